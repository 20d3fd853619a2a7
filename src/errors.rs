use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvloadError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Error while reducing weather file: {0}")]
    WeatherParse(#[from] WeatherParseError),
    #[error("Error while importing tabular data: {0}")]
    ImportParse(#[from] ImportParseError),
    #[error("Error while loading persisted inputs: {0}")]
    Snapshot(#[from] SnapshotError),
    #[error("Error identified during load calculation: {0}")]
    FailureInCalculation(#[from] CalculationError),
}

/// Weather reduction failures. The caller is expected to keep its previous
/// climate data when one of these is returned.
#[derive(Debug, Error)]
pub enum WeatherParseError {
    #[error("weather file has no column whose label contains {label:?}")]
    MissingColumn { label: &'static str },
    #[error("weather file contains no data rows with a numeric dry bulb temperature")]
    NoDataRows,
    #[error("weather file could not be read: {0}")]
    Read(#[from] csv::Error),
}

/// Tabular import failures. Importers never return partial data: on any of
/// these the caller's existing inputs are left untouched.
#[derive(Debug, Error)]
pub enum ImportParseError {
    #[error("import file could not be read: {0}")]
    Read(#[from] csv::Error),
    #[error("import file contained no recognized rows")]
    Empty,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("persisted inputs could not be deserialized: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("persisted inputs use unsupported schema version {0}")]
    UnsupportedVersion(u64),
    #[error("persisted inputs version field must be an unsigned integer")]
    InvalidVersionField,
}

#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("no building with id {0:?} in inputs")]
    UnknownBuilding(String),
    #[error("building {building_id:?} has no element at index {index}")]
    ElementIndexOutOfRange { building_id: String, index: usize },
    #[error(
        "element at index {index} in building {building_id:?} carries no resistance or transmittance to sweep"
    )]
    NotSweepable { building_id: String, index: usize },
    #[error("sweep step must be positive, got {0}")]
    NonPositiveStep(f64),
}
