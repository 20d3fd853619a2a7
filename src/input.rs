use crate::core::units::{Facade, DEFAULT_MANUAL_BASE_TEMP};
use crate::errors::SnapshotError;
use serde::{Deserialize, Serialize};
use std::io::Read;

pub const SNAPSHOT_SCHEMA_VERSION: u64 = 1;

/// Annual climate summary consumed by the engine. Degree-day fields are
/// derived values: while `is_manual_input` is false they only ever come out
/// of the weather-file reducer, never direct user edits.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimateData {
    pub heating_degree_days: f64,
    pub cooling_degree_days: f64,
    pub heating_base_temp: f64,
    pub cooling_base_temp: f64,
    pub north_solar_radiation: f64,
    pub south_solar_radiation: f64,
    pub east_solar_radiation: f64,
    pub west_solar_radiation: f64,
    pub is_manual_input: bool,
    #[serde(default)]
    pub source_file: Option<String>,
}

impl Default for ClimateData {
    fn default() -> Self {
        Self {
            heating_degree_days: 0.0,
            cooling_degree_days: 0.0,
            heating_base_temp: DEFAULT_MANUAL_BASE_TEMP,
            cooling_base_temp: DEFAULT_MANUAL_BASE_TEMP,
            north_solar_radiation: 0.0,
            south_solar_radiation: 0.0,
            east_solar_radiation: 0.0,
            west_solar_radiation: 0.0,
            is_manual_input: true,
            source_file: None,
        }
    }
}

impl ClimateData {
    pub fn solar_radiation(&self, facade: Facade) -> f64 {
        match facade {
            Facade::North => self.north_solar_radiation,
            Facade::East => self.east_solar_radiation,
            Facade::South => self.south_solar_radiation,
            Facade::West => self.west_solar_radiation,
        }
    }
}

/// An envelope element. Each category carries exactly the fields that are
/// meaningful to it, so a mismatched field set is unrepresentable.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum Element {
    #[serde(rename_all = "camelCase")]
    Glazing {
        /// Flat glazing area, used when no per-facade split is present.
        #[serde(default)]
        area: Option<f64>,
        #[serde(default)]
        north_area: Option<f64>,
        #[serde(default)]
        east_area: Option<f64>,
        #[serde(default)]
        south_area: Option<f64>,
        #[serde(default)]
        west_area: Option<f64>,
        #[serde(default)]
        u_value: f64,
        #[serde(default)]
        shgc: f64,
        #[serde(default)]
        perimeter: f64,
    },
    #[serde(rename_all = "camelCase")]
    AboveGrade {
        #[serde(default)]
        area: f64,
        #[serde(default)]
        r_value: f64,
    },
    #[serde(rename_all = "camelCase")]
    Slab {
        #[serde(default)]
        f_factor: f64,
        #[serde(default)]
        perimeter: f64,
    },
    #[serde(rename_all = "camelCase")]
    BasementWall {
        #[serde(default)]
        area: f64,
        #[serde(default)]
        c_factor: f64,
    },
}

/// One building envelope under comparison. Element order is display order
/// only and has no effect on totals.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingColumn {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInputs {
    #[serde(default)]
    pub climate: ClimateData,
    #[serde(default)]
    pub airflow_rate: f64,
    #[serde(default)]
    pub current_energy_load: f64,
    // missing in snapshots persisted before buildings became a sequence
    #[serde(default)]
    pub buildings: Vec<BuildingColumn>,
}

#[derive(Debug, Deserialize)]
struct VersionedSnapshot {
    #[allow(dead_code)]
    version: u64,
    inputs: CalculatorInputs,
}

/// Load persisted calculator inputs. Accepts the versioned envelope
/// `{"version": 1, "inputs": {...}}` as well as a bare pre-envelope
/// `CalculatorInputs` object, which is treated as version 1.
pub fn ingest_snapshot(json: impl Read) -> Result<CalculatorInputs, SnapshotError> {
    let value: serde_json::Value = serde_json::from_reader(json)?;
    match value.get("version") {
        Some(version) => {
            let version = version.as_u64().ok_or(SnapshotError::InvalidVersionField)?;
            if version != SNAPSHOT_SCHEMA_VERSION {
                return Err(SnapshotError::UnsupportedVersion(version));
            }
            let snapshot: VersionedSnapshot = serde_json::from_value(value)?;
            Ok(snapshot.inputs)
        }
        None => Ok(serde_json::from_value(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;
    use std::io::Cursor;

    #[fixture]
    fn climate_json() -> serde_json::Value {
        json!({
            "heatingDegreeDays": 5000.0,
            "coolingDegreeDays": 1000.0,
            "heatingBaseTemp": 65.0,
            "coolingBaseTemp": 65.0,
            "northSolarRadiation": 100.0,
            "southSolarRadiation": 400.0,
            "eastSolarRadiation": 250.0,
            "westSolarRadiation": 250.0,
            "isManualInput": true
        })
    }

    #[rstest]
    fn should_ingest_versioned_snapshot(climate_json: serde_json::Value) {
        let snapshot = json!({
            "version": 1,
            "inputs": {
                "climate": climate_json,
                "airflowRate": 0.01,
                "currentEnergyLoad": 1_000_000.0,
                "buildings": [
                    {
                        "id": "1",
                        "name": "Existing",
                        "elements": [
                            {"category": "aboveGrade", "area": 400.0, "rValue": 15.0}
                        ]
                    }
                ]
            }
        });
        let inputs = ingest_snapshot(Cursor::new(snapshot.to_string())).unwrap();
        assert_eq!(inputs.climate.heating_degree_days, 5000.0);
        assert_eq!(inputs.buildings.len(), 1);
        assert_eq!(
            inputs.buildings[0].elements[0],
            Element::AboveGrade {
                area: 400.0,
                r_value: 15.0
            }
        );
    }

    #[rstest]
    fn should_ingest_bare_inputs_as_version_1(climate_json: serde_json::Value) {
        let snapshot = json!({"climate": climate_json, "airflowRate": 0.02});
        let inputs = ingest_snapshot(Cursor::new(snapshot.to_string())).unwrap();
        assert_eq!(inputs.airflow_rate, 0.02);
        assert_eq!(inputs.current_energy_load, 0.0);
    }

    #[rstest]
    fn should_default_missing_buildings_to_empty(climate_json: serde_json::Value) {
        let snapshot = json!({"version": 1, "inputs": {"climate": climate_json}});
        let inputs = ingest_snapshot(Cursor::new(snapshot.to_string())).unwrap();
        assert_eq!(
            inputs.buildings,
            vec![],
            "missing building sequence must load as empty, not fail"
        );
    }

    #[rstest]
    fn should_reject_unsupported_schema_version() {
        let snapshot = json!({"version": 9, "inputs": {}});
        assert!(matches!(
            ingest_snapshot(Cursor::new(snapshot.to_string())),
            Err(SnapshotError::UnsupportedVersion(9))
        ));
    }

    #[rstest]
    fn should_reject_non_integer_version() {
        let snapshot = json!({"version": "one", "inputs": {}});
        assert!(matches!(
            ingest_snapshot(Cursor::new(snapshot.to_string())),
            Err(SnapshotError::InvalidVersionField)
        ));
    }

    #[rstest]
    fn should_round_trip_element_categories() {
        let glazing = Element::Glazing {
            area: None,
            north_area: Some(120.0),
            east_area: Some(80.0),
            south_area: Some(200.0),
            west_area: Some(80.0),
            u_value: 0.3,
            shgc: 0.4,
            perimeter: 96.0,
        };
        let value = serde_json::to_value(&glazing).unwrap();
        assert_eq!(value["category"], "glazing");
        assert_eq!(serde_json::from_value::<Element>(value).unwrap(), glazing);

        let slab = Element::Slab {
            f_factor: 0.73,
            perimeter: 140.0,
        };
        let value = serde_json::to_value(&slab).unwrap();
        assert_eq!(value["category"], "slab");
        assert_eq!(serde_json::from_value::<Element>(value).unwrap(), slab);
    }

    #[rstest]
    fn manual_climate_defaults_to_legacy_base_temperature() {
        let climate = ClimateData::default();
        assert!(climate.is_manual_input);
        assert_eq!(climate.heating_base_temp, 65.0);
        assert_eq!(climate.cooling_base_temp, 65.0);
    }
}
