pub mod flat;
pub mod hierarchical;

use crate::input::{BuildingColumn, CalculatorInputs};
use indexmap::IndexMap;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::debug;

pub(crate) const CLIMATE_DATA_LABEL: &str = "Climate Data";

/// A raw imported cell: numeric parse is attempted first, with the verbatim
/// text kept when it fails so diagnostics can show what was actually there.
#[derive(Clone, Debug, PartialEq)]
pub enum ParsedValue {
    Number(f64),
    Text(String),
}

impl ParsedValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(number) => ParsedValue::Number(number),
            Err(_) => ParsedValue::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParsedValue::Number(number) => Some(*number),
            ParsedValue::Text(_) => None,
        }
    }
}

/// Recognized glazing parameter labels, as they appear in exports.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
pub enum GlazingParameter {
    #[strum(serialize = "North Area (Agn)")]
    NorthArea,
    #[strum(serialize = "East Area (Age)")]
    EastArea,
    #[strum(serialize = "South Area (Ags)")]
    SouthArea,
    #[strum(serialize = "West Area (Agw)")]
    WestArea,
    #[strum(serialize = "Perimeter (P)")]
    Perimeter,
    #[strum(serialize = "U-Value (U)")]
    UValue,
    #[strum(serialize = "SHGC")]
    Shgc,
}

/// Recognized opaque-element parameter labels.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
pub enum OpaqueParameter {
    #[strum(serialize = "Area (A)")]
    Area,
    #[strum(serialize = "R-Value (R)")]
    RValue,
    #[strum(serialize = "F-Factor (F)")]
    FFactor,
    #[strum(serialize = "Perimeter (P)")]
    Perimeter,
    #[strum(serialize = "C-Factor (C)")]
    CFactor,
}

/// Recognized climate parameter labels.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
pub enum ClimateParameter {
    #[strum(serialize = "Heating Degree Days (HDD)")]
    HeatingDegreeDays,
    #[strum(serialize = "Cooling Degree Days (CDD)")]
    CoolingDegreeDays,
    #[strum(serialize = "Heating Base Temp")]
    HeatingBaseTemp,
    #[strum(serialize = "Cooling Base Temp")]
    CoolingBaseTemp,
    #[strum(serialize = "North Solar Radiation")]
    NorthSolarRadiation,
    #[strum(serialize = "East Solar Radiation")]
    EastSolarRadiation,
    #[strum(serialize = "South Solar Radiation")]
    SouthSolarRadiation,
    #[strum(serialize = "West Solar Radiation")]
    WestSolarRadiation,
    #[strum(serialize = "Airflow Rate (CFM)")]
    AirflowRate,
    #[strum(serialize = "Current Energy Load")]
    CurrentEnergyLoad,
}

/// Category labels recognized by the hierarchical grammar.
#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, Eq, Hash, PartialEq)]
pub enum CategoryLabel {
    #[strum(serialize = "Glazing")]
    Glazing,
    #[strum(serialize = "Element")]
    Element,
    #[strum(serialize = "Above Grade Element")]
    AboveGradeElement,
    #[strum(serialize = "On/Sub-grade Slab")]
    OnSubGradeSlab,
    #[strum(serialize = "Basement Walls")]
    BasementWalls,
}

impl CategoryLabel {
    pub(crate) const OPAQUE: [CategoryLabel; 4] = [
        CategoryLabel::Element,
        CategoryLabel::AboveGradeElement,
        CategoryLabel::OnSubGradeSlab,
        CategoryLabel::BasementWalls,
    ];
}

/// Result of a flat (single-building) import.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatImport {
    pub building: BuildingColumn,
    pub climate_values: IndexMap<ClimateParameter, f64>,
    pub unrecognized: IndexMap<String, ParsedValue>,
}

impl FlatImport {
    /// Replace the building list with the imported building and overlay any
    /// imported climate values. Only called on a successful parse, so a
    /// failed import leaves existing inputs untouched.
    pub fn apply_to(&self, inputs: &mut CalculatorInputs) {
        inputs.buildings = vec![self.building.clone()];
        apply_climate_values(inputs, &self.climate_values);
    }
}

/// Result of a hierarchical (multi-building) import.
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchicalImport {
    pub buildings: Vec<BuildingColumn>,
    pub climate_values: IndexMap<ClimateParameter, f64>,
    pub unrecognized: IndexMap<String, ParsedValue>,
}

impl HierarchicalImport {
    pub fn apply_to(&self, inputs: &mut CalculatorInputs) {
        inputs.buildings = self.buildings.clone();
        apply_climate_values(inputs, &self.climate_values);
    }
}

fn apply_climate_values(
    inputs: &mut CalculatorInputs,
    values: &IndexMap<ClimateParameter, f64>,
) {
    let mut touched_climate = false;
    for (parameter, value) in values {
        match parameter {
            ClimateParameter::AirflowRate => inputs.airflow_rate = *value,
            ClimateParameter::CurrentEnergyLoad => inputs.current_energy_load = *value,
            climate_parameter => {
                touched_climate = true;
                let climate = &mut inputs.climate;
                match climate_parameter {
                    ClimateParameter::HeatingDegreeDays => climate.heating_degree_days = *value,
                    ClimateParameter::CoolingDegreeDays => climate.cooling_degree_days = *value,
                    ClimateParameter::HeatingBaseTemp => climate.heating_base_temp = *value,
                    ClimateParameter::CoolingBaseTemp => climate.cooling_base_temp = *value,
                    ClimateParameter::NorthSolarRadiation => {
                        climate.north_solar_radiation = *value
                    }
                    ClimateParameter::EastSolarRadiation => climate.east_solar_radiation = *value,
                    ClimateParameter::SouthSolarRadiation => {
                        climate.south_solar_radiation = *value
                    }
                    ClimateParameter::WestSolarRadiation => climate.west_solar_radiation = *value,
                    ClimateParameter::AirflowRate | ClimateParameter::CurrentEnergyLoad => {
                        unreachable!()
                    }
                }
            }
        }
    }
    if touched_climate {
        // imported climate counts as manual entry, not a reduced weather file
        inputs.climate.is_manual_input = true;
        inputs.climate.source_file = None;
    }
}

/// Record one `Climate Data` key/value pair, routing unknown or non-numeric
/// parameters to the diagnostics bucket.
pub(crate) fn record_climate_value(
    parameter: &str,
    value: ParsedValue,
    climate_values: &mut IndexMap<ClimateParameter, f64>,
    unrecognized: &mut IndexMap<String, ParsedValue>,
) {
    match ClimateParameter::from_str(parameter) {
        Ok(recognized) => match value.as_number() {
            Some(number) => {
                climate_values.insert(recognized, number);
            }
            None => {
                unrecognized.insert(format!("{CLIMATE_DATA_LABEL}_{parameter}"), value);
            }
        },
        Err(_) => {
            debug!(parameter, "unrecognized climate parameter");
            unrecognized.insert(format!("{CLIMATE_DATA_LABEL}_{parameter}"), value);
        }
    }
}

/// Trimmed view of a record's fields.
pub(crate) fn fields_of(record: &csv::StringRecord) -> Vec<&str> {
    record.iter().map(str::trim).collect()
}
