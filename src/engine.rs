use crate::core::units::INFILTRATION_AIR_FACTOR;
use crate::input::{BuildingColumn, CalculatorInputs, ClimateData};
use serde::{Deserialize, Serialize};

/// Knobs the engine exposes beyond the inputs themselves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineSettings {
    /// Scale applied to the infiltration term on top of the 1.08 air factor.
    /// The default of 1.0 is the raw-CFM convention
    /// `perimeter × 1.08 × CFM × degree-days`; a per-thousand daily
    /// convention is available as `24.0 / 1000.0`.
    pub infiltration_scale: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            infiltration_scale: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingResult {
    pub id: String,
    pub name: String,
    /// Rounded sum of every loss/gain component, the per-building headline.
    pub total_energy: f64,
    pub envelope_heat_loss: f64,
    pub envelope_heat_gain: f64,
    pub solar_heat_gain: f64,
    pub infiltration_heat_loss: f64,
    pub infiltration_heat_gain: f64,
    pub glazing_area: f64,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResults {
    pub envelope_heat_loss: f64,
    pub envelope_heat_gain: f64,
    pub solar_heat_gain: f64,
    pub infiltration_heat_loss: f64,
    pub infiltration_heat_gain: f64,
    pub total_glazing_area: f64,
    pub buildings: Vec<BuildingResult>,
}

pub fn calculate(inputs: &CalculatorInputs) -> CalculatorResults {
    calculate_with_settings(inputs, &EngineSettings::default())
}

/// Pure function of the inputs: identical inputs produce bit-identical
/// results, and nothing is cached between invocations. Rounding happens only
/// on the per-building `total_energy` reporting boundary.
pub fn calculate_with_settings(
    inputs: &CalculatorInputs,
    settings: &EngineSettings,
) -> CalculatorResults {
    let climate = &inputs.climate;
    let mut results = CalculatorResults::default();

    for building in &inputs.buildings {
        let mut envelope_heat_loss = 0.0;
        let mut envelope_heat_gain = 0.0;
        let mut solar_heat_gain = 0.0;
        let mut glazing_area = 0.0;

        for element in &building.elements {
            envelope_heat_loss += element.heat_loss(climate);
            envelope_heat_gain += element.heat_gain(climate);
            solar_heat_gain += element.solar_gain(climate);
            glazing_area += element.glazing_area();
        }

        let (infiltration_heat_loss, infiltration_heat_gain) =
            infiltration_loss_gain(building, climate, inputs.airflow_rate, settings);

        let total_energy = (envelope_heat_loss
            + envelope_heat_gain
            + solar_heat_gain
            + infiltration_heat_loss
            + infiltration_heat_gain)
            .round();

        results.envelope_heat_loss += envelope_heat_loss;
        results.envelope_heat_gain += envelope_heat_gain;
        results.solar_heat_gain += solar_heat_gain;
        results.infiltration_heat_loss += infiltration_heat_loss;
        results.infiltration_heat_gain += infiltration_heat_gain;
        results.total_glazing_area += glazing_area;

        results.buildings.push(BuildingResult {
            id: building.id.clone(),
            name: building.name.clone(),
            total_energy,
            envelope_heat_loss,
            envelope_heat_gain,
            solar_heat_gain,
            infiltration_heat_loss,
            infiltration_heat_gain,
            glazing_area,
        });
    }

    results
}

/// Total annual heat loss for one building: envelope plus infiltration.
/// This is the metric tracked by sensitivity sweeps.
pub(crate) fn building_heat_loss(
    building: &BuildingColumn,
    climate: &ClimateData,
    airflow_rate: f64,
    settings: &EngineSettings,
) -> f64 {
    let envelope: f64 = building
        .elements
        .iter()
        .map(|element| element.heat_loss(climate))
        .sum();
    envelope + infiltration_loss_gain(building, climate, airflow_rate, settings).0
}

/// Infiltration is driven by the summed glazing perimeters only; opaque
/// elements carry no crack length in this model.
fn infiltration_loss_gain(
    building: &BuildingColumn,
    climate: &ClimateData,
    airflow_rate: f64,
    settings: &EngineSettings,
) -> (f64, f64) {
    let total_perimeter: f64 = building
        .elements
        .iter()
        .map(|element| element.glazing_perimeter())
        .sum();
    let conductance =
        total_perimeter * INFILTRATION_AIR_FACTOR * airflow_rate * settings.infiltration_scale;
    (
        conductance * climate.heating_degree_days,
        conductance * climate.cooling_degree_days,
    )
}
