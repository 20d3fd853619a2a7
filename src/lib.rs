pub mod compare_floats;
pub mod core;
pub mod engine;
pub mod errors;
pub mod import;
pub mod input;
pub mod output;
pub mod read_weather_file;

pub use crate::engine::{calculate, BuildingResult, CalculatorResults};
pub use crate::input::{ingest_snapshot, CalculatorInputs};

use crate::errors::EnvloadError;
use crate::import::ClimateParameter;
use crate::output::Output;
use csv::WriterBuilder;

const RESULTS_LOCATION_KEY: &str = "results";
const ENERGY_UNIT: &str = "[BTU/yr]";

/// Calculate the comparison for the given inputs and write the result export
/// through the output. This is the whole engine surface the surrounding
/// application drives: it holds no state between invocations.
pub fn run_comparison(
    inputs: &CalculatorInputs,
    output: impl Output,
) -> Result<CalculatorResults, EnvloadError> {
    let results = engine::calculate(inputs);
    if !output.is_noop() {
        write_results_file(&output, inputs, &results)?;
    }
    Ok(results)
}

fn write_results_file(
    output: &impl Output,
    inputs: &CalculatorInputs,
    results: &CalculatorResults,
) -> Result<(), anyhow::Error> {
    let writer = output.writer_for_location_key(RESULTS_LOCATION_KEY)?;
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record([
        "Building",
        "Total Energy",
        "Envelope Heat Loss",
        "Envelope Heat Gain",
        "Solar Heat Gain",
        "Infiltration Heat Loss",
        "Infiltration Heat Gain",
    ])?;
    writer.write_record([
        "",
        ENERGY_UNIT,
        ENERGY_UNIT,
        ENERGY_UNIT,
        ENERGY_UNIT,
        ENERGY_UNIT,
        ENERGY_UNIT,
    ])?;

    for building in &results.buildings {
        writer.write_record([
            building.name.clone(),
            building.total_energy.to_string(),
            building.envelope_heat_loss.to_string(),
            building.envelope_heat_gain.to_string(),
            building.solar_heat_gain.to_string(),
            building.infiltration_heat_loss.to_string(),
            building.infiltration_heat_gain.to_string(),
        ])?;
    }

    // climate summary block
    writer.write_record([""])?;
    let climate = &inputs.climate;
    let climate_rows = [
        (ClimateParameter::HeatingDegreeDays, climate.heating_degree_days),
        (ClimateParameter::CoolingDegreeDays, climate.cooling_degree_days),
        (ClimateParameter::HeatingBaseTemp, climate.heating_base_temp),
        (ClimateParameter::CoolingBaseTemp, climate.cooling_base_temp),
        (ClimateParameter::NorthSolarRadiation, climate.north_solar_radiation),
        (ClimateParameter::EastSolarRadiation, climate.east_solar_radiation),
        (ClimateParameter::SouthSolarRadiation, climate.south_solar_radiation),
        (ClimateParameter::WestSolarRadiation, climate.west_solar_radiation),
        (ClimateParameter::AirflowRate, inputs.airflow_rate),
        (ClimateParameter::CurrentEnergyLoad, inputs.current_energy_load),
    ];
    for (parameter, value) in climate_rows {
        writer.write_record([parameter.to_string(), value.to_string()])?;
    }
    writer.write_record([
        "Weather File".to_string(),
        climate
            .source_file
            .clone()
            .unwrap_or_else(|| "manual input".to_string()),
    ])?;

    writer.flush()?;

    Ok(())
}
