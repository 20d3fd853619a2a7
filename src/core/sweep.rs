use crate::compare_floats::max_of_2;
use crate::engine::{building_heat_loss, EngineSettings};
use crate::errors::CalculationError;
use crate::input::{CalculatorInputs, Element};
use serde::{Deserialize, Serialize};

/// Which thermal property a sweep varies. The two are reciprocals; the swept
/// kind is converted when it differs from the kind the element stores.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SweptValue {
    RValue,
    UValue,
}

/// Inclusive sample range for a sweep.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct SweepRange {
    pub start: f64,
    pub step: f64,
    pub stop: f64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSample {
    pub value: f64,
    pub heat_loss: f64,
    /// Percentage reduction relative to the worst heat loss in the range.
    pub energy_saved: f64,
}

/// Recompute one building's total heat loss across a swept R- or U-value for
/// a single element, holding everything else fixed, and report each sample's
/// saving relative to the range maximum.
pub fn sweep_element(
    inputs: &CalculatorInputs,
    building_id: &str,
    element_index: usize,
    swept: SweptValue,
    range: SweepRange,
) -> Result<Vec<SweepSample>, CalculationError> {
    if range.step <= 0.0 {
        return Err(CalculationError::NonPositiveStep(range.step));
    }
    let building = inputs
        .buildings
        .iter()
        .find(|building| building.id == building_id)
        .ok_or_else(|| CalculationError::UnknownBuilding(building_id.to_string()))?;
    let element = building.elements.get(element_index).ok_or_else(|| {
        CalculationError::ElementIndexOutOfRange {
            building_id: building_id.to_string(),
            index: element_index,
        }
    })?;
    if !matches!(element, Element::AboveGrade { .. } | Element::Glazing { .. }) {
        return Err(CalculationError::NotSweepable {
            building_id: building_id.to_string(),
            index: element_index,
        });
    }

    let settings = EngineSettings::default();
    let losses: Vec<(f64, f64)> = sample_points(range)
        .map(|value| {
            let mut candidate = building.clone();
            substitute(&mut candidate.elements[element_index], swept, value);
            let loss = building_heat_loss(
                &candidate,
                &inputs.climate,
                inputs.airflow_rate,
                &settings,
            );
            (value, loss)
        })
        .collect();

    let max_loss = losses
        .iter()
        .fold(0.0, |max, (_, loss)| max_of_2(max, *loss));

    Ok(losses
        .into_iter()
        .map(|(value, heat_loss)| SweepSample {
            value,
            heat_loss,
            energy_saved: if max_loss == 0.0 {
                0.0
            } else {
                (max_loss - heat_loss) / max_loss * 100.0
            },
        })
        .collect())
}

/// Index-based stepping so accumulated float error cannot drop the stop
/// point from the inclusive range.
fn sample_points(range: SweepRange) -> impl Iterator<Item = f64> {
    let count = ((range.stop - range.start) / range.step + 1e-9).floor() as i64;
    let count = max_of_2(count, 0) as u64;
    (0..=count).map(move |i| range.start + i as f64 * range.step)
}

fn substitute(element: &mut Element, swept: SweptValue, value: f64) {
    match element {
        Element::AboveGrade { r_value, .. } => {
            *r_value = match swept {
                SweptValue::RValue => value,
                SweptValue::UValue => reciprocal(value),
            };
        }
        Element::Glazing { u_value, .. } => {
            *u_value = match swept {
                SweptValue::UValue => value,
                SweptValue::RValue => reciprocal(value),
            };
        }
        // unreachable for sweepable elements; kept total so the match stays
        // exhaustive if categories grow
        _ => {}
    }
}

fn reciprocal(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        1.0 / value
    }
}
