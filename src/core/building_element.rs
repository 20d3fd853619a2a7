use crate::core::units::{Facade, HOURS_PER_DAY};
use crate::input::{ClimateData, Element};

impl Element {
    /// Annual envelope heat loss contribution in BTU. Elements with a zero
    /// conductance path contribute exactly 0 rather than a division blow-up.
    pub fn heat_loss(&self, climate: &ClimateData) -> f64 {
        let hdd = climate.heating_degree_days;
        match *self {
            Element::AboveGrade { area, r_value } => {
                if r_value == 0.0 {
                    return 0.0;
                }
                (area / r_value) * hdd * HOURS_PER_DAY as f64
            }
            Element::Slab {
                f_factor,
                perimeter,
            } => slab_loss_gain(f_factor, perimeter, climate).0,
            Element::BasementWall { area, c_factor } => {
                area * c_factor * hdd * HOURS_PER_DAY as f64
            }
            Element::Glazing { u_value, .. } => {
                self.glazing_area() * u_value * hdd * HOURS_PER_DAY as f64
            }
        }
    }

    /// Annual envelope heat gain contribution in BTU. Basement walls use the
    /// same effective conductance as for loss, unlike the above-grade
    /// reciprocal treatment.
    pub fn heat_gain(&self, climate: &ClimateData) -> f64 {
        let cdd = climate.cooling_degree_days;
        match *self {
            Element::AboveGrade { area, r_value } => {
                if r_value == 0.0 {
                    return 0.0;
                }
                area * (1.0 / r_value) * cdd * HOURS_PER_DAY as f64
            }
            Element::Slab {
                f_factor,
                perimeter,
            } => slab_loss_gain(f_factor, perimeter, climate).1,
            Element::BasementWall { area, c_factor } => {
                area * c_factor * cdd * HOURS_PER_DAY as f64
            }
            Element::Glazing { u_value, .. } => {
                self.glazing_area() * u_value * cdd * HOURS_PER_DAY as f64
            }
        }
    }

    /// Annual solar heat gain through glazing, from the per-facade area
    /// split. Other categories admit no solar gain.
    pub fn solar_gain(&self, climate: &ClimateData) -> f64 {
        match *self {
            Element::Glazing {
                shgc,
                north_area,
                east_area,
                south_area,
                west_area,
                ..
            } => {
                let facade_areas = [north_area, east_area, south_area, west_area];
                Facade::ALL
                    .iter()
                    .zip(facade_areas)
                    .map(|(facade, area)| {
                        area.unwrap_or(0.0) * shgc * climate.solar_radiation(*facade)
                    })
                    .sum()
            }
            _ => 0.0,
        }
    }

    /// Glazing area used for conductive loss/gain: the sum of the facade
    /// sub-areas when a split is present, otherwise the flat area field.
    pub fn glazing_area(&self) -> f64 {
        match *self {
            Element::Glazing {
                area,
                north_area,
                east_area,
                south_area,
                west_area,
                ..
            } => {
                let facade_areas = [north_area, east_area, south_area, west_area];
                if facade_areas.iter().any(Option::is_some) {
                    facade_areas.iter().map(|a| a.unwrap_or(0.0)).sum()
                } else {
                    area.unwrap_or(0.0)
                }
            }
            _ => 0.0,
        }
    }

    /// Glazing perimeter feeding the building-level infiltration term.
    pub fn glazing_perimeter(&self) -> f64 {
        match *self {
            Element::Glazing { perimeter, .. } => perimeter,
            _ => 0.0,
        }
    }
}

/// Slab-on-grade perimeter loss and gain shares. The annual perimeter flux is
/// apportioned between heating and cooling by each one's degree-day share,
/// which requires an explicit zero guard on the degree-day sum.
fn slab_loss_gain(f_factor: f64, perimeter: f64, climate: &ClimateData) -> (f64, f64) {
    let hdd = climate.heating_degree_days;
    let cdd = climate.cooling_degree_days;
    let degree_day_sum = hdd + cdd;
    if f_factor == 0.0 || perimeter == 0.0 || degree_day_sum == 0.0 {
        return (0.0, 0.0);
    }
    let qc = f_factor * perimeter;
    let q_annual = qc * degree_day_sum * HOURS_PER_DAY as f64;
    (
        q_annual * hdd / degree_day_sum,
        q_annual * cdd / degree_day_sum,
    )
}
