use std::fmt::Display;

pub const HOURS_PER_DAY: u32 = 24;

/// Sensible heat factor for air at standard conditions, in BTU/(h·CFM·°F).
pub const INFILTRATION_AIR_FACTOR: f64 = 1.08;

/// Reducer-side base temperatures, in the weather record's Celsius unit system.
pub const DEFAULT_HEATING_BASE_TEMP: f64 = 18.0;
pub const DEFAULT_COOLING_BASE_TEMP: f64 = 24.0;

/// Base temperature used for manually entered climate data (legacy Fahrenheit
/// convention carried over from ASHRAE 65°F degree-day tables).
pub const DEFAULT_MANUAL_BASE_TEMP: f64 = 65.0;

/// One of the four compass-oriented building faces used to bucket solar
/// radiation and glazing area.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Facade {
    North,
    East,
    South,
    West,
}

impl Facade {
    pub const ALL: [Facade; 4] = [Facade::North, Facade::East, Facade::South, Facade::West];
}

impl Display for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Facade::North => "North",
                Facade::East => "East",
                Facade::South => "South",
                Facade::West => "West",
            }
        )
    }
}

/// Map a solar azimuth in degrees to the facade receiving that radiation.
/// Quadrants are 90° wide: the 45° boundary belongs to East and the 315°
/// boundary to West; 0° and 360° both fall to North.
pub fn facade_for_azimuth(azimuth: f64) -> Facade {
    if (45.0..135.0).contains(&azimuth) {
        Facade::East
    } else if (135.0..225.0).contains(&azimuth) {
        Facade::South
    } else if (225.0..=315.0).contains(&azimuth) {
        Facade::West
    } else {
        Facade::North
    }
}

/// Time-of-day fallback used when a weather record carries no azimuth column.
pub fn facade_for_hour(hour_of_day: usize) -> Facade {
    match hour_of_day {
        6..=11 => Facade::East,
        12 => Facade::South,
        13..=17 => Facade::West,
        _ => Facade::North,
    }
}

pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
