use crate::core::units::{
    facade_for_azimuth, facade_for_hour, round_to_one_decimal, Facade, HOURS_PER_DAY,
};
use crate::errors::WeatherParseError;
use crate::input::ClimateData;
use csv::ReaderBuilder as CsvReaderBuilder;
use std::io::Read;
use tracing::debug;

const DATA_PERIODS_MARKER: &str = "data periods";
/// Conventional EPW header-block length, used when no marker line is found.
const FALLBACK_HEADER_ROW: usize = 8;

const DRY_BULB_LABEL: &str = "dry bulb";
const GLOBAL_HORIZONTAL_LABEL: &str = "global horiz";
const AZIMUTH_LABEL: &str = "azimuth";

/// Reduce an hourly annual weather record to degree-days and per-facade
/// solar radiation totals. On failure the caller keeps its previous climate
/// data; nothing partial is ever returned.
pub fn reduce_weather_data(
    file: impl Read,
    heating_base_temp: f64,
    cooling_base_temp: f64,
    source_file: Option<&str>,
) -> Result<ClimateData, WeatherParseError> {
    let mut reader = CsvReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(file);
    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, _>>()?;

    // the label row sits one past the marker line when a marker exists
    let header_row = records
        .iter()
        .position(|record| {
            record
                .get(0)
                .is_some_and(|field| field.trim().to_lowercase().starts_with(DATA_PERIODS_MARKER))
        })
        .map(|marker_row| marker_row + 1)
        .unwrap_or(FALLBACK_HEADER_ROW);
    let header = records.get(header_row).ok_or(WeatherParseError::NoDataRows)?;

    let column_for = |label: &str| {
        header
            .iter()
            .position(|field| field.to_lowercase().contains(label))
    };
    let temp_column =
        column_for(DRY_BULB_LABEL).ok_or(WeatherParseError::MissingColumn {
            label: DRY_BULB_LABEL,
        })?;
    let radiation_column =
        column_for(GLOBAL_HORIZONTAL_LABEL).ok_or(WeatherParseError::MissingColumn {
            label: GLOBAL_HORIZONTAL_LABEL,
        })?;
    let azimuth_column = column_for(AZIMUTH_LABEL);

    let mut heating_degree_hours = 0.0;
    let mut cooling_degree_hours = 0.0;
    let mut solar_totals = [0.0; 4];
    let mut numeric_rows = 0_usize;

    for (row_index, record) in records.iter().skip(header_row + 1).enumerate() {
        let temp: f64 = match record
            .get(temp_column)
            .and_then(|field| field.trim().parse().ok())
        {
            Some(temp) => temp,
            None => {
                debug!(row_index, "skipping weather row without a numeric dry bulb");
                continue;
            }
        };
        numeric_rows += 1;

        if temp < heating_base_temp {
            heating_degree_hours += heating_base_temp - temp;
        }
        if temp > cooling_base_temp {
            cooling_degree_hours += temp - cooling_base_temp;
        }

        let facade = azimuth_column
            .and_then(|column| record.get(column))
            .and_then(|field| field.trim().parse::<f64>().ok())
            .map(facade_for_azimuth)
            .unwrap_or_else(|| facade_for_hour(row_index % HOURS_PER_DAY as usize));
        let radiation: f64 = record
            .get(radiation_column)
            .and_then(|field| field.trim().parse().ok())
            .unwrap_or(0.0);
        solar_totals[facade_index(facade)] += radiation;
    }

    if numeric_rows == 0 {
        return Err(WeatherParseError::NoDataRows);
    }

    Ok(ClimateData {
        heating_degree_days: round_to_one_decimal(heating_degree_hours / HOURS_PER_DAY as f64),
        cooling_degree_days: round_to_one_decimal(cooling_degree_hours / HOURS_PER_DAY as f64),
        heating_base_temp,
        cooling_base_temp,
        north_solar_radiation: round_to_one_decimal(solar_totals[facade_index(Facade::North)]),
        south_solar_radiation: round_to_one_decimal(solar_totals[facade_index(Facade::South)]),
        east_solar_radiation: round_to_one_decimal(solar_totals[facade_index(Facade::East)]),
        west_solar_radiation: round_to_one_decimal(solar_totals[facade_index(Facade::West)]),
        is_manual_input: false,
        source_file: source_file.map(str::to_string),
    })
}

fn facade_index(facade: Facade) -> usize {
    match facade {
        Facade::North => 0,
        Facade::East => 1,
        Facade::South => 2,
        Facade::West => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    const HEADER_WITH_AZIMUTH: &str =
        "Year,Month,Day,Hour,Dry Bulb Temperature {C},Global Horizontal Radiation {Wh/m2},Solar Azimuth {deg}";

    fn weather_file(header: &str, data_rows: &[&str]) -> String {
        let mut lines = vec![
            "LOCATION,Testville,XX,XXX,000000,0.0,0.0,0.0,100.0".to_string(),
            "DESIGN CONDITIONS,0".to_string(),
            "DATA PERIODS,1,1,Data,Sunday, 1/ 1,12/31".to_string(),
            header.to_string(),
        ];
        lines.extend(data_rows.iter().map(|row| row.to_string()));
        lines.join("\n")
    }

    #[rstest]
    fn should_reduce_degree_days_and_azimuth_bucketed_solar() {
        let file = weather_file(
            HEADER_WITH_AZIMUTH,
            &[
                "1987,1,1,1,6,500,90",
                "1987,1,1,2,30,300,200",
            ],
        );
        let climate =
            reduce_weather_data(Cursor::new(file), 18.0, 24.0, Some("test.epw")).unwrap();
        // deficit 12 + excess 6 degree-hours over 24
        assert_eq!(climate.heating_degree_days, 0.5);
        assert_eq!(climate.cooling_degree_days, 0.3);
        assert_eq!(climate.east_solar_radiation, 500.0);
        assert_eq!(climate.south_solar_radiation, 300.0);
        assert_eq!(climate.north_solar_radiation, 0.0);
        assert_eq!(climate.west_solar_radiation, 0.0);
        assert!(!climate.is_manual_input);
        assert_eq!(climate.source_file.as_deref(), Some("test.epw"));
    }

    #[rstest]
    fn should_fall_back_to_hour_of_day_without_azimuth_column() {
        let header = "Year,Month,Day,Hour,Dry Bulb Temperature {C},Global Horizontal Radiation {Wh/m2}";
        let rows: Vec<String> = (0..8)
            .map(|hour| format!("1987,1,1,{},20,100", hour + 1))
            .collect();
        let row_refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = weather_file(header, &row_refs);
        let climate = reduce_weather_data(Cursor::new(file), 18.0, 24.0, None).unwrap();
        // rows 0-5 are night/morning hours, rows 6 and 7 the east-sun hours
        assert_eq!(climate.north_solar_radiation, 600.0);
        assert_eq!(climate.east_solar_radiation, 200.0);
        assert_eq!(climate.source_file, None);
    }

    #[rstest]
    fn should_use_fixed_header_offset_when_marker_is_absent() {
        let mut lines: Vec<String> = (0..8).map(|i| format!("HEADER LINE {i}")).collect();
        lines.push(HEADER_WITH_AZIMUTH.to_string());
        lines.push("1987,1,1,1,10,250,45".to_string());
        let climate =
            reduce_weather_data(Cursor::new(lines.join("\n")), 18.0, 24.0, None).unwrap();
        assert_eq!(climate.heating_degree_days, 0.3);
        assert_eq!(climate.east_solar_radiation, 250.0, "45 degrees belongs to East");
    }

    #[rstest]
    fn should_skip_rows_without_numeric_dry_bulb() {
        let file = weather_file(
            HEADER_WITH_AZIMUTH,
            &[
                "1987,1,1,1,missing,500,90",
                "1987,1,1,2,6,250,90",
            ],
        );
        let climate = reduce_weather_data(Cursor::new(file), 18.0, 24.0, None).unwrap();
        assert_eq!(climate.heating_degree_days, 0.5);
        assert_eq!(
            climate.east_solar_radiation, 250.0,
            "skipped rows must not accumulate solar radiation"
        );
    }

    #[rstest]
    fn should_fail_without_dry_bulb_column() {
        let file = weather_file(
            "Year,Month,Day,Hour,Global Horizontal Radiation {Wh/m2}",
            &["1987,1,1,1,500"],
        );
        assert!(matches!(
            reduce_weather_data(Cursor::new(file), 18.0, 24.0, None),
            Err(WeatherParseError::MissingColumn { label: "dry bulb" })
        ));
    }

    #[rstest]
    fn should_fail_when_no_row_is_numeric() {
        let file = weather_file(HEADER_WITH_AZIMUTH, &["1987,1,1,1,n/a,500,90"]);
        assert!(matches!(
            reduce_weather_data(Cursor::new(file), 18.0, 24.0, None),
            Err(WeatherParseError::NoDataRows)
        ));
    }

    #[rstest]
    fn should_fail_on_empty_file() {
        assert!(matches!(
            reduce_weather_data(Cursor::new(""), 18.0, 24.0, None),
            Err(WeatherParseError::NoDataRows)
        ));
    }
}
