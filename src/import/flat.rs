use crate::errors::ImportParseError;
use crate::import::{
    fields_of, record_climate_value, FlatImport, GlazingParameter, OpaqueParameter, ParsedValue,
    CLIMATE_DATA_LABEL,
};
use crate::input::{BuildingColumn, Element};
use csv::ReaderBuilder as CsvReaderBuilder;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::Read;
use strum::IntoEnumIterator;
use tracing::debug;

const GLAZING_SLOT: &str = "Glazing 1";
const OPAQUE_SLOT_PREFIX: &str = "Element";
/// Display names of the five fixed opaque slots, in ordinal order.
const OPAQUE_SLOT_NAMES: [&str; 5] =
    ["Soffit", "Basement Walls", "Roof", "Floor", "Opaque Walls"];

/// Import the flat single-building grammar: `category,parameter,value` rows
/// projected onto one glazing element and up to five fixed opaque slots.
pub fn import_flat(file: impl Read) -> Result<FlatImport, ImportParseError> {
    let mut reader = CsvReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(file);

    let mut values: IndexMap<String, ParsedValue> = IndexMap::new();
    for result in reader.records() {
        let record = result?;
        let fields = fields_of(&record);
        if fields.len() < 3 {
            debug!(?fields, "skipping row with fewer than three fields");
            continue;
        }
        values.insert(
            format!("{}_{}", fields[0], fields[1]),
            ParsedValue::parse(fields[2]),
        );
    }
    if values.is_empty() {
        return Err(ImportParseError::Empty);
    }

    let number_for =
        |key: &str| values.get(key).and_then(ParsedValue::as_number).unwrap_or(0.0);
    let glazing_key = |parameter: GlazingParameter| format!("{GLAZING_SLOT}_{parameter}");

    let mut elements = Vec::new();
    if GlazingParameter::iter().any(|parameter| values.contains_key(&glazing_key(parameter))) {
        elements.push(Element::Glazing {
            area: None,
            north_area: Some(number_for(&glazing_key(GlazingParameter::NorthArea))),
            east_area: Some(number_for(&glazing_key(GlazingParameter::EastArea))),
            south_area: Some(number_for(&glazing_key(GlazingParameter::SouthArea))),
            west_area: Some(number_for(&glazing_key(GlazingParameter::WestArea))),
            u_value: number_for(&glazing_key(GlazingParameter::UValue)),
            shgc: number_for(&glazing_key(GlazingParameter::Shgc)),
            perimeter: number_for(&glazing_key(GlazingParameter::Perimeter)),
        });
    }

    for (slot, slot_name) in OPAQUE_SLOT_NAMES.into_iter().enumerate() {
        let ordinal = slot + 1;
        let area = number_for(&format!(
            "{OPAQUE_SLOT_PREFIX} {ordinal}_{}",
            OpaqueParameter::Area
        ));
        let r_value = number_for(&format!(
            "{OPAQUE_SLOT_PREFIX} {ordinal}_{}",
            OpaqueParameter::RValue
        ));
        if area == 0.0 && r_value == 0.0 {
            debug!(slot_name, "dropping opaque slot with zero area and R-value");
            continue;
        }
        elements.push(Element::AboveGrade { area, r_value });
    }

    let recognized: HashSet<String> = GlazingParameter::iter()
        .map(glazing_key)
        .chain((1..=OPAQUE_SLOT_NAMES.len()).flat_map(|ordinal| {
            [
                format!("{OPAQUE_SLOT_PREFIX} {ordinal}_{}", OpaqueParameter::Area),
                format!("{OPAQUE_SLOT_PREFIX} {ordinal}_{}", OpaqueParameter::RValue),
            ]
        }))
        .collect();

    let mut climate_values = IndexMap::new();
    let mut unrecognized = IndexMap::new();
    for (key, value) in values.iter() {
        if recognized.contains(key) {
            continue;
        }
        if let Some(parameter) = key.strip_prefix(&format!("{CLIMATE_DATA_LABEL}_")) {
            record_climate_value(parameter, value.clone(), &mut climate_values, &mut unrecognized);
        } else {
            debug!(%key, "unrecognized import key");
            unrecognized.insert(key.clone(), value.clone());
        }
    }

    Ok(FlatImport {
        building: BuildingColumn {
            id: "1".into(),
            name: "Building 1".into(),
            elements,
        },
        climate_values,
        unrecognized,
    })
}
