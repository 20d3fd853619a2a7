use crate::errors::ImportParseError;
use crate::import::{
    fields_of, record_climate_value, CategoryLabel, GlazingParameter, HierarchicalImport,
    OpaqueParameter, ParsedValue, CLIMATE_DATA_LABEL,
};
use crate::input::{BuildingColumn, Element};
use csv::ReaderBuilder as CsvReaderBuilder;
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::debug;

/// Import the hierarchical multi-building grammar: building-name rows open a
/// building, category rows set the parameter context, and data rows record
/// `"{building} {category}_{parameter}"` key/value pairs that are projected
/// back onto elements once the whole file has been consumed.
pub fn import_hierarchical(file: impl Read) -> Result<HierarchicalImport, ImportParseError> {
    let mut reader = CsvReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(file);

    let mut building_names: Vec<String> = Vec::new();
    let mut values: IndexMap<String, ParsedValue> = IndexMap::new();
    let mut climate_values = IndexMap::new();
    let mut unrecognized = IndexMap::new();
    let mut current_building: Option<String> = None;
    let mut current_category: Option<CategoryLabel> = None;

    for result in reader.records() {
        let record = result?;
        let fields = fields_of(&record);
        let first = fields.first().copied().unwrap_or("");
        let second = fields.get(1).copied().unwrap_or("");
        let third = fields.get(2).copied().unwrap_or("");

        if first == CLIMATE_DATA_LABEL && !second.is_empty() && !third.is_empty() {
            record_climate_value(
                second,
                ParsedValue::parse(third),
                &mut climate_values,
                &mut unrecognized,
            );
        } else if !first.is_empty() && second.is_empty() {
            if !building_names.iter().any(|name| name == first) {
                building_names.push(first.to_string());
            }
            current_building = Some(first.to_string());
            current_category = None;
        } else if !first.is_empty() && CategoryLabel::from_str(second).is_ok() {
            current_category = CategoryLabel::from_str(second).ok();
        } else if !second.is_empty() && !third.is_empty() {
            match (&current_building, current_category) {
                (Some(building), Some(category)) => {
                    values.insert(
                        format!("{building} {category}_{second}"),
                        ParsedValue::parse(third),
                    );
                }
                _ => debug!(
                    parameter = second,
                    "skipping data row outside a building/category context"
                ),
            }
        } else {
            debug!(?fields, "skipping row matching no grammar shape");
        }
    }

    let mut consumed: HashSet<String> = HashSet::new();
    let mut buildings = Vec::new();
    for (ordinal, name) in building_names.iter().enumerate() {
        let mut elements = Vec::new();

        let glazing_prefix = format!("{name} {}", CategoryLabel::Glazing);
        if GlazingParameter::iter()
            .any(|parameter| values.contains_key(&format!("{glazing_prefix}_{parameter}")))
        {
            let mut glazing_value = |parameter: GlazingParameter| {
                take_number(&values, &mut consumed, format!("{glazing_prefix}_{parameter}"))
            };
            elements.push(Element::Glazing {
                area: None,
                north_area: Some(glazing_value(GlazingParameter::NorthArea)),
                east_area: Some(glazing_value(GlazingParameter::EastArea)),
                south_area: Some(glazing_value(GlazingParameter::SouthArea)),
                west_area: Some(glazing_value(GlazingParameter::WestArea)),
                u_value: glazing_value(GlazingParameter::UValue),
                shgc: glazing_value(GlazingParameter::Shgc),
                perimeter: glazing_value(GlazingParameter::Perimeter),
            });
        }

        for label in CategoryLabel::OPAQUE {
            let category_prefix = format!("{name} {label}");
            // one element per distinct prefix: several parameter rows for
            // the same element collapse here
            let element_prefixes: Vec<String> = values
                .keys()
                .filter(|key| key.starts_with(&category_prefix))
                .filter_map(|key| key.rsplit_once('_').map(|(prefix, _)| prefix.to_string()))
                .unique()
                .collect();
            for prefix in element_prefixes {
                let mut parameter_value = |parameter: OpaqueParameter| {
                    take_number(&values, &mut consumed, format!("{prefix}_{parameter}"))
                };
                elements.push(match label {
                    CategoryLabel::Element | CategoryLabel::AboveGradeElement => {
                        Element::AboveGrade {
                            area: parameter_value(OpaqueParameter::Area),
                            r_value: parameter_value(OpaqueParameter::RValue),
                        }
                    }
                    CategoryLabel::OnSubGradeSlab => Element::Slab {
                        f_factor: parameter_value(OpaqueParameter::FFactor),
                        perimeter: parameter_value(OpaqueParameter::Perimeter),
                    },
                    CategoryLabel::BasementWalls => Element::BasementWall {
                        area: parameter_value(OpaqueParameter::Area),
                        c_factor: parameter_value(OpaqueParameter::CFactor),
                    },
                    CategoryLabel::Glazing => unreachable!("not an opaque label"),
                });
            }
        }

        buildings.push(BuildingColumn {
            id: (ordinal + 1).to_string(),
            name: name.clone(),
            elements,
        });
    }

    for (key, value) in values {
        if !consumed.contains(&key) {
            debug!(%key, "unrecognized import key");
            unrecognized.insert(key, value);
        }
    }

    if buildings.is_empty() && climate_values.is_empty() {
        return Err(ImportParseError::Empty);
    }

    Ok(HierarchicalImport {
        buildings,
        climate_values,
        unrecognized,
    })
}

fn take_number(
    values: &IndexMap<String, ParsedValue>,
    consumed: &mut HashSet<String>,
    key: String,
) -> f64 {
    let value = values
        .get(&key)
        .and_then(ParsedValue::as_number)
        .unwrap_or(0.0);
    consumed.insert(key);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ClimateParameter;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    #[rstest]
    fn parameter_rows_collapse_to_one_element_per_building() {
        let file = "\
\"House A\"
\"House A\",\"Above Grade Element\"
,\"Area (A)\",\"400\"
,\"R-Value (R)\",\"15\"
\"House B\"
\"House B\",\"Above Grade Element\"
,\"Area (A)\",\"600\"
,\"R-Value (R)\",\"21\"
";
        let import = import_hierarchical(Cursor::new(file)).unwrap();
        assert_eq!(import.buildings.len(), 2);
        assert_eq!(
            import.buildings[0].elements,
            vec![Element::AboveGrade {
                area: 400.0,
                r_value: 15.0
            }],
            "Area and R-Value rows must collapse into a single element"
        );
        assert_eq!(
            import.buildings[1].elements,
            vec![Element::AboveGrade {
                area: 600.0,
                r_value: 21.0
            }]
        );
        assert_eq!(import.buildings[0].name, "House A");
        assert_eq!(import.buildings[0].id, "1");
        assert_eq!(import.buildings[1].id, "2");
    }

    #[rstest]
    fn reconstructs_each_recognized_category() {
        let file = "\
Workshop
Workshop,Glazing
,North Area (Agn),50
,South Area (Ags),150
,U-Value (U),0.35
,SHGC,0.3
,Perimeter (P),64
Workshop,On/Sub-grade Slab
,F-Factor (F),0.73
,Perimeter (P),140
Workshop,Basement Walls
,Area (A),800
,C-Factor (C),0.1
";
        let import = import_hierarchical(Cursor::new(file)).unwrap();
        assert_eq!(
            import.buildings[0].elements,
            vec![
                Element::Glazing {
                    area: None,
                    north_area: Some(50.0),
                    east_area: Some(0.0),
                    south_area: Some(150.0),
                    west_area: Some(0.0),
                    u_value: 0.35,
                    shgc: 0.3,
                    perimeter: 64.0,
                },
                Element::Slab {
                    f_factor: 0.73,
                    perimeter: 140.0
                },
                Element::BasementWall {
                    area: 800.0,
                    c_factor: 0.1
                },
            ]
        );
    }

    #[rstest]
    fn climate_data_rows_are_recognized_anywhere() {
        let file = "\
Climate Data,Heating Degree Days (HDD),5000
Climate Data,Cooling Degree Days (CDD),1000
Climate Data,Comfort Notes,mild winters
House A
House A,Element
,Area (A),120
";
        let import = import_hierarchical(Cursor::new(file)).unwrap();
        assert_eq!(
            import.climate_values.get(&ClimateParameter::HeatingDegreeDays),
            Some(&5000.0)
        );
        assert_eq!(
            import.climate_values.get(&ClimateParameter::CoolingDegreeDays),
            Some(&1000.0)
        );
        assert_eq!(
            import.unrecognized.get("Climate Data_Comfort Notes"),
            Some(&ParsedValue::Text("mild winters".into()))
        );
        assert_eq!(import.buildings[0].elements.len(), 1);
    }

    #[rstest]
    fn data_rows_outside_context_are_skipped() {
        let file = "\
,Area (A),400
House A
,R-Value (R),15
House A,Above Grade Element
,Area (A),250
";
        let import = import_hierarchical(Cursor::new(file)).unwrap();
        // only the contextual Area row lands; the R-Value row arrived
        // before any category was declared
        assert_eq!(
            import.buildings[0].elements,
            vec![Element::AboveGrade {
                area: 250.0,
                r_value: 0.0
            }]
        );
    }

    #[rstest]
    fn unrecognized_parameters_are_bucketed() {
        let file = "\
House A
House A,Above Grade Element
,Area (A),400
,Colour,green
";
        let import = import_hierarchical(Cursor::new(file)).unwrap();
        assert_eq!(
            import.unrecognized.get("House A Above Grade Element_Colour"),
            Some(&ParsedValue::Text("green".into()))
        );
        assert_eq!(
            import.buildings[0].elements,
            vec![Element::AboveGrade {
                area: 400.0,
                r_value: 0.0
            }]
        );
    }

    #[rstest]
    fn file_without_buildings_or_climate_is_an_error() {
        assert!(matches!(
            import_hierarchical(Cursor::new("")),
            Err(ImportParseError::Empty)
        ));
        // rows that match no grammar shape leave nothing to import
        assert!(matches!(
            import_hierarchical(Cursor::new(",stray note\n,another\n")),
            Err(ImportParseError::Empty)
        ));
    }

    #[rstest]
    fn applies_imported_buildings_and_climate() {
        let file = "\
Climate Data,Heating Degree Days (HDD),4500
House A
House A,Above Grade Element
,Area (A),400
,R-Value (R),15
";
        let import = import_hierarchical(Cursor::new(file)).unwrap();
        let mut inputs = crate::input::CalculatorInputs::default();
        import.apply_to(&mut inputs);
        assert_eq!(inputs.buildings.len(), 1);
        assert_eq!(inputs.climate.heating_degree_days, 4500.0);
        assert!(inputs.climate.is_manual_input);
    }
}
