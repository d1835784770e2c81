// src/pipeline/normalize.rs

//! Record normalization: one parsed item page into table rows.
//!
//! Normalization appends directly to the table store as it goes. It is not
//! transactional: lookup-table allocations made before a failing step stay
//! allocated (they are append-only and a stray name is harmless), while the
//! per-item rows are removed by the caller through
//! [`TableStore::remove_item`] using the id carried in [`NormalizeFailure`].

use scraper::Html;

use crate::error::{AppError, Result};
use crate::services::extract;
use crate::store::{NewItem, NewJunction, TableStore};
use crate::utils::parse::{parse_serving, split_brand};

/// Canonical measures that repeat on every page and carry no information.
const EXCLUDED_MEASURES: [&str; 7] = [
    "100 g",
    "1 g",
    "1 ounce = 28.3495 g",
    "1 pound = 453.592 g",
    "1 kg = 1000 g",
    "custom g",
    "custom oz",
];

/// The category, nutrient and alternate name of the calories pseudo-entry,
/// which every item carries exactly once.
const CALORIES: &str = "Calories";
const CALORIES_ALT: &str = "kcal";
const CALORIES_UNIT: &str = "J";

/// Successful normalization of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedItem {
    pub item_id: u32,
    pub conversions: usize,
    pub nutrients: usize,
}

/// A failed normalization, carrying the partially assigned item id so the
/// caller can roll back whatever was appended before the failure.
#[derive(Debug)]
pub struct NormalizeFailure {
    pub error: AppError,
    pub item_id: Option<u32>,
}

/// Normalize one item page into the store.
pub fn normalize_item(
    doc: &Html,
    store: &mut TableStore,
) -> std::result::Result<NormalizedItem, NormalizeFailure> {
    let mut item_id = None;
    run(doc, store, &mut item_id).map_err(|error| NormalizeFailure { error, item_id })
}

fn run(doc: &Html, store: &mut TableStore, item_id_slot: &mut Option<u32>) -> Result<NormalizedItem> {
    let display_name = extract::item_name(doc)?;
    let (name, brand) = split_brand(&display_name);

    // The duplicate check precedes every lookup resolution so a rejected
    // item leaves zero side effects anywhere.
    if store.contains_item(&name, &brand) {
        return Err(AppError::duplicate(name, brand));
    }

    let serving = parse_serving(&extract::nlea_serving(doc)?)?;
    let nlea_unit = store.unit_id(&serving.unit);
    let amount_unit = store.unit_id(&serving.amount_unit);

    let upc = extract::upc(doc)?;
    let ingredient_list = extract::ingredients(doc)?;

    let item_id = store.add_item(NewItem {
        name,
        brand,
        nlea_unit,
        nlea_val: serving.value,
        amount: serving.amount,
        amount_unit,
        upc,
        ingredient_list,
    })?;
    *item_id_slot = Some(item_id);

    let conversions = add_conversions(doc, store, item_id)?;
    let nutrients = add_nutrients(doc, store, item_id)?;

    Ok(NormalizedItem {
        item_id,
        conversions,
        nutrients,
    })
}

/// Append one conversion row per informative alternate measure.
fn add_conversions(doc: &Html, store: &mut TableStore, item_id: u32) -> Result<usize> {
    let mut added = 0;
    for measure in extract::measure_options(doc)? {
        if EXCLUDED_MEASURES.contains(&measure.as_str()) {
            continue;
        }
        let serving = parse_serving(&measure)?;
        let unit_id = store.unit_id(&serving.unit);
        let amt_unit = store.unit_id(&serving.amount_unit);
        store.add_conversion(item_id, unit_id, serving.value, serving.amount, amt_unit);
        added += 1;
    }
    Ok(added)
}

/// Append the calories pseudo-entry plus one junction row per nutrient line.
fn add_nutrients(doc: &Html, store: &mut TableStore, item_id: u32) -> Result<usize> {
    let cal_amount = extract::calories(doc)?;
    let cat_id = store.category_id(CALORIES);
    let nutrient_id = store.nutrient_id(CALORIES)?;
    let alt_id = store.nutrient_id(CALORIES_ALT)?;
    let unit_id = store.unit_id(CALORIES_UNIT);
    store.add_nutrient_junction(NewJunction {
        item_id,
        nutrient_id,
        alt_id: Some(alt_id),
        cat_id,
        amount: cal_amount,
        unit_id,
        dv: String::new(),
    });
    let mut added = 1;

    for section in extract::nutrient_sections(doc)? {
        let cat_id = store.category_id(&section.category);
        for line in section.lines {
            let nutrient_id = store.nutrient_id(&line.name)?;
            let alt_id = if line.alt_name.is_empty() {
                None
            } else {
                Some(store.nutrient_id(&line.alt_name)?)
            };
            let unit_id = store.unit_id(&line.unit);
            store.add_nutrient_junction(NewJunction {
                item_id,
                nutrient_id,
                alt_id,
                cat_id,
                amount: line.amount,
                unit_id,
                dv: line.daily_value,
            });
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_page(name: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body>
            <h1 id="food-name">{name}</h1>
            <select>
                <option value="2 tbsp = 32 g" selected="selected">2 tbsp</option>
                <option value="1 cup = 258 g">1 cup</option>
                <option value="100 g">100 g</option>
                <option value="custom oz">custom</option>
            </select>
            <table><tr><td id="calories">190</td></tr></table>
            <table class="center wide cellpadding3 nutrient results">
                <tr><th colspan="3">Fats</th></tr>
                <tr>
                    <td class="left"><a class="tooltip" data-tooltip="Total Fat">Fat</a></td>
                    <td class="right">16 g</td>
                    <td><a target="_blank">20%</a></td>
                </tr>
            </table>
            </body></html>"#
        ))
    }

    #[test]
    fn test_duplicate_rejection_has_no_side_effects() {
        let mut store = TableStore::new();
        let doc = item_page("Peanut Butter by BrandX");
        normalize_item(&doc, &mut store).unwrap();

        let units_before = store.units().len();
        let failure = normalize_item(&doc, &mut store).unwrap_err();
        assert!(matches!(failure.error, AppError::DuplicateItem { .. }));
        assert_eq!(failure.item_id, None);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.units().len(), units_before);
    }

    #[test]
    fn test_failure_after_id_assignment_carries_the_id() {
        let mut store = TableStore::new();
        // No calories cell: normalization fails after the item row exists.
        let doc = Html::parse_document(
            r#"<html><body>
            <h1 id="food-name">Broken Item</h1>
            <select><option value="1 cup = 240 g" selected="selected">c</option></select>
            </body></html>"#,
        );

        let failure = normalize_item(&doc, &mut store).unwrap_err();
        let item_id = failure.item_id.expect("id was assigned before failure");
        assert_eq!(store.items().len(), 1);

        store.remove_item(item_id);
        assert!(store.items().is_empty());
    }
}
