// src/services/extract.rs

//! Field extractors over a parsed catalog page.
//!
//! These read specific values out of the third-party site's markup and
//! return typed strings; everything downstream of them is site-agnostic.
//! Selectors follow the catalog's current page structure.

use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{NutrientLine, NutrientSection};
use crate::utils::parse::clean_amount;

fn sel(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::parse("selector", format!("{e:?}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Item links on a letter/page listing. Empty when the page has no items.
pub fn item_links(doc: &Html) -> Result<Vec<String>> {
    let links = sel("a.table_item_name")?;
    Ok(doc
        .select(&links)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect())
}

/// Display name of the item.
pub fn item_name(doc: &Html) -> Result<String> {
    let name = sel("h1#food-name")?;
    let text = doc.select(&name).next().map(text_of).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::not_found("item name (h1#food-name)"));
    }
    Ok(text)
}

/// The canonical NLEA serving-size string (the pre-selected measure option).
pub fn nlea_serving(doc: &Html) -> Result<String> {
    let options = sel("option[selected]")?;
    doc.select(&options)
        .next()
        .and_then(|o| o.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| AppError::not_found("NLEA serving option"))
}

/// All alternate measure option strings (the selected NLEA option excluded).
pub fn measure_options(doc: &Html) -> Result<Vec<String>> {
    let options = sel("option")?;
    Ok(doc
        .select(&options)
        .filter(|o| o.value().attr("selected").is_none())
        .filter_map(|o| o.value().attr("value"))
        .map(str::to_string)
        .collect())
}

/// UPC digits, rendered as individual glyphs and concatenated.
/// Absence is an empty string, not an error.
pub fn upc(doc: &Html) -> Result<String> {
    let digits = sel("div.upc-digit")?;
    Ok(doc.select(&digits).map(text_of).collect::<Vec<_>>().concat())
}

/// Ingredient list, double-space joined from the results table cells.
/// Absence is an empty string, not an error.
pub fn ingredients(doc: &Html) -> Result<String> {
    let table = sel("table.wide.results")?;
    let cells = sel("td.left")?;
    let Some(table) = doc.select(&table).next() else {
        return Ok(String::new());
    };
    let parts: Vec<String> = table
        .select(&cells)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .collect();
    Ok(parts.join("  "))
}

/// Calorie amount for the item.
pub fn calories(doc: &Html) -> Result<String> {
    let cell = sel("td#calories")?;
    let text = doc.select(&cell).next().map(text_of).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::not_found("calorie amount (td#calories)"));
    }
    Ok(text)
}

/// All nutrient table sections, each with its category heading and lines.
pub fn nutrient_sections(doc: &Html) -> Result<Vec<NutrientSection>> {
    let tables = sel("table.center.wide.cellpadding3.nutrient.results")?;
    let category_sel = sel("th[colspan=\"3\"]")?;

    let mut sections = Vec::new();
    for table in doc.select(&tables) {
        let category = table
            .select(&category_sel)
            .next()
            .map(text_of)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::not_found("nutrient category heading"))?;

        sections.push(NutrientSection {
            lines: nutrient_lines(table)?,
            category,
        });
    }
    Ok(sections)
}

/// Nutrient lines of one section table.
///
/// Rows that are headers, spacers or have an empty amount cell are skipped.
fn nutrient_lines(table: ElementRef<'_>) -> Result<Vec<NutrientLine>> {
    let rows = sel("tr")?;
    let spacer = sel("td[colspan=\"3\"]")?;
    let header = sel("th")?;
    let tooltip = sel("a.tooltip")?;
    let left_cell = sel("td.left")?;
    let alt_name = sel("span.gray")?;
    let amount_cell = sel("td.right")?;
    let dv_link = sel("a[target=\"_blank\"]")?;

    let mut lines = Vec::new();
    for row in table.select(&rows) {
        if row.select(&spacer).next().is_some() || row.select(&header).next().is_some() {
            continue;
        }

        let name = match row.select(&tooltip).next() {
            Some(a) => a.value().attr("data-tooltip").map(str::to_string),
            None => row.select(&left_cell).next().map(text_of),
        };
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            continue;
        };

        let amount_text = row
            .select(&amount_cell)
            .next()
            .map(text_of)
            .unwrap_or_default();
        if amount_text.is_empty() {
            continue;
        }
        // Unparseable amounts degrade to empty fields rather than failing
        // the item; the empty unit later resolves to the base unit.
        let (amount, unit) = clean_amount(&amount_text).unwrap_or_default();

        let alt = row.select(&alt_name).next().map(text_of).unwrap_or_default();
        let dv = row.select(&dv_link).next().map(text_of).unwrap_or_default();

        lines.push(NutrientLine {
            name,
            alt_name: alt,
            amount,
            unit,
            daily_value: dv,
        });
    }
    Ok(lines)
}
