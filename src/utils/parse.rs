// src/utils/parse.rs

//! Text parsers for serving-size and amount strings.
//!
//! The catalog renders serving measures as `"<value> <unit> = <amount> <unit>"`
//! (e.g. `"2 tbsp = 32 g"`). Values stay as their source lexical strings so
//! re-saving a loaded table reproduces the file exactly.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{AppError, Result};

/// A parsed serving-size measure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serving {
    /// Numeric value of the measure (e.g. `"2"`)
    pub value: String,
    /// Measure unit, cleaned of parenthesized alternates (e.g. `"tbsp"`)
    pub unit: String,
    /// Equivalent amount (e.g. `"32"`)
    pub amount: String,
    /// Unit of the equivalent amount (e.g. `"g"`)
    pub amount_unit: String,
}

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)\s*(\w+)").expect("valid amount regex"))
}

fn paren_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\((.*?)\)").expect("valid paren regex"))
}

/// Split an item display name into `(name, brand)` on the literal `" by "`.
///
/// Without the separator the whole string is the name and the brand is empty.
pub fn split_brand(display_name: &str) -> (String, String) {
    match display_name.split_once(" by ") {
        Some((name, brand)) => (name.trim().to_string(), brand.trim().to_string()),
        None => (display_name.trim().to_string(), String::new()),
    }
}

/// Extract `(number, unit)` from a leading-number-then-word string like `"28 g"`.
pub fn clean_amount(text: &str) -> Option<(String, String)> {
    let caps = amount_re().captures(text.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

/// Strip parenthesized alternates and approximation noise from a unit string.
///
/// Returns the cleaned unit and the alternate text that was removed
/// (multiple parenthesized groups are joined with `/`).
pub fn clean_unit_measure(unit: &str) -> (String, String) {
    let alts: Vec<&str> = paren_re()
        .captures_iter(unit)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let alt = alts.join("/");

    let cleaned = paren_re().replace_all(unit, "");
    let cleaned = cleaned
        .replace("approximate", "")
        .replace("aprx", "")
        .trim()
        .to_string();

    (cleaned, alt)
}

/// Parse a full serving measure string of the form
/// `"<value> <unit> = <amount> <amount_unit>"`.
pub fn parse_serving(text: &str) -> Result<Serving> {
    let malformed = || AppError::parse("serving measure", format!("malformed: {text:?}"));

    let (value, rest) = text.trim().split_once(' ').ok_or_else(malformed)?;
    let (unit, amount_part) = rest.split_once('=').ok_or_else(malformed)?;

    let (amount, amount_unit) = clean_amount(amount_part.trim()).ok_or_else(malformed)?;
    let (unit, _alt) = clean_unit_measure(unit.trim());

    Ok(Serving {
        value: value.to_string(),
        unit,
        amount,
        amount_unit,
    })
}
