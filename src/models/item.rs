// src/models/item.rs

//! Primary item row.

use crate::error::Result;
use crate::models::{Record, field, parse_id};

/// One catalog item with its canonical NLEA serving measure.
///
/// `(name, brand)` is the natural key: the pair is unique across every item
/// ever inserted in a run, and a collision rejects the incoming item whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub item_id: u32,
    pub name: String,
    pub brand: String,
    /// Unit id of the NLEA serving measure
    pub nlea_unit: u32,
    /// Value of the NLEA serving measure (source lexical form)
    pub nlea_val: String,
    /// Equivalent amount of the NLEA serving measure
    pub amount: String,
    /// Unit id of the equivalent amount
    pub amount_unit: u32,
    /// UPC digits, empty if the page carries none
    pub upc: String,
    /// Ingredient text, double-space joined, empty if absent
    pub ingredient_list: String,
}

impl Record for ItemRow {
    const FILE: &'static str = "items.csv";
    const HEADER: &'static [&'static str] = &[
        "item_id",
        "name",
        "brand",
        "NLEA_unit",
        "NLEA_val",
        "amount",
        "amount_unit",
        "upc",
        "ingredient_list",
    ];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.item_id.to_string(),
            self.name.clone(),
            self.brand.clone(),
            self.nlea_unit.to_string(),
            self.nlea_val.clone(),
            self.amount.clone(),
            self.amount_unit.to_string(),
            self.upc.clone(),
            self.ingredient_list.clone(),
        ]
    }

    fn from_record(record: &[String]) -> Result<Self> {
        Ok(Self {
            item_id: parse_id(record, 0, Self::FILE)?,
            name: field(record, 1, Self::FILE)?.to_string(),
            brand: field(record, 2, Self::FILE)?.to_string(),
            nlea_unit: parse_id(record, 3, Self::FILE)?,
            nlea_val: field(record, 4, Self::FILE)?.to_string(),
            amount: field(record, 5, Self::FILE)?.to_string(),
            amount_unit: parse_id(record, 6, Self::FILE)?,
            upc: field(record, 7, Self::FILE)?.to_string(),
            ingredient_list: field(record, 8, Self::FILE)?.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let row = ItemRow {
            item_id: 7,
            name: "Peanut Butter".to_string(),
            brand: "BrandX".to_string(),
            nlea_unit: 2,
            nlea_val: "2".to_string(),
            amount: "32".to_string(),
            amount_unit: 1,
            upc: "012345678905".to_string(),
            ingredient_list: "peanuts  salt".to_string(),
        };
        let back = ItemRow::from_record(&row.to_record()).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_short_record_rejected() {
        let record = vec!["1".to_string(), "name".to_string()];
        assert!(ItemRow::from_record(&record).is_err());
    }
}
