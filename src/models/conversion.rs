// src/models/conversion.rs

//! Alternate serving-size conversion row.

use crate::error::Result;
use crate::models::{Record, field, parse_id};

/// One alternate serving measure offered for an item.
///
/// Canonical measures that carry no information (`100 g`, weight-conversion
/// boilerplate, custom inputs) never reach this table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRow {
    pub conversion_id: u32,
    pub item_id: u32,
    /// Unit id of the measure
    pub unit_id: u32,
    /// Value of the measure (source lexical form)
    pub unit_amt: String,
    /// Equivalent amount
    pub amount: String,
    /// Unit id of the equivalent amount
    pub amt_unit: u32,
}

impl Record for ConversionRow {
    const FILE: &'static str = "conversion_junc.csv";
    const HEADER: &'static [&'static str] = &[
        "conversion_id",
        "item_id",
        "unit_id",
        "unit_amt",
        "amount",
        "amt_unit",
    ];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.conversion_id.to_string(),
            self.item_id.to_string(),
            self.unit_id.to_string(),
            self.unit_amt.clone(),
            self.amount.clone(),
            self.amt_unit.to_string(),
        ]
    }

    fn from_record(record: &[String]) -> Result<Self> {
        Ok(Self {
            conversion_id: parse_id(record, 0, Self::FILE)?,
            item_id: parse_id(record, 1, Self::FILE)?,
            unit_id: parse_id(record, 2, Self::FILE)?,
            unit_amt: field(record, 3, Self::FILE)?.to_string(),
            amount: field(record, 4, Self::FILE)?.to_string(),
            amt_unit: parse_id(record, 5, Self::FILE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip() {
        let row = ConversionRow {
            conversion_id: 3,
            item_id: 7,
            unit_id: 4,
            unit_amt: "1".to_string(),
            amount: "258".to_string(),
            amt_unit: 1,
        };
        assert_eq!(ConversionRow::from_record(&row.to_record()).unwrap(), row);
    }
}
