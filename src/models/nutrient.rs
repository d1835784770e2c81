// src/models/nutrient.rs

//! Nutrient junction row and extracted nutrient section shapes.

use crate::error::Result;
use crate::models::{Record, field, parse_id, parse_opt_id};

/// One nutrient measurement for an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutrientJunctionRow {
    pub nut_junc_id: u32,
    pub item_id: u32,
    pub nutrient_id: u32,
    /// Alternate nutrient name id, absent when the page shows none
    pub alt_id: Option<u32>,
    pub cat_id: u32,
    /// Measured amount (source lexical form)
    pub amount: String,
    pub unit_id: u32,
    /// Daily-value percentage as printed, empty if absent
    pub dv: String,
}

impl Record for NutrientJunctionRow {
    const FILE: &'static str = "nutrient_junc.csv";
    const HEADER: &'static [&'static str] = &[
        "nut_junc_id",
        "item_id",
        "nutrient_id",
        "alt_id",
        "cat_id",
        "amount",
        "unit_id",
        "dv",
    ];

    fn to_record(&self) -> Vec<String> {
        vec![
            self.nut_junc_id.to_string(),
            self.item_id.to_string(),
            self.nutrient_id.to_string(),
            self.alt_id.map_or(String::new(), |id| id.to_string()),
            self.cat_id.to_string(),
            self.amount.clone(),
            self.unit_id.to_string(),
            self.dv.clone(),
        ]
    }

    fn from_record(record: &[String]) -> Result<Self> {
        Ok(Self {
            nut_junc_id: parse_id(record, 0, Self::FILE)?,
            item_id: parse_id(record, 1, Self::FILE)?,
            nutrient_id: parse_id(record, 2, Self::FILE)?,
            alt_id: parse_opt_id(record, 3, Self::FILE)?,
            cat_id: parse_id(record, 4, Self::FILE)?,
            amount: field(record, 5, Self::FILE)?.to_string(),
            unit_id: parse_id(record, 6, Self::FILE)?,
            dv: field(record, 7, Self::FILE)?.to_string(),
        })
    }
}

/// One nutrient line as extracted from a page table, before id resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutrientLine {
    pub name: String,
    /// Alternate display name, empty when the page shows none
    pub alt_name: String,
    pub amount: String,
    pub unit: String,
    pub daily_value: String,
}

/// A category-titled block of nutrient lines from a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NutrientSection {
    pub category: String,
    pub lines: Vec<NutrientLine>,
}
