// src/store/tables.rs

//! In-memory owner of the six dataset tables for one run.

use crate::error::{AppError, Result};
use crate::models::{ConversionRow, ItemRow, NutrientJunctionRow};
use crate::store::lookup::{LookupKind, LookupTable};

/// An item row before id assignment.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub brand: String,
    pub nlea_unit: u32,
    pub nlea_val: String,
    pub amount: String,
    pub amount_unit: u32,
    pub upc: String,
    pub ingredient_list: String,
}

/// A nutrient junction row before id assignment.
#[derive(Debug, Clone)]
pub struct NewJunction {
    pub item_id: u32,
    pub nutrient_id: u32,
    pub alt_id: Option<u32>,
    pub cat_id: u32,
    pub amount: String,
    pub unit_id: u32,
    pub dv: String,
}

/// All tables of the current run.
///
/// The per-item tables may hold only the tail of the persisted history (the
/// checkpoint manager reloads a fixed window); the lookup tables are always
/// complete. Ids keep growing from the persisted maximum, which the loaded
/// tail still contains because ids are append-only and monotonic.
#[derive(Debug)]
pub struct TableStore {
    items: Vec<ItemRow>,
    conversions: Vec<ConversionRow>,
    nutrients: Vec<NutrientJunctionRow>,
    units: LookupTable,
    nutrient_names: LookupTable,
    categories: LookupTable,
}

impl Default for TableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            conversions: Vec::new(),
            nutrients: Vec::new(),
            units: LookupTable::new(LookupKind::Unit),
            nutrient_names: LookupTable::new(LookupKind::Nutrient),
            categories: LookupTable::new(LookupKind::Category),
        }
    }

    /// Assemble a store from loaded tables.
    pub fn from_parts(
        items: Vec<ItemRow>,
        conversions: Vec<ConversionRow>,
        nutrients: Vec<NutrientJunctionRow>,
        units: LookupTable,
        nutrient_names: LookupTable,
        categories: LookupTable,
    ) -> Self {
        Self {
            items,
            conversions,
            nutrients,
            units,
            nutrient_names,
            categories,
        }
    }

    /// Whether an item with this natural key is already present.
    pub fn contains_item(&self, name: &str, brand: &str) -> bool {
        self.items
            .iter()
            .any(|row| row.name == name && row.brand == brand)
    }

    /// Append an item, assigning the next id.
    ///
    /// Rejects a `(name, brand)` collision without touching any table.
    pub fn add_item(&mut self, new: NewItem) -> Result<u32> {
        if self.contains_item(&new.name, &new.brand) {
            return Err(AppError::duplicate(new.name, new.brand));
        }

        let item_id = self.items.iter().map(|r| r.item_id).max().unwrap_or(0) + 1;
        self.items.push(ItemRow {
            item_id,
            name: new.name,
            brand: new.brand,
            nlea_unit: new.nlea_unit,
            nlea_val: new.nlea_val,
            amount: new.amount,
            amount_unit: new.amount_unit,
            upc: new.upc,
            ingredient_list: new.ingredient_list,
        });
        Ok(item_id)
    }

    /// Append a conversion row, assigning the next id.
    pub fn add_conversion(
        &mut self,
        item_id: u32,
        unit_id: u32,
        unit_amt: String,
        amount: String,
        amt_unit: u32,
    ) -> u32 {
        let conversion_id = self
            .conversions
            .iter()
            .map(|r| r.conversion_id)
            .max()
            .unwrap_or(0)
            + 1;
        self.conversions.push(ConversionRow {
            conversion_id,
            item_id,
            unit_id,
            unit_amt,
            amount,
            amt_unit,
        });
        conversion_id
    }

    /// Append a nutrient junction row, assigning the next id.
    pub fn add_nutrient_junction(&mut self, new: NewJunction) -> u32 {
        let nut_junc_id = self
            .nutrients
            .iter()
            .map(|r| r.nut_junc_id)
            .max()
            .unwrap_or(0)
            + 1;
        self.nutrients.push(NutrientJunctionRow {
            nut_junc_id,
            item_id: new.item_id,
            nutrient_id: new.nutrient_id,
            alt_id: new.alt_id,
            cat_id: new.cat_id,
            amount: new.amount,
            unit_id: new.unit_id,
            dv: new.dv,
        });
        nut_junc_id
    }

    /// Remove every row belonging to `item_id` from the three per-item
    /// tables. Lookup tables are left untouched; a stray allocated name is
    /// harmless. Returns the number of rows removed.
    pub fn remove_item(&mut self, item_id: u32) -> usize {
        let before = self.items.len() + self.conversions.len() + self.nutrients.len();
        self.items.retain(|r| r.item_id != item_id);
        self.conversions.retain(|r| r.item_id != item_id);
        self.nutrients.retain(|r| r.item_id != item_id);
        before - (self.items.len() + self.conversions.len() + self.nutrients.len())
    }

    /// Resolve a unit name. An empty name normalizes to the base unit `g`.
    pub fn unit_id(&mut self, name: &str) -> u32 {
        let name = name.trim();
        let name = if name.is_empty() { "g" } else { name };
        self.units.resolve(name)
    }

    /// Resolve a nutrient name. An empty name is an error, never an entity.
    pub fn nutrient_id(&mut self, name: &str) -> Result<u32> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_argument(
                "empty nutrient name cannot be looked up",
            ));
        }
        Ok(self.nutrient_names.resolve(name))
    }

    /// Resolve a nutrient category name.
    pub fn category_id(&mut self, name: &str) -> u32 {
        self.categories.resolve(name.trim())
    }

    pub fn items(&self) -> &[ItemRow] {
        &self.items
    }

    pub fn conversions(&self) -> &[ConversionRow] {
        &self.conversions
    }

    pub fn nutrient_junctions(&self) -> &[NutrientJunctionRow] {
        &self.nutrients
    }

    pub fn units(&self) -> &LookupTable {
        &self.units
    }

    pub fn nutrient_names(&self) -> &LookupTable {
        &self.nutrient_names
    }

    pub fn categories(&self) -> &LookupTable {
        &self.categories
    }
}
