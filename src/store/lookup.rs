// src/store/lookup.rs

//! Name-keyed lookup tables with dense surrogate ids.

use std::collections::HashMap;

use crate::error::{AppError, Result};

/// Which lookup table this is; fixes the persisted file and id column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Unit,
    Nutrient,
    Category,
}

impl LookupKind {
    /// File name of the table under the data directory.
    pub const fn file(self) -> &'static str {
        match self {
            Self::Unit => "unit_lu.csv",
            Self::Nutrient => "nutrient_lu.csv",
            Self::Category => "nutrient_category_lu.csv",
        }
    }

    /// Persisted id column name.
    pub const fn id_column(self) -> &'static str {
        match self {
            Self::Unit => "unit_id",
            Self::Nutrient => "nutrient_id",
            Self::Category => "cat_id",
        }
    }
}

/// One `{id, name}` lookup row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub id: u32,
    pub name: String,
}

/// Allocation-only dictionary assigning a dense integer id per distinct name.
///
/// Names accumulate monotonically across a run; there is no removal. Ids are
/// allocated as `max(existing) + 1` so tables reloaded from disk keep
/// growing their original sequence.
#[derive(Debug, Clone)]
pub struct LookupTable {
    kind: LookupKind,
    rows: Vec<LookupEntry>,
    index: HashMap<String, u32>,
}

impl LookupTable {
    /// Create an empty table.
    pub fn new(kind: LookupKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Rebuild a table from persisted entries.
    ///
    /// Rejects duplicate names: the persisted lookup files are globally
    /// deduplicated and a repeat means the file is corrupt.
    pub fn from_entries(kind: LookupKind, entries: Vec<LookupEntry>) -> Result<Self> {
        let mut table = Self::new(kind);
        for entry in entries {
            if table.index.contains_key(&entry.name) {
                return Err(AppError::table(
                    kind.file(),
                    format!("duplicate name {:?}", entry.name),
                ));
            }
            table.index.insert(entry.name.clone(), entry.id);
            table.rows.push(entry);
        }
        Ok(table)
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    /// Id for `name`, allocating a new one on first sight.
    pub fn resolve(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.index.get(name) {
            return id;
        }

        let id = self.rows.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.index.insert(name.to_string(), id);
        self.rows.push(LookupEntry {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Id for `name` if already present, without allocating.
    pub fn get(&self, name: &str) -> Option<u32> {
        self.index.get(name).copied()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[LookupEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
