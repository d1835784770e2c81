// src/store/persist.rs

//! Dataset persistence and crawl checkpointing.
//!
//! Each table lives in its own CSV file with a header row. The three
//! per-item tables (items, conversions, nutrient junctions) are loaded only
//! as their most recent `tail_window` rows; the rest of the history stays on
//! disk and is reattached at save time by dropping that same window from the
//! file before appending the in-memory rows. The window exists so a resumed
//! run can still detect duplicate items without holding the whole history in
//! memory. Lookup tables are loaded and written in full since they must stay
//! globally deduplicated.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{Checkpoint, ConversionRow, ItemRow, NutrientJunctionRow, Record};
use crate::store::lookup::{LookupEntry, LookupKind, LookupTable};
use crate::store::tables::TableStore;
use crate::utils::csv;

const CHECKPOINT_FILE: &str = "restart.txt";

/// Loads, merges and saves the on-disk projection of a [`TableStore`].
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    data_dir: PathBuf,
    window: usize,
}

impl CheckpointManager {
    /// Create a manager rooted at `data_dir` with the given tail window.
    pub fn new(data_dir: impl Into<PathBuf>, window: usize) -> Self {
        Self {
            data_dir: data_dir.into(),
            window,
        }
    }

    /// Tail window depth used for both load and save.
    pub fn window(&self) -> usize {
        self.window
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Read a table file into records, header row dropped.
    ///
    /// Returns `None` when the file does not exist yet.
    fn read_records(&self, file: &str) -> Result<Option<Vec<Vec<String>>>> {
        let path = self.path(file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut rows = csv::parse_rows(&text);
        if rows.is_empty() {
            return Err(AppError::table(file, "missing header row"));
        }
        rows.remove(0);
        Ok(Some(rows))
    }

    /// Write a full table file atomically (temp file, then rename).
    fn write_table(&self, file: &str, header: &[&str], records: &[Vec<String>]) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.path(file);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, csv::to_csv_string(header, records))?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Load the trailing window of a per-item table.
    fn load_tail<T: Record>(&self) -> Result<Vec<T>> {
        let Some(records) = self.read_records(T::FILE)? else {
            return Ok(Vec::new());
        };
        let skip = records.len().saturating_sub(self.window);
        records[skip..].iter().map(|r| T::from_record(r)).collect()
    }

    /// Load a lookup table in full.
    fn load_lookup(&self, kind: LookupKind) -> Result<LookupTable> {
        let Some(records) = self.read_records(kind.file())? else {
            return Ok(LookupTable::new(kind));
        };

        let mut entries = Vec::with_capacity(records.len());
        for record in &records {
            let id = record
                .first()
                .and_then(|raw| raw.parse().ok())
                .ok_or_else(|| AppError::table(kind.file(), "bad id column"))?;
            let name = record
                .get(1)
                .ok_or_else(|| AppError::table(kind.file(), "missing name column"))?
                .clone();
            entries.push(LookupEntry { id, name });
        }
        LookupTable::from_entries(kind, entries)
    }

    /// Merge-save a per-item table: drop the previously loaded tail from the
    /// file, then append everything currently in memory.
    fn save_merged<T: Record>(&self, rows: &[T]) -> Result<()> {
        let existing = self.read_records(T::FILE)?.unwrap_or_default();
        let keep = existing.len().saturating_sub(self.window);

        let mut records: Vec<Vec<String>> = existing.into_iter().take(keep).collect();
        records.extend(rows.iter().map(Record::to_record));
        self.write_table(T::FILE, T::HEADER, &records)
    }

    /// Replace a lookup table file with the in-memory contents.
    fn save_lookup(&self, table: &LookupTable) -> Result<()> {
        let records: Vec<Vec<String>> = table
            .entries()
            .iter()
            .map(|e| vec![e.id.to_string(), e.name.clone()])
            .collect();
        let kind = table.kind();
        self.write_table(kind.file(), &[kind.id_column(), "name"], &records)
    }

    /// Load the working table set and the resumption cursor, if any.
    pub fn load(&self) -> Result<(TableStore, Option<Checkpoint>)> {
        let store = TableStore::from_parts(
            self.load_tail::<ItemRow>()?,
            self.load_tail::<ConversionRow>()?,
            self.load_tail::<NutrientJunctionRow>()?,
            self.load_lookup(LookupKind::Unit)?,
            self.load_lookup(LookupKind::Nutrient)?,
            self.load_lookup(LookupKind::Category)?,
        );
        let checkpoint = self.load_checkpoint()?;
        Ok((store, checkpoint))
    }

    /// Flush every table to disk.
    pub fn save(&self, store: &TableStore) -> Result<()> {
        self.save_merged(store.items())?;
        self.save_merged(store.conversions())?;
        self.save_merged(store.nutrient_junctions())?;
        self.save_lookup(store.units())?;
        self.save_lookup(store.nutrient_names())?;
        self.save_lookup(store.categories())?;
        Ok(())
    }

    /// Overwrite the resumption cursor.
    pub fn save_checkpoint(&self, checkpoint: &Checkpoint) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.path(CHECKPOINT_FILE), checkpoint.to_string())?;
        Ok(())
    }

    /// Read the resumption cursor, if one was left behind.
    pub fn load_checkpoint(&self) -> Result<Option<Checkpoint>> {
        let path = self.path(CHECKPOINT_FILE);
        match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Checkpoint::parse(&text).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Drop the resumption cursor after a completed run.
    pub fn clear_checkpoint(&self) -> Result<()> {
        let path = self.path(CHECKPOINT_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_files_yields_empty_store() {
        let tmp = TempDir::new().unwrap();
        let manager = CheckpointManager::new(tmp.path(), 20);
        let (store, checkpoint) = manager.load().unwrap();
        assert!(store.items().is_empty());
        assert!(store.units().is_empty());
        assert!(checkpoint.is_none());
    }

    #[test]
    fn test_checkpoint_round_trip_and_clear() {
        let tmp = TempDir::new().unwrap();
        let manager = CheckpointManager::new(tmp.path(), 20);

        manager.save_checkpoint(&Checkpoint::new('C', 4)).unwrap();
        assert_eq!(
            manager.load_checkpoint().unwrap(),
            Some(Checkpoint::new('C', 4))
        );

        manager.clear_checkpoint().unwrap();
        assert_eq!(manager.load_checkpoint().unwrap(), None);
        // clearing twice is fine
        manager.clear_checkpoint().unwrap();
    }

    #[test]
    fn test_malformed_table_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("items.csv"), "item_id,name\nnot-a-number,x\n").unwrap();
        let manager = CheckpointManager::new(tmp.path(), 20);
        assert!(manager.load().is_err());
    }
}
