use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::loader::{self, LoadError};
use super::model::Table;

// ---------------------------------------------------------------------------
// Table cache
// ---------------------------------------------------------------------------

/// Explicit memo of loaded sheets keyed by (path, sheet name, header offset).
/// Invalidation is the owner's call; the application clears the cache after
/// an upload changes the file set.
#[derive(Default)]
pub struct TableCache {
    entries: HashMap<(PathBuf, String, usize), Rc<Table>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the requested sheet, loading it on first access.
    /// Load failures go back to the caller and are not cached.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        sheet: &str,
        header_offset: usize,
    ) -> Result<Rc<Table>, LoadError> {
        let key = (path.to_path_buf(), sheet.to_string(), header_offset);
        if let Some(table) = self.entries.get(&key) {
            return Ok(Rc::clone(table));
        }

        let table = Rc::new(loader::load_table(path, sheet, header_offset)?);
        log::info!(
            "Loaded sheet '{sheet}' from {}: {} rows, {} columns",
            path.display(),
            table.len(),
            table.columns.len()
        );
        self.entries.insert(key, Rc::clone(&table));
        Ok(table)
    }

    /// Drop every cached sheet.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
