use std::path::PathBuf;

use crate::data::cache::TableCache;
use crate::data::loader::{self, DEFAULT_HEADER_OFFSET};
use crate::data::registry::{FileEntry, FileRegistry, RegistryError};
use crate::data::search::{self, ColumnFilters, SearchReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    SingleSheet,
    AllSheets,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub registry: FileRegistry,
    pub cache: TableCache,

    /// Registry snapshot from the last refresh.
    pub files: Vec<FileEntry>,
    /// Display name of the selected file.
    pub selected_file: Option<String>,
    /// Sheets of the selected file, in workbook order.
    pub sheets: Vec<String>,
    pub selected_sheet: Option<String>,

    pub mode: SearchMode,
    /// Column order of the selected sheet, driving the filter inputs.
    pub filter_columns: Vec<String>,
    /// Per-column filter texts (single-sheet mode).
    pub filters: ColumnFilters,
    /// Whole-row query (all-sheets mode).
    pub query: String,

    /// Last computed result; `None` until a search ran.
    pub results: Option<SearchReport>,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(registry: FileRegistry) -> Self {
        let mut state = AppState {
            registry,
            cache: TableCache::new(),
            files: Vec::new(),
            selected_file: None,
            sheets: Vec::new(),
            selected_sheet: None,
            mode: SearchMode::SingleSheet,
            filter_columns: Vec::new(),
            filters: ColumnFilters::new(),
            query: String::new(),
            results: None,
            status_message: None,
        };
        state.refresh_files();
        state
    }

    /// Re-read the registry and keep the selection valid.
    pub fn refresh_files(&mut self) {
        match self.registry.list() {
            Ok(files) => self.files = files,
            Err(e) => {
                log::error!("Failed to list files: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.files.clear();
            }
        }

        let selection_ok = self
            .selected_file
            .as_ref()
            .is_some_and(|name| self.files.iter().any(|f| f.name == *name));
        if !selection_ok {
            match self.files.first().map(|f| f.name.clone()) {
                Some(first) => self.select_file(first),
                None => self.clear_selection(),
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selected_file = None;
        self.sheets.clear();
        self.selected_sheet = None;
        self.filter_columns.clear();
        self.filters.clear();
        self.results = None;
    }

    fn selected_path(&self) -> Option<PathBuf> {
        let name = self.selected_file.as_ref()?;
        self.files
            .iter()
            .find(|f| f.name == *name)
            .map(|f| f.path.clone())
    }

    /// Select a file and enumerate its sheets. Enumeration failure aborts the
    /// selection: no partial sheet list is shown.
    pub fn select_file(&mut self, name: String) {
        self.selected_file = Some(name);
        self.sheets.clear();
        self.selected_sheet = None;
        self.filter_columns.clear();
        self.filters.clear();
        self.results = None;

        let Some(path) = self.selected_path() else {
            return;
        };
        match loader::sheet_names(&path) {
            Ok(sheets) => {
                self.sheets = sheets;
                self.status_message = None;
                if let Some(first) = self.sheets.first().cloned() {
                    self.select_sheet(first);
                }
            }
            Err(e) => {
                log::error!("Failed to enumerate sheets of {}: {e}", path.display());
                self.status_message = Some(format!("Cannot read file: {e}"));
            }
        }
    }

    /// Select a sheet, loading it (through the cache) to discover its columns
    /// for the filter inputs.
    pub fn select_sheet(&mut self, sheet: String) {
        self.selected_sheet = Some(sheet.clone());
        self.filter_columns.clear();
        self.filters.clear();
        self.results = None;

        let Some(path) = self.selected_path() else {
            return;
        };
        match self.cache.get_or_load(&path, &sheet, DEFAULT_HEADER_OFFSET) {
            Ok(table) => {
                self.filter_columns = table.columns.clone();
                self.filters = search::init_filters(&table);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load sheet '{sheet}': {e}");
                self.status_message = Some(format!("Cannot load sheet: {e}"));
            }
        }
    }

    /// Run the per-column filter over the selected sheet.
    pub fn run_single_sheet_search(&mut self) {
        let (Some(path), Some(sheet)) = (self.selected_path(), self.selected_sheet.clone()) else {
            return;
        };

        match self.cache.get_or_load(&path, &sheet, DEFAULT_HEADER_OFFSET) {
            Ok(table) => {
                let report = search::filter_single_sheet(&table, &sheet, &self.filters);
                log::info!(
                    "Single-sheet search in '{sheet}': {} matching rows",
                    report.total
                );
                self.status_message = None;
                self.results = Some(report);
            }
            Err(e) => {
                log::error!("Search failed: {e}");
                self.status_message = Some(format!("Cannot load sheet: {e}"));
            }
        }
    }

    /// Run the whole-row search across every sheet of the selected file.
    pub fn run_all_sheets_search(&mut self) {
        let Some(path) = self.selected_path() else {
            return;
        };

        let sheets = self.sheets.clone();
        let cache = &mut self.cache;
        let outcome = search::search_all_sheets(&sheets, &self.query, |sheet| {
            cache.get_or_load(&path, sheet, DEFAULT_HEADER_OFFSET)
        });

        match outcome {
            Ok(Some(report)) => {
                log::info!(
                    "All-sheets search for '{}': {} matches across {} sheets",
                    self.query,
                    report.total,
                    sheets.len()
                );
                self.status_message = None;
                self.results = Some(report);
            }
            Ok(None) => {
                self.results = None;
                self.status_message = Some("Enter a search term first.".to_string());
            }
            Err(e) => {
                log::error!("Search failed: {e}");
                self.status_message = Some(format!("Cannot load sheet: {e}"));
            }
        }
    }

    /// Add files picked by the user: read each and store it through the
    /// registry. Duplicates are skipped with a warning and the rest of the
    /// batch continues; any success invalidates the table cache.
    pub fn add_files(&mut self, paths: Vec<PathBuf>) {
        let mut saved = 0usize;
        let mut messages: Vec<String> = Vec::new();

        for path in paths {
            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
            else {
                messages.push(format!("Skipped '{}': unreadable file name.", path.display()));
                continue;
            };

            let bytes = match std::fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    log::error!("Failed to read {}: {e}", path.display());
                    messages.push(format!("Could not read '{name}': {e}."));
                    continue;
                }
            };

            match self.registry.add(&name, &bytes) {
                Ok(_) => {
                    log::info!("Stored upload '{name}' ({} bytes)", bytes.len());
                    saved += 1;
                }
                Err(RegistryError::DuplicateFile(_)) => {
                    log::warn!("Upload '{name}' already exists, skipping");
                    messages.push(format!("'{name}' already exists, skipped."));
                }
                Err(e) => {
                    log::error!("Failed to store '{name}': {e}");
                    messages.push(format!("Could not save '{name}': {e}."));
                }
            }
        }

        if saved > 0 {
            // Previously loaded sheets may now be stale.
            self.cache.clear();
            self.refresh_files();
            messages.push(format!("Saved {saved} file(s)."));
        }
        self.status_message = if messages.is_empty() {
            None
        } else {
            Some(messages.join(" "))
        };
    }
}
