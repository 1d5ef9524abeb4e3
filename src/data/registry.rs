use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Bundled demo workbook, listed first when present in the base directory.
pub const DEFAULT_WORKBOOK: &str = "TestSearch.xlsx";

/// Directory under the base dir where added files are stored.
pub const UPLOAD_DIR: &str = "uploaded_files";

/// Extensions the registry accepts, matched case-insensitively.
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Name collision with an existing entry. The upload is skipped so the
    /// existing file is never silently overwritten.
    #[error("a file named '{0}' already exists")]
    DuplicateFile(String),
    #[error("'{0}' is not a spreadsheet file")]
    UnsupportedType(String),
    #[error("invalid file name '{0}'")]
    InvalidName(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// File registry
// ---------------------------------------------------------------------------

/// One selectable file: display name (unique registry key) and its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Name → path view over the bundled workbook and the upload directory.
/// Constructed once per session; [`FileRegistry::list`] re-reads the
/// filesystem on every call, so the view always reflects the latest upload.
pub struct FileRegistry {
    base_dir: PathBuf,
    upload_dir: PathBuf,
}

impl FileRegistry {
    /// Create a registry rooted at `base_dir`, creating the upload directory
    /// if it does not exist yet.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let base_dir = base_dir.into();
        let upload_dir = base_dir.join(UPLOAD_DIR);
        fs::create_dir_all(&upload_dir)?;
        Ok(FileRegistry {
            base_dir,
            upload_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Whether `name` carries an accepted spreadsheet extension.
    pub fn is_spreadsheet(name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SPREADSHEET_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Current entries: the bundled workbook first (if present), then every
    /// spreadsheet in the upload directory, sorted by name. Names are unique
    /// by construction since colliding uploads are rejected.
    pub fn list(&self) -> Result<Vec<FileEntry>, RegistryError> {
        let mut entries = Vec::new();

        let default_path = self.base_dir.join(DEFAULT_WORKBOOK);
        if default_path.is_file() {
            entries.push(FileEntry {
                name: DEFAULT_WORKBOOK.to_string(),
                path: default_path,
            });
        }

        let mut uploads: Vec<FileEntry> = Vec::new();
        for entry in fs::read_dir(&self.upload_dir)? {
            let entry = entry?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            if path.is_file() && Self::is_spreadsheet(name) {
                uploads.push(FileEntry {
                    name: name.to_string(),
                    path,
                });
            }
        }
        uploads.sort_by(|a, b| a.name.cmp(&b.name));
        entries.extend(uploads);

        Ok(entries)
    }

    /// Path for a listed display name.
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>, RegistryError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|e| e.name == name)
            .map(|e| e.path))
    }

    /// Persist `bytes` verbatim under `name` in the upload directory.
    /// Names already present anywhere in the registry are rejected.
    pub fn add(&self, name: &str, bytes: &[u8]) -> Result<PathBuf, RegistryError> {
        if Path::new(name).file_name() != Some(OsStr::new(name)) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        if !Self::is_spreadsheet(name) {
            return Err(RegistryError::UnsupportedType(name.to_string()));
        }
        if self.list()?.iter().any(|e| e.name == name) {
            return Err(RegistryError::DuplicateFile(name.to_string()));
        }

        let dst = self.upload_dir.join(name);
        fs::write(&dst, bytes)?;
        Ok(dst)
    }
}
