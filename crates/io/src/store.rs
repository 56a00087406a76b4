// Grid persistence as a single JSON file
//
// The durable analog of one string-keyed slot: the whole grid, encoded as
// a JSON array-of-arrays of {value, style} objects, rewritten on every
// mutation. No schema versioning - a shape change means a clear.

use std::fs;
use std::path::{Path, PathBuf};

use gridpad_engine::grid::Grid;
use gridpad_engine::store::Store;

/// File-backed [`Store`] under the user config dir by default.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
        }
    }

    /// Store backed by an explicit file (settings override, tests).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridpad")
            .join("sheet.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Option<Grid> {
        // Missing file and undecodable blob both read as "no saved state".
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    fn save(&self, grid: &Grid) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string(grid).map_err(|e| e.to_string())?;
        fs::write(&self.path, json).map_err(|e| e.to_string())
    }

    fn clear(&self) -> Result<(), String> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    }
}
