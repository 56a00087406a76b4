//! Persistence seam for grid state.
//!
//! The store is injected into the [`Workbook`](crate::workbook::Workbook)
//! once at startup and lives for the process. Every mutation writes the
//! whole grid through it; there is no batching or debounce.

use std::cell::RefCell;
use std::rc::Rc;

use crate::grid::Grid;

/// A durable string-keyed slot holding one serialized grid.
pub trait Store {
    /// Read the saved grid. `None` when nothing is saved or the saved
    /// blob does not decode - callers fall back to a blank grid either way.
    fn load(&self) -> Option<Grid>;

    /// Write the entire grid, replacing any previous save.
    fn save(&self, grid: &Grid) -> Result<(), String>;

    /// Remove the saved grid. Removing an absent save is not an error.
    fn clear(&self) -> Result<(), String>;
}

/// In-process store holding the serialized blob in memory.
///
/// Clones share the same slot, so a test can keep a handle to the store it
/// handed to a workbook. Goes through the JSON codec on every call so the
/// persisted shape is exercised, not bypassed.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with a raw blob (for decode-failure tests).
    pub fn with_blob(blob: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(blob.to_string()))),
        }
    }

    /// The raw saved blob, if any.
    pub fn blob(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Option<Grid> {
        self.slot
            .borrow()
            .as_deref()
            .and_then(|blob| serde_json::from_str(blob).ok())
    }

    fn save(&self, grid: &Grid) -> Result<(), String> {
        let blob = serde_json::to_string(grid).map_err(|e| e.to_string())?;
        *self.slot.borrow_mut() = Some(blob);
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}
