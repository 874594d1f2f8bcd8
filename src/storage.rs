//! Persistence seam for the cart.
//!
//! A single durable slot holds a JSON snapshot of the form
//! `{ "items": [...] }`. Only the item list is persisted; the visibility flag
//! and derived totals are not. Backends are injected so the store logic stays
//! unit-testable without real durable storage.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use crate::domain::aggregates::CartLineItem;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub trait CartStorage {
    /// Loads the persisted snapshot. `Ok(None)` when nothing was ever saved.
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError>;

    /// Overwrites the persisted snapshot.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError>;
}

impl<S: CartStorage + ?Sized> CartStorage for &S {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        (**self).load()
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        (**self).save(snapshot)
    }
}

/// Non-durable backend; holds the snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with a raw JSON document, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: Mutex::new(Some(raw.into())) }
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot poisoned".into()))?;
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| StorageError::Unavailable("memory slot poisoned".into()))?;
        *slot = Some(raw);
        Ok(())
    }
}

/// One JSON document on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let raw = serde_json::to_string(snapshot)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
