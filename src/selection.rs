//! User-chosen custom color selection, persisted as a JSON array of codes.
//!
//! The in-memory list only reaches storage through [`CustomSelection::save`],
//! so edits can be staged (e.g. while a picker is open) and then either
//! confirmed or discarded with [`CustomSelection::reload`].

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Key the selection is persisted under.
pub const STORAGE_KEY: &str = "customBeadColors";

/// Durable single-value storage for the serialized selection.
pub trait SelectionStorage {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&mut self, value: &str) -> io::Result<()>;
}

/// Stores the selection in `<dir>/customBeadColors.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStorage for FileStorage {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, value: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, value)
    }
}

/// Process-local storage. The wasm bindings fill it with the value the page
/// read from `localStorage`; see [`crate::startup_store`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    value: Option<String>,
}

impl MemoryStorage {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl SelectionStorage for MemoryStorage {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> io::Result<()> {
        self.value = Some(value.to_owned());
        Ok(())
    }
}

/// Ordered, duplicate-free list of selected codes plus its backing storage.
#[derive(Debug)]
pub struct CustomSelection<S: SelectionStorage> {
    storage: S,
    codes: Vec<String>,
}

impl<S: SelectionStorage> CustomSelection<S> {
    /// Load from storage. Missing or corrupt data yields an empty selection.
    pub fn load(storage: S) -> Self {
        let codes = read_codes(&storage);
        Self { storage, codes }
    }

    /// Discard unsaved edits and re-read storage.
    pub fn reload(&mut self) {
        self.codes = read_codes(&self.storage);
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn add(&mut self, code: &str) {
        if !self.contains(code) {
            self.codes.push(code.to_owned());
        }
    }

    pub fn remove(&mut self, code: &str) {
        self.codes.retain(|c| c != code);
    }

    /// Select the code if absent, deselect it if present.
    pub fn toggle(&mut self, code: &str) {
        if self.contains(code) {
            self.remove(code);
        } else {
            self.add(code);
        }
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    /// Replace the whole selection, dropping duplicates (first occurrence wins).
    pub fn replace<I, T>(&mut self, codes: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.codes.clear();
        for code in codes {
            self.add(code.as_ref());
        }
    }

    /// Persist the current in-memory selection.
    pub fn save(&mut self) -> Result<()> {
        let json =
            serde_json::to_string(&self.codes).map_err(|e| Error::Storage(e.to_string()))?;
        self.storage
            .write(&json)
            .map_err(|e| Error::Storage(e.to_string()))?;
        tracing::debug!(count = self.codes.len(), "saved custom color selection");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn read_codes(storage: &impl SelectionStorage) -> Vec<String> {
    let text = match storage.read() {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read custom color selection");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<String>>(&text) {
        Ok(list) => {
            let mut codes: Vec<String> = Vec::with_capacity(list.len());
            for code in list {
                if !codes.contains(&code) {
                    codes.push(code);
                }
            }
            codes
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding corrupt custom color selection");
            Vec::new()
        }
    }
}
