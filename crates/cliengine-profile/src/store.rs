//! Persisted-record stores.
//!
//! A record is an identifier plus an opaque text payload. The directory
//! store keeps one `<id>.<extension>` file per record; the memory store is
//! for tests and ephemeral sessions.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cliengine_types::error::{EngineError, Result};

use crate::allocator::{allocate, allocate_file_name, record_file_name, strip_extension};

/// Storage of identifier-keyed records.
pub trait RecordStore {
    /// Identifiers of every stored record.
    fn list_identifiers(&self) -> Result<HashSet<String>>;

    /// Whether a record with this identifier exists.
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.list_identifiers()?.contains(id))
    }

    /// `base` if no record uses it, else the first free `base_k`.
    fn allocate_identifier(&self, base: &str) -> Result<String> {
        Ok(allocate(base, &self.list_identifiers()?))
    }

    /// Read a record's payload.
    fn read_record(&self, id: &str) -> Result<String>;

    /// Create or replace a record.
    fn write_record(&mut self, id: &str, payload: &str) -> Result<()>;

    /// Delete a record. Fails if it does not exist.
    fn remove_record(&mut self, id: &str) -> Result<()>;
}

/// Reject identifiers that cannot name a record file.
pub fn validate_identifier(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(EngineError::Store("profile id must not be empty".to_string()));
    }
    if id.starts_with('.') || id.contains(['/', '\\', '\0']) {
        return Err(EngineError::Store(format!("invalid profile id: {id:?}")));
    }
    Ok(())
}

/// Records stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    extension: String,
}

impl DirectoryStore {
    /// A store over `dir` using files named `<id>.<extension>`. The directory
    /// is created on first write.
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn path(&self, id: &str) -> Result<PathBuf> {
        validate_identifier(id)?;
        Ok(self.dir.join(record_file_name(id, &self.extension)))
    }

    /// Names of the regular files in the directory. Missing directory lists
    /// as empty.
    fn file_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(_) => log::debug!("skipping non-UTF-8 file name in {}", self.dir.display()),
            }
        }
        Ok(names)
    }
}

impl RecordStore for DirectoryStore {
    fn list_identifiers(&self) -> Result<HashSet<String>> {
        Ok(self
            .file_names()?
            .iter()
            .filter_map(|name| strip_extension(name, &self.extension))
            .map(str::to_string)
            .collect())
    }

    fn allocate_identifier(&self, base: &str) -> Result<String> {
        let file_name = allocate_file_name(base, self.file_names()?, &self.extension);
        let id = strip_extension(&file_name, &self.extension).unwrap_or(base);
        Ok(id.to_string())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.path(id)?.is_file())
    }

    fn read_record(&self, id: &str) -> Result<String> {
        let path = self.path(id)?;
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EngineError::Store(format!("no such record: {id}")),
            _ => e.into(),
        })
    }

    fn write_record(&mut self, id: &str, payload: &str) -> Result<()> {
        let path = self.path(id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, payload)?;
        log::debug!("wrote record {}", path.display());
        Ok(())
    }

    fn remove_record(&mut self, id: &str) -> Result<()> {
        let path = self.path(id)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EngineError::Store(format!("no such record: {id}")),
            _ => e.into(),
        })?;
        log::debug!("removed record {}", path.display());
        Ok(())
    }
}

/// Records held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn list_identifiers(&self) -> Result<HashSet<String>> {
        Ok(self.records.keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.records.contains_key(id))
    }

    fn read_record(&self, id: &str) -> Result<String> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::Store(format!("no such record: {id}")))
    }

    fn write_record(&mut self, id: &str, payload: &str) -> Result<()> {
        validate_identifier(id)?;
        self.records.insert(id.to_string(), payload.to_string());
        Ok(())
    }

    fn remove_record(&mut self, id: &str) -> Result<()> {
        self.records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EngineError::Store(format!("no such record: {id}")))
    }
}
