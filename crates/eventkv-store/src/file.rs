//! JSON file backend.

use crate::error::StoreError;
use crate::traits::{decode, encode, DocumentStore};
use eventkv_core::Document;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bytes written when initialising a missing data file.
pub const EMPTY_DOCUMENT: &[u8] = b"{}";

/// Options for the file backend.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each save (default: false).
    pub sync: bool,
    /// Whether to create the file with an empty document if it doesn't
    /// exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Document stored as a single JSON object file.
///
/// Every `save` truncates and rewrites the whole file. Nothing guards the
/// file against other writers.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    sync: bool,
}

impl JsonFileStore {
    /// Opens the data file at `path`.
    ///
    /// If the file doesn't exist and `options.create` is `true`, it is
    /// created holding `{}`. An existing file is left untouched; its content
    /// is only validated on the first `load`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if:
    /// - The path exists but is not a regular file
    /// - The file is missing and `options.create` is `false`
    /// - The file cannot be created
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Err(StoreError::NotAFile(path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound && options.create => {
                write_file(&path, EMPTY_DOCUMENT, options.sync)?;
                info!(path = %path.display(), "initialised empty data file");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            path,
            sync: options.sync,
        })
    }

    /// Returns the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Document, StoreError> {
        let bytes = fs::read(&self.path)?;
        decode(&bytes)
    }

    fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = encode(doc)?;
        write_file(&self.path, &bytes, self.sync)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }
}

fn write_file(path: &Path, bytes: &[u8], sync: bool) -> Result<(), StoreError> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}
