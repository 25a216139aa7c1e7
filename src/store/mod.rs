//! Backing store module
//!
//! The table layer consumes persistence through the [`ArrayStore`] trait:
//! a group of named, typed arrays with metadata queries, whole-array reads
//! and writes, and a single-level transaction. Two backends implement it:
//! an embedded single-file store ([`FileStore`], connection-oriented,
//! requires an explicit close) and a hierarchical directory store
//! ([`DirStore`], one file per array, no close needed).

use crate::array::TypedArray;
use crate::types::ScalarType;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

// Re-export error types and result type
pub mod error;
pub use error::{StoreError, StoreResult};

// Backend implementations
pub mod dir;
pub mod file;
pub use dir::DirStore;
pub use file::FileStore;

/// Magic prefix of every persisted record
const MAGIC: &[u8; 8] = b"TABSTOR1";

/// Backing store variant selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// Embedded single-file store, connection-oriented
    File,
    /// Hierarchical directory store, one file per array
    Directory,
}

/// Options applied when opening a storage unit
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Reject writes and transactions; opening a missing unit fails
    pub read_only: bool,
}

impl OpenOptions {
    /// Read-only open options
    pub fn read_only() -> Self {
        Self { read_only: true }
    }
}

/// Metadata of one stored array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayMeta {
    /// Element type
    pub dtype: ScalarType,
    /// Full shape, row dimension first
    pub shape: Vec<usize>,
    /// Logical byte size
    pub nbytes: usize,
    /// Physically stored byte size (encoded record length)
    pub nbytes_stored: usize,
}

/// Group-of-arrays persistence capability
///
/// One instance corresponds to one opened storage unit. Array names are
/// enumerated in sorted order so schema derivation is stable across opens.
pub trait ArrayStore {
    /// Names of all arrays in the group, sorted
    fn array_names(&self) -> Vec<String>;

    /// Metadata of one array
    fn array_meta(&self, name: &str) -> StoreResult<ArrayMeta>;

    /// Read one array fully into memory
    fn read_array(&self, name: &str) -> StoreResult<TypedArray>;

    /// Write one array, replacing any existing array of the same name
    fn write_array(&mut self, name: &str, values: TypedArray) -> StoreResult<()>;

    /// Start a transaction; writes become visible on commit
    fn begin_transaction(&mut self) -> StoreResult<()>;

    /// Commit the open transaction
    fn commit(&mut self) -> StoreResult<()>;

    /// Discard the open transaction
    fn rollback(&mut self) -> StoreResult<()>;

    /// Release the connection; idempotent
    fn close(&mut self) -> StoreResult<()>;

    /// Whether this backend holds a connection that needs closing
    fn requires_close(&self) -> bool;
}

/// Open a storage unit of the selected backend at `location`.
pub fn open_store(
    location: &Path,
    store_type: StoreType,
    options: &OpenOptions,
) -> StoreResult<Box<dyn ArrayStore>> {
    match store_type {
        StoreType::File => Ok(Box::new(FileStore::open(location, options)?)),
        StoreType::Directory => Ok(Box::new(DirStore::open(location, options)?)),
    }
}

/// Encode a value as a checksummed record: magic, CRC32 of the payload,
/// then the JSON payload.
pub(crate) fn encode_record<T: Serialize>(value: &T) -> StoreResult<Vec<u8>> {
    let payload = serde_json::to_vec(value).map_err(StoreError::EncodeError)?;
    let mut buf = Vec::with_capacity(MAGIC.len() + 4 + payload.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a checksummed record, verifying magic and CRC32.
pub(crate) fn decode_record<T: DeserializeOwned>(bytes: &[u8], origin: &Path) -> StoreResult<T> {
    let header_len = MAGIC.len() + 4;
    if bytes.len() < header_len || &bytes[..MAGIC.len()] != MAGIC {
        return Err(StoreError::Corrupt(format!(
            "Bad record header in {:?}",
            origin
        )));
    }
    let stored_crc = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let payload = &bytes[header_len..];
    if crc32fast::hash(payload) != stored_crc {
        return Err(StoreError::Corrupt(format!(
            "Checksum mismatch in {:?}",
            origin
        )));
    }
    serde_json::from_slice(payload).map_err(StoreError::DecodeError)
}
