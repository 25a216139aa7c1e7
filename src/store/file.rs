//! Embedded single-file store
//!
//! The whole group lives in one file: a checksummed record whose payload
//! is the map of array name to array. The file is loaded fully on open and
//! rewritten atomically (temp file + rename) on every non-transactional
//! write and on commit. The connection must be closed explicitly; after
//! close every operation fails with [`StoreError::Closed`].

use crate::array::TypedArray;
use crate::store::{ArrayMeta, ArrayStore, OpenOptions, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

type GroupImage = BTreeMap<String, TypedArray>;

/// Embedded-database-backed group of arrays
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    arrays: GroupImage,
    /// Pre-transaction image; `Some` while a transaction is open
    snapshot: Option<GroupImage>,
    read_only: bool,
    closed: bool,
}

impl FileStore {
    /// Open the store file at `path`, creating it if missing.
    ///
    /// A read-only open of a missing file fails instead of creating it.
    pub fn open(path: &Path, options: &OpenOptions) -> StoreResult<Self> {
        let arrays = match fs::read(path) {
            Ok(bytes) => crate::store::decode_record(&bytes, path)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if options.read_only {
                    return Err(StoreError::IoError(err));
                }
                GroupImage::new()
            }
            Err(err) => return Err(StoreError::IoError(err)),
        };

        let store = Self {
            path: path.to_path_buf(),
            arrays,
            snapshot: None,
            read_only: options.read_only,
            closed: false,
        };
        // Creating the unit makes it visible to existence probes right away.
        if !store.read_only && !path.exists() {
            store.persist()?;
        }
        Ok(store)
    }

    fn persist(&self) -> StoreResult<()> {
        let bytes = crate::store::encode_record(&self.arrays)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        self.ensure_open()?;
        if self.read_only {
            Err(StoreError::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl ArrayStore for FileStore {
    fn array_names(&self) -> Vec<String> {
        self.arrays.keys().cloned().collect()
    }

    fn array_meta(&self, name: &str) -> StoreResult<ArrayMeta> {
        self.ensure_open()?;
        let array = self
            .arrays
            .get(name)
            .ok_or_else(|| StoreError::ArrayNotFound(name.to_string()))?;
        let encoded = crate::store::encode_record(array)?;
        Ok(ArrayMeta {
            dtype: array.dtype(),
            shape: array.shape().to_vec(),
            nbytes: array.nbytes(),
            nbytes_stored: encoded.len(),
        })
    }

    fn read_array(&self, name: &str) -> StoreResult<TypedArray> {
        self.ensure_open()?;
        self.arrays
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::ArrayNotFound(name.to_string()))
    }

    fn write_array(&mut self, name: &str, values: TypedArray) -> StoreResult<()> {
        self.ensure_writable()?;
        if self.snapshot.is_some() {
            self.arrays.insert(name.to_string(), values);
            return Ok(());
        }
        // Outside a transaction the in-memory image must track the disk
        // image, so a failed persist undoes the insert.
        let previous = self.arrays.insert(name.to_string(), values);
        if let Err(err) = self.persist() {
            match previous {
                Some(old) => {
                    self.arrays.insert(name.to_string(), old);
                }
                None => {
                    self.arrays.remove(name);
                }
            }
            return Err(err);
        }
        Ok(())
    }

    fn begin_transaction(&mut self) -> StoreResult<()> {
        self.ensure_writable()?;
        if self.snapshot.is_some() {
            return Err(StoreError::TransactionActive);
        }
        self.snapshot = Some(self.arrays.clone());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.ensure_writable()?;
        if self.snapshot.take().is_none() {
            return Err(StoreError::NoTransaction);
        }
        // The rename inside persist is atomic, so a failed commit leaves
        // the on-disk image at the pre-transaction state.
        self.persist()
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.ensure_open()?;
        match self.snapshot.take() {
            Some(image) => {
                self.arrays = image;
                Ok(())
            }
            None => Err(StoreError::NoTransaction),
        }
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.closed {
            return Ok(());
        }
        if !self.read_only {
            self.persist()?;
        }
        self.closed = true;
        Ok(())
    }

    fn requires_close(&self) -> bool {
        true
    }
}
