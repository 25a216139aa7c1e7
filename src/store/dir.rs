//! Hierarchical directory store
//!
//! The storage unit is a directory holding one checksummed record file per
//! array (`<name>.col`). Arrays are read from disk on every access and no
//! connection state is held, so `close` is a no-op. Transactions stage
//! writes in memory and flush them file by file on commit; if a flush
//! fails partway, every file already flushed by that commit is rolled
//! back — new arrays are removed and replaced arrays restored to their
//! pre-transaction contents — so the unit is never left half-populated.

use crate::array::TypedArray;
use crate::store::{ArrayMeta, ArrayStore, OpenOptions, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const ARRAY_FILE_EXT: &str = "col";

/// Directory-backed group of arrays
#[derive(Debug)]
pub struct DirStore {
    path: PathBuf,
    /// Staged writes; `Some` while a transaction is open
    staged: Option<BTreeMap<String, TypedArray>>,
    read_only: bool,
}

impl DirStore {
    /// Open the store directory at `path`, creating it if missing.
    pub fn open(path: &Path, options: &OpenOptions) -> StoreResult<Self> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(StoreError::Corrupt(format!(
                    "{:?} exists but is not a directory",
                    path
                )));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                if options.read_only {
                    return Err(StoreError::IoError(err));
                }
                fs::create_dir_all(path)?;
            }
            Err(err) => return Err(StoreError::IoError(err)),
        }
        Ok(Self {
            path: path.to_path_buf(),
            staged: None,
            read_only: options.read_only,
        })
    }

    fn array_path(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.{}", name, ARRAY_FILE_EXT))
    }

    fn read_file(&self, name: &str) -> StoreResult<Vec<u8>> {
        match fs::read(self.array_path(name)) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::ArrayNotFound(name.to_string()))
            }
            Err(err) => Err(StoreError::IoError(err)),
        }
    }

    fn write_file(&self, name: &str, array: &TypedArray) -> StoreResult<()> {
        let bytes = crate::store::encode_record(array)?;
        let target = self.array_path(name);
        let tmp = self.path.join(format!("{}.{}.tmp", name, ARRAY_FILE_EXT));
        fs::write(&tmp, &bytes)?;
        if let Err(err) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        Ok(())
    }

    fn ensure_writable(&self) -> StoreResult<()> {
        if self.read_only {
            Err(StoreError::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Flush one staged array, returning the bytes it replaced, if any.
    fn flush_staged(&self, name: &str, array: &TypedArray) -> StoreResult<Option<Vec<u8>>> {
        let previous = match fs::read(self.array_path(name)) {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => return Err(StoreError::IoError(err)),
        };
        self.write_file(name, array)?;
        Ok(previous)
    }
}

impl ArrayStore for DirStore {
    fn array_names(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.path) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == ARRAY_FILE_EXT) {
                    path.file_stem().map(|s| s.to_string_lossy().into_owned())
                } else {
                    None
                }
            })
            .collect();
        names.sort();
        names
    }

    fn array_meta(&self, name: &str) -> StoreResult<ArrayMeta> {
        let bytes = self.read_file(name)?;
        let array: TypedArray = crate::store::decode_record(&bytes, &self.array_path(name))?;
        Ok(ArrayMeta {
            dtype: array.dtype(),
            shape: array.shape().to_vec(),
            nbytes: array.nbytes(),
            nbytes_stored: bytes.len(),
        })
    }

    fn read_array(&self, name: &str) -> StoreResult<TypedArray> {
        let bytes = self.read_file(name)?;
        crate::store::decode_record(&bytes, &self.array_path(name))
    }

    fn write_array(&mut self, name: &str, values: TypedArray) -> StoreResult<()> {
        self.ensure_writable()?;
        match self.staged.as_mut() {
            Some(staged) => {
                staged.insert(name.to_string(), values);
                Ok(())
            }
            None => self.write_file(name, &values),
        }
    }

    fn begin_transaction(&mut self) -> StoreResult<()> {
        self.ensure_writable()?;
        if self.staged.is_some() {
            return Err(StoreError::TransactionActive);
        }
        self.staged = Some(BTreeMap::new());
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.ensure_writable()?;
        let staged = self.staged.take().ok_or(StoreError::NoTransaction)?;
        // Pre-transaction bytes of every array this commit touches, so a
        // failure can put replaced arrays back instead of losing them.
        let mut flushed: Vec<(String, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
        for (name, array) in &staged {
            match self.flush_staged(name, array) {
                Ok(previous) => flushed.push((name.clone(), previous)),
                Err(err) => {
                    for (done, old) in flushed {
                        match old {
                            Some(bytes) => {
                                let _ = fs::write(self.array_path(&done), bytes);
                            }
                            None => {
                                let _ = fs::remove_file(self.array_path(&done));
                            }
                        }
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        if self.staged.take().is_none() {
            return Err(StoreError::NoTransaction);
        }
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn requires_close(&self) -> bool {
        false
    }
}
