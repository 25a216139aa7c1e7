//! Catalog module
//!
//! The catalog maps human-readable hierarchical table names to physical
//! storage locations under a root directory and manages table lifecycle:
//! existence checks, creation, deletion, and the close-all sweep over
//! every table opened in the current session.

use crate::access;
use crate::store::{OpenOptions, StoreType};
use crate::table::{RecordArray, Table};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub mod error;
pub use error::{CatalogError, CatalogResult};

/// Name-translation mode for resolving logical table names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMode {
    /// Names map to a single path component under the root
    Flat,
    /// The `-` separator in names maps to the platform path separator,
    /// so `a-b` and `a/b` resolve to the same nested location
    Nested,
}

/// Name-to-path translator and table lifecycle manager
///
/// The catalog holds no live table handles: every access re-resolves the
/// name and constructs a fresh [`Table`]. The only state it carries is the
/// session set, an append-only (and deliberately non-deduplicated) list of
/// names opened through it, consumed by [`Catalog::close_all`].
pub struct Catalog {
    root: PathBuf,
    store_type: StoreType,
    name_mode: NameMode,
    options: OpenOptions,
    session: Mutex<Vec<String>>,
}

impl Catalog {
    /// File extension of every storage unit under the root
    const TABLE_FILE_EXT: &'static str = "tbl";

    /// Create a catalog rooted at `root`, creating the root directory if
    /// missing.
    pub fn new(
        root: impl AsRef<Path>,
        store_type: StoreType,
        name_mode: NameMode,
    ) -> CatalogResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            store_type,
            name_mode,
            options: OpenOptions::default(),
            session: Mutex::new(Vec::new()),
        })
    }

    /// Catalog root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Backend variant used for every table this catalog opens
    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    /// Resolve a logical name to its physical storage path.
    ///
    /// Pure name translation, no I/O: separator replacement per the name
    /// mode, then extension normalization, then joining under the root.
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        let name = match self.name_mode {
            NameMode::Flat => name.to_string(),
            NameMode::Nested => name.replace('-', std::path::MAIN_SEPARATOR_STR),
        };
        let mut path = PathBuf::from(name);
        if path
            .extension()
            .is_none_or(|ext| ext != Self::TABLE_FILE_EXT)
        {
            path.set_extension(Self::TABLE_FILE_EXT);
        }
        self.root.join(path)
    }

    /// Returns true iff the resolved storage unit is readable
    pub fn contains(&self, name: &str) -> bool {
        access::readable(&self.resolve_path(name))
    }

    /// Open the named table, recording the name in the session set.
    ///
    /// Every call constructs a fresh table handle; nothing is cached.
    pub fn get(&self, name: &str) -> CatalogResult<Table> {
        let path = self.resolve_path(name);
        if !access::readable(&path) {
            return Err(CatalogError::TableNotFound(name.to_string()));
        }
        self.session.lock().push(name.to_string());
        let table = Table::open(&path, None, self.store_type, &self.options)?;
        debug!(table = %name, "opened table");
        Ok(table)
    }

    /// Keyed assignment through the catalog is explicitly disallowed;
    /// write through [`Table::assign`] or [`Catalog::create_table`].
    pub fn set(&self, name: &str, _data: &RecordArray) -> CatalogResult<()> {
        warn!(table = %name, "rejected keyed assignment through the catalog");
        Err(CatalogError::Unsupported(format!(
            "cannot assign table {} through the catalog",
            name
        )))
    }

    /// Remove the storage unit for `name`. Removing an absent unit is a
    /// no-op, not an error.
    pub fn delete(&self, name: &str) -> CatalogResult<()> {
        let path = self.resolve_path(name);
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path)?,
            Ok(_) => fs::remove_file(&path)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err.into()),
        }
        info!(table = %name, "deleted storage unit");
        Ok(())
    }

    /// Every file path under the catalog root: a fresh recursive walk per
    /// call, directories post-order, files in arbitrary per-directory
    /// order.
    pub fn iter_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        collect_files(&self.root, &mut paths);
        paths
    }

    /// Number of files under the catalog root
    pub fn len(&self) -> usize {
        self.iter_paths().len()
    }

    /// Returns true if the catalog root holds no files
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create the named table, optionally bulk-ingesting `data`.
    ///
    /// An existing unit fails with `TableAlreadyExists` unless `replace`
    /// is set, in which case the old unit is deleted first. Missing parent
    /// directories of a nested name are created.
    pub fn create_table(
        &self,
        name: &str,
        data: Option<&RecordArray>,
        replace: bool,
    ) -> CatalogResult<Table> {
        let path = self.resolve_path(name);
        if access::readable(&path) {
            if !replace {
                return Err(CatalogError::TableAlreadyExists(name.to_string()));
            }
            self.delete(name)?;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let table = Table::open(&path, data, self.store_type, &self.options)?;
        self.session.lock().push(name.to_string());
        info!(table = %name, replace, "created table");
        Ok(table)
    }

    /// Close every table recorded in the session set.
    ///
    /// Each name is reopened via [`Catalog::get`] and closed; the catalog
    /// never retained the original handles. Entries whose unit has been
    /// deleted since are skipped with a warning rather than failing the
    /// sweep.
    pub fn close_all(&self) -> CatalogResult<()> {
        let names: Vec<String> = self.session.lock().clone();
        for name in names {
            match self.get(&name) {
                Ok(mut table) => table.close()?,
                Err(CatalogError::TableNotFound(_)) => {
                    warn!(table = %name, "session entry no longer exists, skipping");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Snapshot of the session set, in recording order
    pub fn session_names(&self) -> Vec<String> {
        self.session.lock().clone()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("root", &self.root)
            .field("store_type", &self.store_type)
            .field("name_mode", &self.name_mode)
            .finish()
    }
}

/// Recursive post-order walk: descend into subdirectories first, then
/// push this directory's files.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let entries: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    for path in entries.iter().filter(|p| p.is_dir()) {
        collect_files(path, out);
    }
    for path in entries.into_iter().filter(|p| p.is_file()) {
        out.push(path);
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
