//! Column-group table over one backing-store group

use crate::access;
use crate::array::TypedArray;
use crate::store::{self, ArrayStore, OpenOptions, StoreType};
use crate::table::error::{TableError, TableResult};
use crate::table::record::RecordArray;
use crate::table::select::{SelectKey, Selection};
use crate::types::Field;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One logical table: a group of independently stored column arrays
/// sharing a conceptual row index.
///
/// The table owns its store handle exclusively. Handles are not shared or
/// deduplicated; two tables opened at the same location see each other's
/// writes only once they reach the backing store.
pub struct Table {
    location: PathBuf,
    store_type: StoreType,
    store: Box<dyn ArrayStore>,
    closed: bool,
}

impl Table {
    /// Open or create the group at `location` in the selected backend.
    ///
    /// Fails with [`TableError::Access`] when the parent directory of the
    /// location is not readable. When `initial_data` is given, every field
    /// is written as one column array inside a single store transaction;
    /// a failed field write rolls the transaction back and surfaces
    /// [`TableError::Ingest`], leaving the table unpopulated.
    pub fn open(
        location: impl AsRef<Path>,
        initial_data: Option<&RecordArray>,
        store_type: StoreType,
        options: &OpenOptions,
    ) -> TableResult<Self> {
        let location = location.as_ref().to_path_buf();
        if !access::parent_readable(&location) {
            return Err(TableError::Access(location));
        }
        let mut store = store::open_store(&location, store_type, options)?;
        if let Some(data) = initial_data {
            Self::ingest(store.as_mut(), data)?;
        }
        Ok(Self {
            location,
            store_type,
            store,
            closed: false,
        })
    }

    /// Write every field of `data` as one column array inside a single
    /// transaction.
    pub(crate) fn ingest(store: &mut dyn ArrayStore, data: &RecordArray) -> TableResult<()> {
        store
            .begin_transaction()
            .map_err(|err| TableError::Ingest(err.to_string()))?;
        for (field, column) in data.fields().iter().zip(data.columns()) {
            if let Err(err) = store.write_array(&field.name, column.clone()) {
                let _ = store.rollback();
                return Err(TableError::Ingest(format!(
                    "column {}: {}",
                    field.name, err
                )));
            }
        }
        if let Err(err) = store.commit() {
            return Err(TableError::Ingest(err.to_string()));
        }
        debug!(fields = data.num_fields(), "bulk ingest committed");
        Ok(())
    }

    /// Storage location of the group
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Backend variant this table was opened with
    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    /// Release the store connection where the backend requires it.
    ///
    /// Idempotent: closing an already-closed table is a no-op.
    pub fn close(&mut self) -> TableResult<()> {
        if self.closed {
            return Ok(());
        }
        if self.store.requires_close() {
            self.store.close()?;
        }
        self.closed = true;
        Ok(())
    }

    /// Returns true once `close` has run
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> TableResult<()> {
        if self.closed {
            Err(TableError::Closed)
        } else {
            Ok(())
        }
    }

    /// Ordered column names present in the group
    pub fn columns(&self) -> TableResult<Vec<String>> {
        self.ensure_open()?;
        Ok(self.store.array_names())
    }

    /// Composite dtype: one field per column, in column enumeration order
    pub fn dtype(&self) -> TableResult<Vec<Field>> {
        let mut fields = Vec::new();
        for name in self.columns()? {
            let meta = self.store.array_meta(&name)?;
            let inner_shape = meta.shape.get(1..).unwrap_or(&[]).to_vec();
            fields.push(Field::new(name, meta.dtype, inner_shape));
        }
        Ok(fields)
    }

    /// Table shape: a single-element tuple holding the minimum row count
    /// across columns. A table with zero columns has no minimum and fails
    /// with [`TableError::EmptyTable`].
    pub fn shape(&self) -> TableResult<(usize,)> {
        let mut min_rows: Option<usize> = None;
        for name in self.columns()? {
            let meta = self.store.array_meta(&name)?;
            let rows = meta.shape.first().copied().unwrap_or(0);
            min_rows = Some(min_rows.map_or(rows, |m| m.min(rows)));
        }
        min_rows.map(|rows| (rows,)).ok_or(TableError::EmptyTable)
    }

    /// Per-column row counts, for detecting inconsistently sized columns
    /// that the minimum-based `shape` silently tolerates.
    pub fn column_row_counts(&self) -> TableResult<Vec<(String, usize)>> {
        let mut counts = Vec::new();
        for name in self.columns()? {
            let meta = self.store.array_meta(&name)?;
            let rows = meta.shape.first().copied().unwrap_or(0);
            counts.push((name, rows));
        }
        Ok(counts)
    }

    /// Sum of logical byte sizes across columns
    pub fn nbytes(&self) -> TableResult<usize> {
        let mut total = 0;
        for name in self.columns()? {
            total += self.store.array_meta(&name)?.nbytes;
        }
        Ok(total)
    }

    /// Sum of physically stored byte sizes across columns
    pub fn nbytes_stored(&self) -> TableResult<usize> {
        let mut total = 0;
        for name in self.columns()? {
            total += self.store.array_meta(&name)?.nbytes_stored;
        }
        Ok(total)
    }

    /// Row/column selection.
    ///
    /// Every path materializes the touched columns fully before packing or
    /// gathering; nothing is pushed down into the backing store.
    pub fn select(&self, key: SelectKey) -> TableResult<Selection> {
        self.ensure_open()?;
        match key {
            SelectKey::ByName(name) => Ok(Selection::Column(self.store.read_array(&name)?)),
            SelectKey::ByNames(names) => {
                let mut columns = Vec::with_capacity(names.len());
                for name in names {
                    let array = self.store.read_array(&name)?;
                    columns.push((name, array));
                }
                Ok(Selection::Records(RecordArray::new(columns)))
            }
            SelectKey::ByMask(mask) => {
                let (rows,) = self.shape()?;
                if mask.len() != rows {
                    return Err(TableError::ShapeMismatch {
                        expected: rows,
                        actual: mask.len(),
                    });
                }
                let picked: Vec<usize> = mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect();
                self.gather_all(&picked)
            }
            SelectKey::ByIndex(indices) => {
                let (rows,) = self.shape()?;
                let picked = indices.resolve(rows)?;
                self.gather_all(&picked)
            }
        }
    }

    /// Gather the given rows from every column into a record array.
    fn gather_all(&self, rows: &[usize]) -> TableResult<Selection> {
        let mut columns = Vec::new();
        for name in self.columns()? {
            let array = self.store.read_array(&name)?;
            columns.push((name, array.take_rows(rows)?));
        }
        Ok(Selection::Records(RecordArray::new(columns)))
    }

    /// Write `data` as a new or replacing column array under `name`.
    ///
    /// Only plain identifiers are accepted as column names; anything else
    /// fails with [`TableError::UnsupportedKey`].
    pub fn assign(&mut self, name: &str, data: &TypedArray) -> TableResult<()> {
        self.ensure_open()?;
        if !is_identifier(name) {
            return Err(TableError::UnsupportedKey(name.to_string()));
        }
        self.store.write_array(name, data.clone())?;
        Ok(())
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("location", &self.location)
            .field("store_type", &self.store_type)
            .field("closed", &self.closed)
            .finish()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
