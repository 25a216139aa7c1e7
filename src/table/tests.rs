use super::*;
use crate::array::{ColumnValues, TypedArray};
use crate::store::{ArrayMeta, ArrayStore, OpenOptions, StoreError, StoreResult, StoreType};
use crate::types::ScalarType;
use tempfile::TempDir;

fn sample_data() -> RecordArray {
    RecordArray::new(vec![
        ("id".to_string(), TypedArray::from_i64(vec![1, 2, 3, 4])),
        (
            "score".to_string(),
            TypedArray::from_f64(vec![0.5, 0.25, 0.75, 1.0]),
        ),
        (
            "flag".to_string(),
            TypedArray::from_bool(vec![true, false, true, false]),
        ),
    ])
}

fn open_with_data(dir: &TempDir, store_type: StoreType) -> Table {
    Table::open(
        dir.path().join("t.tbl"),
        Some(&sample_data()),
        store_type,
        &OpenOptions::default(),
    )
    .unwrap()
}

#[test]
fn test_open_fails_on_unreadable_parent() {
    let temp_dir = TempDir::new().unwrap();
    let location = temp_dir.path().join("missing").join("t.tbl");
    let result = Table::open(&location, None, StoreType::File, &OpenOptions::default());
    assert!(matches!(result, Err(TableError::Access(_))));
}

#[test]
fn test_columns_sorted_and_dtype_matches() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let columns = table.columns().unwrap();
    assert_eq!(columns, vec!["flag", "id", "score"]);

    let dtype = table.dtype().unwrap();
    assert_eq!(dtype.len(), columns.len());
    for (field, name) in dtype.iter().zip(&columns) {
        assert_eq!(&field.name, name);
    }
    assert_eq!(dtype[0].dtype, ScalarType::Bool);
    assert_eq!(dtype[1].dtype, ScalarType::Int64);
    assert_eq!(dtype[2].dtype, ScalarType::Float64);
}

#[test]
fn test_shape_is_minimum_row_count() {
    let temp_dir = TempDir::new().unwrap();
    let mut table = open_with_data(&temp_dir, StoreType::File);
    assert_eq!(table.shape().unwrap(), (4,));

    table
        .assign("short", &TypedArray::from_i32(vec![1, 2]))
        .unwrap();
    assert_eq!(table.shape().unwrap(), (2,));

    let counts = table.column_row_counts().unwrap();
    assert!(counts.contains(&("short".to_string(), 2)));
    assert!(counts.contains(&("id".to_string(), 4)));
}

#[test]
fn test_shape_empty_table_fails() {
    let temp_dir = TempDir::new().unwrap();
    let table = Table::open(
        temp_dir.path().join("empty.tbl"),
        None,
        StoreType::File,
        &OpenOptions::default(),
    )
    .unwrap();
    assert!(matches!(table.shape(), Err(TableError::EmptyTable)));
}

#[test]
fn test_nbytes_sums_columns() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    // 4 x i64 + 4 x f64 + 4 x bool
    assert_eq!(table.nbytes().unwrap(), 32 + 32 + 4);
    assert!(table.nbytes_stored().unwrap() > 0);
}

#[test]
fn test_ingest_roundtrip() {
    for store_type in [StoreType::File, StoreType::Directory] {
        let temp_dir = TempDir::new().unwrap();
        let data = sample_data();
        let table = open_with_data(&temp_dir, store_type);

        let names: Vec<String> = data.field_names().iter().map(|s| s.to_string()).collect();
        let selected = table.select(SelectKey::ByNames(names)).unwrap();
        assert_eq!(selected.into_records().unwrap(), data);
    }
}

#[test]
fn test_select_by_name_returns_raw_column() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let column = table
        .select(SelectKey::ByName("id".to_string()))
        .unwrap()
        .into_column()
        .unwrap();
    assert_eq!(column, TypedArray::from_i64(vec![1, 2, 3, 4]));

    let result = table.select(SelectKey::ByName("missing".to_string()));
    assert!(matches!(result, Err(TableError::ColumnNotFound(_))));
}

#[test]
fn test_select_by_names_preserves_requested_order() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let records = table
        .select(SelectKey::ByNames(vec![
            "score".to_string(),
            "id".to_string(),
        ]))
        .unwrap()
        .into_records()
        .unwrap();
    assert_eq!(records.field_names(), vec!["score", "id"]);
}

#[test]
fn test_select_by_mask() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let mask = vec![true, false, true, false];
    let records = table
        .select(SelectKey::ByMask(mask.clone()))
        .unwrap()
        .into_records()
        .unwrap();

    let kept = mask.iter().filter(|&&b| b).count();
    assert_eq!(records.row_count(), kept);
    assert_eq!(
        records.column("id").unwrap(),
        &TypedArray::from_i64(vec![1, 3])
    );
    assert_eq!(
        records.column("flag").unwrap(),
        &TypedArray::from_bool(vec![true, true])
    );
}

#[test]
fn test_mask_and_index_selection_agree() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let mask = vec![false, true, true, false];
    let indices: Vec<i64> = mask
        .iter()
        .enumerate()
        .filter_map(|(i, &b)| b.then_some(i as i64))
        .collect();

    let by_mask = table.select(SelectKey::ByMask(mask)).unwrap();
    let by_index = table
        .select(SelectKey::ByIndex(IndexArray::Int64(indices)))
        .unwrap();
    assert_eq!(by_mask, by_index);
}

#[test]
fn test_select_mask_length_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let result = table.select(SelectKey::ByMask(vec![true, false]));
    assert!(matches!(
        result,
        Err(TableError::ShapeMismatch {
            expected: 4,
            actual: 2
        })
    ));
}

#[test]
fn test_select_negative_index_wraps() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let records = table
        .select(SelectKey::ByIndex(IndexArray::Int32(vec![-1, 0])))
        .unwrap()
        .into_records()
        .unwrap();
    assert_eq!(
        records.column("id").unwrap(),
        &TypedArray::from_i64(vec![4, 1])
    );
}

#[test]
fn test_select_index_out_of_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    let result = table.select(SelectKey::ByIndex(IndexArray::UInt64(vec![4])));
    assert!(matches!(
        result,
        Err(TableError::RowIndexOutOfBounds { index: 4, rows: 4 })
    ));
}

#[test]
fn test_select_key_from_array_paths() {
    let temp_dir = TempDir::new().unwrap();
    let table = open_with_data(&temp_dir, StoreType::File);

    // A bool array key behaves as a mask over all columns.
    let key = SelectKey::from_array(&TypedArray::from_bool(vec![false, true, false, true])).unwrap();
    let records = table.select(key).unwrap().into_records().unwrap();
    assert_eq!(records.row_count(), 2);

    // A float array key is rejected outright.
    let result = SelectKey::from_array(&TypedArray::from_f64(vec![0.0]));
    assert!(matches!(result, Err(TableError::InvalidKey(_))));
}

#[test]
fn test_assign_replaces_column() {
    let temp_dir = TempDir::new().unwrap();
    let mut table = open_with_data(&temp_dir, StoreType::File);

    table
        .assign("id", &TypedArray::from_i64(vec![9, 8, 7, 6]))
        .unwrap();
    let column = table
        .select(SelectKey::ByName("id".to_string()))
        .unwrap()
        .into_column()
        .unwrap();
    assert_eq!(column, TypedArray::from_i64(vec![9, 8, 7, 6]));
}

#[test]
fn test_assign_rejects_non_identifier_names() {
    let temp_dir = TempDir::new().unwrap();
    let mut table = open_with_data(&temp_dir, StoreType::File);

    for bad in ["", "1col", "a-b", "a b", "col!"] {
        let result = table.assign(bad, &TypedArray::from_i8(vec![1]));
        assert!(
            matches!(result, Err(TableError::UnsupportedKey(_))),
            "accepted {:?}",
            bad
        );
    }
}

#[test]
fn test_close_idempotent_and_other_handle_reads() {
    let temp_dir = TempDir::new().unwrap();
    let location = temp_dir.path().join("t.tbl");
    let mut table = Table::open(
        &location,
        Some(&sample_data()),
        StoreType::File,
        &OpenOptions::default(),
    )
    .unwrap();

    table.close().unwrap();
    table.close().unwrap();
    assert!(table.is_closed());
    assert!(matches!(table.columns(), Err(TableError::Closed)));

    // A fresh handle to the same unit still reads everything.
    let reopened = Table::open(&location, None, StoreType::File, &OpenOptions::default()).unwrap();
    assert_eq!(reopened.shape().unwrap(), (4,));
}

#[test]
fn test_close_noop_for_directory_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut table = open_with_data(&temp_dir, StoreType::Directory);
    table.close().unwrap();
    table.close().unwrap();
    assert!(table.is_closed());
}

#[test]
fn test_multidimensional_columns() {
    let temp_dir = TempDir::new().unwrap();
    let data = RecordArray::new(vec![(
        "embedding".to_string(),
        TypedArray::with_shape(vec![3, 2], ColumnValues::Float32(vec![0.0; 6])).unwrap(),
    )]);
    let table = Table::open(
        temp_dir.path().join("vec.tbl"),
        Some(&data),
        StoreType::File,
        &OpenOptions::default(),
    )
    .unwrap();

    let dtype = table.dtype().unwrap();
    assert_eq!(dtype[0].inner_shape, vec![2]);
    assert_eq!(table.shape().unwrap(), (3,));
    assert_eq!(table.nbytes().unwrap(), 24);

    let records = table
        .select(SelectKey::ByIndex(IndexArray::Int64(vec![1])))
        .unwrap()
        .into_records()
        .unwrap();
    assert_eq!(records.column("embedding").unwrap().shape(), &[1, 2]);
}

#[test]
fn test_ingest_failure_on_read_only_store() {
    let temp_dir = TempDir::new().unwrap();
    let location = temp_dir.path().join("t.tbl");
    // Create the unit first so a read-only open succeeds.
    Table::open(&location, None, StoreType::File, &OpenOptions::default()).unwrap();

    let result = Table::open(
        &location,
        Some(&sample_data()),
        StoreType::File,
        &OpenOptions::read_only(),
    );
    assert!(matches!(result, Err(TableError::Ingest(_))));
}

/// Store double that fails the write of one named array, for exercising
/// the ingest rollback path.
struct FailingStore {
    fail_on: String,
    written: Vec<String>,
    in_txn: bool,
    rolled_back: bool,
}

impl FailingStore {
    fn new(fail_on: &str) -> Self {
        Self {
            fail_on: fail_on.to_string(),
            written: Vec::new(),
            in_txn: false,
            rolled_back: false,
        }
    }
}

impl ArrayStore for FailingStore {
    fn array_names(&self) -> Vec<String> {
        self.written.clone()
    }

    fn array_meta(&self, name: &str) -> StoreResult<ArrayMeta> {
        Err(StoreError::ArrayNotFound(name.to_string()))
    }

    fn read_array(&self, name: &str) -> StoreResult<TypedArray> {
        Err(StoreError::ArrayNotFound(name.to_string()))
    }

    fn write_array(&mut self, name: &str, _values: TypedArray) -> StoreResult<()> {
        if name == self.fail_on {
            return Err(StoreError::IoError(std::io::Error::other("disk full")));
        }
        self.written.push(name.to_string());
        Ok(())
    }

    fn begin_transaction(&mut self) -> StoreResult<()> {
        self.in_txn = true;
        Ok(())
    }

    fn commit(&mut self) -> StoreResult<()> {
        self.in_txn = false;
        Ok(())
    }

    fn rollback(&mut self) -> StoreResult<()> {
        self.in_txn = false;
        self.rolled_back = true;
        self.written.clear();
        Ok(())
    }

    fn close(&mut self) -> StoreResult<()> {
        Ok(())
    }

    fn requires_close(&self) -> bool {
        false
    }
}

#[test]
fn test_ingest_rolls_back_on_field_write_failure() {
    let mut store = FailingStore::new("score");
    let result = Table::ingest(&mut store, &sample_data());

    assert!(matches!(result, Err(TableError::Ingest(_))));
    assert!(store.rolled_back);
    assert!(store.written.is_empty());
    assert!(!store.in_txn);
}
