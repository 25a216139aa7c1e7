//! Tabstore demo entry

use tabstore::array::TypedArray;
use tabstore::catalog::{Catalog, NameMode};
use tabstore::store::StoreType;
use tabstore::table::{RecordArray, SelectKey, Selection};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("tabstore demo failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::new("./data", StoreType::File, NameMode::Nested)?;

    let data = RecordArray::new(vec![
        ("id".to_string(), TypedArray::from_i64(vec![1, 2, 3, 4])),
        (
            "score".to_string(),
            TypedArray::from_f64(vec![0.5, 0.25, 0.75, 1.0]),
        ),
    ]);

    let table = catalog.create_table("demo-metrics", Some(&data), true)?;
    println!("columns:      {:?}", table.columns()?);
    for field in table.dtype()? {
        println!("field:        {}", field);
    }
    println!("shape:        {:?}", table.shape()?);
    println!(
        "bytes:        {} logical / {} stored",
        table.nbytes()?,
        table.nbytes_stored()?
    );

    if let Selection::Records(records) =
        table.select(SelectKey::ByMask(vec![true, false, true, false]))?
    {
        println!("masked rows:  {}", records.row_count());
    }

    catalog.close_all()?;
    Ok(())
}
