use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Error;
use simple_logger::SimpleLogger;

use tabular_file_sort::column_type::ColumnType;
use tabular_file_sort::external_mode::ExternalMode;
use tabular_file_sort::locale::Locale;
use tabular_file_sort::order::Order;
use tabular_file_sort::sort::Sort;
use tabular_file_sort::sort_key::SortKey;
use tabular_file_sort::strategy::Algorithm;

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn sort_by_inferred_types(path: &Path) -> Result<(), Error> {
    let mut sort = Sort::new(path.to_path_buf());
    // every column becomes a key, in column order, typed by sampling the file
    for (column, column_type) in sort.infer_types()? {
        log::info!("column {} is {}", column, column_type);
        sort.add_key(SortKey::new(&column, column_type));
    }
    sort.sort()?;
    Ok(())
}

fn sort_with_runs(path: &Path) -> Result<(), Error> {
    let mut sort = Sort::new(path.to_path_buf());
    sort.add_key(SortKey::new("name", ColumnType::String).with_case_insensitive(true));
    sort.add_key(SortKey::new("age", ColumnType::Number).with_order(Order::Desc));
    sort.with_external_mode(ExternalMode::Runs);
    sort.with_max_rows_in_memory(2);
    sort.sort()?;
    log::info!("sorted: {}", sort.check()?);
    Ok(())
}

fn sort_in_memory(path: &Path) -> Result<(), Error> {
    let mut data_set = Sort::new(path.to_path_buf()).load()?;
    let keys = vec![SortKey::new("city", ColumnType::String).with_order(Order::Desc)];
    data_set.sort(&keys, Algorithm::from_name("bubble"), &Locale::new("pt-PT"))?;
    data_set.write(path)
}

// cargo run -r --example sort_csv_file
pub fn main() -> Result<(), Error> {
    SimpleLogger::new().init()?;

    let input_path = PathBuf::from("./tests/fixtures/people.csv");
    let output_path = PathBuf::from("./target/people.csv");
    fs::copy(&input_path, &output_path)?;

    sort_by_inferred_types(&output_path)?;
    sort_with_runs(&output_path)?;
    sort_in_memory(&output_path)?;

    print!("{}", fs::read_to_string(&output_path)?);
    Ok(())
}
