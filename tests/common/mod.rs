//! Shared test utilities and fixture generators

#![allow(dead_code)]

use paystat::pipeline::{Column, ColumnType, Dataset, Schema};
use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two-department identity table
///
/// - `id`: 1 = Eng, 2 = Sales
pub fn employees() -> Dataset {
    Dataset::new([
        ("id", Column::from(vec![1i64, 2])),
        ("department", Column::from(vec!["Eng", "Sales"])),
    ])
    .unwrap()
}

/// Compensation rows for the employees fixture
///
/// Employee 1 appears twice, so the merged table has 3 rows with
/// Eng averaging 55000 and Sales 70000.
pub fn compensation() -> Dataset {
    Dataset::new([
        ("id", Column::from(vec![1i64, 2, 1])),
        ("salary", Column::from(vec![50000.0f64, 70000.0, 60000.0])),
        ("bonus", Column::from(vec![1000.0f64, 2000.0, 1500.0])),
    ])
    .unwrap()
}

/// Empty compensation table with the usual schema
pub fn empty_compensation() -> Dataset {
    Dataset::empty(&Schema::new([
        ("id", ColumnType::Int),
        ("salary", ColumnType::Float),
        ("bonus", ColumnType::Float),
    ]))
}

/// Larger randomly generated tables for property and stress tests
pub fn random_tables(employees: usize, rows: usize, seed: u64) -> (Dataset, Dataset) {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(seed);
    let departments = ["Eng", "Sales", "Ops", "Finance", "Legal"];

    let ids: Vec<i64> = (0..employees as i64).collect();
    let depts: Vec<&str> = (0..employees)
        .map(|_| departments[rng.gen_range(0..departments.len())])
        .collect();

    // Some ids fall outside the identity table and must be dropped by the join
    let comp_ids: Vec<i64> = (0..rows)
        .map(|_| rng.gen_range(0..(employees as i64 + 5)))
        .collect();
    let salaries: Vec<f64> = (0..rows).map(|_| rng.gen_range(30_000.0..150_000.0)).collect();
    let bonuses: Vec<f64> = salaries
        .iter()
        .map(|s| s * 0.05 + rng.gen_range(-500.0..500.0))
        .collect();

    let identity = Dataset::new([
        ("id", Column::from(ids)),
        ("department", Column::from(depts)),
    ])
    .unwrap();
    let compensation = Dataset::new([
        ("id", Column::from(comp_ids)),
        ("salary", Column::from(salaries)),
        ("bonus", Column::from(bonuses)),
    ])
    .unwrap();

    (identity, compensation)
}

/// Employee table as a polars DataFrame
pub fn employees_frame() -> DataFrame {
    df! {
        "id" => [1i64, 2, 3],
        "name" => ["Ada", "Grace", "Linus"],
        "department" => ["Eng", "Sales", "Eng"],
    }
    .unwrap()
}

/// Salary table as a polars DataFrame; id 99 has no employee
pub fn salaries_frame() -> DataFrame {
    df! {
        "id" => [1i64, 2, 1, 3, 99],
        "salary" => [50000.0f64, 70000.0, 60000.0, 65000.0, 40000.0],
        "bonus" => [1000.0f64, 2000.0, 1500.0, 1200.0, 500.0],
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame, name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = write_csv(&temp_dir, df, name);
    (temp_dir, csv_path)
}

/// Write a CSV file into an existing temporary directory
pub fn write_csv(dir: &TempDir, df: &mut DataFrame, name: &str) -> PathBuf {
    let csv_path = dir.path().join(name);
    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    csv_path
}

/// Write a Parquet file into an existing temporary directory
pub fn write_parquet(dir: &TempDir, df: &mut DataFrame, name: &str) -> PathBuf {
    let parquet_path = dir.path().join(name);
    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();
    parquet_path
}
