//! Dataset loader for CSV and Parquet files
//!
//! Reads exports of the employee and salary tables with polars and converts
//! the resulting frames into [`Dataset`] values for the analytics core.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use super::dataset::{Column as DataColumn, Dataset};

/// Load a file (CSV or Parquet based on extension) into a polars DataFrame.
///
/// `infer_schema_length` bounds CSV type inference; 0 scans the whole file.
pub fn load_frame(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => {
            let schema_length = if infer_schema_length == 0 {
                None
            } else {
                Some(infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    lf.collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Load a file straight into a [`Dataset`].
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<Dataset> {
    let df = load_frame(path, infer_schema_length)?;
    dataset_from_frame(&df).with_context(|| format!("Failed to convert {}", path.display()))
}

/// Convert a DataFrame into a [`Dataset`].
///
/// Integer and boolean columns become integer columns, floating-point
/// columns become float columns, and every other type is rendered as text.
/// `UInt64` stays integer unless a value exceeds `i64::MAX`.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let mut columns: Vec<(String, DataColumn)> = Vec::with_capacity(df.width());

    for col in df.get_columns() {
        let name = col.name().to_string();
        let converted = match col.dtype() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::Boolean => {
                let cast = col.cast(&DataType::Int64)?;
                DataColumn::Int(cast.i64()?.into_iter().collect())
            }
            DataType::UInt64 if u64_fits_i64(col)? => {
                let cast = col.cast(&DataType::Int64)?;
                DataColumn::Int(cast.i64()?.into_iter().collect())
            }
            DataType::UInt64 | DataType::Float32 | DataType::Float64 => {
                let cast = col.cast(&DataType::Float64)?;
                DataColumn::Float(cast.f64()?.into_iter().collect())
            }
            DataType::String => {
                DataColumn::Str(col.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
            }
            _ => {
                let cast = col.cast(&DataType::String)?;
                DataColumn::Str(cast.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
            }
        };
        columns.push((name, converted));
    }

    Ok(Dataset::new(columns)?)
}

fn u64_fits_i64(col: &Column) -> PolarsResult<bool> {
    Ok(col.u64()?.max().map_or(true, |max| max <= i64::MAX as u64))
}

/// Shape and estimated in-memory size of a loaded frame: (rows, cols, MB)
pub fn frame_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}
