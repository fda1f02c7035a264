use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::DiamondError;

use super::model::{Dataset, RawRow, REQUIRED_COLUMNS};
use super::prepare::prepare;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and prepare a diamond table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the columns in [`REQUIRED_COLUMNS`]
/// * `.parquet` – same columns; categoricals may be dictionary-encoded
/// * `.json`    – `[{ "carat": 0.23, "cut": "Ideal", ... }, ...]`
///
/// Extra columns (e.g. a leading pandas index) are ignored.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let rows = read_rows(path)?;
    let dataset = prepare(&rows).with_context(|| format!("preparing {}", path.display()))?;
    Ok(dataset)
}

/// Read raw rows without preparing them.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>, source: &str) -> Result<()> {
    let present: BTreeSet<&str> = present.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !present.contains(c))
        .collect();
    if !missing.is_empty() {
        return Err(DiamondError::Schema(format!(
            "{source} is missing column(s): {}",
            missing.join(", ")
        ))
        .into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(headers.iter(), "CSV")?;

    reader
        .deserialize::<RawRow>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            check_columns(obj.keys().map(String::as_str), &format!("JSON row {i}"))?;
            serde_json::from_value::<RawRow>(rec.clone())
                .with_context(|| format!("JSON row {i}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`, where
/// categoricals become dictionary columns) and **Polars**.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        read_batch(&batch, rows.len(), &mut rows)?;
    }
    Ok(rows)
}

fn read_batch(batch: &RecordBatch, offset: usize, rows: &mut Vec<RawRow>) -> Result<()> {
    let schema = batch.schema();
    check_columns(schema.fields().iter().map(|f| f.name().as_str()), "Parquet file")?;

    let carat = numeric(batch, "carat")?;
    let depth = numeric(batch, "depth")?;
    let table = numeric(batch, "table")?;
    let price = numeric(batch, "price")?;
    let x = numeric(batch, "x")?;
    let y = numeric(batch, "y")?;
    let z = numeric(batch, "z")?;
    let cut = text(batch, "cut")?;
    let color = text(batch, "color")?;
    let clarity = text(batch, "clarity")?;

    for row in 0..batch.num_rows() {
        let row_no = offset + row;
        let f = |arr: &ArrayRef, name: &str| -> Result<f64> {
            if arr.is_null(row) {
                bail!("Row {row_no}: null value in '{name}'");
            }
            Ok(arr.as_primitive::<Float64Type>().value(row))
        };
        let s = |arr: &ArrayRef, name: &str| -> Result<String> {
            if arr.is_null(row) {
                bail!("Row {row_no}: null value in '{name}'");
            }
            Ok(arr.as_string::<i32>().value(row).to_string())
        };

        rows.push(RawRow {
            carat: f(&carat, "carat")?,
            cut: s(&cut, "cut")?,
            color: s(&color, "color")?,
            clarity: s(&clarity, "clarity")?,
            depth: f(&depth, "depth")?,
            table: f(&table, "table")?,
            price: f(&price, "price")?,
            x: f(&x, "x")?,
            y: f(&y, "y")?,
            z: f(&z, "z")?,
        });
    }
    Ok(())
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn numeric(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    cast(column(batch, name)?, &DataType::Float64)
        .with_context(|| format!("column '{name}' is not numeric"))
}

fn text(batch: &RecordBatch, name: &str) -> Result<ArrayRef> {
    cast(column(batch, name)?, &DataType::Utf8)
        .with_context(|| format!("column '{name}' is not text"))
}
