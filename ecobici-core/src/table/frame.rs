//! Columnar view of pulled batches as polars DataFrames.
//!
//! Hosts that consume columns rather than rows can convert each batch here.
//! Row order and cell contents are preserved exactly.

use super::schema::ColumnDef;
use super::value::{LogicalType, Row, Value};
use polars::prelude::*;

/// Build a DataFrame from rows laid out per `schema`.
///
/// Fails if a row's arity or cell types disagree with the schema.
pub fn rows_to_dataframe(schema: &[ColumnDef], rows: &[Row]) -> PolarsResult<DataFrame> {
    let columns = schema
        .iter()
        .enumerate()
        .map(|(idx, col)| build_column(col, idx, rows))
        .collect::<PolarsResult<Vec<_>>>()?;
    DataFrame::new(columns)
}

fn mismatch(col: &ColumnDef, row: usize, found: Option<&Value>) -> PolarsError {
    let found = found.map_or("missing cell".to_string(), |v| v.logical_type().to_string());
    polars_err!(
        SchemaMismatch: "column '{}' row {}: expected {}, found {}",
        col.name, row, col.ty, found
    )
}

/// Pull one typed cell per row out of column `idx`.
fn extract<'a, T>(
    col: &ColumnDef,
    idx: usize,
    rows: &'a [Row],
    pick: impl Fn(&'a Value) -> Option<T>,
) -> PolarsResult<Vec<T>> {
    rows.iter()
        .enumerate()
        .map(|(r, row)| {
            let cell = row.get(idx);
            cell.and_then(&pick).ok_or_else(|| mismatch(col, r, cell))
        })
        .collect()
}

fn build_column(col: &ColumnDef, idx: usize, rows: &[Row]) -> PolarsResult<Column> {
    let name = PlSmallStr::from_static(col.name);
    let column = match col.ty {
        LogicalType::Varchar => Column::new(
            name,
            extract(col, idx, rows, |v| match v {
                Value::Varchar(s) => Some(s.as_str()),
                _ => None,
            })?,
        ),
        LogicalType::Integer => Column::new(
            name,
            extract(col, idx, rows, |v| match v {
                Value::Integer(i) => Some(*i),
                _ => None,
            })?,
        ),
        LogicalType::BigInt => Column::new(
            name,
            extract(col, idx, rows, |v| match v {
                Value::BigInt(i) => Some(*i),
                _ => None,
            })?,
        ),
        LogicalType::Double => Column::new(
            name,
            extract(col, idx, rows, |v| match v {
                Value::Double(f) => Some(*f),
                _ => None,
            })?,
        ),
        LogicalType::Boolean => Column::new(
            name,
            extract(col, idx, rows, |v| match v {
                Value::Boolean(b) => Some(*b),
                _ => None,
            })?,
        ),
        LogicalType::Blob => {
            let values = extract(col, idx, rows, |v| match v {
                Value::Blob(b) => Some(b.as_slice()),
                _ => None,
            })?;
            Column::from(BinaryChunked::from_slice(name, &values).into_series())
        }
    };
    Ok(column)
}
