//! Row schemas per feed kind.
//!
//! Column order here is the order of cells in every produced row and the order
//! the host sees in its bind output.

use super::value::{LogicalType, Row};
use crate::feed::FeedKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: LogicalType,
}

const fn col(name: &'static str, ty: LogicalType) -> ColumnDef {
    ColumnDef { name, ty }
}

pub const STATION_STATUS_SCHEMA: &[ColumnDef] = &[
    col("station_id", LogicalType::Varchar),
    col("num_bikes_available", LogicalType::Integer),
    col("num_docks_available", LogicalType::Integer),
    col("last_reported", LogicalType::BigInt),
    col("is_installed", LogicalType::Boolean),
    col("is_renting", LogicalType::Boolean),
    col("is_returning", LogicalType::Boolean),
];

pub const STATION_INFORMATION_SCHEMA: &[ColumnDef] = &[
    col("station_id", LogicalType::Varchar),
    col("name", LogicalType::Varchar),
    col("lat", LogicalType::Double),
    col("lon", LogicalType::Double),
    col("address", LogicalType::Varchar),
    col("capacity", LogicalType::Integer),
];

pub const SYSTEM_INFORMATION_SCHEMA: &[ColumnDef] = &[
    col("system_id", LogicalType::Varchar),
    col("language", LogicalType::Varchar),
    col("name", LogicalType::Varchar),
    col("timezone", LogicalType::Varchar),
];

/// Raw archive bytes, one row per fetched month. Parsing the CSV is the caller's job.
pub const HISTORICAL_TRIPS_SCHEMA: &[ColumnDef] = &[col("csv_data", LogicalType::Blob)];

pub fn schema_for(kind: FeedKind) -> &'static [ColumnDef] {
    match kind {
        FeedKind::StationStatus => STATION_STATUS_SCHEMA,
        FeedKind::StationInformation => STATION_INFORMATION_SCHEMA,
        FeedKind::SystemInformation => SYSTEM_INFORMATION_SCHEMA,
        FeedKind::HistoricalTrips => HISTORICAL_TRIPS_SCHEMA,
    }
}

/// Check a row's arity and cell types against a schema.
pub fn row_matches(schema: &[ColumnDef], row: &Row) -> bool {
    row.len() == schema.len()
        && schema
            .iter()
            .zip(row.cells())
            .all(|(c, v)| c.ty == v.logical_type())
}
