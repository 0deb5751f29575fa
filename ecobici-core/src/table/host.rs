//! Table-function registration.
//!
//! A host engine exposes "register a function with a bind step and a pull
//! step". [`register_functions`] wires the row producer into any such host;
//! [`FunctionRegistry`] is a small in-process host used by the CLI and tests.

use super::error::TableError;
use super::producer::{BoundTable, RowProducer};
use super::schema::{schema_for, ColumnDef};
use super::value::{LogicalType, Row, Value};
use crate::feed::{FeedKind, FetchRequest};
use crate::fetch::Transport;
use crate::period::{MonthRange, YearMonth};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Arguments supplied by the host at bind time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindInput {
    pub arguments: Vec<Value>,
}

impl BindInput {
    pub fn new(arguments: Vec<Value>) -> Self {
        Self { arguments }
    }
}

pub type BindFn = Box<dyn Fn(&BindInput) -> Result<BoundTable, TableError> + Send + Sync>;
pub type PullFn = fn(&mut BoundTable, usize) -> &[Row];

/// Everything a host needs to expose one table function.
pub struct TableFunction {
    pub name: &'static str,
    /// Accepted argument lists. `&[]` means the function takes no arguments.
    pub signatures: &'static [&'static [LogicalType]],
    pub schema: &'static [ColumnDef],
    pub bind: BindFn,
    pub pull: PullFn,
}

pub trait TableFunctionHost {
    fn register(&mut self, function: TableFunction) -> Result<(), TableError>;
}

/// The pull step for every Ecobici table: slice the next batch off the cursor.
pub fn pull_rows(table: &mut BoundTable, max_batch_size: usize) -> &[Row] {
    table.pull(max_batch_size)
}

const NO_ARGUMENTS: &[&[LogicalType]] = &[&[]];

const HISTORICAL_SIGNATURES: &[&[LogicalType]] = &[
    &[LogicalType::BigInt, LogicalType::BigInt],
    &[
        LogicalType::BigInt,
        LogicalType::BigInt,
        LogicalType::BigInt,
        LogicalType::BigInt,
    ],
];

/// Register the three GBFS tables and the historical trips table with `host`.
pub fn register_functions<T: Transport + 'static>(
    host: &mut dyn TableFunctionHost,
    producer: Arc<RowProducer<T>>,
) -> Result<(), TableError> {
    for kind in FeedKind::ALL {
        let producer = Arc::clone(&producer);
        let bind: BindFn = if kind.is_realtime() {
            Box::new(move |input: &BindInput| {
                if !input.arguments.is_empty() {
                    return Err(TableError::InvalidArgument(format!(
                        "{} takes no arguments, got {}",
                        kind.function_name(),
                        input.arguments.len()
                    )));
                }
                let request = FetchRequest::realtime(kind).ok_or_else(|| {
                    TableError::InvalidArgument(format!("{kind} is not a real-time feed"))
                })?;
                producer.bind(&request)
            })
        } else {
            Box::new(move |input: &BindInput| {
                let request = historical_request(&input.arguments)?;
                producer.bind(&request)
            })
        };
        let signatures = if kind.is_realtime() {
            NO_ARGUMENTS
        } else {
            HISTORICAL_SIGNATURES
        };

        host.register(TableFunction {
            name: kind.function_name(),
            signatures,
            schema: schema_for(kind),
            bind,
            pull: pull_rows,
        })?;
    }
    Ok(())
}

/// `(year, month)` or `(start_year, start_month, end_year, end_month)`.
fn historical_request(arguments: &[Value]) -> Result<FetchRequest, TableError> {
    let ints = arguments
        .iter()
        .map(|v| {
            v.as_i64().ok_or_else(|| {
                TableError::InvalidArgument(format!("expected an integer argument, got '{v}'"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    match ints.as_slice() {
        [year, month] => Ok(FetchRequest::historical_month(year_month(*year, *month)?)),
        [start_year, start_month, end_year, end_month] => Ok(FetchRequest::historical(
            MonthRange::new(
                year_month(*start_year, *start_month)?,
                year_month(*end_year, *end_month)?,
            ),
        )),
        _ => Err(TableError::InvalidArgument(format!(
            "{} expects (year, month) or (start_year, start_month, end_year, end_month), got {} arguments",
            FeedKind::HistoricalTrips.function_name(),
            arguments.len()
        ))),
    }
}

fn year_month(year: i64, month: i64) -> Result<YearMonth, TableError> {
    let year = i32::try_from(year)
        .map_err(|_| TableError::InvalidArgument(format!("year {year} out of range")))?;
    let month = u32::try_from(month)
        .map_err(|_| TableError::InvalidArgument(format!("month {month} out of range")))?;
    Ok(YearMonth::new(year, month)?)
}

/// A bound function ready to be drained.
pub struct Scan {
    table: BoundTable,
    pull: PullFn,
}

impl Scan {
    pub fn schema(&self) -> &'static [ColumnDef] {
        self.table.schema()
    }

    pub fn next_batch(&mut self, max_batch_size: usize) -> &[Row] {
        (self.pull)(&mut self.table, max_batch_size)
    }
}

/// Minimal in-process host: functions by name, bind by name, drain by pulling.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<&'static str, TableFunction>,
}

impl TableFunctionHost for FunctionRegistry {
    fn register(&mut self, function: TableFunction) -> Result<(), TableError> {
        if self.functions.contains_key(function.name) {
            return Err(TableError::DuplicateFunction(function.name.to_string()));
        }
        self.functions.insert(function.name, function);
        Ok(())
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Ecobici functions already registered.
    pub fn with_producer<T: Transport + 'static>(
        producer: Arc<RowProducer<T>>,
    ) -> Result<Self, TableError> {
        let mut registry = Self::new();
        register_functions(&mut registry, producer)?;
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&TableFunction> {
        self.functions.get(name)
    }

    /// Registered functions, sorted by name.
    pub fn functions(&self) -> impl Iterator<Item = &TableFunction> {
        self.functions.values()
    }

    pub fn bind(&self, name: &str, arguments: Vec<Value>) -> Result<Scan, TableError> {
        let function = self
            .get(name)
            .ok_or_else(|| TableError::UnknownFunction(name.to_string()))?;
        let table = (function.bind)(&BindInput::new(arguments))?;
        Ok(Scan {
            table,
            pull: function.pull,
        })
    }

    /// Bind `name` and pull until exhausted, handing each non-empty batch to
    /// `on_batch`. Returns the total row count.
    pub fn scan<F>(
        &self,
        name: &str,
        arguments: Vec<Value>,
        batch_size: usize,
        mut on_batch: F,
    ) -> Result<usize, TableError>
    where
        F: FnMut(&[ColumnDef], &[Row]),
    {
        if batch_size == 0 {
            return Err(TableError::InvalidArgument(
                "batch size must be at least 1".into(),
            ));
        }

        let mut scan = self.bind(name, arguments)?;
        let schema = scan.schema();
        let mut total = 0;
        loop {
            let batch = scan.next_batch(batch_size);
            if batch.is_empty() {
                break;
            }
            total += batch.len();
            on_batch(schema, batch);
        }
        Ok(total)
    }
}
