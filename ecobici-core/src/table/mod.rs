//! Row materialization and the bind/pull table-function surface.

pub mod cursor;
pub mod error;
pub mod frame;
pub mod gbfs;
pub mod host;
pub mod producer;
pub mod schema;
pub mod value;

pub use cursor::{BatchCursor, CursorState, STANDARD_BATCH_SIZE};
pub use error::TableError;
pub use frame::rows_to_dataframe;
pub use host::{
    pull_rows, register_functions, BindFn, BindInput, FunctionRegistry, PullFn, Scan,
    TableFunction, TableFunctionHost,
};
pub use producer::{project_payload, BoundTable, RowProducer};
pub use schema::{schema_for, ColumnDef};
pub use value::{LogicalType, Row, Value};
