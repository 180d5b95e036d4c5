pub mod sql;
pub mod state;
pub mod types;
pub mod write;

pub use sql::{map_to_duckdb_type, quote_ident};
pub use state::SchemaState;
pub use types::{Column, UNKNOWN_TYPE};
pub use write::{read_columns, write_columns};
