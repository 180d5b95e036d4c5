//! Relational sink: the SQL storage the ingested lines end up in.
//!
//! [`RelationalSink`] is the narrow surface the ingestion core talks to;
//! [`DuckSink`] backs it with an embedded DuckDB database, either in memory
//! or in a file.

use duckdb::arrow::record_batch::RecordBatch;
use duckdb::arrow::util::display::{ArrayFormatter, FormatOptions};
use duckdb::{params_from_iter, Connection};
use tracing::{debug, trace};

use crate::error::{LinesqlError, Result};
use crate::schema::sql::{add_column_sql, create_table_sql, insert_sql, quote_ident};
use crate::schema::Column;

/// Storage location that selects an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Rows returned by an ad-hoc query, already rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryOutput {
    /// One string per row, fields joined by `delimiter`.
    pub fn lines<'a>(&'a self, delimiter: &'a str) -> impl Iterator<Item = String> + 'a {
        self.rows.iter().map(move |r| r.join(delimiter))
    }
}

/// What the ingestion core needs from a SQL engine.
pub trait RelationalSink {
    /// Drop `table` if present and create it with `columns`.
    fn create_table(&mut self, table: &str, columns: &[Column]) -> Result<()>;

    fn drop_table(&mut self, table: &str) -> Result<()>;

    /// Append one column. Adding a column that already exists is a no-op.
    fn add_column(&mut self, table: &str, column: &Column) -> Result<()>;

    /// Insert one row; `row[i]` goes to `columns[i]`, `None` is stored as NULL.
    fn insert_row(&mut self, table: &str, columns: &[Column], row: &[Option<String>])
        -> Result<()>;

    fn query(&mut self, sql: &str) -> Result<QueryOutput>;
}

/// DuckDB-backed sink. Inserts accumulate in an open transaction that is
/// committed before any DDL, any query and on close.
pub struct DuckSink {
    conn: Connection,
    in_memory: bool,
    in_txn: bool,
}

impl DuckSink {
    /// Open `location`: `:memory:` for an in-memory database, otherwise a
    /// database file that is created if it doesn't exist.
    pub fn open(location: &str) -> Result<Self> {
        if location == IN_MEMORY {
            Self::open_mem_db()
        } else {
            Self::open_disk_db(location)
        }
    }

    pub fn open_disk_db(path: &str) -> Result<Self> {
        debug!(path, "opening DuckDB file");
        let conn = Connection::open(path)?;
        Ok(Self {
            conn,
            in_memory: false,
            in_txn: false,
        })
    }

    pub fn open_mem_db() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            in_memory: true,
            in_txn: false,
        })
    }

    fn begin(&mut self) -> Result<()> {
        if !self.in_txn {
            self.conn.execute_batch("BEGIN TRANSACTION")?;
            self.in_txn = true;
        }
        Ok(())
    }

    /// Commit whatever inserts are pending.
    pub fn commit(&mut self) -> Result<()> {
        if self.in_txn {
            self.conn.execute_batch("COMMIT")?;
            self.in_txn = false;
        }
        Ok(())
    }

    /// Commit outstanding work, checkpoint file databases and release the connection.
    pub fn close(mut self) -> Result<()> {
        self.commit()?;
        if !self.in_memory {
            self.conn.execute_batch("CHECKPOINT")?;
        }
        self.conn.close().map_err(|(_, e)| LinesqlError::from(e))
    }

    fn render(batches: &[RecordBatch]) -> Result<Vec<Vec<String>>> {
        let options = FormatOptions::default().with_null("");
        let mut rows = Vec::new();
        for batch in batches {
            let formatters = batch
                .columns()
                .iter()
                .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            for i in 0..batch.num_rows() {
                rows.push(formatters.iter().map(|f| f.value(i).to_string()).collect());
            }
        }
        Ok(rows)
    }
}

impl RelationalSink for DuckSink {
    fn create_table(&mut self, table: &str, columns: &[Column]) -> Result<()> {
        self.drop_table(table)?;
        self.conn.flush_prepared_statement_cache();
        let ddl = create_table_sql(table, columns);
        debug!(table, columns = columns.len(), "creating table");
        trace!(%ddl);
        self.conn.execute_batch(&ddl)?;
        Ok(())
    }

    fn drop_table(&mut self, table: &str) -> Result<()> {
        self.commit()?;
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))?;
        Ok(())
    }

    fn add_column(&mut self, table: &str, column: &Column) -> Result<()> {
        self.commit()?;
        let ddl = add_column_sql(table, column);
        debug!(table, column = %column.name, "adding column");
        self.conn.execute_batch(&ddl)?;
        self.conn.flush_prepared_statement_cache();
        Ok(())
    }

    fn insert_row(
        &mut self,
        table: &str,
        columns: &[Column],
        row: &[Option<String>],
    ) -> Result<()> {
        if row.len() != columns.len() {
            return Err(LinesqlError::Storage(format!(
                "row has {} values for {} columns",
                row.len(),
                columns.len()
            )));
        }
        self.begin()?;
        let sql = insert_sql(table, columns);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        stmt.execute(params_from_iter(row.iter()))?;
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<QueryOutput> {
        self.commit()?;
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        let columns = match batches.first() {
            Some(batch) => batch
                .schema()
                .fields()
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
            None => stmt.column_names(),
        };
        let rows = Self::render(&batches)?;
        Ok(QueryOutput { columns, rows })
    }
}
