// src/schema/state.rs

use std::collections::HashSet;

use tracing::debug;

use super::types::Column;
use crate::duck::RelationalSink;
use crate::error::{LinesqlError, Result};

/// The ordered, append-only column list of the table being filled, kept in
/// step with the table that backs it.
#[derive(Debug)]
pub struct SchemaState {
    table: String,
    columns: Vec<Column>,
    /// An empty schema has no table behind it yet.
    created: bool,
}

impl SchemaState {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            created: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Replace the schema, dropping and recreating the backing table.
    /// An empty column list only drops it.
    pub fn define<S: RelationalSink + ?Sized>(
        &mut self,
        sink: &mut S,
        columns: Vec<Column>,
    ) -> Result<()> {
        check_columns(&[], &columns)?;
        if columns.is_empty() {
            sink.drop_table(&self.table)?;
            self.created = false;
        } else {
            sink.create_table(&self.table, &columns)?;
            self.created = true;
        }
        debug!(table = %self.table, columns = ?names(&columns), "schema defined");
        self.columns = columns;
        Ok(())
    }

    /// Add one column at the end, in memory and in the table.
    pub fn append_column<S: RelationalSink + ?Sized>(
        &mut self,
        sink: &mut S,
        column: Column,
    ) -> Result<()> {
        check_columns(&self.columns, std::slice::from_ref(&column))?;
        if self.created {
            sink.add_column(&self.table, &column)?;
        } else {
            sink.create_table(&self.table, std::slice::from_ref(&column))?;
            self.created = true;
        }
        self.columns.push(column);
        Ok(())
    }

    /// Grow by `count` positionally named columns; returns how many were added.
    pub fn grow<S: RelationalSink + ?Sized>(&mut self, sink: &mut S, count: usize) -> Result<usize> {
        for _ in 0..count {
            let position = self.columns.len() + 1;
            self.append_column(sink, Column::autonamed(position))?;
        }
        if count > 0 {
            debug!(table = %self.table, width = self.columns.len(), "schema grew");
        }
        Ok(count)
    }
}

fn names(columns: &[Column]) -> Vec<&str> {
    columns.iter().map(|c| c.name.as_str()).collect()
}

/// Validate `incoming` and make sure no name collides, case-insensitively,
/// with `existing` or with another incoming column.
fn check_columns(existing: &[Column], incoming: &[Column]) -> Result<()> {
    let mut seen: HashSet<String> = existing.iter().map(|c| c.name.to_lowercase()).collect();
    for col in incoming {
        col.validate()?;
        if !seen.insert(col.name.to_lowercase()) {
            return Err(LinesqlError::config(format!(
                "duplicate column name `{}`",
                col.name
            )));
        }
    }
    Ok(())
}
