//! Run configuration, resolved once before any input is read.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::duck::IN_MEMORY;
use crate::error::{LinesqlError, Result};
use crate::schema::{Column, UNKNOWN_TYPE};

pub const DEFAULT_TABLE_NAME: &str = "lines";
pub const DEFAULT_DELIMITER: &str = " ";
pub const DEFAULT_OUTPUT_DELIMITER: &str = "|";

/// How the table's columns come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisioningMode {
    /// Column names come from the first line read.
    FirstLine,
    /// Columns are declared up front.
    Static,
    /// Columns are added as wider rows show up.
    Dynamic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub table_name: String,
    /// Regular expression separating input fields.
    pub delimiter: String,
    pub output_delimiter: String,
    pub skip_lines: usize,
    pub mode: ProvisioningMode,
    /// Declared columns; when present the run is Static whatever `mode` says.
    pub static_columns: Option<Vec<Column>>,
    pub join_long_rows: bool,
    pub fill_short_rows: bool,
    pub ignore_wrong_lines: bool,
    /// `:memory:` or a database file path.
    pub db_location: String,
    pub query: String,
    pub inputs: Vec<String>,
    pub dump: bool,
    pub schema_out: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            output_delimiter: DEFAULT_OUTPUT_DELIMITER.to_string(),
            skip_lines: 0,
            mode: ProvisioningMode::FirstLine,
            static_columns: None,
            join_long_rows: true,
            fill_short_rows: false,
            ignore_wrong_lines: true,
            db_location: IN_MEMORY.to_string(),
            query: String::new(),
            inputs: Vec::new(),
            dump: false,
            schema_out: None,
        }
    }
}

impl Config {
    /// The mode actually in force: a static column list wins over any selector.
    pub fn effective_mode(&self) -> ProvisioningMode {
        if self.static_columns.is_some() {
            ProvisioningMode::Static
        } else {
            self.mode
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_name.trim().is_empty() {
            return Err(LinesqlError::config("table name must not be empty"));
        }
        if self.delimiter.is_empty() {
            return Err(LinesqlError::config("delimiter pattern must not be empty"));
        }
        match &self.static_columns {
            Some(cols) if cols.is_empty() => {
                Err(LinesqlError::config("static column list is empty"))
            }
            None if self.mode == ProvisioningMode::Static => Err(LinesqlError::config(
                "static mode needs a column list (--columns or --columns-file)",
            )),
            _ => Ok(()),
        }
    }
}

/// Parse `"name:type,name:type"`. A pair without `:type` gets the `UNKNOWN` type.
pub fn parse_column_list(list: &str) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    for raw in list.split(',') {
        let s = raw.trim();
        if s.is_empty() {
            return Err(LinesqlError::config(format!(
                "empty entry in column list `{}`",
                list
            )));
        }
        let (name, ty) = match s.split_once(':') {
            Some((n, t)) => (n.trim(), t.trim()),
            None => (s, UNKNOWN_TYPE),
        };
        let col = Column::new(name, ty);
        col.validate()?;
        columns.push(col);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_type_pairs() {
        let cols = parse_column_list("name:TEXT, val : INTEGER,extra").unwrap();
        assert_eq!(
            cols,
            vec![
                Column::new("name", "TEXT"),
                Column::new("val", "INTEGER"),
                Column::unknown("extra"),
            ]
        );
    }

    #[test]
    fn bad_lists_are_configuration_errors() {
        for list in ["", "a:TEXT,,b:TEXT", ":TEXT", "a:", "a:INT(x)"] {
            let err = parse_column_list(list).unwrap_err();
            assert!(matches!(err, LinesqlError::Config(_)), "{}", list);
        }
    }

    #[test]
    fn static_columns_take_precedence() {
        let config = Config {
            mode: ProvisioningMode::Dynamic,
            static_columns: Some(vec![Column::unknown("a")]),
            ..Config::default()
        };
        assert_eq!(config.effective_mode(), ProvisioningMode::Static);
        assert_eq!(
            Config::default().effective_mode(),
            ProvisioningMode::FirstLine
        );
    }

    #[test]
    fn static_mode_without_columns_is_rejected() {
        let config = Config {
            mode: ProvisioningMode::Static,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        assert!(Config::default().validate().is_ok());

        let blank_table = Config {
            table_name: " ".into(),
            ..Config::default()
        };
        assert!(blank_table.validate().is_err());
    }
}
