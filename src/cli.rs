//! Command-line surface.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{
    parse_column_list, Config, ProvisioningMode, DEFAULT_DELIMITER, DEFAULT_OUTPUT_DELIMITER,
    DEFAULT_TABLE_NAME,
};
use crate::duck::IN_MEMORY;
use crate::error::Result;
use crate::schema::read_columns;

/// Load delimited text lines into a SQL table, then run one query over it.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// SQL to run once all input is loaded
    pub query: String,

    /// Input files or glob patterns; `-` or nothing reads stdin
    pub inputs: Vec<String>,

    /// Table the lines are loaded into
    #[arg(short, long, env = "LINESQL_TABLE", default_value = DEFAULT_TABLE_NAME)]
    pub table: String,

    /// Regular expression separating input fields
    #[arg(short, long, default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Separator between printed result fields
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DELIMITER)]
    pub output_delimiter: String,

    /// Number of leading lines to ignore entirely
    #[arg(short, long, default_value_t = 0)]
    pub skip_lines: usize,

    /// Where column names come from
    #[arg(short, long, value_enum, default_value_t = ProvisioningMode::FirstLine)]
    pub mode: ProvisioningMode,

    /// Static columns as `name:type,name:type` (implies static mode)
    #[arg(short, long, conflicts_with = "columns_file")]
    pub columns: Option<String>,

    /// Static columns from a JSON file written by --schema-out (implies static mode)
    #[arg(long)]
    pub columns_file: Option<PathBuf>,

    /// Reject rows longer than the schema instead of merging their tail
    #[arg(short = 'j', long = "no-join-long-rows", action = ArgAction::SetFalse)]
    pub join_long_rows: bool,

    /// Pad rows shorter than the schema with NULLs instead of rejecting them
    #[arg(short, long)]
    pub fill_short_rows: bool,

    /// Abort on the first rejected line instead of reporting and skipping it
    #[arg(short = 'i', long = "abort-on-wrong-lines", action = ArgAction::SetFalse)]
    pub ignore_wrong_lines: bool,

    /// Database file, or `:memory:`
    #[arg(long, env = "LINESQL_DB", default_value = IN_MEMORY)]
    pub db: String,

    /// Print the column names and every loaded row before the query result
    #[arg(long)]
    pub dump: bool,

    /// Write the final schema as JSON to this path
    #[arg(long)]
    pub schema_out: Option<PathBuf>,
}

impl Args {
    /// Resolve into the immutable run configuration.
    pub fn into_config(self) -> Result<Config> {
        let static_columns = match (&self.columns, &self.columns_file) {
            (Some(list), _) => Some(parse_column_list(list)?),
            (None, Some(path)) => Some(read_columns(path)?),
            (None, None) => None,
        };

        let config = Config {
            table_name: self.table,
            delimiter: self.delimiter,
            output_delimiter: self.output_delimiter,
            skip_lines: self.skip_lines,
            mode: self.mode,
            static_columns,
            join_long_rows: self.join_long_rows,
            fill_short_rows: self.fill_short_rows,
            ignore_wrong_lines: self.ignore_wrong_lines,
            db_location: self.db,
            query: self.query,
            inputs: self.inputs,
            dump: self.dump,
            schema_out: self.schema_out,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinesqlError;
    use crate::schema::{write_columns, Column};
    use anyhow::Result;
    use tempfile::tempdir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("linesql").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() -> Result<()> {
        let config = parse(&["SELECT * FROM lines"]).into_config()?;
        assert_eq!(config.query, "SELECT * FROM lines");
        assert!(config.inputs.is_empty());
        assert_eq!(config.delimiter, " ");
        assert_eq!(config.output_delimiter, "|");
        assert_eq!(config.mode, ProvisioningMode::FirstLine);
        assert!(config.join_long_rows);
        assert!(!config.fill_short_rows);
        assert!(config.ignore_wrong_lines);
        assert_eq!(config.db_location, ":memory:");
        Ok(())
    }

    #[test]
    fn flags_flip_policies() -> Result<()> {
        let config = parse(&[
            "-j", "-f", "-i", "-s", "2", "-m", "dynamic", "-d", ",", "-t", "logs", "q", "a.txt",
            "-",
        ])
        .into_config()?;
        assert!(!config.join_long_rows);
        assert!(config.fill_short_rows);
        assert!(!config.ignore_wrong_lines);
        assert_eq!(config.skip_lines, 2);
        assert_eq!(config.mode, ProvisioningMode::Dynamic);
        assert_eq!(config.delimiter, ",");
        assert_eq!(config.table_name, "logs");
        assert_eq!(config.inputs, vec!["a.txt", "-"]);
        Ok(())
    }

    #[test]
    fn column_list_forces_static() -> Result<()> {
        let config = parse(&["-m", "dynamic", "-c", "name:TEXT,val:INTEGER", "q"]).into_config()?;
        assert_eq!(config.effective_mode(), ProvisioningMode::Static);
        assert_eq!(
            config.static_columns,
            Some(vec![Column::new("name", "TEXT"), Column::new("val", "INTEGER")])
        );
        Ok(())
    }

    #[test]
    fn columns_file_is_loaded() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("schema.json");
        write_columns(&path, &[Column::new("a", "TEXT")])?;
        let path = path.to_string_lossy().to_string();

        let config = parse(&["--columns-file", path.as_str(), "q"]).into_config()?;
        assert_eq!(config.static_columns, Some(vec![Column::new("a", "TEXT")]));

        let both = Args::try_parse_from(["linesql", "-c", "a", "--columns-file", path.as_str(), "q"]);
        assert!(both.is_err());
        Ok(())
    }

    #[test]
    fn bad_inputs_are_configuration_errors() {
        let err = parse(&["-c", "a:TEXT,,b", "q"]).into_config().unwrap_err();
        assert!(matches!(err, LinesqlError::Config(_)));

        let err = parse(&["-m", "static", "q"]).into_config().unwrap_err();
        assert!(matches!(err, LinesqlError::Config(_)));

        assert!(Args::try_parse_from(["linesql"]).is_err());
    }
}
