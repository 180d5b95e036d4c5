// src/schema/types.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LinesqlError, Result};

/// Type token given to columns whose type nobody declared.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// One or more identifier words, optionally followed by `(p)` or `(p, s)`.
static TYPE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(?: [A-Za-z][A-Za-z0-9_]*)*(?:\(\s*\d+\s*(?:,\s*\d+\s*)?\))?$")
        .expect("type token pattern is valid")
});

fn default_ty() -> String {
    UNKNOWN_TYPE.to_string()
}

/// A single column definition: its name and declared type token.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash)]
pub struct Column {
    pub name: String,
    #[serde(default = "default_ty")]
    pub ty: String,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    /// Column with the placeholder `UNKNOWN` type.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN_TYPE)
    }

    /// Positional name used when the schema grows on its own.
    pub fn autonamed(position: usize) -> Self {
        Self::unknown(format!("c{}", position))
    }

    /// Reject empty names and type tokens that don't look like a SQL type.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LinesqlError::config("column name must not be empty"));
        }
        if !TYPE_TOKEN.is_match(self.ty.trim()) {
            return Err(LinesqlError::config(format!(
                "malformed type `{}` for column `{}`",
                self.ty, self.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_type_tokens() {
        for ty in [
            "UNKNOWN",
            "TEXT",
            "integer",
            "VARCHAR(20)",
            "DECIMAL(10, 2)",
            "DOUBLE PRECISION",
        ] {
            assert!(Column::new("x", ty).validate().is_ok(), "{}", ty);
        }
    }

    #[test]
    fn rejects_malformed_columns() {
        assert!(Column::new("x", "INT; DROP TABLE t").validate().is_err());
        assert!(Column::new("x", "").validate().is_err());
        assert!(Column::new("x", "VARCHAR(").validate().is_err());
        assert!(Column::unknown("  ").validate().is_err());
    }

    #[test]
    fn autonamed_is_positional() {
        assert_eq!(Column::autonamed(3), Column::new("c3", "UNKNOWN"));
    }

    #[test]
    fn missing_type_deserializes_as_unknown() -> anyhow::Result<()> {
        let cols: Vec<Column> = serde_json::from_str(r#"[{"name":"a"},{"name":"b","ty":"INTEGER"}]"#)?;
        assert_eq!(cols[0].ty, UNKNOWN_TYPE);
        assert_eq!(cols[1].ty, "INTEGER");
        Ok(())
    }
}
