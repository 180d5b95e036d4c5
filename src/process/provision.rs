// src/process/provision.rs

use tracing::debug;

use crate::config::{Config, ProvisioningMode};
use crate::duck::RelationalSink;
use crate::error::{LinesqlError, Result};
use crate::schema::{Column, SchemaState};

/// How the schema gets established. Picked once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioning {
    /// The first line read names the columns and is not stored.
    FirstLine { consumed: bool },
    /// Columns are declared before any input is read.
    Static(Vec<Column>),
    /// Starts empty; the reconciler grows it as wider rows arrive.
    Dynamic,
}

impl Provisioning {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        match config.effective_mode() {
            ProvisioningMode::FirstLine => Ok(Provisioning::FirstLine { consumed: false }),
            ProvisioningMode::Dynamic => Ok(Provisioning::Dynamic),
            ProvisioningMode::Static => {
                let cols = config.static_columns.clone().ok_or_else(|| {
                    LinesqlError::config("static mode needs a column list")
                })?;
                Ok(Provisioning::Static(cols))
            }
        }
    }

    pub fn mode(&self) -> ProvisioningMode {
        match self {
            Provisioning::FirstLine { .. } => ProvisioningMode::FirstLine,
            Provisioning::Static(_) => ProvisioningMode::Static,
            Provisioning::Dynamic => ProvisioningMode::Dynamic,
        }
    }

    /// Whether the reconciler may add columns.
    pub fn grows(&self) -> bool {
        matches!(self, Provisioning::Dynamic)
    }

    /// Set up the schema before the first line is read.
    pub fn start<S: RelationalSink + ?Sized>(
        &self,
        schema: &mut SchemaState,
        sink: &mut S,
    ) -> Result<()> {
        match self {
            Provisioning::Static(cols) => schema.define(sink, cols.clone()),
            Provisioning::Dynamic => schema.define(sink, Vec::new()),
            // waits for the header line
            Provisioning::FirstLine { .. } => Ok(()),
        }
    }

    /// Claim `fields` as the header line if this strategy still wants one.
    pub fn take_header(&mut self, fields: &[String]) -> Option<Vec<Column>> {
        match self {
            Provisioning::FirstLine { consumed } if !*consumed => {
                *consumed = true;
                debug!(columns = fields.len(), "taking column names from header line");
                Some(fields.iter().map(Column::unknown).collect())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duck::DuckSink;
    use anyhow::Result;

    #[test]
    fn selection_follows_config() -> Result<()> {
        let first = Provisioning::from_config(&Config::default())?;
        assert_eq!(first, Provisioning::FirstLine { consumed: false });

        let dynamic = Provisioning::from_config(&Config {
            mode: ProvisioningMode::Dynamic,
            ..Config::default()
        })?;
        assert!(dynamic.grows());

        let cols = vec![Column::new("a", "TEXT")];
        let fixed = Provisioning::from_config(&Config {
            mode: ProvisioningMode::Dynamic,
            static_columns: Some(cols.clone()),
            ..Config::default()
        })?;
        assert_eq!(fixed, Provisioning::Static(cols));
        assert!(!fixed.grows());
        Ok(())
    }

    #[test]
    fn header_is_taken_once() {
        let mut p = Provisioning::FirstLine { consumed: false };
        let fields = vec!["x".to_string(), "y".to_string()];
        assert_eq!(
            p.take_header(&fields),
            Some(vec![Column::unknown("x"), Column::unknown("y")])
        );
        assert_eq!(p.take_header(&fields), None);
        assert_eq!(Provisioning::Dynamic.take_header(&fields), None);
    }

    #[test]
    fn static_defines_schema_before_input() -> Result<()> {
        let mut sink = DuckSink::open_mem_db()?;
        let mut schema = SchemaState::new("t");
        Provisioning::Static(vec![Column::new("a", "TEXT"), Column::new("b", "INT")])
            .start(&mut schema, &mut sink)?;
        assert_eq!(schema.len(), 2);

        let mut dyn_schema = SchemaState::new("d");
        Provisioning::Dynamic.start(&mut dyn_schema, &mut sink)?;
        assert!(dyn_schema.is_empty());
        Ok(())
    }
}
