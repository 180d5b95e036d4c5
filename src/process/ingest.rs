// src/process/ingest.rs
use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::{debug, info, instrument, trace};

use crate::config::Config;
use crate::duck::RelationalSink;
use crate::error::{LineError, LinesqlError, Result};
use crate::input::{for_each_line, InputSource};
use crate::process::provision::Provisioning;
use crate::process::reconcile::{reconcile, Row, RowPolicy, Verdict};
use crate::process::split::LineSplitter;
use crate::schema::SchemaState;

/// Counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    pub lines_read: usize,
    pub skipped: usize,
    pub header_lines: usize,
    pub inserted: usize,
    pub rejected: usize,
    pub columns_added: usize,
}

/// Drives lines through splitting, schema bootstrap and reconciliation into
/// the sink. Owns the schema for the duration of the run.
pub struct Ingestor<'a, S: RelationalSink + ?Sized, W: Write> {
    sink: &'a mut S,
    schema: SchemaState,
    splitter: LineSplitter,
    provisioning: Provisioning,
    policy: RowPolicy,
    ignore_wrong_lines: bool,
    skip_remaining: usize,
    stats: IngestStats,
    /// Where non-fatal line errors are reported.
    errors: W,
}

impl<'a, S: RelationalSink + ?Sized, W: Write> Ingestor<'a, S, W> {
    /// Resolve the strategy and policies from `config`; a Static schema is
    /// created here, before any input.
    pub fn new(config: &Config, sink: &'a mut S, errors: W) -> Result<Self> {
        let splitter = LineSplitter::new(&config.delimiter)?;
        let provisioning = Provisioning::from_config(config)?;
        let policy = RowPolicy::new(&provisioning, config);
        let mut schema = SchemaState::new(config.table_name.clone());
        provisioning.start(&mut schema, &mut *sink)?;
        debug!(mode = ?provisioning.mode(), ?policy, delimiter = %splitter.pattern(), "ingestor ready");

        Ok(Self {
            sink,
            schema,
            splitter,
            provisioning,
            policy,
            ignore_wrong_lines: config.ignore_wrong_lines,
            skip_remaining: config.skip_lines,
            stats: IngestStats::default(),
            errors,
        })
    }

    pub fn schema(&self) -> &SchemaState {
        &self.schema
    }

    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Process one physical line.
    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        self.stats.lines_read += 1;
        let line_no = self.stats.lines_read;

        if self.skip_remaining > 0 {
            self.skip_remaining -= 1;
            self.stats.skipped += 1;
            trace!(line = line_no, "skipped");
            return Ok(());
        }

        let fields = self.splitter.split(raw);
        if let Some(columns) = self.provisioning.take_header(&fields) {
            self.schema.define(&mut *self.sink, columns)?;
            self.stats.header_lines += 1;
            return Ok(());
        }

        match reconcile(fields, self.schema.len(), self.policy, line_no)? {
            Verdict::Insert(row) => self.insert(row),
            Verdict::Grow { added, row } => {
                self.stats.columns_added += self.schema.grow(&mut *self.sink, added)?;
                self.insert(row)
            }
            Verdict::Reject(err) => self.on_line_error(err),
        }
    }

    fn insert(&mut self, row: Row) -> Result<()> {
        self.sink
            .insert_row(self.schema.table(), self.schema.columns(), &row)?;
        self.stats.inserted += 1;
        Ok(())
    }

    fn on_line_error(&mut self, err: LineError) -> Result<()> {
        self.stats.rejected += 1;
        if !self.ignore_wrong_lines {
            return Err(LinesqlError::Line(err));
        }
        writeln!(self.errors, "{}", err).map_err(|e| LinesqlError::io("error stream", e))?;
        Ok(())
    }

    pub fn ingest_reader<R: BufRead>(&mut self, reader: R, name: &str) -> Result<()> {
        for_each_line(reader, name, |line| self.feed_line(line))
    }

    #[instrument(level = "info", skip(self, source), fields(source = %source))]
    pub fn ingest_source(&mut self, source: &InputSource) -> Result<()> {
        let before = self.stats.lines_read;
        let reader = source.open()?;
        self.ingest_reader(reader, &source.to_string())?;
        debug!(lines = self.stats.lines_read - before, "source done");
        Ok(())
    }

    /// End the run, handing back the final schema.
    pub fn finish(mut self) -> Result<(SchemaState, IngestStats)> {
        self.errors
            .flush()
            .map_err(|e| LinesqlError::io("error stream", e))?;
        info!(
            lines = self.stats.lines_read,
            skipped = self.stats.skipped,
            inserted = self.stats.inserted,
            rejected = self.stats.rejected,
            columns_added = self.stats.columns_added,
            width = self.schema.len(),
            "ingestion finished"
        );
        Ok((self.schema, self.stats))
    }
}
