// src/process/reconcile.rs

use crate::config::Config;
use crate::error::{LineError, LineErrorKind, LinesqlError, Result};
use crate::process::provision::Provisioning;

/// Field values ready for insertion; `None` marks padding.
pub type Row = Vec<Option<String>>;

/// How mismatched rows are handled for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPolicy {
    /// Long rows widen the schema instead of being merged or rejected.
    pub grow: bool,
    pub join_long_rows: bool,
    pub fill_short_rows: bool,
}

impl RowPolicy {
    /// Dynamic provisioning grows and always pads short rows, whatever
    /// `fill_short_rows` says.
    pub fn new(provisioning: &Provisioning, config: &Config) -> Self {
        let grow = provisioning.grows();
        Self {
            grow,
            join_long_rows: config.join_long_rows,
            fill_short_rows: grow || config.fill_short_rows,
        }
    }
}

/// What to do with one data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Insert as is; the row has exactly the schema's width.
    Insert(Row),
    /// Add `added` columns first, then insert.
    Grow { added: usize, row: Row },
    Reject(LineError),
}

/// Decide how the `fields` of line `line` fit a schema `schema_len` wide.
///
/// Long rows are handled first (grow, merge the tail into the last column, or
/// reject), then short rows (pad with `None` or reject).
pub fn reconcile(
    fields: Vec<String>,
    schema_len: usize,
    policy: RowPolicy,
    line: usize,
) -> Result<Verdict> {
    if schema_len == 0 && !policy.grow {
        return Err(LinesqlError::config(format!(
            "no columns defined when line {} arrived",
            line
        )));
    }

    let observed = fields.len();
    let mut row: Row = fields.into_iter().map(Some).collect();

    if observed > schema_len {
        if policy.grow {
            return Ok(Verdict::Grow {
                added: observed - schema_len,
                row,
            });
        }
        if !policy.join_long_rows {
            return Ok(Verdict::Reject(LineError {
                line,
                kind: LineErrorKind::TooLong,
                observed,
                expected: schema_len,
            }));
        }
        let tail: Vec<String> = row.split_off(schema_len - 1).into_iter().flatten().collect();
        row.push(Some(tail.join(" ")));
    } else if observed < schema_len {
        if !policy.fill_short_rows {
            return Ok(Verdict::Reject(LineError {
                line,
                kind: LineErrorKind::TooShort,
                observed,
                expected: schema_len,
            }));
        }
        row.resize(schema_len, None);
    }

    Ok(Verdict::Insert(row))
}
