// src/process/split.rs
use regex::Regex;

use crate::error::{LinesqlError, Result};

/// Splits raw lines into fields on a regular-expression delimiter.
///
/// Runs of delimiters are not collapsed unless the pattern says so: with the
/// default single-blank pattern `"a  b"` yields `["a", "", "b"]`.
#[derive(Debug, Clone)]
pub struct LineSplitter {
    re: Regex,
}

impl LineSplitter {
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(LinesqlError::config("delimiter pattern must not be empty"));
        }
        let re = Regex::new(pattern).map_err(|e| {
            LinesqlError::config(format!("invalid delimiter pattern `{}`: {}", pattern, e))
        })?;
        Ok(Self { re })
    }

    pub fn pattern(&self) -> &str {
        self.re.as_str()
    }

    /// Trim surrounding whitespace, then split. Never returns an empty vector.
    pub fn split(&self, line: &str) -> Vec<String> {
        self.re.split(line.trim()).map(str::to_owned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_blank_does_not_collapse_runs() {
        let s = LineSplitter::new(" ").unwrap();
        assert_eq!(s.split("a b c"), vec!["a", "b", "c"]);
        assert_eq!(s.split("a  b"), vec!["a", "", "b"]);
    }

    #[test]
    fn pattern_can_collapse_runs() {
        let s = LineSplitter::new(r"\s+").unwrap();
        assert_eq!(s.split("a \t  b"), vec!["a", "b"]);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let s = LineSplitter::new(",").unwrap();
        assert_eq!(s.split("  x,y,z \r\n"), vec!["x", "y", "z"]);
    }

    #[test]
    fn empty_line_is_a_single_empty_field() {
        let s = LineSplitter::new(" ").unwrap();
        assert_eq!(s.split("\n"), vec![""]);
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let err = LineSplitter::new("(unclosed").unwrap_err();
        assert!(matches!(err, LinesqlError::Config(_)));
        assert!(LineSplitter::new("").is_err());
    }
}
