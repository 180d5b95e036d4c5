//! Input sources: stdin, plain file paths and glob patterns, read as one
//! stream of lines.

use std::{
    fmt,
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use glob::glob;
use tracing::debug;

use crate::error::{LinesqlError, Result};

/// Argument that means "read standard input".
pub const STDIN_MARKER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl InputSource {
    pub fn open(&self) -> Result<Box<dyn BufRead>> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            InputSource::File(path) => {
                let file = File::open(path)
                    .map_err(|e| LinesqlError::io(path.display().to_string(), e))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

fn is_pattern(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Turn command-line input arguments into sources, in order.
/// No arguments means stdin; glob patterns expand to their sorted matches.
pub fn resolve_inputs(args: &[String]) -> Result<Vec<InputSource>> {
    if args.is_empty() {
        return Ok(vec![InputSource::Stdin]);
    }

    let mut sources = Vec::with_capacity(args.len());
    for arg in args {
        if arg == STDIN_MARKER {
            sources.push(InputSource::Stdin);
        } else if is_pattern(arg) {
            let entries = glob(arg).map_err(|e| {
                LinesqlError::config(format!("invalid input pattern `{}`: {}", arg, e))
            })?;
            let mut paths: Vec<PathBuf> = entries.filter_map(|p| p.ok()).collect();
            if paths.is_empty() {
                return Err(LinesqlError::config(format!(
                    "no input files match `{}`",
                    arg
                )));
            }
            paths.sort();
            debug!(pattern = %arg, matches = paths.len(), "expanded input pattern");
            sources.extend(paths.into_iter().map(InputSource::File));
        } else {
            sources.push(InputSource::File(PathBuf::from(arg)));
        }
    }
    Ok(sources)
}

/// Feed every line of `reader` to `f`, without its line terminator.
/// Invalid UTF-8 is replaced rather than treated as an error.
pub fn for_each_line<R, F>(mut reader: R, name: &str, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&str) -> Result<()>,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| LinesqlError::io(name, e))?;
        if n == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&buf);
        f(text.trim_end_matches(['\n', '\r']))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    #[test]
    fn no_arguments_or_dash_mean_stdin() {
        assert_eq!(resolve_inputs(&[]).unwrap(), vec![InputSource::Stdin]);
        assert_eq!(
            resolve_inputs(&["-".to_string(), "a.txt".to_string()]).unwrap(),
            vec![InputSource::Stdin, InputSource::File(PathBuf::from("a.txt"))]
        );
    }

    #[test]
    fn patterns_expand_sorted() -> anyhow::Result<()> {
        let dir = tempdir()?;
        for name in ["b.log", "a.log", "c.txt"] {
            fs::write(dir.path().join(name), "x\n")?;
        }
        let pattern = format!("{}/*.log", dir.path().display());
        let sources = resolve_inputs(&[pattern])?;
        assert_eq!(
            sources,
            vec![
                InputSource::File(dir.path().join("a.log")),
                InputSource::File(dir.path().join("b.log")),
            ]
        );

        let nothing = format!("{}/*.csv", dir.path().display());
        assert!(matches!(
            resolve_inputs(&[nothing]),
            Err(LinesqlError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn missing_file_fails_on_open() {
        let src = InputSource::File(PathBuf::from("/definitely/not/here.txt"));
        assert!(matches!(src.open(), Err(LinesqlError::Io { .. })));
    }

    #[test]
    fn lines_are_yielded_without_terminators() -> anyhow::Result<()> {
        let data = b"one 1\r\ntwo \xff2\nlast";
        let mut seen = Vec::new();
        for_each_line(Cursor::new(&data[..]), "mem", |l| {
            seen.push(l.to_string());
            Ok(())
        })?;
        assert_eq!(seen, vec!["one 1", "two \u{fffd}2", "last"]);
        Ok(())
    }
}
