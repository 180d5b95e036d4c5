use serde_json;
use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use super::Column;
use crate::error::{LinesqlError, Result};

/// Write `columns` as pretty JSON to `path`.
///
/// Written to a hidden temp file next to `path` first, then renamed over it.
pub fn write_columns<P: AsRef<Path>>(path: P, columns: &[Column]) -> Result<()> {
    let path = path.as_ref();
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| LinesqlError::config(format!("not a file path: {}", path.display())))?;
    let tmp_name = format!(".{}.tmp", file_name);
    let tmp_path = match dir {
        Some(d) => d.join(tmp_name),
        None => Path::new(&tmp_name).to_path_buf(),
    };

    let io_err = |e| LinesqlError::io(tmp_path.display().to_string(), e);
    let tmp = fs::File::create(&tmp_path).map_err(io_err)?;
    let mut out = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut out, columns).map_err(|e| LinesqlError::Json {
        path: tmp_path.display().to_string(),
        source: e,
    })?;
    // trailing newline
    out.write_all(b"\n").map_err(io_err)?;
    out.flush().map_err(io_err)?;
    drop(out);

    fs::rename(&tmp_path, path)
        .map_err(|e| LinesqlError::io(path.display().to_string(), e))?;
    Ok(())
}

/// Load a column list written by [`write_columns`].
pub fn read_columns<P: AsRef<Path>>(path: P) -> Result<Vec<Column>> {
    let path = path.as_ref();
    let f = fs::File::open(path).map_err(|e| LinesqlError::io(path.display().to_string(), e))?;
    serde_json::from_reader(std::io::BufReader::new(f)).map_err(|e| LinesqlError::Json {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn written_schema_reads_back() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("lines_columns.json");
        let cols = vec![Column::new("name", "TEXT"), Column::autonamed(2)];

        write_columns(&path, &cols)?;
        assert_eq!(read_columns(&path)?, cols);

        let text = fs::read_to_string(&path)?;
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\"ty\": \"UNKNOWN\""));
        // temp file is gone after the rename
        assert_eq!(fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn overwrite_replaces_previous_schema() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("s.json");
        write_columns(&path, &[Column::unknown("old")])?;
        write_columns(&path, &[Column::unknown("new")])?;
        assert_eq!(read_columns(&path)?, vec![Column::unknown("new")]);
        Ok(())
    }

    #[test]
    fn unreadable_schema_file_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            read_columns(&missing),
            Err(LinesqlError::Io { .. })
        ));

        let garbage = dir.path().join("bad.json");
        fs::write(&garbage, "{not json").unwrap();
        assert!(matches!(
            read_columns(&garbage),
            Err(LinesqlError::Json { .. })
        ));
    }
}
