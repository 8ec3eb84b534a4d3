use anyhow::{Context, Result};
use log::debug;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Field separator for every table the pipeline writes
pub const OUTPUT_SEPARATOR: u8 = b';';

/// Write a table as `;`-separated CSV with a header row, creating parent directories
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }
    }

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(OUTPUT_SEPARATOR)
        .finish(df)
        .with_context(|| format!("Failed to write table: {}", path.display()))?;

    debug!("Wrote {} rows to {}", df.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_table_semicolon_separated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("table.csv");

        let mut df = DataFrame::new(vec![
            Column::new("state_name".into(), &["beijing", "ontario"]),
            Column::new("area_km2".into(), &[Some(16251.93), None]),
        ])
        .unwrap();

        write_table(&mut df, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "state_name;area_km2");
        assert_eq!(lines[1], "beijing;16251.93");
        assert_eq!(lines[2], "ontario;");
    }
}
