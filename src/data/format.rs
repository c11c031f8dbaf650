use std::fmt;
use std::path::Path;

use anyhow::{bail, Result};

/// On-disk table formats understood by the loader and the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// Comma-separated, UTF-8, header row, no index column.
    #[default]
    Csv,
    /// Array of records: `[{"Produto": "Mouse", ...}, ...]`.
    Json,
    Parquet,
}

impl FileFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "json" => Ok(FileFormat::Json),
            "parquet" | "pq" => Ok(FileFormat::Parquet),
            other => bail!("Unsupported file extension: .{other}"),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Csv => "CSV",
            FileFormat::Json => "JSON",
            FileFormat::Parquet => "Parquet",
        };
        f.write_str(name)
    }
}
