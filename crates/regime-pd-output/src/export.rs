//! CSV and JSON export of report tables.

use crate::{DecileTable, RegimeRiskRow, RegimeRiskSummary};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values, one row per table row.
    Csv,

    /// Compact JSON.
    Json,

    /// Pretty-printed JSON.
    PrettyJson,
}

impl ExportFormat {
    /// File extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Trait for types that can be exported to various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format, creating parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

fn rows_to_json<T: Serialize>(rows: &T, pretty: bool) -> Result<String, ExportError> {
    Ok(if pretty {
        serde_json::to_string_pretty(rows)?
    } else {
        serde_json::to_string(rows)?
    })
}

/// JSON shape of a risk summary: rows plus the headline uplift.
#[derive(Serialize)]
struct SummaryDocument<'a> {
    regimes: &'a [RegimeRiskRow],
    relative_mean_pd_uplift_pct: Option<f64>,
}

impl Exporter for RegimeRiskSummary {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        let document = SummaryDocument {
            regimes: self.rows(),
            relative_mean_pd_uplift_pct: self.relative_mean_pd_uplift(),
        };
        match format {
            ExportFormat::Csv => rows_to_csv(self.rows()),
            ExportFormat::Json => rows_to_json(&document, false),
            ExportFormat::PrettyJson => rows_to_json(&document, true),
        }
    }
}

impl Exporter for DecileTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(self.stats()),
            ExportFormat::Json => rows_to_json(&self.stats(), false),
            ExportFormat::PrettyJson => rows_to_json(&self.stats(), true),
        }
    }
}
