//! Output format abstraction.

use derive_more::Display;
use lazsync_types::{LazsyncError, OrderRecord, ProductRecord, Records};
use std::io::Write;
use thiserror::Error;

use crate::{CsvFormatter, JsonFormatter};

/// Output format identifier.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// CSV format.
    #[default]
    #[display("csv")]
    Csv,
    /// JSON array format.
    #[display("json")]
    Json,
    /// Newline-delimited JSON format.
    #[display("ndjson")]
    Ndjson,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Csv, Self::Json, Self::Ndjson]
    }

    /// Writes records in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_records<W: Write + Send>(
        &self,
        records: &Records,
        writer: W,
    ) -> Result<(), FormatError> {
        match self {
            Self::Csv => CsvFormatter::new().write_records(records, writer),
            Self::Json => JsonFormatter::new().write_records(records, writer),
            Self::Ndjson => JsonFormatter::ndjson().write_records(records, writer),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

impl From<FormatError> for LazsyncError {
    fn from(error: FormatError) -> Self {
        match error {
            FormatError::Io(e) => Self::Io(e),
            FormatError::Json(e) => Self::Json(e),
            e @ (FormatError::UnknownFormat(_) | FormatError::Csv(_)) => {
                Self::Format(e.to_string())
            }
        }
    }
}

/// Trait for output formatters.
pub trait Formatter: Send + Sync {
    /// Writes order records to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_orders<W: Write + Send>(
        &self,
        orders: &[OrderRecord],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Writes product records to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_products<W: Write + Send>(
        &self,
        products: &[ProductRecord],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Writes records of either collection.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_records<W: Write + Send>(
        &self,
        records: &Records,
        writer: W,
    ) -> Result<(), FormatError> {
        match records {
            Records::Orders(orders) => self.write_orders(orders, writer),
            Records::Products(products) => self.write_products(products, writer),
        }
    }

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_display_matches_extension() {
        for format in OutputFormat::all() {
            assert_eq!(format.to_string(), format.extension());
        }
    }

    #[test]
    fn test_write_records_dispatch() {
        let records = Records::Orders(vec![OrderRecord {
            order_id: "42".to_string(),
            ..Default::default()
        }]);

        let mut out = Vec::new();
        OutputFormat::Ndjson.write_records(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains(r#""order_id":"42""#));
    }

    #[test]
    fn test_csv_error_into_lazsync_error() {
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(["a", "b"]).unwrap();
        let err = writer.write_record(["only one"]).unwrap_err();

        let error = LazsyncError::from(FormatError::from(err));
        assert!(matches!(error, LazsyncError::Format(message) if message.starts_with("CSV error")));
    }
}
