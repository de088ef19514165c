//! JSON output format.

use lazsync_types::{OrderRecord, ProductRecord};
use serde::Serialize;
use std::io::Write;

use crate::{FormatError, Formatter};

/// How records are laid out in a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonLayout {
    /// One JSON array holding every record.
    #[default]
    Array,
    /// One record per line (NDJSON / JSON Lines).
    Lines,
}

/// Writes records as JSON using their serde field names.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    layout: JsonLayout,
    indent: bool,
}

impl JsonFormatter {
    /// Array layout, compact.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            layout: JsonLayout::Array,
            indent: false,
        }
    }

    /// Line-per-record layout.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            layout: JsonLayout::Lines,
            indent: false,
        }
    }

    /// Indents array output. Line layout is never indented.
    #[must_use]
    pub const fn pretty(mut self) -> Self {
        self.indent = true;
        self
    }

    /// Returns the layout.
    #[must_use]
    pub const fn layout(&self) -> JsonLayout {
        self.layout
    }

    fn write_items<T: Serialize, W: Write>(
        &self,
        items: &[T],
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.layout == JsonLayout::Lines {
            for item in items {
                serde_json::to_writer(&mut writer, item)?;
                writer.write_all(b"\n")?;
            }
            return Ok(());
        }

        if self.indent {
            serde_json::to_writer_pretty(&mut writer, items)?;
        } else {
            serde_json::to_writer(&mut writer, items)?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_orders<W: Write + Send>(
        &self,
        orders: &[OrderRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_items(orders, writer)
    }

    fn write_products<W: Write + Send>(
        &self,
        products: &[ProductRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        self.write_items(products, writer)
    }

    fn extension(&self) -> &str {
        match self.layout {
            JsonLayout::Array => "json",
            JsonLayout::Lines => "ndjson",
        }
    }
}
