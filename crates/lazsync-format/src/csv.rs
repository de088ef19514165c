//! CSV output format.

use ::csv::{Writer, WriterBuilder};
use lazsync_types::{OrderRecord, ProductRecord};
use std::io::Write;

use crate::{FormatError, Formatter};

/// Separator between image URLs inside one CSV field.
const LIST_SEPARATOR: &str = "|";

const ORDER_HEADER: [&str; 10] = [
    "order_id",
    "created_at",
    "updated_at",
    "price",
    "voucher_platform",
    "voucher_seller",
    "shipping_fee_discount",
    "warehouse_code",
    "shipping_fee",
    "items_count",
];

const PRODUCT_HEADER: [&str; 11] = [
    "item_id",
    "name",
    "brand",
    "status",
    "created_time",
    "updated_time",
    "price",
    "special_price",
    "quantity",
    "url",
    "images",
];

/// CSV formatter.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break; embedded quotes are doubled.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: u8,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: b',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter(b'\t')
    }

    fn writer<W: Write>(&self, writer: W) -> Writer<W> {
        WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(writer)
    }
}

impl Formatter for CsvFormatter {
    fn write_orders<W: Write + Send>(
        &self,
        orders: &[OrderRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        let mut out = self.writer(writer);
        if self.include_header {
            out.write_record(ORDER_HEADER)?;
        }

        for order in orders {
            out.write_record([
                order.order_id.clone(),
                order.created_at.clone(),
                order.updated_at.clone(),
                order.price.to_string(),
                order.voucher_platform.to_string(),
                order.voucher_seller.to_string(),
                order.shipping_fee_discount.to_string(),
                order.warehouse_code.clone(),
                order.shipping_fee.to_string(),
                order.items_count.to_string(),
            ])?;
        }

        out.flush()?;
        Ok(())
    }

    fn write_products<W: Write + Send>(
        &self,
        products: &[ProductRecord],
        writer: W,
    ) -> Result<(), FormatError> {
        let mut out = self.writer(writer);
        if self.include_header {
            out.write_record(PRODUCT_HEADER)?;
        }

        for product in products {
            out.write_record([
                product.item_id.to_string(),
                product.name.clone(),
                product.brand.clone(),
                product.status.clone(),
                product.created_time.clone(),
                product.updated_time.clone(),
                product.price.to_string(),
                product.special_price.to_string(),
                product.quantity.to_string(),
                product.url.clone(),
                product.images.join(LIST_SEPARATOR),
            ])?;
        }

        out.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
