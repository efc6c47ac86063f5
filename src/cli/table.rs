//! Tabular rendering for list output
//!
//! Rows are plain strings; the output format decides the layout:
//! bordered tables via `tabled`, RFC 4180 CSV via `csv`, or TSV for
//! piping into `cut`/`awk`.

use clap::ValueEnum;
use console::Style;
use miette::{IntoDiagnostic, Result};
use tabled::builder::Builder;
use tabled::settings::Style as TableStyle;

use crate::cli::helpers::{format_date, format_price, format_timestamp, truncate_str};
use crate::cli::OutputFormat;
use crate::entities::Product;

/// Widest name shown in bordered tables
const TABLE_NAME_WIDTH: usize = 40;

/// Columns available in product listings
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ProductColumn {
    Id,
    Name,
    Category,
    Price,
    Stock,
    Expires,
    Created,
    Updated,
    /// Price times stock on hand
    Value,
}

pub const DEFAULT_COLUMNS: &[ProductColumn] = &[
    ProductColumn::Id,
    ProductColumn::Name,
    ProductColumn::Category,
    ProductColumn::Price,
    ProductColumn::Stock,
    ProductColumn::Expires,
];

impl ProductColumn {
    pub fn header(&self) -> &'static str {
        match self {
            ProductColumn::Id => "ID",
            ProductColumn::Name => "NAME",
            ProductColumn::Category => "CATEGORY",
            ProductColumn::Price => "PRICE",
            ProductColumn::Stock => "STOCK",
            ProductColumn::Expires => "EXPIRES",
            ProductColumn::Created => "CREATED",
            ProductColumn::Updated => "UPDATED",
            ProductColumn::Value => "VALUE",
        }
    }

    pub fn cell(&self, product: &Product) -> String {
        match self {
            ProductColumn::Id => product.id().to_string(),
            ProductColumn::Name => product.name.clone(),
            ProductColumn::Category => product.category.clone(),
            ProductColumn::Price => format_price(product.unit_price),
            ProductColumn::Stock => product.quantity_in_stock.to_string(),
            ProductColumn::Expires => format_date(product.expiration_date),
            ProductColumn::Created => format_timestamp(product.creation_date()),
            ProductColumn::Updated => format_timestamp(product.update_date()),
            ProductColumn::Value => format_price(product.stock_value()),
        }
    }
}

/// Red when sold out, yellow when below the reorder threshold
pub fn stock_style(product: &Product) -> Style {
    if !product.in_stock() {
        Style::new().red()
    } else if product.is_low_stock() {
        Style::new().yellow()
    } else {
        Style::new()
    }
}

/// Render products in one of the tabular formats (table, tsv, csv, id)
pub fn render_products(
    products: &[Product],
    columns: &[ProductColumn],
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Id {
        let mut out = String::new();
        for product in products {
            out.push_str(product.id().as_str());
            out.push('\n');
        }
        return Ok(out);
    }

    let headers: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|product| {
            columns
                .iter()
                .map(|column| match (column, format) {
                    (ProductColumn::Name, OutputFormat::Table) => {
                        truncate_str(&product.name, TABLE_NAME_WIDTH)
                    }
                    (ProductColumn::Stock, OutputFormat::Table) => stock_style(product)
                        .apply_to(product.quantity_in_stock)
                        .to_string(),
                    _ => column.cell(product),
                })
                .collect()
        })
        .collect();

    render_rows(&headers, rows, format)
}

/// Render arbitrary rows; JSON and YAML callers serialize their own data
pub fn render_rows(headers: &[&str], rows: Vec<Vec<String>>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(headers.iter().map(|h| h.to_string()));
            for row in rows {
                builder.push_record(row);
            }
            let mut table = builder.build();
            table.with(TableStyle::rounded());
            Ok(format!("{}\n", table))
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(headers).into_diagnostic()?;
            for row in &rows {
                writer.write_record(row).into_diagnostic()?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| miette::miette!("{}", e))?;
            String::from_utf8(bytes).into_diagnostic()
        }
        _ => {
            let mut out = headers.join("\t");
            out.push('\n');
            for row in rows {
                let cells: Vec<String> = row.iter().map(|cell| tsv_safe(cell)).collect();
                out.push_str(&cells.join("\t"));
                out.push('\n');
            }
            Ok(out)
        }
    }
}

fn tsv_safe(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}
