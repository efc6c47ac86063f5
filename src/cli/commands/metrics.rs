//! `invman metrics` command - stock totals per category

use console::style;
use miette::Result;

use crate::cli::commands::connect;
use crate::cli::helpers::format_price;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::render_rows;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::InventoryApi;
use crate::entities::{InventoryMetrics, StockSummary};

/// Label of the summary row covering every category
const OVERALL: &str = "(all)";

#[derive(clap::Args, Debug)]
pub struct MetricsArgs {
    /// Only this category
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

pub async fn run(args: MetricsArgs, global: &GlobalOpts) -> Result<()> {
    let (_, client) = connect(global)?;
    let metrics = client.metrics().await?;

    let format = effective_format(global.format, true);

    if let Some(name) = &args.category {
        let summary = metrics
            .category(name)
            .ok_or_else(|| miette::miette!("No metrics for category '{}'", name))?;
        if print_structured(summary, format)? {
            return Ok(());
        }
        print!("{}", render_rows(&HEADERS, vec![summary_row(name, summary)], format)?);
        return Ok(());
    }

    if print_structured(&metrics, format)? {
        return Ok(());
    }

    print!("{}", render_metrics(&metrics, format)?);
    if format == OutputFormat::Table {
        println!(
            "{} categor{}, total value {}",
            style(metrics.by_category.len()).cyan(),
            if metrics.by_category.len() == 1 { "y" } else { "ies" },
            style(format_price(metrics.overall.total_value)).cyan()
        );
    }
    Ok(())
}

const HEADERS: [&str; 4] = ["CATEGORY", "STOCK", "VALUE", "AVG PRICE"];

fn summary_row(label: &str, summary: &StockSummary) -> Vec<String> {
    vec![
        label.to_string(),
        summary.total_stock.to_string(),
        format_price(summary.total_value),
        format_price(summary.average_price),
    ]
}

/// Per-category table followed by the overall row
pub fn render_metrics(metrics: &InventoryMetrics, format: OutputFormat) -> Result<String> {
    render_rows(&HEADERS, metrics_rows(metrics), format)
}

/// One row per category in name order, then the overall row
fn metrics_rows(metrics: &InventoryMetrics) -> Vec<Vec<String>> {
    metrics
        .by_category
        .iter()
        .map(|(name, summary)| summary_row(name, summary))
        .chain(std::iter::once(summary_row(OVERALL, &metrics.overall)))
        .collect()
}
