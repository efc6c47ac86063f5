//! `invman categories` command

use miette::Result;

use crate::cli::commands::connect;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::render_rows;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::InventoryApi;

pub async fn run(global: &GlobalOpts) -> Result<()> {
    let (_, client) = connect(global)?;
    let categories = client.categories().await?;

    let format = effective_format(global.format, true);
    if print_structured(&categories, format)? {
        return Ok(());
    }

    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            let rows = categories.iter().map(|c| vec![c.clone()]).collect();
            print!("{}", render_rows(&["CATEGORY"], rows, format)?);
        }
        _ => {
            for category in &categories {
                println!("{}", category);
            }
        }
    }
    Ok(())
}
