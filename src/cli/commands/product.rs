//! `invman product` command - product listing and maintenance

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::connect;
use crate::cli::filters::FilterArgs;
use crate::cli::helpers::{
    format_date, format_price, format_timestamp, parse_date, read_ids_from_stdin,
};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{render_products, stock_style, ProductColumn, DEFAULT_COLUMNS};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    fetch_all, find_product, InventoryApi, ListQuery, LocalInventory,
};
use crate::entities::{Product, ProductForm, ProductId, ProductPage};
use crate::schema::FormValidator;

#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List one page of products
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show a product's details
    Show(ShowArgs),

    /// Create a new product
    New(NewArgs),

    /// Change fields of an existing product
    Edit(EditArgs),

    /// Delete products by id
    #[command(visible_alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Page to show, starting at 1
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Products per page (defaults to the configured page size)
    #[arg(long)]
    pub size: Option<usize>,

    /// Fetch everything once, then filter, sort and page locally
    #[arg(long)]
    pub local: bool,

    /// Columns to display
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = DEFAULT_COLUMNS.to_vec())]
    pub columns: Vec<ProductColumn>,

    /// Print only the number of matching products
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Product id
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Product name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Unit price
    #[arg(long)]
    pub price: Option<f64>,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    pub stock: u32,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub expires: Option<NaiveDate>,

    /// Prompt for each field
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Product id
    pub id: String,

    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long, short = 'c')]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub stock: Option<u32>,

    /// New expiration date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date, conflicts_with = "clear_expiration")]
    pub expires: Option<NaiveDate>,

    /// Remove the expiration date
    #[arg(long)]
    pub clear_expiration: bool,

    /// Prompt for each field, starting from the current values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Product ids; read from stdin when omitted
    pub ids: Vec<String>,
}

/// Run a product subcommand
pub async fn run(cmd: ProductCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProductCommands::List(args) => run_list(args, global).await,
        ProductCommands::Show(args) => run_show(args, global).await,
        ProductCommands::New(args) => run_new(args, global).await,
        ProductCommands::Edit(args) => run_edit(args, global).await,
        ProductCommands::Delete(args) => run_delete(args, global).await,
    }
}

async fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (config, client) = connect(global)?;

    let size = args.size.unwrap_or(config.page_size).max(1);
    let query = ListQuery {
        filter: args.filter.to_filter(),
        sort: args.filter.to_sort(),
        page: args.page.saturating_sub(1),
        size,
    };

    let page = if args.local {
        let everything = fetch_all(&client, config.page_size).await?;
        tracing::debug!(count = everything.len(), "fetched catalogue for local listing");
        LocalInventory::with_products(everything).list(&query).await?
    } else {
        client.list(&query).await?
    };

    if args.count {
        println!("{}", page.total_items);
        return Ok(());
    }

    let format = effective_format(global.format, true);
    if print_structured(&page.content, format)? {
        return Ok(());
    }

    if page.content.is_empty() {
        if format != OutputFormat::Id {
            print_empty_page(&page, query.page);
        }
        return Ok(());
    }

    print!("{}", render_products(&page.content, &args.columns, format)?);

    if format == OutputFormat::Table {
        println!(
            "Page {} of {} ({} product(s))",
            style(page.number + 1).cyan(),
            page.total_pages,
            style(page.total_items).cyan()
        );
    }

    Ok(())
}

fn print_empty_page(page: &ProductPage, requested: usize) {
    if page.total_items > 0 && requested >= page.total_pages {
        println!(
            "Page {} is past the last page ({}).",
            requested + 1,
            page.total_pages
        );
    } else {
        println!("No products found.");
    }
}

async fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_, client) = connect(global)?;
    let product = find_product(&client, &ProductId::from(args.id.as_str())).await?;

    let format = effective_format(global.format, false);
    if print_structured(&product, format)? {
        return Ok(());
    }

    match format {
        OutputFormat::Id => println!("{}", product.id()),
        OutputFormat::Tsv | OutputFormat::Csv => {
            let columns = [
                ProductColumn::Id,
                ProductColumn::Name,
                ProductColumn::Category,
                ProductColumn::Price,
                ProductColumn::Stock,
                ProductColumn::Expires,
                ProductColumn::Created,
                ProductColumn::Updated,
            ];
            print!("{}", render_products(std::slice::from_ref(&product), &columns, format)?);
        }
        _ => print_product(&product),
    }

    Ok(())
}

fn print_product(product: &Product) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(product.id()).cyan());
    println!("{}: {}", style("Name").bold(), style(&product.name).yellow());
    println!("{}: {}", style("Category").bold(), product.category);
    println!("{}", style("─".repeat(60)).dim());

    println!(
        "{}: {}",
        style("Unit price").bold(),
        format_price(product.unit_price)
    );

    println!(
        "{}: {}",
        style("In stock").bold(),
        stock_style(product).apply_to(product.quantity_in_stock)
    );
    println!(
        "{}: {}",
        style("Stock value").bold(),
        format_price(product.stock_value())
    );
    println!(
        "{}: {}",
        style("Expires").bold(),
        format_date(product.expiration_date)
    );

    println!();
    println!(
        "{}: {}",
        style("Created").dim(),
        format_timestamp(product.creation_date())
    );
    println!(
        "{}: {}",
        style("Updated").dim(),
        format_timestamp(product.update_date())
    );
}

async fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let form = if args.interactive {
        let defaults = ProductForm {
            name: args.name.clone().unwrap_or_default(),
            category: args.category.clone().unwrap_or_default(),
            unit_price: args.price.unwrap_or(0.0),
            quantity_in_stock: args.stock,
            expiration_date: args.expires,
        };
        prompt_form(&defaults)?
    } else {
        let name = args
            .name
            .ok_or_else(|| miette::miette!("--name is required (or use --interactive)"))?;
        let category = args
            .category
            .ok_or_else(|| miette::miette!("--category is required (or use --interactive)"))?;
        let price = args
            .price
            .ok_or_else(|| miette::miette!("--price is required (or use --interactive)"))?;

        let form = ProductForm::new(name, category, price, args.stock);
        match args.expires {
            Some(date) => form.expiring(date),
            None => form,
        }
    };

    FormValidator::new().validate(&form)?;

    let (_, client) = connect(global)?;
    let product = client.create(&form).await?;
    tracing::info!(id = %product.id(), "product created");

    report_saved(&product, "Created", global)
}

async fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_, client) = connect(global)?;
    let id = ProductId::from(args.id.as_str());
    let current = find_product(&client, &id).await?;

    let mut form = ProductForm::from(&current);
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(category) = args.category {
        form.category = category;
    }
    if let Some(price) = args.price {
        form.unit_price = price;
    }
    if let Some(stock) = args.stock {
        form.quantity_in_stock = stock;
    }
    if args.clear_expiration {
        form.expiration_date = None;
    } else if let Some(date) = args.expires {
        form.expiration_date = Some(date);
    }

    if args.interactive {
        form = prompt_form(&form)?;
    }

    if form == ProductForm::from(&current) {
        if !global.quiet {
            println!("Nothing to change for product {}", style(current.id()).cyan());
        }
        return Ok(());
    }

    FormValidator::new().validate(&form)?;

    let product = client.update(&id, &form).await?;
    tracing::info!(id = %product.id(), "product updated");

    report_saved(&product, "Updated", global)
}

async fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let ids = if args.ids.is_empty() {
        read_ids_from_stdin()
            .ok_or_else(|| miette::miette!("No product ids given (pass them as arguments or on stdin)"))?
    } else {
        args.ids
    };

    let (_, client) = connect(global)?;

    let mut failed = 0;
    for raw in &ids {
        let id = ProductId::from(raw.as_str());
        match client.delete(&id).await {
            Ok(()) => {
                if !global.quiet {
                    println!("{} Deleted product {}", style("✓").green(), style(&id).cyan());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), id, e);
            }
        }
    }

    if failed > 0 {
        return Err(miette::miette!(
            "{} of {} deletion(s) failed",
            failed,
            ids.len()
        ));
    }
    Ok(())
}

fn report_saved(product: &Product, action: &str, global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Id => println!("{}", product.id()),
        OutputFormat::Json | OutputFormat::Yaml => {
            print_structured(product, global.format)?;
        }
        _ => {
            if !global.quiet {
                println!(
                    "{} {} product {}",
                    style("✓").green(),
                    action,
                    style(product.id()).cyan()
                );
                println!(
                    "   {} ({})",
                    style(&product.name).yellow(),
                    product.category
                );
            }
        }
    }
    Ok(())
}

/// Prompt for every form field, offering `defaults` as starting values
pub fn prompt_form(defaults: &ProductForm) -> Result<ProductForm> {
    let theme = ColorfulTheme::default();

    let mut name = Input::<String>::with_theme(&theme).with_prompt("Name");
    if !defaults.name.is_empty() {
        name = name.default(defaults.name.clone());
    }
    let name = name
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("name must not be blank")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .into_diagnostic()?;

    let mut category = Input::<String>::with_theme(&theme).with_prompt("Category");
    if !defaults.category.is_empty() {
        category = category.default(defaults.category.clone());
    }
    let category = category.interact_text().into_diagnostic()?;

    let unit_price: f64 = Input::with_theme(&theme)
        .with_prompt("Unit price")
        .default(defaults.unit_price)
        .interact_text()
        .into_diagnostic()?;

    let quantity_in_stock: u32 = Input::with_theme(&theme)
        .with_prompt("Units in stock")
        .default(defaults.quantity_in_stock)
        .interact_text()
        .into_diagnostic()?;

    let expires: String = Input::with_theme(&theme)
        .with_prompt("Expiration date (YYYY-MM-DD, blank for none)")
        .default(
            defaults
                .expiration_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        )
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if input.trim().is_empty() {
                Ok(())
            } else {
                parse_date(input).map(|_| ())
            }
        })
        .interact_text()
        .into_diagnostic()?;

    let expiration_date = if expires.trim().is_empty() {
        None
    } else {
        Some(parse_date(&expires).map_err(|e| miette::miette!("{}", e))?)
    };

    Ok(ProductForm {
        name,
        category,
        unit_price,
        quantity_in_stock,
        expiration_date,
    })
}
