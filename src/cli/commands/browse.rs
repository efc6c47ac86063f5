//! `invman browse` command - interactive paged browser
//!
//! A menu loop over [`ProductStore`]: every action is one store intent,
//! and the screen is redrawn from [`ProductStore::view`] after each one.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use miette::{IntoDiagnostic, Result};
use std::io::IsTerminal;

use crate::cli::commands::connect;
use crate::cli::commands::metrics::render_metrics;
use crate::cli::commands::product::prompt_form;
use crate::cli::filters::FilterArgs;
use crate::cli::table::{render_products, DEFAULT_COLUMNS};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    FilterSpec, InventoryApi, InventoryError, InventoryResult, ProductStore, SortColumn,
    SortSpec, StoreView,
};
use crate::entities::{Product, ProductForm};

#[derive(clap::Args, Debug)]
pub struct BrowseArgs {
    /// Initial filter and sort
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Products per page (defaults to the configured page size)
    #[arg(long)]
    pub size: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Previous,
    GoTo,
    Search,
    Categories,
    InStock,
    Sort,
    Reset,
    Refresh,
    New,
    Edit,
    Delete,
    Metrics,
    Quit,
}

const ACTIONS: &[(Action, &str)] = &[
    (Action::Next, "Next page"),
    (Action::Previous, "Previous page"),
    (Action::GoTo, "Go to page..."),
    (Action::Search, "Search by name..."),
    (Action::Categories, "Filter categories..."),
    (Action::InStock, "Toggle in-stock only"),
    (Action::Sort, "Sort by column..."),
    (Action::Reset, "Reset filters and sort"),
    (Action::Refresh, "Refresh"),
    (Action::New, "New product..."),
    (Action::Edit, "Edit product..."),
    (Action::Delete, "Delete product..."),
    (Action::Metrics, "Show metrics"),
    (Action::Quit, "Quit"),
];

pub async fn run(args: BrowseArgs, global: &GlobalOpts) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        return Err(miette::miette!("browse needs an interactive terminal"));
    }

    let (config, client) = connect(global)?;
    let mut store = ProductStore::new(client, args.size.unwrap_or(config.page_size));

    let sort = args.filter.to_sort();
    if !sort.is_empty() {
        settle(store.set_sort(sort).await);
    }
    settle(store.apply_filters(args.filter.to_filter()).await);

    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = ACTIONS.iter().map(|(_, label)| *label).collect();

    loop {
        render(&mut store)?;

        let choice = Select::with_theme(&theme)
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact_opt()
            .into_diagnostic()?;
        let Some(choice) = choice else {
            return Ok(());
        };

        match ACTIONS[choice].0 {
            Action::Next => {
                if settle(store.next_page().await) == Some(false) {
                    println!("{}", style("Already on the last page").dim());
                }
            }
            Action::Previous => {
                if settle(store.prev_page().await) == Some(false) {
                    println!("{}", style("Already on the first page").dim());
                }
            }
            Action::GoTo => {
                let total = store.state().total_pages();
                let page: usize = Input::with_theme(&theme)
                    .with_prompt(format!("Page (1-{})", total.max(1)))
                    .default(store.state().page() + 1)
                    .interact_text()
                    .into_diagnostic()?;
                if settle(store.set_page(page.saturating_sub(1)).await) == Some(false) {
                    println!("{}", style(format!("No page {}", page)).yellow());
                }
            }
            Action::Search => {
                let term: String = Input::with_theme(&theme)
                    .with_prompt("Name contains (blank for any)")
                    .default(store.state().filter().name.clone())
                    .allow_empty(true)
                    .interact_text()
                    .into_diagnostic()?;
                let filter = store.state().filter().clone().with_name(term);
                settle(store.apply_filters(filter).await);
            }
            Action::Categories => {
                if let Some(filter) = pick_categories(&mut store, &theme).await? {
                    settle(store.apply_filters(filter).await);
                }
            }
            Action::InStock => {
                let current = store.state().filter().clone();
                let only = !current.in_stock_only;
                settle(store.apply_filters(current.in_stock(only)).await);
            }
            Action::Sort => {
                let columns = SortColumn::all();
                let items: Vec<String> = columns
                    .iter()
                    .map(|c| match store.state().sort().direction_of(*c) {
                        Some(dir) => format!("{} ({})", c.label(), dir),
                        None => c.label().to_string(),
                    })
                    .collect();
                let picked = Select::with_theme(&theme)
                    .with_prompt("Cycle sort: off -> asc -> desc -> off")
                    .items(&items)
                    .interact_opt()
                    .into_diagnostic()?;
                if let Some(i) = picked {
                    settle(store.toggle_sort(columns[i]).await);
                }
            }
            Action::Reset => {
                settle(store.reset_filters().await);
            }
            Action::Refresh => {
                settle(store.refresh().await);
            }
            Action::New => {
                let form = prompt_form(&ProductForm::new("", "", 0.0, 0))?;
                if let Some(product) = settle(store.create(form).await) {
                    println!("{} Created product {}", style("✓").green(), style(product.id()).cyan());
                }
            }
            Action::Edit => {
                if let Some(product) = pick_product(store.products(), &theme, "Edit which product?")? {
                    let form = prompt_form(&ProductForm::from(&product))?;
                    if settle(store.update(product.id(), form).await).is_some() {
                        println!("{} Updated product {}", style("✓").green(), style(product.id()).cyan());
                    }
                }
            }
            Action::Delete => {
                if let Some(product) =
                    pick_product(store.products(), &theme, "Delete which product?")?
                {
                    let confirmed = Confirm::with_theme(&theme)
                        .with_prompt(format!("Delete '{}'?", product.name))
                        .default(false)
                        .interact()
                        .into_diagnostic()?;
                    if confirmed && settle(store.delete(product.id()).await).is_some() {
                        println!("{} Deleted product {}", style("✓").green(), style(product.id()).cyan());
                    }
                }
            }
            Action::Metrics => match store.load_metrics().await {
                Ok(metrics) => print!("{}", render_metrics(metrics, OutputFormat::Table)?),
                Err(err) => eprintln!("{} {}", style("✗").red(), err),
            },
            Action::Quit => return Ok(()),
        }
    }
}

/// Keep the session alive on failure.
///
/// Fetch and mutation failures are already in the store's error state and
/// shown on the next render; validation failures happen before any request
/// and are printed here.
fn settle<T>(result: InventoryResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(InventoryError::Validation(failure)) => {
            eprintln!("{} {}", style("✗").red(), failure);
            None
        }
        Err(err) => {
            tracing::debug!(error = %err, "browse action failed");
            None
        }
    }
}

fn render<A: InventoryApi>(store: &mut ProductStore<A>) -> Result<()> {
    println!();
    match store.view() {
        StoreView::Loading => println!("{}", style("Loading...").dim()),
        StoreView::Error(message) => {
            eprintln!("{} {}", style("✗").red(), style(message).red());
            store.dismiss_error();
        }
        StoreView::Ready(view) => {
            println!(
                "Page {} of {} · {} product(s) · filter: {} · sort: {}",
                style(if view.total_pages == 0 { 0 } else { view.page + 1 }).cyan(),
                view.total_pages,
                style(view.total_items).cyan(),
                describe_filter(view.filter),
                describe_sort(view.sort)
            );
            if view.products.is_empty() {
                println!("No products found.");
            } else {
                print!(
                    "{}",
                    render_products(view.products, DEFAULT_COLUMNS, OutputFormat::Table)?
                );
            }
        }
    }
    Ok(())
}

fn describe_filter(filter: &FilterSpec) -> String {
    if filter.is_empty() {
        return "none".to_string();
    }
    let mut parts = Vec::new();
    if let Some(term) = filter.name_term() {
        parts.push(format!("name~\"{}\"", term));
    }
    if !filter.categories.is_empty() {
        let names: Vec<&str> = filter.categories.iter().map(String::as_str).collect();
        parts.push(format!("category in [{}]", names.join(", ")));
    }
    if filter.in_stock_only {
        parts.push("in stock".to_string());
    }
    parts.join(", ")
}

fn describe_sort(sort: &SortSpec) -> String {
    if sort.is_empty() {
        return "none".to_string();
    }
    sort.keys()
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

async fn pick_categories<A: InventoryApi>(
    store: &mut ProductStore<A>,
    theme: &ColorfulTheme,
) -> Result<Option<FilterSpec>> {
    let mut filter = store.state().filter().clone();
    let categories: Vec<String> = match store.load_categories().await {
        Ok(set) => set.iter().cloned().collect(),
        Err(err) => {
            eprintln!("{} {}", style("✗").red(), err);
            return Ok(None);
        }
    };
    if categories.is_empty() {
        println!("No categories yet.");
        return Ok(None);
    }

    let checked: Vec<bool> = categories
        .iter()
        .map(|c| filter.categories.contains(c))
        .collect();
    let picked = MultiSelect::with_theme(theme)
        .with_prompt("Categories (none selected = all)")
        .items(&categories)
        .defaults(&checked)
        .interact_opt()
        .into_diagnostic()?;

    Ok(picked.map(|indices| {
        filter.categories = indices.into_iter().map(|i| categories[i].clone()).collect();
        filter
    }))
}

fn pick_product(products: &[Product], theme: &ColorfulTheme, prompt: &str) -> Result<Option<Product>> {
    if products.is_empty() {
        println!("No products on this page.");
        return Ok(None);
    }
    let items: Vec<String> = products
        .iter()
        .map(|p| format!("{} ({}) [{}]", p.name, p.category, p.id()))
        .collect();
    let picked = Select::with_theme(theme)
        .with_prompt(prompt)
        .items(&items)
        .interact_opt()
        .into_diagnostic()?;
    Ok(picked.map(|i| products[i].clone()))
}
