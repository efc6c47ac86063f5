//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::browse::BrowseArgs;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::config::ConfigCommands;
use crate::cli::commands::metrics::MetricsArgs;
use crate::cli::commands::product::ProductCommands;

/// Browse and manage products in an inventory service
#[derive(Parser, Debug)]
#[command(name = "invman", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Inventory service URL (overrides config file and INVMAN_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub format: OutputFormat,

    /// Debug-level logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List, show, create, edit and delete products
    #[command(subcommand, visible_alias = "p")]
    Product(ProductCommands),

    /// List product categories
    Categories,

    /// Stock value and quantity per category
    Metrics(MetricsArgs),

    /// Interactive paged browser
    Browse(BrowseArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-separated for lists, YAML for single products
    #[default]
    Auto,
    /// Bordered table
    Table,
    Tsv,
    Csv,
    Json,
    Yaml,
    /// Product ids only, one per line
    Id,
}
