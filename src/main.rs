use clap::Parser;
use miette::{IntoDiagnostic, Result};

use invman::cli::commands;
use invman::cli::{Cli, Commands};
use invman::core::logging::{init_subscriber, Verbosity};

fn main() -> Result<()> {
    // Install miette's fancy error handler for readable diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    init_subscriber(
        Verbosity::from_flags(cli.global.verbose, cli.global.quiet),
        cli.global.no_color,
    );
    if cli.global.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let global = cli.global;
    runtime.block_on(async move {
        match cli.command {
            Commands::Product(cmd) => commands::product::run(cmd, &global).await,
            Commands::Categories => commands::categories::run(&global).await,
            Commands::Metrics(args) => commands::metrics::run(args, &global).await,
            Commands::Browse(args) => commands::browse::run(args, &global).await,
            Commands::Config(cmd) => commands::config::run(cmd, &global),
            Commands::Completions(args) => commands::completions::run(args),
        }
    })
}
