//! `omconv` -- typed views of open metadata instances.
//!
//! Parses CLI arguments with clap, resolves the runtime context (config file,
//! environment and flags), and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

fn main() {
    let cli = Cli::parse();

    let result = RuntimeContext::from_global_args(&cli.global).and_then(|ctx| {
        init_tracing(&ctx);
        debug!(
            openmeta_dir = ?ctx.openmeta_dir,
            store = ?ctx.store_path,
            policy = %ctx.config.unmatched_relationships,
            "resolved runtime context"
        );
        dispatch(&ctx, cli.command)
    });

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so that stdout stays parseable. `RUST_LOG` wins over
/// the configured filter unless `--verbose` is given.
fn init_tracing(ctx: &RuntimeContext) {
    let filter = if ctx.verbose {
        EnvFilter::new(ctx.log_filter())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(ctx.log_filter()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(ctx: &RuntimeContext, command: Option<Commands>) -> anyhow::Result<()> {
    match command {
        Some(Commands::Kinds) => commands::kinds::run(ctx),
        Some(Commands::Convert(args)) => commands::convert::run(ctx, &args),
        Some(Commands::List(args)) => commands::list::run(ctx, &args),
        Some(Commands::Check) => commands::check::run(ctx),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    }
}
