//! `omconv list` -- convert every entity of a bean kind's entity type.

use anyhow::{Context, Result};

use crate::cli::ListArgs;
use crate::context::RuntimeContext;
use crate::output::{BEAN_HEADERS, bean_row, output_json, output_table};

/// Execute the `omconv list` command.
pub fn run(ctx: &RuntimeContext, args: &ListArgs) -> Result<()> {
    let handler = ctx.handler()?;
    let conversion = ctx.conversion_context("list");

    let beans = handler
        .find_beans(&args.kind, &conversion)
        .with_context(|| format!("cannot list {} beans", args.kind))?;

    if ctx.json {
        return output_json(&beans);
    }

    if beans.is_empty() {
        println!("No {} beans found.", args.kind);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = beans.iter().map(bean_row).collect();
    output_table(BEAN_HEADERS, &rows);
    println!("\n{} bean(s)", beans.len());
    Ok(())
}
