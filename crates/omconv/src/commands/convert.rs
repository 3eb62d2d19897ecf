//! `omconv convert` -- convert one stored instance into a bean.

use anyhow::{Context, Result};

use crate::cli::ConvertArgs;
use crate::context::RuntimeContext;
use crate::output::{BEAN_HEADERS, bean_row, output_json, output_table};

/// Execute the `omconv convert` command.
pub fn run(ctx: &RuntimeContext, args: &ConvertArgs) -> Result<()> {
    let handler = ctx.handler()?;
    let conversion = ctx.conversion_context("convert");

    let bean = handler
        .get_bean(&args.kind, &args.guid, &conversion)
        .with_context(|| format!("cannot convert {} as {}", args.guid, args.kind))?;

    if ctx.json {
        return output_json(&bean);
    }

    output_table(BEAN_HEADERS, &[bean_row(&bean)]);
    let extended = bean.extended_properties();
    if !extended.is_empty() {
        println!();
        println!("Extended properties:");
        for (name, value) in extended {
            println!("  {name}: {}", serde_json::to_string(value)?);
        }
    }
    Ok(())
}
