//! `omconv check` -- load the instance store and report what it holds.

use anyhow::Result;

use openmeta_repository::MetadataCollection;

use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `omconv check` command.
///
/// Loading validates every instance, so a store that loads is a valid one.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let store = ctx.open_store()?;
    let stats = store.statistics()?;

    if ctx.json {
        return output_json(&stats);
    }

    println!(
        "{} entities, {} relationships",
        stats.entity_count, stats.relationship_count
    );
    let rows: Vec<Vec<String>> = stats
        .entities_by_type
        .iter()
        .map(|(name, count)| vec!["entity".to_string(), name.clone(), count.to_string()])
        .chain(
            stats
                .relationships_by_type
                .iter()
                .map(|(name, count)| vec!["relationship".to_string(), name.clone(), count.to_string()]),
        )
        .collect();
    if !rows.is_empty() {
        println!();
        output_table(&["CATEGORY", "TYPE", "COUNT"], &rows);
    }
    Ok(())
}
