//! Output formatting helpers for the `omconv` CLI.

use std::io::{self, Write};

use serde::Serialize;

use openmeta_convert::Bean;
use openmeta_core::instance::QUALIFIED_NAME;

/// Print a value as pretty-printed JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    // Ignore broken pipe errors (e.g., piped to `head`)
    let _ = writeln!(handle, "{json}");
    Ok(())
}

/// Print rows as a left-aligned table with a header and separator line.
pub fn output_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    for row in std::iter::once(&header_cells)
        .chain(std::iter::once(&separator))
        .chain(rows)
    {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(handle, "{}", line.join("  ").trim_end());
    }
}

/// The name a bean is best known by: its qualified name, or the unique name
/// of the related element for relationship beans.
pub fn bean_name(bean: &Bean) -> String {
    let name = match bean {
        Bean::RelatedElement(related) => related.related_element.unique_name.clone(),
        other => other
            .to_instance_properties()
            .get_str(QUALIFIED_NAME)
            .map(str::to_owned),
    };
    name.unwrap_or_else(|| "-".to_string())
}

/// One table row summarizing a bean.
pub fn bean_row(bean: &Bean) -> Vec<String> {
    let header = bean.header();
    vec![
        bean.guid().to_string(),
        header.element_type.type_name.clone(),
        bean_name(bean),
        bean.extended_properties().len().to_string(),
    ]
}

pub const BEAN_HEADERS: &[&str] = &["GUID", "TYPE", "NAME", "EXTENDED"];
