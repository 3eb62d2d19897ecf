//! `omconv kinds` -- list the bean kinds the converter can build.

use anyhow::Result;
use serde::Serialize;

use openmeta_convert::{BeanDescriptor, InputShape};

use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KindInfo {
    kind: &'static str,
    bean_class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<&'static str>,
    input: &'static str,
    relationship_types: Vec<&'static str>,
}

impl From<&BeanDescriptor> for KindInfo {
    fn from(descriptor: &BeanDescriptor) -> Self {
        Self {
            kind: descriptor.kind.tag(),
            bean_class: descriptor.bean_class,
            entity_type: descriptor.entity_type,
            input: input_label(descriptor.input),
            relationship_types: descriptor.relationship_types().collect(),
        }
    }
}

fn input_label(input: InputShape) -> &'static str {
    match input {
        InputShape::Entity => "entity",
        InputShape::EntityWithRelationship => "entity+relationship",
        InputShape::EntityWithRelationships => "entity+relationships",
        InputShape::Relationship => "relationship",
    }
}

/// Execute the `omconv kinds` command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let converter = ctx.converter();
    let kinds: Vec<KindInfo> = converter.registry().iter().map(KindInfo::from).collect();

    if ctx.json {
        return output_json(&kinds);
    }

    let rows: Vec<Vec<String>> = kinds
        .iter()
        .map(|k| {
            vec![
                k.kind.to_string(),
                k.bean_class.to_string(),
                k.entity_type.unwrap_or("-").to_string(),
                k.input.to_string(),
                k.relationship_types.join(","),
            ]
        })
        .collect();
    output_table(
        &["KIND", "CLASS", "ENTITY TYPE", "INPUT", "RELATIONSHIPS"],
        &rows,
    );
    Ok(())
}
