//! Clap CLI definitions for the `omconv` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use openmeta_core::enums::UnmatchedRelationshipPolicy;

/// omconv -- typed views of open metadata instances.
///
/// Reads entities and relationships from a JSONL instance store and
/// converts them into typed beans.
#[derive(Parser, Debug)]
#[command(
    name = "omconv",
    about = "Convert open metadata instances into typed beans",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// JSONL instance store (default: `store` from .openmeta/config.yaml).
    #[arg(long, global = true, env = "OMCONV_STORE")]
    pub store: Option<PathBuf>,

    /// What to do with relationships a bean has no slot for: ignore, warn or reject.
    #[arg(long, global = true)]
    pub policy: Option<UnmatchedRelationshipPolicy>,

    /// Require entities to be of the bean's entity type.
    #[arg(long, global = true)]
    pub strict_types: bool,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the bean kinds that can be built.
    Kinds,

    /// Convert one instance into a bean.
    #[command(alias = "show")]
    Convert(ConvertArgs),

    /// Convert every entity of a bean kind's entity type.
    List(ListArgs),

    /// Load and validate the instance store.
    Check,
}

/// Arguments for `omconv convert`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Guid of the entity (or relationship, for relationship kinds).
    pub guid: String,

    /// Bean kind tag, e.g. `glossary-term`.
    #[arg(short = 'k', long)]
    pub kind: String,
}

/// Arguments for `omconv list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Bean kind tag, e.g. `asset`.
    #[arg(short = 'k', long)]
    pub kind: String,
}
