//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the loaded
//! configuration with command-line overrides applied, the resolved store
//! path and the output flags.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use openmeta_config::{ConverterConfig, find_openmeta_dir, load_config};
use openmeta_convert::{ConversionContext, Converter, ElementHandler};
use openmeta_repository::InMemoryCollection;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
#[derive(Debug)]
pub struct RuntimeContext {
    /// The `.openmeta/` directory, if one was found.
    pub openmeta_dir: Option<PathBuf>,

    /// Configuration after command-line overrides.
    pub config: ConverterConfig,

    /// Resolved JSONL store path.
    pub store_path: Option<PathBuf>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Flags win over `OPENMETA_*` variables, which win over the config file.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("failed to read current directory")?;
        let openmeta_dir = find_openmeta_dir(&cwd);

        let mut config = match &openmeta_dir {
            Some(dir) => load_config(dir)
                .with_context(|| format!("failed to load config from {}", dir.display()))?,
            None => ConverterConfig::default(),
        };
        if let Some(policy) = global.policy {
            config.unmatched_relationships = policy;
        }
        if global.strict_types {
            config.strict_types = true;
        }

        let store_path = match &global.store {
            Some(path) => Some(path.clone()),
            None => openmeta_dir
                .as_deref()
                .and_then(|dir| config.store_path(dir)),
        };

        Ok(Self {
            openmeta_dir,
            config,
            store_path,
            json: global.json,
            verbose: global.verbose,
        })
    }

    /// The `tracing` filter to install, if any.
    pub fn log_filter(&self) -> String {
        if self.verbose {
            return "omconv=debug,openmeta_convert=debug,openmeta_repository=debug".to_string();
        }
        self.config
            .log
            .filter
            .clone()
            .unwrap_or_else(|| "warn".to_string())
    }

    /// A converter configured from the policy and type-checking settings.
    pub fn converter(&self) -> Converter {
        Converter::standard()
            .with_policy(self.config.unmatched_relationships)
            .with_strict_types(self.config.strict_types)
    }

    /// Identifies a conversion made on behalf of `method`.
    pub fn conversion_context(&self, method: &str) -> ConversionContext {
        ConversionContext::new(self.config.service_name.clone(), method)
    }

    /// Loads the instance store.
    pub fn open_store(&self) -> Result<InMemoryCollection> {
        let path = self
            .store_path
            .as_ref()
            .context("no instance store given. Pass --store or set `store` in .openmeta/config.yaml")?;
        InMemoryCollection::open(path)
            .with_context(|| format!("failed to load instance store {}", path.display()))
    }

    /// Loads the store and pairs it with a converter.
    pub fn handler(&self) -> Result<ElementHandler<InMemoryCollection>> {
        Ok(ElementHandler::new(self.open_store()?, self.converter()))
    }
}
