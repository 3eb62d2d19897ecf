//! Configuration management for openmeta tools.
//!
//! This crate finds the `.openmeta/` directory, loads `config.yaml` from it
//! with `OPENMETA_*` environment overrides, and saves it back.

pub mod config;
pub mod openmeta_dir;

pub use config::{ConfigError, ConverterConfig, LogConfig, load_config, save_config};
pub use openmeta_dir::{ensure_openmeta_dir, find_openmeta_dir, find_openmeta_dir_or_error};
