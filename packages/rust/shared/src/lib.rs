//! Shared types, error model, and configuration for Docflow.
//!
//! This crate is the foundation depended on by all other Docflow crates.
//! It provides:
//! - [`DocflowError`] — the unified error type
//! - Domain types ([`StepRecord`], [`StepIo`], [`StepConnection`],
//!   [`ReferenceFile`], [`SubdirectoryGroup`], [`Value`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ParsingConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{DocflowError, Result};
pub use types::{
    ConnectionKind, Fields, ReferenceFile, StepConnection, StepIo, StepRecord, SubdirectoryGroup,
    UsesBlock, Value, display_name,
};
