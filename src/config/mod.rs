//! Configuration management for irregular-ts.
//!
//! Configuration is plain data: [`PipelineConfig`] for the transformation
//! pipeline, [`MissingRate`] for missing data simulation and [`SplitConfig`]
//! for the optional random partitioning helper.

pub mod core;
pub mod missing;

pub use self::core::{ConfigBuilder, PipelineConfig, SplitConfig};
pub use self::missing::MissingRate;

/// Default file name looked up by applications embedding the pipeline.
pub const DEFAULT_CONFIG_FILE: &str = "irregular-ts.toml";
