//! Library constants and configuration defaults.

/// Sentinel stored in place of a missing observation.
pub const MISSING_VALUE: f32 = f32::NAN;

/// Added to the standard deviation when standardising to avoid division by zero.
pub const STANDARDISE_EPSILON: f32 = 1e-6;

/// Probabilities and proportions at or below this value are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Default proportion of sequences assigned to the training split.
pub const DEFAULT_TRAIN_PROP: f64 = 0.7;

/// Include the time stamp channel unless told otherwise.
pub const DEFAULT_INCLUDE_TIME: bool = true;

/// Prefix of the environment variables read by
/// [`PipelineConfig::load_from_environment`](crate::config::PipelineConfig::load_from_environment).
pub const ENV_PREFIX: &str = "IRREGULAR_TS_";

/// Version information.
pub const IRREGULAR_TS_VERSION: &str = env!("CARGO_PKG_VERSION");
