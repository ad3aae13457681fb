//! # irregular-ts
//!
//! Turns regularly sampled, fully observed multivariate time series into
//! training arrays that look irregularly sampled and partially observed.
//!
//! ## Features
//!
//! - **Missing data simulation**: seeded per-channel dropout of observations
//! - **Observation masks**: one `0/1` channel per time series channel
//! - **Time deltas**: time elapsed since each channel was last observed
//! - **Imputation**: none, zero, mean/mode, forward fill or a custom function,
//!   with fill values fitted on the training split only
//! - **Fixed channel order**: time stamp, time series, mask, delta
//!
//! ## Quick Start
//!
//! ```rust
//! use irregular_ts::{ConfigBuilder, ImputeMethod, Split, TimeSeriesDataset};
//! use ndarray::Array3;
//!
//! # fn main() -> irregular_ts::Result<()> {
//! // 4 sequences, 10 timesteps, 3 channels
//! let series = Array3::from_shape_fn((4, 10, 3), |(n, t, c)| (n + t + c) as f32);
//!
//! let config = ConfigBuilder::new()
//!     .missing(0.3)
//!     .seed(123)
//!     .mask(true)
//!     .delta(true)
//!     .impute(ImputeMethod::Forward)
//!     .build()?;
//!
//! let dataset = TimeSeriesDataset::builder()
//!     .series(series)
//!     .markers(vec![Split::Train, Split::Train, Split::Val, Split::Test])
//!     .config(config)
//!     .build()?;
//!
//! // time stamp + 3 series + 3 mask + 3 delta channels
//! assert_eq!(dataset.x().dim(), (2, 10, 10));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: types, constants and error handling
//! - [`config`]: pipeline configuration, file and environment loading
//! - [`dataset`]: the pipeline stages and the [`TimeSeriesDataset`] owning their output

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]

// Core infrastructure module - always available
pub mod core;

// Configuration management module
pub mod config;

// Dataset and pipeline module
pub mod dataset;

// Re-export core functionality for convenience
pub use crate::core::{
    constants::*,
    error::{Result, TimeSeriesError},
    traits::*,
    types::*,
};

// Re-export configuration functionality
pub use config::{ConfigBuilder, MissingRate, PipelineConfig, SplitConfig};

// Re-export dataset functionality
pub use dataset::{
    assemble, imputer_for, AssemblyOptions, FillTable, FnImputer, ForwardImputer, Imputer,
    MeanImputer, NoImputer, PartitionData, Partitions, Standardiser, TimeSeriesDataset,
    TimeSeriesDatasetBuilder, ZeroImputer,
};

// Version information
pub use crate::core::constants::IRREGULAR_TS_VERSION as VERSION;

/// Initialize logging for the library.
///
/// Optional: the pipeline works without it, but log output is only visible
/// once a logger is installed.
///
/// ```rust
/// fn main() -> irregular_ts::Result<()> {
///     irregular_ts::init()?;
///     assert!(irregular_ts::is_initialized());
///     Ok(())
/// }
/// ```
pub fn init() -> Result<()> {
    crate::core::initialize_core()
}

/// Check if the library has been initialized.
pub fn is_initialized() -> bool {
    crate::core::is_core_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_initialization() {
        assert!(init().is_ok());
        assert!(is_initialized());
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports() {
        let config = PipelineConfig::default();
        assert_eq!(config.layout(3).total(), 4);
        assert_eq!(imputer_for(ImputeMethod::Zero).name(), "zero");
    }
}
