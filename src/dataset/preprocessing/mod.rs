//! Missing data preprocessing for irregular-ts.
//!
//! One module per pipeline stage, in the order the stages run:
//!
//! 1. [`dropout`]: simulate missing observations
//! 2. [`mask`]: derive observation masks and time deltas
//! 3. [`statistics`]: fit channel fill values on the training split
//! 4. [`missing`]: impute the time series channels
//! 5. [`standardise`]: optional z-scoring of the assembled output

pub mod dropout;
pub mod mask;
pub mod missing;
pub mod standardise;
pub mod statistics;

pub use dropout::simulate_missing;
pub use mask::{check_time_stamps, missing_mask, time_delta};
pub use missing::{
    imputer_for, ForwardImputer, FnImputer, Imputer, MeanImputer, NoImputer, ZeroImputer,
};
pub use standardise::Standardiser;
pub use statistics::{nan_mean, nan_mode, nan_std, FillTable};
