//! Dataset module for irregular-ts.
//!
//! [`TimeSeriesDataset`] owns the transformed partitions. The pipeline stages
//! it runs live in [`preprocessing`]; [`assembly`] concatenates the output
//! channels and [`partition`] assigns sequences to splits.

pub mod assembly;
pub mod dataset;
pub mod partition;
pub mod preprocessing;

// Re-export commonly used types
pub use assembly::{assemble, AssemblyOptions};
pub use dataset::{PartitionData, TimeSeriesDataset, TimeSeriesDatasetBuilder};
pub use partition::Partitions;
pub use preprocessing::{
    imputer_for, FillTable, FnImputer, ForwardImputer, Imputer, MeanImputer, NoImputer,
    Standardiser, ZeroImputer,
};
