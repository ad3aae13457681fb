//! Core data types for irregular-ts.
//!
//! Arrays follow one convention throughout the crate: the first axis indexes
//! sequences, the second timesteps and the third channels.

use crate::core::error::{Result, TimeSeriesError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Value type of every time series, mask, delta and label entry.
/// Missing entries hold `NaN`.
pub type Value = f32;

/// Channel index type (0-based, time series channels only).
pub type ChannelIndex = usize;

/// Data partition a sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    /// Training partition; the only one that feeds channel statistics
    Train,
    /// Validation partition
    Val,
    /// Test partition
    Test,
}

impl Default for Split {
    fn default() -> Self {
        Split::Train
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::Train => write!(f, "train"),
            Split::Val => write!(f, "val"),
            Split::Test => write!(f, "test"),
        }
    }
}

impl FromStr for Split {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "train" => Ok(Split::Train),
            "val" => Ok(Split::Val),
            "test" => Ok(Split::Test),
            other => Err(TimeSeriesError::config(format!(
                "unknown split '{}', expected one of train, val, test",
                other
            ))),
        }
    }
}

/// Built-in imputation methods selectable by name.
///
/// Custom functions are supplied directly as an
/// [`Imputer`](crate::dataset::preprocessing::missing::Imputer) and have no name here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImputeMethod {
    /// Leave missing values in place
    None,
    /// Replace missing values with zero
    Zero,
    /// Replace missing values with the channel mean (mode if categorical)
    Mean,
    /// Carry the last observation forward, channel fill value before the first one
    Forward,
}

impl Default for ImputeMethod {
    fn default() -> Self {
        ImputeMethod::None
    }
}

impl fmt::Display for ImputeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImputeMethod::None => write!(f, "none"),
            ImputeMethod::Zero => write!(f, "zero"),
            ImputeMethod::Mean => write!(f, "mean"),
            ImputeMethod::Forward => write!(f, "forward"),
        }
    }
}

impl FromStr for ImputeMethod {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(ImputeMethod::None),
            "zero" => Ok(ImputeMethod::Zero),
            "mean" => Ok(ImputeMethod::Mean),
            "forward" => Ok(ImputeMethod::Forward),
            other => Err(TimeSeriesError::config(format!(
                "argument 'impute' must be one of none, zero, mean, forward or a function, got '{}'",
                other
            ))),
        }
    }
}

/// Which channels of the assembled output are standardised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Standardise {
    /// No standardisation
    None,
    /// Continuous time series channels only
    Data,
    /// Time stamp, continuous time series and delta channels
    All,
}

impl Default for Standardise {
    fn default() -> Self {
        Standardise::None
    }
}

impl fmt::Display for Standardise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Standardise::None => write!(f, "none"),
            Standardise::Data => write!(f, "data"),
            Standardise::All => write!(f, "all"),
        }
    }
}

impl FromStr for Standardise {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Standardise::None),
            "data" => Ok(Standardise::Data),
            "all" => Ok(Standardise::All),
            other => Err(TimeSeriesError::config(format!(
                "argument 'standardise' must be one of none, data, all, got '{}'",
                other
            ))),
        }
    }
}

/// Positions of each channel block inside an assembled array.
///
/// Blocks always appear in the order time stamp, time series, mask, delta;
/// a block that was not requested is an empty range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelLayout {
    /// Time stamp channel (length 0 or 1)
    pub time: Range<usize>,
    /// Time series channels
    pub data: Range<usize>,
    /// Missing data mask channels
    pub mask: Range<usize>,
    /// Time delta channels
    pub delta: Range<usize>,
}

impl ChannelLayout {
    /// Compute the layout for `n_channels` series channels and the requested blocks.
    pub fn new(n_channels: usize, time: bool, mask: bool, delta: bool) -> Self {
        let time_len = usize::from(time);
        let time_range = 0..time_len;
        let data = time_len..time_len + n_channels;
        let mask_len = if mask { n_channels } else { 0 };
        let mask_range = data.end..data.end + mask_len;
        let delta_len = if delta { n_channels } else { 0 };
        let delta_range = mask_range.end..mask_range.end + delta_len;

        ChannelLayout {
            time: time_range,
            data,
            mask: mask_range,
            delta: delta_range,
        }
    }

    /// Total number of output channels.
    pub fn total(&self) -> usize {
        self.delta.end
    }

    /// Number of time series channels.
    pub fn n_channels(&self) -> usize {
        self.data.len()
    }
}
