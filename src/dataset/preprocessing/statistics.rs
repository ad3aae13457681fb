//! Channel fill values computed from the training partition.
//!
//! A [`FillTable`] holds one fill value per time series channel: the mean of
//! the observed entries for continuous channels and the mode for categorical
//! channels. Caller supplied overrides replace the computed statistic. The
//! table is fitted once and never changes afterwards.

use crate::core::error::{Result, TimeSeriesError};
use crate::core::traits::Fitted;
use crate::core::types::{ChannelIndex, Value};
use ndarray::{ArrayView3, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-channel fill values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillTable {
    /// Fill value per channel, None when the channel had nothing to compute from
    values: Vec<Option<Value>>,
    /// Channels whose value is a mode
    categorical: Vec<ChannelIndex>,
    /// Channels whose value came from an override
    overridden: Vec<ChannelIndex>,
}

impl FillTable {
    /// Fit the table on the (pre-imputation) training series.
    ///
    /// Channels listed in `overrides` take the override value without looking
    /// at the data. A channel with no observed entries and no override is left
    /// undefined; asking for its value later is a statistics error.
    pub fn fit(
        series: ArrayView3<'_, Value>,
        categorical: &[ChannelIndex],
        overrides: &BTreeMap<ChannelIndex, Value>,
    ) -> Result<Self> {
        let n_channels = series.len_of(Axis(2));
        check_indices("categorical", categorical.iter().copied(), n_channels)?;
        check_indices("override", overrides.keys().copied(), n_channels)?;

        let mut categorical: Vec<ChannelIndex> = categorical.to_vec();
        categorical.sort_unstable();
        categorical.dedup();

        let values = (0..n_channels)
            .map(|c| {
                if let Some(&value) = overrides.get(&c) {
                    return Some(value);
                }
                let lane = series.index_axis(Axis(2), c);
                if categorical.binary_search(&c).is_ok() {
                    nan_mode(lane.iter().copied())
                } else {
                    nan_mean(lane.iter().copied())
                }
            })
            .collect::<Vec<_>>();

        for (c, value) in values.iter().enumerate() {
            match value {
                Some(v) => log::debug!("Channel {} fill value {}", c, v),
                None => log::debug!("Channel {} has no observed training values", c),
            }
        }

        Ok(FillTable {
            values,
            categorical,
            overridden: overrides.keys().copied().collect(),
        })
    }

    /// Table with explicit values for every channel.
    pub fn from_values(values: Vec<Value>) -> Self {
        let overridden = (0..values.len()).collect();
        FillTable {
            values: values.into_iter().map(Some).collect(),
            categorical: Vec::new(),
            overridden,
        }
    }

    /// Fill value of `channel`.
    pub fn value(&self, channel: ChannelIndex) -> Result<Value> {
        match self.values.get(channel) {
            Some(Some(value)) => Ok(*value),
            Some(None) => Err(TimeSeriesError::statistics(
                channel,
                if self.is_categorical(channel) {
                    "mode is undefined, no observed values in the training split and no override"
                } else {
                    "mean is undefined, no observed values in the training split and no override"
                },
            )),
            None => Err(TimeSeriesError::index_out_of_bounds(channel, self.values.len())),
        }
    }

    /// Fill value of `channel`, None when undefined or out of range.
    pub fn get(&self, channel: ChannelIndex) -> Option<Value> {
        self.values.get(channel).copied().flatten()
    }

    /// Fail with the first undefined channel, if any.
    pub fn require_all(&self) -> Result<()> {
        for channel in 0..self.values.len() {
            self.value(channel)?;
        }
        Ok(())
    }

    /// Whether every channel has a fill value.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// All fill values in channel order.
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Categorical channels, ascending.
    pub fn categorical(&self) -> &[ChannelIndex] {
        &self.categorical
    }

    pub fn is_categorical(&self, channel: ChannelIndex) -> bool {
        self.categorical.binary_search(&channel).is_ok()
    }

    pub fn is_overridden(&self, channel: ChannelIndex) -> bool {
        self.overridden.contains(&channel)
    }
}

impl Fitted for FillTable {
    fn n_channels(&self) -> usize {
        self.values.len()
    }
}

fn check_indices<I>(argument: &str, indices: I, n_channels: usize) -> Result<()>
where
    I: IntoIterator<Item = ChannelIndex>,
{
    for index in indices {
        if index >= n_channels {
            return Err(TimeSeriesError::config(format!(
                "channel {} in argument '{}' is not included in the data ({} channels)",
                index, argument, n_channels
            )));
        }
    }
    Ok(())
}

/// Mean of the non-`NaN` values, accumulated in `f64`.
pub fn nan_mean<I: IntoIterator<Item = Value>>(values: I) -> Option<Value> {
    let (sum, count) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0f64, 0usize), |(sum, count), v| (sum + f64::from(v), count + 1));

    if count == 0 {
        None
    } else {
        Some((sum / count as f64) as Value)
    }
}

/// Sample standard deviation (n - 1) of the non-`NaN` values.
pub fn nan_std<I: IntoIterator<Item = Value>>(values: I) -> Option<Value> {
    let observed: Vec<f64> = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .map(f64::from)
        .collect();

    if observed.len() < 2 {
        return None;
    }

    let mean = observed.iter().sum::<f64>() / observed.len() as f64;
    let var = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (observed.len() - 1) as f64;
    Some(var.sqrt() as Value)
}

/// Most frequent non-`NaN` value. Ties go to the smallest value.
pub fn nan_mode<I: IntoIterator<Item = Value>>(values: I) -> Option<Value> {
    // Adding zero folds -0.0 into 0.0.
    let mut observed: Vec<Value> = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .map(|v| v + 0.0)
        .collect();
    observed.sort_unstable_by(|a, b| a.total_cmp(b));

    let mut best: Option<(Value, usize)> = None;
    let mut start = 0;
    while start < observed.len() {
        let value = observed[start];
        let mut end = start + 1;
        while end < observed.len() && observed[end] == value {
            end += 1;
        }
        let count = end - start;
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
        start = end;
    }

    best.map(|(value, _)| value)
}
