//! Standardisation of assembled arrays with training split statistics.

use crate::core::constants::STANDARDISE_EPSILON;
use crate::core::error::{Result, TimeSeriesError};
use crate::core::types::{ChannelIndex, ChannelLayout, Standardise, Value};
use crate::dataset::preprocessing::statistics::{nan_mean, nan_std};
use ndarray::{Array3, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

/// Fitted z-score transform over selected output channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardiser {
    /// Output channel positions that are transformed
    channels: Vec<usize>,
    means: Vec<Value>,
    stds: Vec<Value>,
}

impl Standardiser {
    /// Fit on the assembled training array.
    ///
    /// `Data` selects the continuous time series channels, `All` adds the
    /// time stamp and delta channels. Categorical and mask channels are never
    /// selected. Missing entries are ignored; a selected channel needs at least
    /// two observed training values.
    pub fn fit(
        train: ArrayView3<'_, Value>,
        layout: &ChannelLayout,
        mode: Standardise,
        categorical: &[ChannelIndex],
    ) -> Result<Self> {
        let channels = select_channels(layout, mode, categorical);

        let mut means = Vec::with_capacity(channels.len());
        let mut stds = Vec::with_capacity(channels.len());
        for &position in &channels {
            let lane = train.index_axis(Axis(2), position);
            let mean = nan_mean(lane.iter().copied());
            let std = nan_std(lane.iter().copied());
            let (mean, std) = match (mean, std) {
                (Some(mean), Some(std)) => (mean, std),
                _ => {
                    return Err(TimeSeriesError::statistics(
                        position,
                        "standardisation needs at least two observed training values",
                    ))
                }
            };
            means.push(mean);
            stds.push(std);
        }

        log::debug!("Standardising output channels {:?}", channels);
        Ok(Standardiser {
            channels,
            means,
            stds,
        })
    }

    /// Apply `(x - mean) / (std + epsilon)` to the fitted channels.
    pub fn transform(&self, x: ArrayView3<'_, Value>) -> Array3<Value> {
        let mut output = x.to_owned();
        for ((&position, &mean), &std) in self.channels.iter().zip(&self.means).zip(&self.stds) {
            let scale = std + STANDARDISE_EPSILON;
            output
                .index_axis_mut(Axis(2), position)
                .mapv_inplace(|v| (v - mean) / scale);
        }
        output
    }

    /// Output channel positions that are transformed.
    pub fn channels(&self) -> &[usize] {
        &self.channels
    }

    pub fn means(&self) -> &[Value] {
        &self.means
    }

    pub fn stds(&self) -> &[Value] {
        &self.stds
    }
}

fn select_channels(
    layout: &ChannelLayout,
    mode: Standardise,
    categorical: &[ChannelIndex],
) -> Vec<usize> {
    let data = layout
        .data
        .clone()
        .filter(|position| !categorical.contains(&(position - layout.data.start)));

    match mode {
        Standardise::None => Vec::new(),
        Standardise::Data => data.collect(),
        Standardise::All => layout
            .time
            .clone()
            .chain(data)
            .chain(layout.delta.clone())
            .collect(),
    }
}
