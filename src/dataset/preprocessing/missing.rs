//! Missing value imputation for irregular-ts.
//!
//! The built-in strategies implement [`Imputer`]:
//!
//! - [`NoImputer`]: leaves missing values in place
//! - [`ZeroImputer`]: replaces missing values with zero
//! - [`MeanImputer`]: replaces missing values with the channel fill value
//! - [`ForwardImputer`]: carries the last observation forward
//!
//! [`FnImputer`] adapts a caller supplied function. Every imputer returns new
//! arrays; the series it receives is the pre-imputation state and mask/delta
//! channels are never passed in.

use crate::core::error::{Result, TimeSeriesError};
use crate::core::traits::Fitted;
use crate::core::types::{ChannelIndex, ImputeMethod, Value};
use crate::dataset::preprocessing::statistics::FillTable;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use std::fmt;

/// Imputation capability.
///
/// An imputer receives the pre-imputation series of one partition together
/// with its labels, the fill table fitted on the training partition and the
/// time series channels it may touch. It returns a new series and label
/// array; the inputs are never modified. Mask and delta channels are derived
/// before imputation and never pass through an imputer.
pub trait Imputer: Send + Sync + fmt::Debug {
    /// Impute missing values of `channels` in `series`.
    fn impute(
        &self,
        series: ArrayView3<'_, Value>,
        labels: ArrayView2<'_, Value>,
        fill: &FillTable,
        channels: &[ChannelIndex],
    ) -> Result<(Array3<Value>, Array2<Value>)>;

    /// Short name used in logs and summaries.
    fn name(&self) -> &str;

    /// Whether this imputer reads fill values. When true every channel of the
    /// fill table must be defined before any partition is imputed.
    fn needs_fill_table(&self) -> bool {
        true
    }
}

/// Leave missing values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImputer;

impl Imputer for NoImputer {
    fn impute(
        &self,
        series: ArrayView3<'_, Value>,
        labels: ArrayView2<'_, Value>,
        _fill: &FillTable,
        _channels: &[ChannelIndex],
    ) -> Result<(Array3<Value>, Array2<Value>)> {
        Ok((series.to_owned(), labels.to_owned()))
    }

    fn name(&self) -> &str {
        "none"
    }

    fn needs_fill_table(&self) -> bool {
        false
    }
}

/// Replace missing values with zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroImputer;

impl Imputer for ZeroImputer {
    fn impute(
        &self,
        series: ArrayView3<'_, Value>,
        labels: ArrayView2<'_, Value>,
        _fill: &FillTable,
        channels: &[ChannelIndex],
    ) -> Result<(Array3<Value>, Array2<Value>)> {
        let mut output = series.to_owned();
        for &c in channels {
            check_channel(c, &output)?;
            output
                .index_axis_mut(Axis(2), c)
                .mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
        }
        Ok((output, labels.to_owned()))
    }

    fn name(&self) -> &str {
        "zero"
    }

    fn needs_fill_table(&self) -> bool {
        false
    }
}

/// Replace missing values with the channel fill value (mean, or mode for
/// categorical channels).
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanImputer;

impl Imputer for MeanImputer {
    fn impute(
        &self,
        series: ArrayView3<'_, Value>,
        labels: ArrayView2<'_, Value>,
        fill: &FillTable,
        channels: &[ChannelIndex],
    ) -> Result<(Array3<Value>, Array2<Value>)> {
        fill.check_channels(series.len_of(Axis(2)))?;
        let mut output = series.to_owned();
        for &c in channels {
            check_channel(c, &output)?;
            let fill_value = fill.value(c)?;
            output
                .index_axis_mut(Axis(2), c)
                .mapv_inplace(|v| if v.is_nan() { fill_value } else { v });
        }
        Ok((output, labels.to_owned()))
    }

    fn name(&self) -> &str {
        "mean"
    }
}

/// Carry the most recent observation forward in time.
///
/// Missing entries before the first observation of a channel take the channel
/// fill value. Only past values are ever read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardImputer;

impl Imputer for ForwardImputer {
    fn impute(
        &self,
        series: ArrayView3<'_, Value>,
        labels: ArrayView2<'_, Value>,
        fill: &FillTable,
        channels: &[ChannelIndex],
    ) -> Result<(Array3<Value>, Array2<Value>)> {
        fill.check_channels(series.len_of(Axis(2)))?;
        let mut output = series.to_owned();
        for &c in channels {
            check_channel(c, &output)?;
            let fill_value = fill.value(c)?;
            for mut lane in output.index_axis_mut(Axis(2), c).outer_iter_mut() {
                let mut last = fill_value;
                for v in lane.iter_mut() {
                    if v.is_nan() {
                        *v = last;
                    } else {
                        last = *v;
                    }
                }
            }
        }
        Ok((output, labels.to_owned()))
    }

    fn name(&self) -> &str {
        "forward"
    }
}

type ImputeFn = dyn Fn(
        ArrayView3<'_, Value>,
        ArrayView2<'_, Value>,
        &FillTable,
        &[ChannelIndex],
    ) -> anyhow::Result<(Array3<Value>, Array2<Value>)>
    + Send
    + Sync;

/// Caller supplied imputation function.
///
/// The function receives the same arguments as [`Imputer::impute`] and may
/// also transform the labels. Its errors are reported as
/// [`TimeSeriesError::Imputation`]. Only the shape of the result is checked.
pub struct FnImputer {
    name: String,
    func: Box<ImputeFn>,
    needs_fill_table: bool,
}

impl FnImputer {
    /// Wrap `func` under `name`.
    pub fn new<S, F>(name: S, func: F) -> Self
    where
        S: Into<String>,
        F: Fn(
                ArrayView3<'_, Value>,
                ArrayView2<'_, Value>,
                &FillTable,
                &[ChannelIndex],
            ) -> anyhow::Result<(Array3<Value>, Array2<Value>)>
            + Send
            + Sync
            + 'static,
    {
        FnImputer {
            name: name.into(),
            func: Box::new(func),
            needs_fill_table: true,
        }
    }

    /// Declare that the function never reads the fill table, so channels
    /// without training observations are not an error.
    pub fn without_fill_table(mut self) -> Self {
        self.needs_fill_table = false;
        self
    }
}

impl fmt::Debug for FnImputer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnImputer")
            .field("name", &self.name)
            .field("needs_fill_table", &self.needs_fill_table)
            .finish()
    }
}

impl Imputer for FnImputer {
    fn impute(
        &self,
        series: ArrayView3<'_, Value>,
        labels: ArrayView2<'_, Value>,
        fill: &FillTable,
        channels: &[ChannelIndex],
    ) -> Result<(Array3<Value>, Array2<Value>)> {
        (self.func)(series, labels, fill, channels)
            .map_err(|e| TimeSeriesError::imputation(self.name.clone(), e))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn needs_fill_table(&self) -> bool {
        self.needs_fill_table
    }
}

/// Built-in imputer for `method`.
pub fn imputer_for(method: ImputeMethod) -> Box<dyn Imputer> {
    match method {
        ImputeMethod::None => Box::new(NoImputer),
        ImputeMethod::Zero => Box::new(ZeroImputer),
        ImputeMethod::Mean => Box::new(MeanImputer),
        ImputeMethod::Forward => Box::new(ForwardImputer),
    }
}

fn check_channel(channel: ChannelIndex, series: &Array3<Value>) -> Result<()> {
    let n_channels = series.len_of(Axis(2));
    if channel >= n_channels {
        return Err(TimeSeriesError::index_out_of_bounds(channel, n_channels));
    }
    Ok(())
}
