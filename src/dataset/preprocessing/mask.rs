//! Observation mask and time delta derivation.

use crate::core::error::{Result, TimeSeriesError};
use crate::core::types::Value;
use ndarray::{Array3, ArrayView2, ArrayView3, Axis};

/// Mask of observed entries: `1.0` where `series` holds a value, `0.0` where
/// it holds `NaN`.
pub fn missing_mask(series: ArrayView3<'_, Value>) -> Array3<Value> {
    series.mapv(|v| if v.is_nan() { 0.0 } else { 1.0 })
}

/// Fail unless every row of `times` is finite and non-decreasing.
pub fn check_time_stamps(times: ArrayView2<'_, Value>) -> Result<()> {
    for (i, row) in times.outer_iter().enumerate() {
        let mut previous = Value::NEG_INFINITY;
        for (j, &now) in row.iter().enumerate() {
            if !now.is_finite() {
                return Err(TimeSeriesError::config(format!(
                    "time stamp {} of sequence {} is not finite",
                    j, i
                )));
            }
            if now < previous {
                return Err(TimeSeriesError::config(format!(
                    "time stamps of sequence {} decrease at step {} ({} after {})",
                    i, j, now, previous
                )));
            }
            previous = now;
        }
    }
    Ok(())
}

/// Time elapsed since the last observation of each channel.
///
/// `delta[n, 0, c]` is zero. For later steps the elapsed time
/// `times[n, t] - times[n, t - 1]` is taken as is when the current entry is
/// observed and added to the previous delta when it is missing. Channels are
/// independent. Time stamps must pass [`check_time_stamps`].
pub fn time_delta(
    mask: ArrayView3<'_, Value>,
    times: ArrayView2<'_, Value>,
) -> Result<Array3<Value>> {
    let (n, t, _) = mask.dim();
    if times.dim() != (n, t) {
        return Err(TimeSeriesError::shape(
            format!("time stamps of shape ({}, {})", n, t),
            format!("{:?}", times.shape()),
        ));
    }
    check_time_stamps(times)?;

    let mut delta = Array3::<Value>::zeros(mask.raw_dim());
    let sequences = delta
        .outer_iter_mut()
        .zip(mask.outer_iter())
        .zip(times.outer_iter());

    for ((mut seq_delta, seq_mask), seq_times) in sequences {
        for step in 1..t {
            let elapsed = seq_times[step] - seq_times[step - 1];
            for c in 0..seq_mask.len_of(Axis(1)) {
                let value = if seq_mask[[step, c]] > 0.0 {
                    elapsed
                } else {
                    elapsed + seq_delta[[step - 1, c]]
                };
                seq_delta[[step, c]] = value;
            }
        }
    }

    Ok(delta)
}
