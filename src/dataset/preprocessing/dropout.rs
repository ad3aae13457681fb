//! Missing data simulation.
//!
//! Every entry of a fully observed array is independently replaced with
//! `NaN` with the probability configured for its channel. The random stream
//! is seeded, so the same seed always deletes the same entries.

use crate::config::MissingRate;
use crate::core::constants::MISSING_VALUE;
use crate::core::error::Result;
use crate::core::types::Value;
use ndarray::{Array3, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Simulate missing data in `series`.
///
/// Entries are visited in `(sequence, timestep, channel)` order with one
/// uniform draw each; an entry is dropped iff the draw is below its channel
/// probability. Entries that are already missing stay missing. A new array is
/// returned.
pub fn simulate_missing(
    series: ArrayView3<'_, Value>,
    rate: &MissingRate,
    seed: Option<u64>,
) -> Result<Array3<Value>> {
    let n_channels = series.len_of(Axis(2));
    let probs = rate.per_channel(n_channels)?;

    for (channel, &p) in probs.iter().enumerate() {
        if p >= 1.0 {
            log::warn!(
                "Channel {} has missing probability 1, every observation will be dropped",
                channel
            );
        }
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut output = series.to_owned();
    let mut dropped = 0usize;
    for mut row in output.rows_mut() {
        for (value, &p) in row.iter_mut().zip(probs.iter()) {
            let u: f32 = rng.gen();
            if u < p {
                if !value.is_nan() {
                    dropped += 1;
                }
                *value = MISSING_VALUE;
            }
        }
    }

    log::debug!(
        "Dropped {} of {} observations (rate {}, seed {:?})",
        dropped,
        output.len(),
        rate,
        seed
    );
    Ok(output)
}
