//! Missing data simulation settings.

use crate::core::constants::EPSILON;
use crate::core::error::{Result, TimeSeriesError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability of dropping each observation.
///
/// In TOML/JSON a bare number is a [`MissingRate::Global`] and a list is a
/// [`MissingRate::PerChannel`], e.g. `missing = [0.8, 0.2, 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissingRate {
    /// Same probability for every channel
    Global(f32),
    /// One probability per time series channel
    PerChannel(Vec<f32>),
}

impl MissingRate {
    /// Check every probability lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match self {
            MissingRate::Global(p) => check_probability("missing", *p),
            MissingRate::PerChannel(probs) => {
                for (i, &p) in probs.iter().enumerate() {
                    check_probability(&format!("missing[{}]", i), p)?;
                }
                Ok(())
            }
        }
    }

    /// Check the rate against the number of channels in the data.
    pub fn validate_for_channels(&self, n_channels: usize) -> Result<()> {
        self.validate()?;
        if let MissingRate::PerChannel(probs) = self {
            if probs.len() != n_channels {
                return Err(TimeSeriesError::config(format!(
                    "argument 'missing' has {} probabilities but the data has {} channels",
                    probs.len(),
                    n_channels
                )));
            }
        }
        Ok(())
    }

    /// Probability for every channel.
    pub fn per_channel(&self, n_channels: usize) -> Result<Vec<f32>> {
        self.validate_for_channels(n_channels)?;
        Ok(match self {
            MissingRate::Global(p) => vec![*p; n_channels],
            MissingRate::PerChannel(probs) => probs.clone(),
        })
    }

    /// Whether any observation can be dropped at all.
    pub fn is_active(&self) -> bool {
        match self {
            MissingRate::Global(p) => f64::from(*p) > EPSILON,
            MissingRate::PerChannel(probs) => probs.iter().any(|&p| f64::from(p) > EPSILON),
        }
    }
}

impl From<f32> for MissingRate {
    fn from(p: f32) -> Self {
        MissingRate::Global(p)
    }
}

impl From<Vec<f32>> for MissingRate {
    fn from(probs: Vec<f32>) -> Self {
        MissingRate::PerChannel(probs)
    }
}

impl fmt::Display for MissingRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingRate::Global(p) => write!(f, "{}", p),
            MissingRate::PerChannel(probs) => write!(f, "{:?}", probs),
        }
    }
}

fn check_probability(parameter: &str, p: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(TimeSeriesError::invalid_parameter(
            parameter,
            p.to_string(),
            "must be in range [0.0, 1.0]",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_rate_expands_to_every_channel() {
        let rate = MissingRate::Global(0.25);
        assert_eq!(rate.per_channel(3).unwrap(), vec![0.25, 0.25, 0.25]);
        assert!(rate.is_active());
    }

    #[test]
    fn test_per_channel_length_is_checked() {
        let rate = MissingRate::PerChannel(vec![0.8, 0.2]);
        assert!(rate.validate().is_ok());
        let err = rate.validate_for_channels(3).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_out_of_range_probability() {
        assert!(MissingRate::Global(1.5).validate().is_err());
        assert!(MissingRate::Global(-0.1).validate().is_err());
        assert!(MissingRate::Global(f32::NAN).validate().is_err());
        assert!(MissingRate::PerChannel(vec![0.1, 1.01]).validate().is_err());
        assert!(MissingRate::Global(1.0).validate().is_ok());
        assert!(MissingRate::Global(0.0).validate().is_ok());
    }

    #[test]
    fn test_zero_rate_is_inactive() {
        assert!(!MissingRate::Global(0.0).is_active());
        assert!(!MissingRate::PerChannel(vec![0.0, 0.0]).is_active());
        assert!(MissingRate::PerChannel(vec![0.0, 0.3]).is_active());
    }

    #[test]
    fn test_untagged_serde() {
        let global: MissingRate = serde_json::from_str("0.5").unwrap();
        assert_eq!(global, MissingRate::Global(0.5));
        let per: MissingRate = serde_json::from_str("[0.8, 0.2, 0.5]").unwrap();
        assert_eq!(per, MissingRate::PerChannel(vec![0.8, 0.2, 0.5]));
    }
}
