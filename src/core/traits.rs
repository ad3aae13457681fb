//! Core trait definitions for irregular-ts.

use crate::core::error::{Result, TimeSeriesError};

/// Components whose fitted state can be checked before use.
pub trait Fitted {
    /// Number of channels the state was fitted on.
    fn n_channels(&self) -> usize;

    /// Fail unless the state covers exactly `n_channels` channels.
    fn check_channels(&self, n_channels: usize) -> Result<()> {
        if self.n_channels() != n_channels {
            return Err(TimeSeriesError::shape(
                format!("{} channels", self.n_channels()),
                format!("{} channels", n_channels),
            ));
        }
        Ok(())
    }
}
