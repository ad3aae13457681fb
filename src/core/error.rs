//! Error handling and error types for irregular-ts.
//!
//! Every failure in the pipeline is deterministic: the same inputs fail the
//! same way on every call. Errors are therefore surfaced to the caller as soon
//! as they are detected and are never recovered silently (an undefined channel
//! mean quietly replaced with zero would corrupt training data).

use std::io;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum TimeSeriesError {
    /// Malformed configuration: bad missing-data probabilities, unknown
    /// imputation method, channel indices outside the data, bad split sizes.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A channel fill value could not be computed from the training split.
    #[error("Statistics error for channel {channel}: {message}")]
    Statistics { channel: usize, message: String },

    /// Arrays whose shapes do not line up.
    #[error("Shape error: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Out of bounds access
    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// A caller-supplied imputation function failed.
    #[error("Imputation '{imputer}' failed: {source}")]
    Imputation {
        imputer: String,
        #[source]
        source: anyhow::Error,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using TimeSeriesError
pub type Result<T> = std::result::Result<T, TimeSeriesError>;

impl TimeSeriesError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        TimeSeriesError::Config {
            message: message.into(),
        }
    }

    /// Create a statistics error for a channel
    pub fn statistics<S: Into<String>>(channel: usize, message: S) -> Self {
        TimeSeriesError::Statistics {
            channel,
            message: message.into(),
        }
    }

    /// Create a shape error
    pub fn shape<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        TimeSeriesError::Shape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        TimeSeriesError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an index out of bounds error
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        TimeSeriesError::IndexOutOfBounds { index, length }
    }

    /// Wrap the failure of a custom imputation function
    pub fn imputation<S: Into<String>>(imputer: S, source: anyhow::Error) -> Self {
        TimeSeriesError::Imputation {
            imputer: imputer.into(),
            source,
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        TimeSeriesError::Internal {
            message: message.into(),
        }
    }

    /// True for the configuration family of errors.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            TimeSeriesError::Config { .. }
                | TimeSeriesError::InvalidParameter { .. }
                | TimeSeriesError::IndexOutOfBounds { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TimeSeriesError::Config { .. } => "config",
            TimeSeriesError::Statistics { .. } => "statistics",
            TimeSeriesError::Shape { .. } => "shape",
            TimeSeriesError::InvalidParameter { .. } => "invalid_parameter",
            TimeSeriesError::IndexOutOfBounds { .. } => "index_out_of_bounds",
            TimeSeriesError::Imputation { .. } => "imputation",
            TimeSeriesError::IO { .. } => "io",
            TimeSeriesError::Json { .. } => "json",
            TimeSeriesError::Toml { .. } => "toml",
            TimeSeriesError::Internal { .. } => "internal",
        }
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::TimeSeriesError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::TimeSeriesError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = TimeSeriesError::config("test configuration error");
        assert_eq!(err.category(), "config");
        assert!(err.is_config());

        let err = TimeSeriesError::statistics(3, "no observed values");
        assert_eq!(err.category(), "statistics");
        assert!(!err.is_config());
    }

    #[test]
    fn test_error_macros() {
        let err = config_error!("test error");
        assert!(matches!(err, TimeSeriesError::Config { .. }));

        let err = config_error!("channel {} out of range", 42);
        assert!(err.to_string().contains("channel 42 out of range"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(value: f32) -> Result<()> {
            ensure!(value >= 0.0, TimeSeriesError::config("negative"));
            Ok(())
        }
        assert!(check(1.0).is_ok());
        assert!(check(-1.0).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = TimeSeriesError::shape("(2, 5, 3)", "(2, 4, 3)");
        let error_string = format!("{}", err);
        assert!(error_string.contains("Shape error"));
        assert!(error_string.contains("(2, 5, 3)"));

        let err = TimeSeriesError::statistics(1, "all values missing");
        assert!(err.to_string().contains("channel 1"));
    }

    #[test]
    fn test_imputation_error_keeps_source() {
        let err = TimeSeriesError::imputation("median", anyhow::anyhow!("boom"));
        assert_eq!(err.category(), "imputation");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: TimeSeriesError = io_err.into();
        assert!(matches!(err, TimeSeriesError::IO { .. }));
        assert_eq!(err.category(), "io");
    }
}
