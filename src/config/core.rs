//! Pipeline configuration structure and builder.
//!
//! [`PipelineConfig`] carries every recognised option of the pipeline:
//! missing data simulation, which extra channels to append, the imputation
//! method, categorical channels and fill value overrides. It can be built in
//! code with [`ConfigBuilder`], read from a `.toml`/`.json` file or taken from
//! `IRREGULAR_TS_*` environment variables.

use crate::config::missing::MissingRate;
use crate::core::constants::*;
use crate::core::error::{Result, TimeSeriesError};
use crate::core::types::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure for the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Probability of dropping observations (None disables simulation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<MissingRate>,
    /// Random seed for missing data simulation (None draws from entropy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Prepend the time stamp channel
    pub time: bool,
    /// Append one missing data mask channel per series channel
    pub mask: bool,
    /// Append one time delta channel per series channel
    pub delta: bool,
    /// Built-in imputation method
    pub impute: ImputeMethod,
    /// Channels whose fill value is the mode instead of the mean
    pub categorical: Vec<ChannelIndex>,
    /// Standardisation of the assembled output
    pub standardise: Standardise,
    /// Fill values that replace the computed mean/mode for given channels
    #[serde(rename = "override", skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<ChannelIndex, Value>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            missing: None,
            seed: None,
            time: DEFAULT_INCLUDE_TIME,
            mask: false,
            delta: false,
            impute: ImputeMethod::None,
            categorical: Vec::new(),
            standardise: Standardise::None,
            overrides: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the parameters that do not depend on the data.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref missing) = self.missing {
            missing.validate()?;
        }

        for (&channel, &value) in &self.overrides {
            if !value.is_finite() {
                return Err(TimeSeriesError::invalid_parameter(
                    format!("override[{}]", channel),
                    value.to_string(),
                    "must be a finite value",
                ));
            }
        }

        Ok(())
    }

    /// Validate against data with `n_channels` time series channels.
    pub fn validate_for_channels(&self, n_channels: usize) -> Result<()> {
        self.validate()?;

        if let Some(ref missing) = self.missing {
            missing.validate_for_channels(n_channels)?;
        }

        if let Some(&channel) = self.categorical.iter().find(|&&c| c >= n_channels) {
            return Err(TimeSeriesError::config(format!(
                "channel {} in argument 'categorical' is not included in the data ({} channels)",
                channel, n_channels
            )));
        }

        if let Some(&channel) = self.overrides.keys().find(|&&c| c >= n_channels) {
            return Err(TimeSeriesError::config(format!(
                "channel {} in argument 'override' is not included in the data ({} channels)",
                channel, n_channels
            )));
        }

        Ok(())
    }

    /// Whether missing data simulation will drop anything.
    pub fn simulates_missing(&self) -> bool {
        self.missing.as_ref().map_or(false, MissingRate::is_active)
    }

    /// Channel layout of the assembled output.
    pub fn layout(&self, n_channels: usize) -> ChannelLayout {
        ChannelLayout::new(n_channels, self.time, self.mask, self.delta)
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: PipelineConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(TimeSeriesError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        log::debug!("Loaded pipeline configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a `.toml` or `.json` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)?,
            Some("toml") => toml::to_string_pretty(self).map_err(|e| {
                TimeSeriesError::config(format!("Failed to serialize to TOML: {}", e))
            })?,
            _ => {
                return Err(TimeSeriesError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn load_from_environment() -> Result<Self> {
        let mut config = PipelineConfig::default();
        config.apply_environment_overrides()?;
        Ok(config)
    }

    /// Overwrite fields for which an `IRREGULAR_TS_*` variable is set.
    ///
    /// Recognised: `SEED`, `MISSING` (one probability or a comma separated
    /// list), `IMPUTE`, `STANDARDISE`, `TIME`, `MASK`, `DELTA`.
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_var("SEED") {
            self.seed = Some(
                val.parse()
                    .map_err(|_| TimeSeriesError::config(format!("Invalid {}SEED", ENV_PREFIX)))?,
            );
        }

        if let Some(val) = env_var("MISSING") {
            self.missing = Some(parse_missing(&val)?);
        }

        if let Some(val) = env_var("IMPUTE") {
            self.impute = val.parse()?;
        }

        if let Some(val) = env_var("STANDARDISE") {
            self.standardise = val.parse()?;
        }

        if let Some(val) = env_var("TIME") {
            self.time = parse_flag("TIME", &val)?;
        }
        if let Some(val) = env_var("MASK") {
            self.mask = parse_flag("MASK", &val)?;
        }
        if let Some(val) = env_var("DELTA") {
            self.delta = parse_flag("DELTA", &val)?;
        }

        self.validate()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, name)).ok()
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(TimeSeriesError::config(format!(
            "Invalid {}{}: '{}'",
            ENV_PREFIX, name, value
        ))),
    }
}

fn parse_missing(value: &str) -> Result<MissingRate> {
    let parsed: std::result::Result<Vec<f32>, _> =
        value.split(',').map(|s| s.trim().parse::<f32>()).collect();
    let probs =
        parsed.map_err(|_| TimeSeriesError::config(format!("Invalid {}MISSING", ENV_PREFIX)))?;

    let rate = if value.contains(',') {
        MissingRate::PerChannel(probs)
    } else {
        MissingRate::Global(probs[0])
    };
    rate.validate()?;
    Ok(rate)
}

/// Builder for [`PipelineConfig`]
#[derive(Debug)]
pub struct ConfigBuilder {
    config: PipelineConfig,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: PipelineConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Drop every observation with probability `p`
    pub fn missing(self, p: f32) -> Self {
        self.missing_rate(MissingRate::Global(p))
    }

    /// Drop observations with one probability per channel
    pub fn missing_per_channel(self, probs: Vec<f32>) -> Self {
        self.missing_rate(MissingRate::PerChannel(probs))
    }

    /// Simulate missing data with the given rate
    pub fn missing_rate(mut self, missing: MissingRate) -> Self {
        if let Err(e) = missing.validate() {
            self.validation_errors.push(e.to_string());
        }
        self.config.missing = Some(missing);
        self
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Include or omit the time stamp channel
    pub fn time(mut self, time: bool) -> Self {
        self.config.time = time;
        self
    }

    /// Include or omit the mask channels
    pub fn mask(mut self, mask: bool) -> Self {
        self.config.mask = mask;
        self
    }

    /// Include or omit the time delta channels
    pub fn delta(mut self, delta: bool) -> Self {
        self.config.delta = delta;
        self
    }

    /// Set the imputation method
    pub fn impute(mut self, impute: ImputeMethod) -> Self {
        self.config.impute = impute;
        self
    }

    /// Set the imputation method by name
    pub fn impute_name(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(method) => self.config.impute = method,
            Err(e) => self.validation_errors.push(e.to_string()),
        }
        self
    }

    /// Mark channels as categorical
    pub fn categorical(mut self, channels: Vec<ChannelIndex>) -> Self {
        self.config.categorical = channels;
        self
    }

    /// Override the fill value of one channel
    pub fn override_fill(mut self, channel: ChannelIndex, value: Value) -> Self {
        if !value.is_finite() {
            self.validation_errors
                .push(format!("override for channel {} must be finite", channel));
        }
        self.config.overrides.insert(channel, value);
        self
    }

    /// Set the standardisation mode
    pub fn standardise(mut self, standardise: Standardise) -> Self {
        self.config.standardise = standardise;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<PipelineConfig> {
        if !self.validation_errors.is_empty() {
            return Err(TimeSeriesError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Proportions for the optional random train/validation/test split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Proportion of sequences in the training split, in `(0, 1)`
    pub train_prop: f64,
    /// Proportion in the validation split. None means all remaining
    /// sequences and no test split.
    pub val_prop: Option<f64>,
    /// Seed for the shuffle
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            train_prop: DEFAULT_TRAIN_PROP,
            val_prop: None,
            seed: None,
        }
    }
}

impl SplitConfig {
    /// Create a split with the given training proportion
    pub fn new(train_prop: f64) -> Self {
        SplitConfig {
            train_prop,
            ..Self::default()
        }
    }

    /// Set the validation proportion (the remainder becomes the test split)
    pub fn with_val_prop(mut self, val_prop: f64) -> Self {
        self.val_prop = Some(val_prop);
        self
    }

    /// Set the shuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and return `(train, val, test)` proportions.
    pub fn proportions(&self) -> Result<(f64, f64, f64)> {
        if !(self.train_prop > EPSILON && self.train_prop < 1.0) {
            return Err(TimeSeriesError::config(
                "argument 'train_prop' must be in range (0, 1)",
            ));
        }

        match self.val_prop {
            None => Ok((self.train_prop, 1.0 - self.train_prop, 0.0)),
            Some(val) => {
                let remaining = 1.0 - self.train_prop;
                if !(val > EPSILON && val < remaining) {
                    return Err(TimeSeriesError::config(format!(
                        "argument 'val_prop' must be in range (0, {})",
                        remaining
                    )));
                }
                Ok((self.train_prop, val, remaining - val))
            }
        }
    }
}
