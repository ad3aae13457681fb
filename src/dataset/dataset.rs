//! Time series dataset owning the transformed partitions.
//!
//! [`TimeSeriesDataset`] runs the whole pipeline once at construction:
//!
//! 1. validate inputs and configuration
//! 2. simulate missing data over every sequence
//! 3. derive mask and time delta channels from the result
//! 4. partition sequences into train/validation/test
//! 5. fit the fill table on the training partition
//! 6. impute every partition with that fill table
//! 7. assemble the output channels
//! 8. standardise with training statistics, if requested
//!
//! The fill table and the assembled partitions never change afterwards.

use crate::config::{PipelineConfig, SplitConfig};
use crate::core::error::{Result, TimeSeriesError};
use crate::core::types::*;
use crate::dataset::assembly::{assemble, AssemblyOptions};
use crate::dataset::partition::{select, Partitions};
use crate::dataset::preprocessing::{
    check_time_stamps, imputer_for, missing_mask, simulate_missing, time_delta, FillTable,
    Imputer, Standardiser,
};
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use std::fmt;

/// Assembled arrays of one partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionData {
    /// Assembled series `(sequences, timesteps, output channels)`
    pub x: Array3<Value>,
    /// Labels, possibly transformed by a custom imputer
    pub y: Array2<Value>,
    /// Positions of these sequences in the input arrays
    pub indices: Vec<usize>,
}

impl PartitionData {
    fn empty(timesteps: usize, channels: usize, labels: usize) -> Self {
        PartitionData {
            x: Array3::zeros((0, timesteps, channels)),
            y: Array2::zeros((0, labels)),
            indices: Vec::new(),
        }
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Transformed time series dataset.
#[derive(Debug)]
pub struct TimeSeriesDataset {
    name: String,
    config: PipelineConfig,
    imputer: Box<dyn Imputer>,
    fill_table: FillTable,
    standardiser: Option<Standardiser>,
    layout: ChannelLayout,
    // Splits without sequences hold empty arrays.
    train: PartitionData,
    val: PartitionData,
    test: PartitionData,
    split: Split,
}

impl TimeSeriesDataset {
    /// Create a dataset builder
    pub fn builder() -> TimeSeriesDatasetBuilder {
        TimeSeriesDatasetBuilder::new()
    }

    /// Assembled series of the selected split.
    pub fn x(&self) -> ArrayView3<'_, Value> {
        self.selected().x.view()
    }

    /// Labels of the selected split.
    pub fn y(&self) -> ArrayView2<'_, Value> {
        self.selected().y.view()
    }

    /// Training partition.
    pub fn train(&self) -> &PartitionData {
        &self.train
    }

    /// Validation partition.
    pub fn val(&self) -> Result<&PartitionData> {
        self.partition(Split::Val)
    }

    /// Test partition.
    pub fn test(&self) -> Result<&PartitionData> {
        self.partition(Split::Test)
    }

    /// Any partition. A partition without sequences is a configuration error.
    pub fn partition(&self, split: Split) -> Result<&PartitionData> {
        let data = self.data(split);
        if data.is_empty() {
            return Err(TimeSeriesError::config(format!(
                "the {} split has no sequences",
                split
            )));
        }
        Ok(data)
    }

    /// Split returned by [`x`](Self::x) and [`y`](Self::y).
    pub fn split(&self) -> Split {
        self.split
    }

    /// Fill table fitted on the training partition.
    pub fn fill_table(&self) -> &FillTable {
        &self.fill_table
    }

    /// Standardisation fitted on the training partition, if requested.
    pub fn standardiser(&self) -> Option<&Standardiser> {
        self.standardiser.as_ref()
    }

    /// Channel positions of the assembled arrays.
    pub fn layout(&self) -> &ChannelLayout {
        &self.layout
    }

    /// Number of output channels.
    pub fn n_channels(&self) -> usize {
        self.layout.total()
    }

    /// Number of sequences in the selected split.
    pub fn len(&self) -> usize {
        self.selected().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected().is_empty()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn imputer(&self) -> &dyn Imputer {
        self.imputer.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn data(&self, split: Split) -> &PartitionData {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    fn selected(&self) -> &PartitionData {
        self.data(self.split)
    }

    fn split_sizes(&self) -> (usize, usize, usize) {
        (self.train.len(), self.val.len(), self.test.len())
    }
}

impl fmt::Display for TimeSeriesDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (train, val, test) = self.split_sizes();
        let total = (train + val + test) as f64;
        let seed = self
            .config
            .seed
            .map_or_else(|| "none".to_string(), |s| s.to_string());

        writeln!(f, "TimeSeriesDataset: {}", self.name)?;
        writeln!(
            f,
            " - data split = {:.0}/{:.0}/{:.0}% (training/validation/test)",
            100.0 * train as f64 / total,
            100.0 * val as f64 / total,
            100.0 * test as f64 / total
        )?;
        writeln!(
            f,
            " - time/mask/delta channels = {}/{}/{}",
            self.config.time, self.config.mask, self.config.delta
        )?;
        writeln!(f, " - random seed = {}", seed)?;
        writeln!(f, " - imputation = {}", self.imputer.name())?;
        writeln!(f, " - categorical channels = {:?}", self.fill_table.categorical())?;
        writeln!(f, " - standardise = {}", self.config.standardise)?;
        write!(f, " - x, y return the {} split", self.split)
    }
}

/// Builder for [`TimeSeriesDataset`]
#[derive(Debug, Default)]
pub struct TimeSeriesDatasetBuilder {
    name: Option<String>,
    series: Option<Array3<Value>>,
    timestamps: Option<Array2<Value>>,
    labels: Option<Array2<Value>>,
    partitions: Option<Partitions>,
    markers: Option<Vec<Split>>,
    random_split: Option<SplitConfig>,
    config: PipelineConfig,
    imputer: Option<Box<dyn Imputer>>,
    split: Split,
}

impl TimeSeriesDatasetBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Dataset name shown in the summary
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Fully observed (or genuinely incomplete) series `(N, T, C)`
    pub fn series(mut self, series: Array3<Value>) -> Self {
        self.series = Some(series);
        self
    }

    /// Time stamps `(N, T)`. Defaults to `0, 1, ..., T - 1` for every sequence.
    pub fn timestamps(mut self, timestamps: Array2<Value>) -> Self {
        self.timestamps = Some(timestamps);
        self
    }

    /// Labels `(N, L)`. Defaults to an empty `(N, 0)` array.
    pub fn labels(mut self, labels: Array2<Value>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Explicit partitions. Defaults to every sequence in the training split.
    pub fn partitions(mut self, partitions: Partitions) -> Self {
        self.partitions = Some(partitions);
        self
    }

    /// Explicit partition markers, one per sequence
    pub fn markers(mut self, markers: Vec<Split>) -> Self {
        self.markers = Some(markers);
        self
    }

    /// Random stratified partitioning of the sequences
    pub fn random_split(mut self, split: SplitConfig) -> Self {
        self.random_split = Some(split);
        self
    }

    /// Pipeline configuration
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Custom imputer; takes precedence over `config.impute`
    pub fn imputer(mut self, imputer: Box<dyn Imputer>) -> Self {
        self.imputer = Some(imputer);
        self
    }

    /// Split returned by `x()` and `y()`
    pub fn split(mut self, split: Split) -> Self {
        self.split = split;
        self
    }

    /// Run the pipeline and build the dataset
    pub fn build(self) -> Result<TimeSeriesDataset> {
        let series = self
            .series
            .ok_or_else(|| TimeSeriesError::config("argument 'series' is required"))?;
        let (n, t, c) = series.dim();
        if n == 0 || t == 0 || c == 0 {
            return Err(TimeSeriesError::shape(
                "a non-empty (sequences, timesteps, channels) array",
                format!("{:?}", series.shape()),
            ));
        }

        let timestamps = match self.timestamps {
            Some(times) => {
                if times.dim() != (n, t) {
                    return Err(TimeSeriesError::shape(
                        format!("time stamps of shape ({}, {})", n, t),
                        format!("{:?}", times.shape()),
                    ));
                }
                check_time_stamps(times.view())?;
                times
            }
            None => Array2::from_shape_fn((n, t), |(_, j)| j as Value),
        };

        let labels = self.labels.unwrap_or_else(|| Array2::zeros((n, 0)));
        if labels.nrows() != n {
            return Err(TimeSeriesError::shape(
                format!("labels with {} rows", n),
                format!("{:?}", labels.shape()),
            ));
        }

        let config = self.config;
        config.validate_for_channels(c)?;

        let partitions = match (self.partitions, self.markers, self.random_split) {
            (Some(partitions), _, _) => partitions,
            (None, Some(markers), _) => Partitions::from_markers(&markers)?,
            (None, None, Some(split)) => Partitions::random(labels.view(), &split)?,
            (None, None, None) => Partitions::from_markers(&vec![Split::Train; n])?,
        };
        partitions.validate(n)?;
        if partitions.indices(self.split).is_empty() {
            return Err(TimeSeriesError::config(format!(
                "the {} split has no sequences",
                self.split
            )));
        }

        let imputer = self.imputer.unwrap_or_else(|| imputer_for(config.impute));

        log::info!(
            "Building dataset: {} sequences, {} timesteps, {} channels, imputation '{}'",
            n,
            t,
            c,
            imputer.name()
        );

        // Missing data simulation runs before partitioning.
        let series = match config.missing {
            Some(ref rate) if rate.is_active() => {
                simulate_missing(series.view(), rate, config.seed)?
            }
            _ => series,
        };

        let mask = missing_mask(series.view());
        let delta = if config.delta {
            Some(time_delta(mask.view(), timestamps.view())?)
        } else {
            None
        };
        log::debug!(
            "{} of {} entries missing after simulation",
            mask.iter().filter(|&&m| m == 0.0).count(),
            mask.len()
        );

        let train_raw = select(series.view(), partitions.indices(Split::Train));
        let fill_table = FillTable::fit(train_raw.view(), &config.categorical, &config.overrides)?;
        if imputer.needs_fill_table() {
            fill_table.require_all()?;
        }

        let channels: Vec<ChannelIndex> = (0..c).collect();
        let options = AssemblyOptions {
            time: config.time,
            mask: config.mask,
            delta: config.delta,
        };

        let build_partition = |indices: &[usize]| -> Result<PartitionData> {
            let x_raw = select(series.view(), indices);
            let y_raw = select(labels.view(), indices);
            let (x_imputed, y_imputed) =
                imputer.impute(x_raw.view(), y_raw.view(), &fill_table, &channels)?;

            if x_imputed.dim() != x_raw.dim() {
                return Err(TimeSeriesError::shape(
                    format!("imputed series of shape {:?}", x_raw.shape()),
                    format!("{:?}", x_imputed.shape()),
                ));
            }
            if y_imputed.nrows() != indices.len() {
                return Err(TimeSeriesError::shape(
                    format!("imputed labels with {} rows", indices.len()),
                    format!("{:?}", y_imputed.shape()),
                ));
            }

            let times = select(timestamps.view(), indices);
            let mask_part = options.mask.then(|| select(mask.view(), indices));
            let delta_part = delta.as_ref().map(|d| select(d.view(), indices));
            let (x, _) = assemble(
                times.view(),
                x_imputed.view(),
                mask_part.as_ref().map(|m| m.view()),
                delta_part.as_ref().map(|d| d.view()),
                options,
            )?;

            Ok(PartitionData {
                x,
                y: y_imputed,
                indices: indices.to_vec(),
            })
        };

        let layout = config.layout(c);
        let build_or_empty = |split: Split| -> Result<PartitionData> {
            match partitions.indices(split) {
                [] => Ok(PartitionData::empty(t, layout.total(), labels.ncols())),
                indices => build_partition(indices),
            }
        };

        let mut train = build_or_empty(Split::Train)?;
        let mut val = build_or_empty(Split::Val)?;
        let mut test = build_or_empty(Split::Test)?;

        debug_assert_eq!(train.x.len_of(Axis(2)), layout.total());

        let standardiser = if config.standardise != Standardise::None {
            let standardiser = Standardiser::fit(
                train.x.view(),
                &layout,
                config.standardise,
                fill_table.categorical(),
            )?;
            for part in [&mut train, &mut val, &mut test] {
                part.x = standardiser.transform(part.x.view());
            }
            Some(standardiser)
        } else {
            None
        };

        log::info!(
            "Dataset ready: {} train, {} val, {} test sequences, {} output channels",
            train.len(),
            val.len(),
            test.len(),
            layout.total()
        );

        Ok(TimeSeriesDataset {
            name: self.name.unwrap_or_else(|| "untitled".to_string()),
            config,
            imputer,
            fill_table,
            standardiser,
            layout,
            train,
            val,
            test,
            split: self.split,
        })
    }
}
