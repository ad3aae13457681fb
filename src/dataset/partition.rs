//! Train/validation/test partitioning of sequences.

use crate::config::SplitConfig;
use crate::core::error::{Result, TimeSeriesError};
use crate::core::types::{Split, Value};
use ndarray::{Array, ArrayView, ArrayView2, Axis, RemoveAxis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Sequence indices of each split, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partitions {
    train: Vec<usize>,
    val: Vec<usize>,
    test: Vec<usize>,
}

impl Partitions {
    /// Group sequences by their markers. The training split must not be empty.
    pub fn from_markers(markers: &[Split]) -> Result<Self> {
        let mut partitions = Partitions {
            train: Vec::new(),
            val: Vec::new(),
            test: Vec::new(),
        };
        for (index, &split) in markers.iter().enumerate() {
            partitions.indices_mut(split).push(index);
        }
        partitions.check()?;
        Ok(partitions)
    }

    /// Random stratified split.
    ///
    /// Sequences are stratified on whether their label row sums to a positive
    /// value, then shuffled with the configured seed and divided according to
    /// the split proportions within each stratum.
    pub fn random(labels: ArrayView2<'_, Value>, config: &SplitConfig) -> Result<Self> {
        let (_, val_prop, test_prop) = config.proportions()?;

        let (mut positive, mut negative): (Vec<usize>, Vec<usize>) =
            (0..labels.nrows()).partition(|&i| {
                let sum: f32 = labels.row(i).iter().filter(|v| !v.is_nan()).sum();
                sum > 0.0
            });

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut partitions = Partitions {
            train: Vec::new(),
            val: Vec::new(),
            test: Vec::new(),
        };
        for stratum in [&mut negative, &mut positive] {
            stratum.shuffle(&mut rng);
            let len = stratum.len();
            let n_test = (((len as f64) * test_prop).round() as usize).min(len);
            let n_val = (((len as f64) * val_prop).round() as usize).min(len - n_test);

            partitions.test.extend_from_slice(&stratum[..n_test]);
            partitions.val.extend_from_slice(&stratum[n_test..n_test + n_val]);
            partitions.train.extend_from_slice(&stratum[n_test + n_val..]);
        }

        partitions.train.sort_unstable();
        partitions.val.sort_unstable();
        partitions.test.sort_unstable();
        partitions.check()?;

        log::info!(
            "Random split: {} train, {} val, {} test sequences",
            partitions.train.len(),
            partitions.val.len(),
            partitions.test.len()
        );
        Ok(partitions)
    }

    /// Indices of the sequences in `split`.
    pub fn indices(&self, split: Split) -> &[usize] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    fn indices_mut(&mut self, split: Split) -> &mut Vec<usize> {
        match split {
            Split::Train => &mut self.train,
            Split::Val => &mut self.val,
            Split::Test => &mut self.test,
        }
    }

    /// Total number of sequences.
    pub fn n_sequences(&self) -> usize {
        self.train.len() + self.val.len() + self.test.len()
    }

    /// Split of every sequence, in sequence order.
    pub fn markers(&self) -> Vec<Split> {
        let mut markers = vec![Split::Train; self.n_sequences()];
        for split in [Split::Val, Split::Test] {
            for &i in self.indices(split) {
                if let Some(marker) = markers.get_mut(i) {
                    *marker = split;
                }
            }
        }
        markers
    }

    /// Fail unless the splits together hold every sequence of `0..n_sequences`
    /// exactly once, each list ascending, with a non-empty training split.
    ///
    /// Partitions built by [`from_markers`](Self::from_markers) or
    /// [`random`](Self::random) always pass. Deserialized ones may not.
    pub fn validate(&self, n_sequences: usize) -> Result<()> {
        if self.n_sequences() != n_sequences {
            return Err(TimeSeriesError::shape(
                format!("partition markers for {} sequences", n_sequences),
                format!("{} markers", self.n_sequences()),
            ));
        }

        let mut seen = vec![false; n_sequences];
        for split in [Split::Train, Split::Val, Split::Test] {
            let indices = self.indices(split);
            if indices.windows(2).any(|w| w[0] >= w[1]) {
                return Err(TimeSeriesError::config(format!(
                    "{} split indices must be strictly ascending",
                    split
                )));
            }
            for &i in indices {
                if i >= n_sequences {
                    return Err(TimeSeriesError::index_out_of_bounds(i, n_sequences));
                }
                if std::mem::replace(&mut seen[i], true) {
                    return Err(TimeSeriesError::config(format!(
                        "sequence {} is assigned to more than one split",
                        i
                    )));
                }
            }
        }
        self.check()
    }

    fn check(&self) -> Result<()> {
        if self.train.is_empty() {
            return Err(TimeSeriesError::config(
                "the training split is empty, channel statistics cannot be computed",
            ));
        }
        Ok(())
    }
}

/// Copy the sequences at `indices` (first axis) into a new array.
pub fn select<D>(array: ArrayView<'_, Value, D>, indices: &[usize]) -> Array<Value, D>
where
    D: RemoveAxis,
{
    array.select(Axis(0), indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_from_markers() {
        let markers = vec![Split::Train, Split::Val, Split::Train, Split::Test];
        let partitions = Partitions::from_markers(&markers).unwrap();
        assert_eq!(partitions.indices(Split::Train), &[0, 2]);
        assert_eq!(partitions.indices(Split::Val), &[1]);
        assert_eq!(partitions.indices(Split::Test), &[3]);
        assert_eq!(partitions.markers(), markers);
    }

    #[test]
    fn test_empty_training_split() {
        let err = Partitions::from_markers(&[Split::Val, Split::Test]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_random_split_sizes_and_coverage() {
        let labels = Array2::from_shape_fn((100, 2), |(i, j)| {
            if (i % 4 == 0) == (j == 0) {
                1.0
            } else {
                0.0
            }
        });
        let config = SplitConfig::new(0.7).with_val_prop(0.2).with_seed(456);
        let partitions = Partitions::random(labels.view(), &config).unwrap();

        assert_eq!(partitions.n_sequences(), 100);
        assert_eq!(partitions.indices(Split::Train).len(), 70);
        assert_eq!(partitions.indices(Split::Val).len(), 20);
        assert_eq!(partitions.indices(Split::Test).len(), 10);

        let mut all: Vec<usize> = partitions.train.clone();
        all.extend(&partitions.val);
        all.extend(&partitions.test);
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_split_is_seeded() {
        let labels = Array2::from_shape_fn((50, 1), |(i, _)| (i % 3) as f32);
        let config = SplitConfig::new(0.6).with_seed(7);
        let a = Partitions::random(labels.view(), &config).unwrap();
        let b = Partitions::random(labels.view(), &config).unwrap();
        assert_eq!(a, b);
        assert!(a.indices(Split::Test).is_empty());
    }

    #[test]
    fn test_random_split_is_stratified() {
        // 20 positive rows, 80 negative rows
        let labels = Array2::from_shape_fn((100, 1), |(i, _)| if i < 20 { 1.0 } else { 0.0 });
        let config = SplitConfig::new(0.5).with_seed(1);
        let partitions = Partitions::random(labels.view(), &config).unwrap();
        let positives = partitions
            .indices(Split::Train)
            .iter()
            .filter(|&&i| i < 20)
            .count();
        assert_eq!(positives, 10);
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let partitions: Partitions =
            serde_json::from_str(r#"{"train":[0,1],"val":[1],"test":[]}"#).unwrap();
        let err = partitions.validate(3).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("sequence 1"));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let partitions: Partitions =
            serde_json::from_str(r#"{"train":[0,1,5],"val":[],"test":[]}"#).unwrap();
        let err = partitions.validate(3).unwrap_err();
        assert!(matches!(err, TimeSeriesError::IndexOutOfBounds { index: 5, .. }));
    }

    #[test]
    fn test_validate_rejects_unsorted_and_empty_train() {
        let partitions: Partitions =
            serde_json::from_str(r#"{"train":[1,0],"val":[],"test":[]}"#).unwrap();
        assert!(partitions.validate(2).is_err());

        let partitions: Partitions =
            serde_json::from_str(r#"{"train":[],"val":[0],"test":[1]}"#).unwrap();
        assert!(partitions.validate(2).unwrap_err().is_config());
    }

    #[test]
    fn test_validate_accepts_built_partitions() {
        let markers = vec![Split::Test, Split::Train, Split::Val, Split::Train];
        let partitions = Partitions::from_markers(&markers).unwrap();
        assert!(partitions.validate(4).is_ok());
        assert!(matches!(
            partitions.validate(5).unwrap_err(),
            TimeSeriesError::Shape { .. }
        ));
    }

    #[test]
    fn test_select() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let picked = select(x.view(), &[2, 0]);
        assert_eq!(picked, array![[5.0, 6.0], [1.0, 2.0]]);
    }
}
