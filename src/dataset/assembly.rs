//! Channel assembly.
//!
//! The assembled array always lists its channel blocks in the same order:
//! time stamp, time series, mask, delta. Blocks that were not requested are
//! left out.

use crate::core::error::{Result, TimeSeriesError};
use crate::core::types::{ChannelLayout, Value};
use ndarray::{concatenate, Array3, ArrayView2, ArrayView3, Axis};

/// Blocks to include besides the time series channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub time: bool,
    pub mask: bool,
    pub delta: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        AssemblyOptions {
            time: true,
            mask: false,
            delta: false,
        }
    }
}

/// Concatenate the requested blocks along the channel axis.
///
/// `mask` and `delta` must be present when the matching option is set.
pub fn assemble<'a>(
    times: ArrayView2<'a, Value>,
    series: ArrayView3<'a, Value>,
    mask: Option<ArrayView3<'a, Value>>,
    delta: Option<ArrayView3<'a, Value>>,
    options: AssemblyOptions,
) -> Result<(Array3<Value>, ChannelLayout)> {
    let (n, t, c) = series.dim();
    if times.dim() != (n, t) {
        return Err(TimeSeriesError::shape(
            format!("time stamps of shape ({}, {})", n, t),
            format!("{:?}", times.shape()),
        ));
    }

    let mut blocks: Vec<ArrayView3<'a, Value>> = Vec::with_capacity(4);
    let time_block = times.insert_axis(Axis(2));
    if options.time {
        blocks.push(time_block);
    }
    blocks.push(series);
    if options.mask {
        blocks.push(required_block("mask", mask, series.dim())?);
    }
    if options.delta {
        blocks.push(required_block("delta", delta, series.dim())?);
    }

    let output = concatenate(Axis(2), &blocks)
        .map_err(|e| TimeSeriesError::internal(format!("channel concatenation failed: {}", e)))?;
    let layout = ChannelLayout::new(c, options.time, options.mask, options.delta);
    debug_assert_eq!(output.len_of(Axis(2)), layout.total());

    Ok((output, layout))
}

fn required_block<'a>(
    name: &str,
    block: Option<ArrayView3<'a, Value>>,
    dim: (usize, usize, usize),
) -> Result<ArrayView3<'a, Value>> {
    let block = block.ok_or_else(|| {
        TimeSeriesError::internal(format!("{} channels requested but not derived", name))
    })?;
    if block.dim() != dim {
        return Err(TimeSeriesError::shape(
            format!("{} of shape {:?}", name, dim),
            format!("{:?}", block.shape()),
        ));
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn inputs() -> (Array2<Value>, Array3<Value>, Array3<Value>, Array3<Value>) {
        let times = array![[0.0, 1.0]];
        let series = array![[[10.0, 20.0, 30.0], [11.0, 21.0, 31.0]]];
        let mask = Array3::from_elem((1, 2, 3), 1.0);
        let delta = Array3::from_elem((1, 2, 3), 5.0);
        (times, series, mask, delta)
    }

    #[test]
    fn test_full_layout_order() {
        let (times, series, mask, delta) = inputs();
        let options = AssemblyOptions {
            time: true,
            mask: true,
            delta: true,
        };
        let (x, layout) = assemble(
            times.view(),
            series.view(),
            Some(mask.view()),
            Some(delta.view()),
            options,
        )
        .unwrap();

        assert_eq!(x.dim(), (1, 2, 10));
        assert_eq!(layout.total(), 10);
        let row: Vec<f32> = x.slice(ndarray::s![0, 1, ..]).to_vec();
        assert_eq!(
            row,
            vec![1.0, 11.0, 21.0, 31.0, 1.0, 1.0, 1.0, 5.0, 5.0, 5.0]
        );
    }

    #[test]
    fn test_series_only() {
        let (times, series, _, _) = inputs();
        let options = AssemblyOptions {
            time: false,
            mask: false,
            delta: false,
        };
        let (x, layout) = assemble(times.view(), series.view(), None, None, options).unwrap();
        assert_eq!(x, series);
        assert_eq!(layout.data, 0..3);
        assert!(layout.mask.is_empty());
    }

    #[test]
    fn test_delta_without_mask() {
        let (times, series, _, delta) = inputs();
        let options = AssemblyOptions {
            time: true,
            mask: false,
            delta: true,
        };
        let (x, layout) =
            assemble(times.view(), series.view(), None, Some(delta.view()), options).unwrap();
        assert_eq!(x.dim(), (1, 2, 7));
        assert_eq!(layout.delta, 4..7);
        assert_eq!(x[[0, 0, 4]], 5.0);
    }

    #[test]
    fn test_missing_block_is_an_error() {
        let (times, series, _, _) = inputs();
        let options = AssemblyOptions {
            time: true,
            mask: true,
            delta: false,
        };
        assert!(assemble(times.view(), series.view(), None, None, options).is_err());
    }
}
