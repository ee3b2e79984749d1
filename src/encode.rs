// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! [`PointSet`] to PointCloud2 buffer encoding.
//!
//! The record layout is assembled from [`Channel::ALL`]: `xyz` always, then
//! `rgb` and `intensity` when their columns are present. Records are written
//! little-endian with `is_bigendian = false`.

use log::debug;
use tracing::instrument;

use crate::{
    error::Error,
    formats::{channel_plan, layout_for, RecordLayout},
    points::PointSet,
};

/// Packed buffer plus the metadata a PointCloud2 envelope needs.
#[derive(Debug, Clone)]
pub struct EncodedCloud {
    /// `point_step * width` bytes of packed records
    pub data: Vec<u8>,
    pub layout: RecordLayout,
    /// Always 1; clouds are unordered
    pub height: u32,
    /// Number of points
    pub width: u32,
    pub row_step: u32,
    /// False if any position coordinate is NaN
    pub is_dense: bool,
}

impl EncodedCloud {
    pub fn point_step(&self) -> u32 {
        self.layout.point_step
    }
}

/// Encode `points` into a freshly allocated buffer.
///
/// # Errors
///
/// Returns [`Error::ColumnLength`] if an optional column has a different
/// number of rows than `xyz`, and [`Error::TooManyPoints`] if `width` or
/// `row_step` would not fit in a `u32`. Empty point sets encode to an empty
/// buffer.
pub fn encode(points: &PointSet) -> Result<EncodedCloud, Error> {
    let mut data = Vec::new();
    let (layout, is_dense) = encode_into(points, &mut data)?;
    let (width, row_step) = cloud_dimensions(points.len(), layout.point_step as usize)?;

    Ok(EncodedCloud {
        data,
        height: 1,
        width,
        row_step,
        is_dense,
        layout,
    })
}

/// Encode `points` into a caller-owned buffer.
///
/// `out` is cleared and resized to `point_step * points.len()`; its
/// allocation is reused when large enough. Returns the record layout and
/// the density flag.
#[instrument(skip_all, fields(n_points = points.len()))]
pub fn encode_into(points: &PointSet, out: &mut Vec<u8>) -> Result<(RecordLayout, bool), Error> {
    points.check_columns()?;

    let (plan, point_step) = channel_plan(points);
    let n_points = points.len();
    cloud_dimensions(n_points, point_step)?;

    out.clear();
    out.resize(point_step * n_points, 0);

    // xyz is always present, so point_step >= 12
    for (index, record) in out.chunks_exact_mut(point_step).enumerate() {
        for &(channel, offset) in &plan {
            channel.write(points, index, &mut record[offset..offset + channel.slot_width()]);
        }
    }

    let is_dense = points.is_dense();
    debug!(
        "encoded {} points with point_step {} (dense: {})",
        n_points, point_step, is_dense
    );

    Ok((layout_for(points), is_dense))
}

/// PointCloud2 `width` and `row_step` for `n_points` records of `point_step`
/// bytes, both of which the message carries as `u32`.
fn cloud_dimensions(n_points: usize, point_step: usize) -> Result<(u32, u32), Error> {
    let too_many = || Error::TooManyPoints {
        n_points,
        point_step,
    };
    let width = u32::try_from(n_points).map_err(|_| too_many())?;
    let step = u32::try_from(point_step).map_err(|_| too_many())?;
    let row_step = step.checked_mul(width).ok_or_else(too_many)?;
    Ok((width, row_step))
}
