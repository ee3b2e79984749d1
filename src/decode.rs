// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! PointCloud2 buffer to [`PointSet`] decoding.
//!
//! The decoder looks up `x`, `y`, `z` (required), `rgb` and `intensity`
//! (optional) by exact name and unpacks each record into columns:
//!
//! - `x`, `y`, `z`: FLOAT32 at their declared offsets
//! - `rgb`: 3 bytes in blue, green, red wire order, reversed to red, green,
//!   blue
//! - `intensity`: 2 bytes as an unsigned 16-bit integer
//!
//! Multi-byte scalars honour [`RecordLayout::is_bigendian`]. All layout
//! checks run before any column is allocated.

use log::trace;
use ndarray::{Array1, Array2};
use tracing::instrument;

use crate::{
    config::Config,
    error::Error,
    formats::{Channel, PointFieldType, RecordLayout},
    points::PointSet,
};

/// Decode a packed buffer into a [`PointSet`] using the default [`Config`].
///
/// # Errors
///
/// Returns a layout error if `buffer.len()` is not a multiple of
/// `layout.point_step`, if `x`, `y` or `z` is missing, or if any field read
/// by the decoder is mistyped or does not fit inside the record.
pub fn decode(buffer: &[u8], layout: &RecordLayout) -> Result<PointSet, Error> {
    decode_with(buffer, layout, &Config::default())
}

/// Decode a packed buffer into a [`PointSet`].
///
/// With `config.strict_layout` set, the whole layout is validated for
/// unknown datatypes, out-of-bounds and overlapping fields, including fields
/// the decoder ignores.
#[instrument(skip_all, fields(len = buffer.len(), point_step = layout.point_step))]
pub fn decode_with(
    buffer: &[u8],
    layout: &RecordLayout,
    config: &Config,
) -> Result<PointSet, Error> {
    if buffer.is_empty() {
        // Zero records: nothing is read, so the layout is not checked
        return Ok(empty_like(layout));
    }

    let n_points = layout.n_records(buffer.len())?;
    if config.strict_layout {
        layout.validate()?;
    }
    let plan = DecodePlan::resolve(layout)?;
    trace!(
        "decoding {} points (rgb: {}, intensity: {})",
        n_points,
        plan.rgb.is_some(),
        plan.intensity.is_some()
    );

    let big_endian = layout.is_bigendian;
    let mut xyz = Vec::with_capacity(n_points * 3);
    let mut rgb = plan.rgb.map(|_| Vec::with_capacity(n_points * 3));
    let mut intensity = plan.intensity.map(|_| Vec::with_capacity(n_points));

    for record in buffer.chunks_exact(layout.point_step as usize) {
        for offset in plan.xyz {
            xyz.push(read_f32(record, offset, big_endian));
        }
        if let (Some(offset), Some(column)) = (plan.rgb, rgb.as_mut()) {
            column.extend_from_slice(&[record[offset + 2], record[offset + 1], record[offset]]);
        }
        if let (Some(offset), Some(column)) = (plan.intensity, intensity.as_mut()) {
            column.push(read_u16(record, offset, big_endian));
        }
    }

    let mut points = PointSet::new(Array2::from_shape_vec((n_points, 3), xyz)?)?;
    points.rgb = rgb
        .map(|column| Array2::from_shape_vec((n_points, 3), column))
        .transpose()?;
    points.intensity = intensity.map(Array1::from_vec);
    Ok(points)
}

/// Empty point set carrying the optional columns named in `layout`.
fn empty_like(layout: &RecordLayout) -> PointSet {
    let mut points = PointSet::empty();
    points.rgb = layout.field("rgb").map(|_| Array2::zeros((0, 3)));
    points.intensity = layout.field("intensity").map(|_| Array1::zeros(0));
    points
}

/// Byte offsets of every channel the decoder will read.
#[derive(Debug)]
struct DecodePlan {
    xyz: [usize; 3],
    rgb: Option<usize>,
    intensity: Option<usize>,
}

impl DecodePlan {
    fn resolve(layout: &RecordLayout) -> Result<Self, Error> {
        let mut xyz = [0; 3];
        for (slot, name) in xyz.iter_mut().zip(Channel::Xyz.names().iter().copied()) {
            *slot = resolve_field(layout, name, Channel::Xyz)?.ok_or(Error::MissingField(name))?;
        }

        Ok(Self {
            xyz,
            rgb: resolve_field(layout, "rgb", Channel::Rgb)?,
            intensity: resolve_field(layout, "intensity", Channel::Intensity)?,
        })
    }
}

/// Locate `name` and check that the channel's read fits the declared type
/// and the record. Returns `None` when the field is absent.
fn resolve_field(
    layout: &RecordLayout,
    name: &str,
    channel: Channel,
) -> Result<Option<usize>, Error> {
    let field = match layout.field(name) {
        Some(field) => field,
        None => return Ok(None),
    };

    let datatype =
        PointFieldType::try_from(field.datatype).map_err(|datatype| Error::UnknownDatatype {
            name: field.name.clone(),
            datatype,
        })?;
    let declared = datatype.width() * field.count as usize;
    let needed = channel.read_width();

    if channel == Channel::Xyz && (datatype != PointFieldType::FLOAT32 || field.count != 1) {
        return Err(Error::TypeMismatch {
            name: field.name.clone(),
            expected: String::from("FLOAT32"),
            found: format!("{} x{}", datatype, field.count),
        });
    }
    if declared < needed {
        return Err(Error::TypeMismatch {
            name: field.name.clone(),
            expected: format!("{} bytes", needed),
            found: format!("{} x{} ({} bytes)", datatype, field.count, declared),
        });
    }

    let offset = field.offset as usize;
    if offset + needed > layout.point_step as usize {
        return Err(Error::FieldOutOfBounds {
            name: field.name.clone(),
            offset: field.offset,
            width: needed,
            point_step: layout.point_step,
        });
    }

    Ok(Some(offset))
}

#[inline]
fn read_bytes<const W: usize>(record: &[u8], offset: usize) -> [u8; W] {
    let mut bytes = [0u8; W];
    bytes.copy_from_slice(&record[offset..offset + W]);
    bytes
}

#[inline]
fn read_f32(record: &[u8], offset: usize, big_endian: bool) -> f32 {
    let bytes = read_bytes::<4>(record, offset);
    if big_endian {
        f32::from_be_bytes(bytes)
    } else {
        f32::from_le_bytes(bytes)
    }
}

#[inline]
fn read_u16(record: &[u8], offset: usize, big_endian: bool) -> u16 {
    let bytes = read_bytes::<2>(record, offset);
    if big_endian {
        u16::from_be_bytes(bytes)
    } else {
        u16::from_le_bytes(bytes)
    }
}
