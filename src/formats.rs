// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! PointCloud2 record layouts shared by the encoder and decoder.
//!
//! A record is a fixed-width run of `point_step` bytes. Each named channel
//! lives at an absolute offset inside the record and is described by a
//! [`PointField`]. The encoder emits one of four layouts depending on which
//! optional columns a [`PointSet`] carries:
//!
//! ## 12-byte format (xyz)
//! ```text
//! ┌───────┬───────┬───────┐
//! │ x:f32 │ y:f32 │ z:f32 │
//! │ 4B    │ 4B    │ 4B    │
//! └───────┴───────┴───────┘
//! ```
//!
//! ## 14-byte format (xyz + intensity)
//! ```text
//! ┌───────┬───────┬───────┬───────────────┐
//! │ x:f32 │ y:f32 │ z:f32 │ intensity:u16 │
//! │ 4B    │ 4B    │ 4B    │ 2B            │
//! └───────┴───────┴───────┴───────────────┘
//! ```
//!
//! ## 16-byte format (xyz + rgb)
//! ```text
//! ┌───────┬───────┬───────┬───┬───┬───┬───┐
//! │ x:f32 │ y:f32 │ z:f32 │ B │ G │ R │ 0 │
//! │ 4B    │ 4B    │ 4B    │ rgb:u32       │
//! └───────┴───────┴───────┴───┴───┴───┴───┘
//! ```
//!
//! ## 18-byte format (xyz + rgb + intensity)
//! ```text
//! ┌───────┬───────┬───────┬───────────────┬───────────────┐
//! │ x:f32 │ y:f32 │ z:f32 │ rgb:u32 (BGR0)│ intensity:u16 │
//! │ 4B    │ 4B    │ 4B    │ 4B            │ 2B            │
//! └───────┴───────┴───────┴───────────────┴───────────────┘
//! ```

use std::fmt;

use edgefirst_schemas::sensor_msgs::PointField;

use crate::{error::Error, points::PointSet};

/// Point field data types for PointCloud2 messages.
///
/// These values correspond to the ROS sensor_msgs/PointField datatype field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(clippy::upper_case_acronyms)]
pub enum PointFieldType {
    INT8 = 1,
    UINT8 = 2,
    INT16 = 3,
    UINT16 = 4,
    INT32 = 5,
    UINT32 = 6,
    FLOAT32 = 7,
    FLOAT64 = 8,
}

impl PointFieldType {
    /// Width in bytes of one scalar element of this type.
    pub fn width(self) -> usize {
        match self {
            PointFieldType::INT8 | PointFieldType::UINT8 => 1,
            PointFieldType::INT16 | PointFieldType::UINT16 => 2,
            PointFieldType::INT32 | PointFieldType::UINT32 | PointFieldType::FLOAT32 => 4,
            PointFieldType::FLOAT64 => 8,
        }
    }
}

impl TryFrom<u8> for PointFieldType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PointFieldType::INT8),
            2 => Ok(PointFieldType::UINT8),
            3 => Ok(PointFieldType::INT16),
            4 => Ok(PointFieldType::UINT16),
            5 => Ok(PointFieldType::INT32),
            6 => Ok(PointFieldType::UINT32),
            7 => Ok(PointFieldType::FLOAT32),
            8 => Ok(PointFieldType::FLOAT64),
            other => Err(other),
        }
    }
}

impl fmt::Display for PointFieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Build a single-element [`PointField`].
pub fn point_field(name: &str, offset: u32, datatype: PointFieldType) -> PointField {
    PointField {
        name: String::from(name),
        offset,
        datatype: datatype as u8,
        count: 1,
    }
}

/// Byte extent `[start, end)` a field occupies within a record.
fn field_extent(field: &PointField) -> Result<(u64, u64), Error> {
    let datatype =
        PointFieldType::try_from(field.datatype).map_err(|datatype| Error::UnknownDatatype {
            name: field.name.clone(),
            datatype,
        })?;
    let start = field.offset as u64;
    let end = start + datatype.width() as u64 * field.count as u64;
    Ok((start, end))
}

/// Per-record layout of a PointCloud2 buffer.
///
/// Every record in a buffer shares this layout. Offsets in `fields` are
/// absolute from the start of each record.
#[derive(Debug, Clone)]
pub struct RecordLayout {
    /// Total width of one record in bytes
    pub point_step: u32,
    /// Whether multi-byte scalars are stored big-endian
    pub is_bigendian: bool,
    /// Field descriptors in declaration order
    pub fields: Vec<PointField>,
}

impl RecordLayout {
    pub fn new(point_step: u32, is_bigendian: bool, fields: Vec<PointField>) -> Self {
        Self {
            point_step,
            is_bigendian,
            fields,
        }
    }

    /// Look up a field by exact, case-sensitive name.
    pub fn field(&self, name: &str) -> Option<&PointField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Number of whole records in a buffer of `len` bytes.
    ///
    /// Fails if `len` is not an exact multiple of `point_step`.
    pub fn n_records(&self, len: usize) -> Result<usize, Error> {
        let point_step = self.point_step as usize;
        if point_step == 0 {
            return Err(Error::InvalidPointStep);
        }
        if len % point_step != 0 {
            return Err(Error::BufferLength {
                len,
                point_step: self.point_step,
            });
        }
        Ok(len / point_step)
    }

    /// Check that every field fits inside `point_step` and that no two
    /// fields overlap.
    pub fn validate(&self) -> Result<(), Error> {
        let extents = self.check_bounds()?;
        check_overlap(extents)
    }

    /// Check that every field has a known datatype and fits inside the
    /// record. Returns the field extents in declaration order.
    pub(crate) fn check_bounds(&self) -> Result<Vec<(&PointField, u64, u64)>, Error> {
        if self.point_step == 0 {
            return Err(Error::InvalidPointStep);
        }

        let mut extents = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let (start, end) = field_extent(field)?;
            if end > self.point_step as u64 {
                return Err(Error::FieldOutOfBounds {
                    name: field.name.clone(),
                    offset: field.offset,
                    width: (end - start) as usize,
                    point_step: self.point_step,
                });
            }
            extents.push((field, start, end));
        }
        Ok(extents)
    }
}

fn check_overlap(mut extents: Vec<(&PointField, u64, u64)>) -> Result<(), Error> {
    extents.retain(|(_, start, end)| end > start);
    extents.sort_by_key(|(_, start, _)| *start);

    for pair in extents.windows(2) {
        let (first, _, first_end) = pair[0];
        let (second, second_start, _) = pair[1];
        if second_start < first_end {
            return Err(Error::FieldOverlap {
                first: first.name.clone(),
                second: second.name.clone(),
            });
        }
    }
    Ok(())
}

/// A named group of fields the codec knows how to pack and unpack.
///
/// Channels are laid out in the order of [`Channel::ALL`]; each optional
/// channel is emitted only when its column is present in the [`PointSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Position, three FLOAT32 fields `x`, `y`, `z`
    Xyz,
    /// Color, one UINT32 field `rgb` holding bytes B, G, R, 0
    Rgb,
    /// Intensity, one UINT16 field `intensity`
    Intensity,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Xyz, Channel::Rgb, Channel::Intensity];

    /// Bytes the channel occupies in an encoded record.
    pub fn slot_width(self) -> usize {
        match self {
            Channel::Xyz => 12,
            Channel::Rgb => 4,
            Channel::Intensity => 2,
        }
    }

    /// Bytes the decoder reads from the channel's offset.
    pub fn read_width(self) -> usize {
        match self {
            Channel::Xyz => 4,
            Channel::Rgb => 3,
            Channel::Intensity => 2,
        }
    }

    /// Field names the channel is looked up by.
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Channel::Xyz => &["x", "y", "z"],
            Channel::Rgb => &["rgb"],
            Channel::Intensity => &["intensity"],
        }
    }

    /// Whether the point set carries this channel's column.
    pub fn is_present(self, points: &PointSet) -> bool {
        match self {
            Channel::Xyz => true,
            Channel::Rgb => points.rgb.is_some(),
            Channel::Intensity => points.intensity.is_some(),
        }
    }

    /// Field descriptors for this channel placed at `offset`.
    pub fn fields(self, offset: u32) -> Vec<PointField> {
        match self {
            Channel::Xyz => vec![
                point_field("x", offset, PointFieldType::FLOAT32),
                point_field("y", offset + 4, PointFieldType::FLOAT32),
                point_field("z", offset + 8, PointFieldType::FLOAT32),
            ],
            Channel::Rgb => vec![point_field("rgb", offset, PointFieldType::UINT32)],
            Channel::Intensity => vec![point_field("intensity", offset, PointFieldType::UINT16)],
        }
    }

    /// Write point `index` of this channel into its record slot.
    ///
    /// `slot` must be exactly [`Channel::slot_width`] bytes. Scalars are
    /// written little-endian.
    #[inline]
    pub(crate) fn write(self, points: &PointSet, index: usize, slot: &mut [u8]) {
        match self {
            Channel::Xyz => {
                let row = points.xyz.row(index);
                slot[0..4].copy_from_slice(&row[0].to_le_bytes());
                slot[4..8].copy_from_slice(&row[1].to_le_bytes());
                slot[8..12].copy_from_slice(&row[2].to_le_bytes());
            }
            Channel::Rgb => {
                if let Some(rgb) = &points.rgb {
                    slot[0] = rgb[[index, 2]];
                    slot[1] = rgb[[index, 1]];
                    slot[2] = rgb[[index, 0]];
                    slot[3] = 0;
                }
            }
            Channel::Intensity => {
                if let Some(intensity) = &points.intensity {
                    slot.copy_from_slice(&intensity[index].to_le_bytes());
                }
            }
        }
    }
}

/// Channels present in `points` paired with their offsets, plus the
/// resulting `point_step`.
pub fn channel_plan(points: &PointSet) -> (Vec<(Channel, usize)>, usize) {
    let mut offset = 0;
    let plan = Channel::ALL
        .into_iter()
        .filter(|channel| channel.is_present(points))
        .map(|channel| {
            let slot = (channel, offset);
            offset += channel.slot_width();
            slot
        })
        .collect();
    (plan, offset)
}

/// Build the [`RecordLayout`] the encoder emits for `points`.
pub fn layout_for(points: &PointSet) -> RecordLayout {
    let (plan, point_step) = channel_plan(points);
    let fields = plan
        .into_iter()
        .flat_map(|(channel, offset)| channel.fields(offset as u32))
        .collect();
    RecordLayout::new(point_step as u32, false, fields)
}
