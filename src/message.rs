// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! `sensor_msgs/msg/PointCloud2` envelope helpers.
//!
//! The codec itself only deals in buffers and layouts; this module wraps an
//! [`EncodedCloud`] in a [`PointCloud2`] with a stamped [`Header`], takes one
//! apart again for decoding, and converts messages to and from CDR bytes.

use std::time::{SystemTime, UNIX_EPOCH};

use cdr::{CdrLe, Infinite};
use edgefirst_schemas::{builtin_interfaces::Time, sensor_msgs::PointCloud2, std_msgs::Header};
use log::trace;

use crate::{
    config::Config,
    decode::decode_with,
    encode::{encode, EncodedCloud},
    error::Error,
    formats::RecordLayout,
    points::PointSet,
};

/// ROS 2 type name carried alongside serialized messages.
pub const SCHEMA: &str = "sensor_msgs/msg/PointCloud2";

/// Current wall-clock time as a ROS timestamp.
pub fn timestamp() -> Result<Time, Error> {
    let duration = SystemTime::now().duration_since(UNIX_EPOCH)?;
    Ok(Time {
        sec: duration.as_secs() as i32,
        nanosec: duration.subsec_nanos(),
    })
}

impl EncodedCloud {
    /// Wrap the encoded buffer in a PointCloud2 message.
    pub fn into_pointcloud2(self, frame_id: impl Into<String>, stamp: Time) -> PointCloud2 {
        PointCloud2 {
            header: Header {
                stamp,
                frame_id: frame_id.into(),
            },
            height: self.height,
            width: self.width,
            fields: self.layout.fields,
            is_bigendian: self.layout.is_bigendian,
            point_step: self.layout.point_step,
            row_step: self.row_step,
            data: self.data,
            is_dense: self.is_dense,
        }
    }
}

/// Encode `points` into a PointCloud2 message with the given header.
pub fn to_pointcloud2(points: &PointSet, frame_id: &str, stamp: Time) -> Result<PointCloud2, Error> {
    Ok(encode(points)?.into_pointcloud2(frame_id, stamp))
}

/// Encode `points` into a PointCloud2 message stamped with the current time.
pub fn to_pointcloud2_now(points: &PointSet, frame_id: &str) -> Result<PointCloud2, Error> {
    to_pointcloud2(points, frame_id, timestamp()?)
}

/// Encode `points` using the frame configured in `config`.
pub fn to_pointcloud2_with(points: &PointSet, config: &Config) -> Result<PointCloud2, Error> {
    to_pointcloud2_now(points, &config.frame_id)
}

/// Record layout described by a PointCloud2 message.
pub fn record_layout(msg: &PointCloud2) -> RecordLayout {
    RecordLayout::new(msg.point_step, msg.is_bigendian, msg.fields.clone())
}

/// Decode a PointCloud2 message using the default [`Config`].
pub fn from_pointcloud2(msg: &PointCloud2) -> Result<PointSet, Error> {
    from_pointcloud2_with(msg, &Config::default())
}

/// Decode a PointCloud2 message.
///
/// When the message declares a non-empty `width * height`, it must agree
/// with the number of records in `data`.
pub fn from_pointcloud2_with(msg: &PointCloud2, config: &Config) -> Result<PointSet, Error> {
    let layout = record_layout(msg);
    let records = if msg.data.is_empty() {
        0
    } else {
        layout.n_records(msg.data.len())?
    };
    let declared = msg.width as usize * msg.height as usize;
    if declared > 0 && declared != records {
        return Err(Error::DimensionMismatch {
            width: msg.width,
            height: msg.height,
            records,
        });
    }

    trace!("decoding {} {} in frame {}", records, SCHEMA, msg.header.frame_id);
    decode_with(&msg.data, &layout, config)
}

impl TryFrom<&PointCloud2> for PointSet {
    type Error = Error;

    fn try_from(msg: &PointCloud2) -> Result<Self, Self::Error> {
        from_pointcloud2(msg)
    }
}

/// Serialize a PointCloud2 message to little-endian CDR.
pub fn serialize(msg: &PointCloud2) -> Result<Vec<u8>, Error> {
    Ok(cdr::serialize::<_, _, CdrLe>(msg, Infinite)?)
}

/// Deserialize a PointCloud2 message from CDR bytes.
pub fn deserialize(bytes: &[u8]) -> Result<PointCloud2, Error> {
    Ok(cdr::deserialize::<PointCloud2>(bytes)?)
}
