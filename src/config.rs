// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Codec options.
///
/// Missing keys take their default values, so a partial JSON document such
/// as `{"frame_id": "lidar"}` is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame stamped into PointCloud2 headers built by the encoder
    pub frame_id: String,

    /// Validate every field in the layout before decoding: unknown datatypes,
    /// fields extending past `point_step` and overlapping fields are rejected
    /// even when the decoder never reads them. When false, only the fields
    /// the decoder reads are checked, for datatype and bounds.
    pub strict_layout: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_id: String::from("base_link"),
            strict_layout: true,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}
