// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! EdgeFirst PointCloud Library
//!
//! This library converts between ROS `sensor_msgs/PointCloud2` record
//! buffers and columnar [`PointSet`]s backed by `ndarray`.
//!
//! # Architecture
//!
//! Both directions are pure, stateless transforms that share only the
//! record layout contract in [`formats`]:
//!
//! ```text
//! ┌──────────────────┐  decode   ┌──────────────────────────────┐
//! │  &[u8] buffer    │ ────────► │  PointSet                    │
//! │  + RecordLayout  │           │  xyz:       Array2<f32> N×3  │
//! │                  │ ◄──────── │  rgb:       Array2<u8>  N×3? │
//! │  EncodedCloud    │  encode   │  intensity: Array1<u16> N?   │
//! └──────────────────┘           └──────────────────────────────┘
//!          │
//!          ▼
//! ┌───────────────────────────────┐
//! │  message::to_pointcloud2      │
//! │  (Header stamp + frame_id)    │
//! └───────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`formats`]: Field datatypes, channel layouts and layout validation
//! - [`points`]: The columnar [`PointSet`]
//! - [`decode`]: Buffer to [`PointSet`]
//! - [`encode`]: [`PointSet`] to buffer
//! - [`message`]: PointCloud2 envelope and CDR helpers
//! - [`config`]: Codec options
//!
//! # Example
//!
//! ```
//! use edgefirst_pointcloud::{decode, encode, PointSet};
//! use ndarray::array;
//!
//! let points = PointSet::from_xyz(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])
//!     .with_intensity(array![100, 200])
//!     .unwrap();
//!
//! let cloud = encode(&points).unwrap();
//! assert_eq!(cloud.layout.point_step, 14);
//! assert_eq!(cloud.row_step, 28);
//!
//! let decoded = decode(&cloud.data, &cloud.layout).unwrap();
//! assert_eq!(decoded, points);
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod formats;
pub mod message;
pub mod points;

// Re-exports for convenience
pub use config::Config;
pub use decode::{decode, decode_with};
pub use encode::{encode, encode_into, EncodedCloud};
pub use error::Error;
pub use formats::{Channel, PointFieldType, RecordLayout};
pub use message::{from_pointcloud2, to_pointcloud2};
pub use points::PointSet;
