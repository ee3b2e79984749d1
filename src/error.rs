// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::fmt;

/// Common error type for point cloud encoding and decoding.
///
/// Layout-class variants (see [`Error::is_layout_error`]) are raised before
/// any output is constructed, so a failed call never yields partial data.
#[derive(Debug)]
pub enum Error {
    /// Buffer length is not a multiple of the record width
    BufferLength { len: usize, point_step: u32 },
    /// Record width of zero
    InvalidPointStep,
    /// A required field is absent from the descriptor list
    MissingField(&'static str),
    /// Field datatype code outside the PointField range
    UnknownDatatype { name: String, datatype: u8 },
    /// Field extends past the end of the record
    FieldOutOfBounds {
        name: String,
        offset: u32,
        width: usize,
        point_step: u32,
    },
    /// Two fields share bytes within the record
    FieldOverlap { first: String, second: String },
    /// Declared datatype disagrees with what the codec reads at the offset
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },
    /// Message width and height disagree with the data length
    DimensionMismatch {
        width: u32,
        height: u32,
        records: usize,
    },
    /// Point count or `point_step * width` does not fit the u32 message fields
    TooManyPoints { n_points: usize, point_step: usize },
    /// An optional column has a different number of rows than `xyz`
    ColumnLength {
        column: &'static str,
        expected: usize,
        found: usize,
    },
    /// Shape error from ndarray operations
    Shape(ndarray::ShapeError),
    /// CDR serialization error
    Cdr(cdr::Error),
    /// System time error
    SystemTime(std::time::SystemTimeError),
    /// Configuration error
    Config(String),
}

impl Error {
    /// Whether the error stems from a malformed record layout or buffer.
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            Error::BufferLength { .. }
                | Error::InvalidPointStep
                | Error::MissingField(_)
                | Error::UnknownDatatype { .. }
                | Error::FieldOutOfBounds { .. }
                | Error::FieldOverlap { .. }
                | Error::TypeMismatch { .. }
                | Error::DimensionMismatch { .. }
                | Error::TooManyPoints { .. }
        )
    }
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::BufferLength { len, point_step } => write!(
                f,
                "buffer of {} bytes is not a multiple of point_step {}",
                len, point_step
            ),
            Error::InvalidPointStep => write!(f, "point_step must be non-zero"),
            Error::MissingField(name) => write!(f, "missing required field: {}", name),
            Error::UnknownDatatype { name, datatype } => {
                write!(f, "field {} has unknown datatype {}", name, datatype)
            }
            Error::FieldOutOfBounds {
                name,
                offset,
                width,
                point_step,
            } => write!(
                f,
                "field {} at offset {} with width {} exceeds point_step {}",
                name, offset, width, point_step
            ),
            Error::FieldOverlap { first, second } => {
                write!(f, "fields {} and {} overlap", first, second)
            }
            Error::TypeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "field {} type mismatch: expected {}, found {}",
                name, expected, found
            ),
            Error::DimensionMismatch {
                width,
                height,
                records,
            } => write!(
                f,
                "{}x{} cloud does not match {} records in data",
                width, height, records
            ),
            Error::TooManyPoints {
                n_points,
                point_step,
            } => write!(
                f,
                "{} points with point_step {} exceed the u32 width/row_step limit",
                n_points, point_step
            ),
            Error::ColumnLength {
                column,
                expected,
                found,
            } => write!(
                f,
                "column {} has {} rows, expected {}",
                column, found, expected
            ),
            Error::Shape(err) => write!(f, "shape error: {}", err),
            Error::Cdr(err) => write!(f, "CDR error: {}", err),
            Error::SystemTime(err) => write!(f, "system time error: {}", err),
            Error::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Shape(err)
    }
}

impl From<cdr::Error> for Error {
    fn from(err: cdr::Error) -> Self {
        Error::Cdr(err)
    }
}

impl From<std::time::SystemTimeError> for Error {
    fn from(err: std::time::SystemTimeError) -> Self {
        Error::SystemTime(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}
