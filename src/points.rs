// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Columnar point set.
//!
//! [`PointSet`] stores point cloud data as parallel `ndarray` columns, one
//! row per point:
//! - `xyz`: (N, 3) `f32` positions, always present
//! - `rgb`: (N, 3) `u8` colors in red, green, blue order
//! - `intensity`: (N,) `u16` return strength
//!
//! A column being `Some` is the only signal that a channel exists. The
//! encoder picks its record layout from it, and the decoder fills it only
//! when the matching field is found.

use ndarray::{Array1, Array2};

use crate::error::Error;

/// Point cloud in structure-of-arrays form.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    pub xyz: Array2<f32>,
    pub rgb: Option<Array2<u8>>,
    pub intensity: Option<Array1<u16>>,
}

impl PointSet {
    /// Create a point set from an (N, 3) position array.
    pub fn new(xyz: Array2<f32>) -> Result<Self, Error> {
        if xyz.ncols() != 3 {
            return Err(Error::ColumnLength {
                column: "xyz",
                expected: 3,
                found: xyz.ncols(),
            });
        }
        Ok(Self {
            xyz,
            rgb: None,
            intensity: None,
        })
    }

    /// Create an empty point set with no optional columns.
    pub fn empty() -> Self {
        Self {
            xyz: Array2::zeros((0, 3)),
            rgb: None,
            intensity: None,
        }
    }

    /// Create a point set from position triples.
    pub fn from_xyz(points: Vec<[f32; 3]>) -> Self {
        Self {
            xyz: Array2::from(points),
            rgb: None,
            intensity: None,
        }
    }

    /// Attach an (N, 3) color column in red, green, blue order.
    pub fn with_rgb(mut self, rgb: Array2<u8>) -> Result<Self, Error> {
        check_rows("rgb", self.len(), rgb.nrows())?;
        if rgb.ncols() != 3 {
            return Err(Error::ColumnLength {
                column: "rgb",
                expected: 3,
                found: rgb.ncols(),
            });
        }
        self.rgb = Some(rgb);
        Ok(self)
    }

    /// Attach an intensity column with one value per point.
    pub fn with_intensity(mut self, intensity: Array1<u16>) -> Result<Self, Error> {
        check_rows("intensity", self.len(), intensity.len())?;
        self.intensity = Some(intensity);
        Ok(self)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.xyz.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_rgb(&self) -> bool {
        self.rgb.is_some()
    }

    pub fn has_intensity(&self) -> bool {
        self.intensity.is_some()
    }

    /// True when no position coordinate is NaN.
    pub fn is_dense(&self) -> bool {
        !self.xyz.iter().any(|v| v.is_nan())
    }

    /// Re-check column shapes. The columns are public, so this runs before
    /// every encode.
    pub(crate) fn check_columns(&self) -> Result<(), Error> {
        if self.xyz.ncols() != 3 {
            return Err(Error::ColumnLength {
                column: "xyz",
                expected: 3,
                found: self.xyz.ncols(),
            });
        }
        if let Some(rgb) = &self.rgb {
            check_rows("rgb", self.len(), rgb.nrows())?;
            if rgb.ncols() != 3 {
                return Err(Error::ColumnLength {
                    column: "rgb",
                    expected: 3,
                    found: rgb.ncols(),
                });
            }
        }
        if let Some(intensity) = &self.intensity {
            check_rows("intensity", self.len(), intensity.len())?;
        }
        Ok(())
    }
}

fn check_rows(column: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected != found {
        return Err(Error::ColumnLength {
            column,
            expected,
            found,
        });
    }
    Ok(())
}
