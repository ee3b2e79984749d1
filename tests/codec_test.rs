// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Encode/decode integration tests over randomized point sets.

use edgefirst_pointcloud::{
    decode, decode_with, encode,
    formats::{point_field, Channel},
    Config, Error, PointFieldType, PointSet, RecordLayout,
};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Point counts covering empty, single, and odd-sized clouds
const SIZES: [usize; 5] = [0, 1, 7, 256, 26_000];

fn random_xyz(rng: &mut StdRng, n_points: usize) -> Array2<f32> {
    Array2::from_shape_fn((n_points, 3), |_| rng.gen_range(-100.0f32..100.0))
}

fn random_rgb(rng: &mut StdRng, n_points: usize) -> Array2<u8> {
    Array2::from_shape_fn((n_points, 3), |_| rng.gen::<u8>())
}

fn random_intensity(rng: &mut StdRng, n_points: usize) -> Array1<u16> {
    Array1::from_shape_fn(n_points, |_| rng.gen::<u16>())
}

#[test]
fn test_roundtrip_xyz() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for n_points in SIZES {
        let points = PointSet::new(random_xyz(&mut rng, n_points)).unwrap();
        let cloud = encode(&points).unwrap();
        assert_eq!(cloud.layout.point_step, 12);
        assert_eq!(cloud.data.len(), 12 * n_points);

        let decoded = decode(&cloud.data, &cloud.layout).unwrap();
        assert_eq!(decoded.xyz, points.xyz, "n_points = {}", n_points);
        assert!(decoded.rgb.is_none());
        assert!(decoded.intensity.is_none());
    }
}

#[test]
fn test_roundtrip_rgb() {
    let mut rng = StdRng::seed_from_u64(1);

    for n_points in SIZES {
        let points = PointSet::new(random_xyz(&mut rng, n_points))
            .unwrap()
            .with_rgb(random_rgb(&mut rng, n_points))
            .unwrap();
        let cloud = encode(&points).unwrap();
        assert_eq!(cloud.layout.point_step, 16);

        let decoded = decode(&cloud.data, &cloud.layout).unwrap();
        assert_eq!(decoded, points, "n_points = {}", n_points);
    }
}

#[test]
fn test_rgb_wire_order() {
    let points = PointSet::from_xyz(vec![[0.0; 3]; 2])
        .with_rgb(Array2::from(vec![[255u8, 128, 1], [9, 8, 7]]))
        .unwrap();
    let cloud = encode(&points).unwrap();

    // Blue, green, red on the wire
    assert_eq!(cloud.data[12..15], [1u8, 128, 255]);
    assert_eq!(cloud.data[28..31], [7u8, 8, 9]);
}

#[test]
fn test_roundtrip_intensity() {
    let mut rng = StdRng::seed_from_u64(2);

    for n_points in SIZES {
        let points = PointSet::new(random_xyz(&mut rng, n_points))
            .unwrap()
            .with_intensity(random_intensity(&mut rng, n_points))
            .unwrap();
        let cloud = encode(&points).unwrap();
        assert_eq!(cloud.layout.point_step, 14);

        let decoded = decode(&cloud.data, &cloud.layout).unwrap();
        assert_eq!(decoded, points, "n_points = {}", n_points);
    }
}

#[test]
fn test_roundtrip_all_channels() {
    let mut rng = StdRng::seed_from_u64(3);

    for n_points in SIZES {
        let points = PointSet::new(random_xyz(&mut rng, n_points))
            .unwrap()
            .with_rgb(random_rgb(&mut rng, n_points))
            .unwrap()
            .with_intensity(random_intensity(&mut rng, n_points))
            .unwrap();
        let cloud = encode(&points).unwrap();
        assert_eq!(cloud.layout.point_step, 18);
        assert_eq!(cloud.row_step, 18 * n_points as u32);
        assert_eq!(cloud.width, n_points as u32);

        let decoded = decode(&cloud.data, &cloud.layout).unwrap();
        assert_eq!(decoded, points, "n_points = {}", n_points);
    }
}

#[test]
fn test_density_flag() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut points = PointSet::new(random_xyz(&mut rng, 100)).unwrap();
    assert!(encode(&points).unwrap().is_dense);

    points.xyz[[57, 0]] = f32::NAN;
    let cloud = encode(&points).unwrap();
    assert!(!cloud.is_dense);

    // NaN survives the round trip bit-for-bit in position
    let decoded = decode(&cloud.data, &cloud.layout).unwrap();
    assert!(decoded.xyz[[57, 0]].is_nan());
    assert_eq!(decoded.xyz[[57, 1]], points.xyz[[57, 1]]);
}

#[test]
fn test_empty_input() {
    let cloud = encode(&PointSet::empty()).unwrap();
    assert!(cloud.data.is_empty());
    assert_eq!(cloud.width, 0);
    assert_eq!(cloud.row_step, 0);
    assert_eq!(cloud.height, 1);

    for channels in [
        Channel::Xyz.fields(0),
        [Channel::Xyz.fields(0), Channel::Rgb.fields(12)].concat(),
        [
            Channel::Xyz.fields(0),
            Channel::Rgb.fields(12),
            Channel::Intensity.fields(16),
        ]
        .concat(),
    ] {
        let layout = RecordLayout::new(18, false, channels);
        let points = decode(&[], &layout).unwrap();
        assert!(points.is_empty());
        assert_eq!(points.xyz.shape(), &[0, 3]);
    }
}

#[test]
fn test_malformed_buffer() {
    let mut rng = StdRng::seed_from_u64(5);
    let points = PointSet::new(random_xyz(&mut rng, 10))
        .unwrap()
        .with_intensity(random_intensity(&mut rng, 10))
        .unwrap();
    let cloud = encode(&points).unwrap();

    for truncate in [1, 7, 13] {
        let data = &cloud.data[..cloud.data.len() - truncate];
        let err = decode(data, &cloud.layout).unwrap_err();
        assert!(err.is_layout_error());
        assert!(matches!(err, Error::BufferLength { point_step: 14, .. }));
    }
}

#[test]
fn test_decode_foreign_layout() {
    // x, y, z, intensity as FLOAT32 (PCL XYZI) with trailing padding
    let mut fields = Channel::Xyz.fields(0);
    fields.push(point_field("intensity", 16, PointFieldType::FLOAT32));
    let layout = RecordLayout::new(32, false, fields);

    let mut data = vec![0u8; 64];
    data[0..4].copy_from_slice(&1.0f32.to_le_bytes());
    data[16..18].copy_from_slice(&77u16.to_le_bytes());
    data[36..40].copy_from_slice(&2.0f32.to_le_bytes());
    data[48..50].copy_from_slice(&88u16.to_le_bytes());

    let points = decode_with(&data, &layout, &Config::default()).unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points.xyz[[0, 0]], 1.0);
    assert_eq!(points.xyz[[1, 1]], 2.0);
    assert_eq!(points.intensity.unwrap().to_vec(), vec![77, 88]);
    assert!(points.rgb.is_none());
}
