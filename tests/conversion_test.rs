// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! End-to-end conversion tests: archive arrays in, decoded messages out.

use a2d2ros::archive::{Archive, FieldArray, ValidateOptions};
use a2d2ros::msg::PointCloud2;
use a2d2ros::{archive_to_cloud, fields, ValidationError, POINT_STEP};
use itertools::izip;
use ndarray::{ArrayD, IxDyn};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Capture {
    points: Vec<[f64; 3]>,
    azimuth: Vec<f64>,
    depth: Vec<f64>,
    reflectance: Vec<i64>,
    timestamp: Vec<i64>,
    valid: Vec<bool>,
}

impl Capture {
    fn synthetic(rows: usize) -> Self {
        Capture {
            points: (0..rows)
                .map(|i| [i as f64 * 0.5, i as f64 * -0.25, 1.0 + i as f64 * 0.1])
                .collect(),
            azimuth: (0..rows).map(|i| i as f64 * 3.6).collect(),
            depth: (0..rows).map(|i| 2.0 + i as f64).collect(),
            reflectance: (0..rows).map(|i| (i % 200) as i64).collect(),
            timestamp: (0..rows)
                .map(|i| 1_554_130_776_000_000 + i as i64)
                .collect(),
            valid: (0..rows).map(|i| i != 2).collect(),
        }
    }

    fn into_archive(self) -> Archive {
        let rows = self.points.len();
        let mut archive = Archive::new();

        let flat: Vec<f64> = self.points.into_iter().flatten().collect();
        archive.insert(
            fields::POINTS,
            FieldArray::Float(ArrayD::from_shape_vec(IxDyn(&[rows, 3]), flat).unwrap()),
        );

        let float = |values: Vec<f64>| {
            FieldArray::Float(ArrayD::from_shape_vec(IxDyn(&[rows]), values).unwrap())
        };
        let int = |values: Vec<i64>| {
            FieldArray::Int(ArrayD::from_shape_vec(IxDyn(&[rows]), values).unwrap())
        };

        archive.insert(fields::AZIMUTH, float(self.azimuth));
        archive.insert(fields::COL, float((0..rows).map(|i| i as f64 * 2.0).collect()));
        archive.insert(fields::DEPTH, float(self.depth.clone()));
        archive.insert(fields::DISTANCE, float(self.depth));
        archive.insert(fields::ROW, float((0..rows).map(|i| i as f64).collect()));

        archive.insert(fields::BOUNDARY, int(vec![0; rows]));
        archive.insert(fields::LIDAR_ID, int(vec![3; rows]));
        archive.insert(
            fields::RECTIME,
            int(self.timestamp.iter().map(|t| t - 50).collect()),
        );
        archive.insert(fields::REFLECTANCE, int(self.reflectance));
        archive.insert(fields::TIMESTAMP, int(self.timestamp));

        archive.insert(
            fields::VALID,
            FieldArray::Bool(ArrayD::from_shape_vec(IxDyn(&[rows]), self.valid).unwrap()),
        );

        archive
    }
}

fn field_offset(msg: &PointCloud2, name: &str) -> usize {
    msg.fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.offset as usize)
        .unwrap_or_else(|| panic!("field {} not declared", name))
}

#[test]
fn test_full_conversion_round_trip() {
    init_logging();

    let rows = 16;
    let capture = Capture::synthetic(rows);
    let expected_points = capture.points.clone();
    let expected_azimuth = capture.azimuth.clone();
    let expected_reflectance = capture.reflectance.clone();
    let expected_timestamp = capture.timestamp.clone();

    let archive = capture.into_archive();
    let msg = archive_to_cloud(
        &archive,
        "cameras_front_center",
        1_554_130_776_500_000,
        &ValidateOptions::default(),
    )
    .unwrap();

    assert_eq!(msg.width as usize, rows);
    assert_eq!(msg.point_step as usize, POINT_STEP);
    assert_eq!(msg.data.len(), rows * POINT_STEP);
    assert_eq!(msg.row_step, 3 * msg.point_step);
    assert!(!msg.is_bigendian);
    // one point carries a false valid flag
    assert!(!msg.is_dense);

    let x_off = field_offset(&msg, "x");
    let y_off = field_offset(&msg, "y");
    let z_off = field_offset(&msg, "z");
    let azimuth_off = field_offset(&msg, fields::AZIMUTH);
    let reflectance_off = field_offset(&msg, fields::REFLECTANCE);
    let timestamp_off = field_offset(&msg, fields::TIMESTAMP);

    let read_f32 = |base: usize, off: usize| {
        f32::from_le_bytes(msg.data[base + off..base + off + 4].try_into().unwrap())
    };
    let read_u64 = |base: usize, off: usize| {
        u64::from_le_bytes(msg.data[base + off..base + off + 8].try_into().unwrap())
    };

    for (i, (point, azimuth, reflectance, timestamp)) in izip!(
        &expected_points,
        &expected_azimuth,
        &expected_reflectance,
        &expected_timestamp
    )
    .enumerate()
    {
        let base = i * POINT_STEP;
        assert_eq!(read_f32(base, x_off), point[0] as f32);
        assert_eq!(read_f32(base, y_off), point[1] as f32);
        assert_eq!(read_f32(base, z_off), point[2] as f32);
        assert_eq!(read_f32(base, azimuth_off), *azimuth as f32);
        assert_eq!(msg.data[base + reflectance_off], *reflectance as u8);
        assert_eq!(read_u64(base, timestamp_off), *timestamp as u64);
    }
}

#[test]
fn test_rejected_archive_produces_no_cloud() {
    init_logging();

    let mut archive = Capture::synthetic(4).into_archive();
    archive.insert(
        fields::DISTANCE,
        FieldArray::Float(
            ArrayD::from_shape_vec(IxDyn(&[4]), vec![1.0, 2.0, -3.0, 4.0]).unwrap(),
        ),
    );

    let result = archive_to_cloud(
        &archive,
        "cameras_front_center",
        1_554_130_776_500_000,
        &ValidateOptions::default(),
    );
    assert_eq!(
        result.unwrap_err(),
        ValidationError::NegativeValue {
            field: fields::DISTANCE.to_string(),
            value: -3.0
        }
    );
}

#[test]
fn test_cloud_message_survives_cdr() {
    init_logging();

    let archive = Capture::synthetic(3).into_archive();
    let msg = archive_to_cloud(
        &archive,
        "cameras_front_center",
        1_554_130_776_500_000,
        &ValidateOptions::default(),
    )
    .unwrap();

    let bytes = a2d2ros::msg::to_cdr(&msg).unwrap();
    let decoded: PointCloud2 = cdr::deserialize(&bytes).unwrap();
    assert_eq!(decoded, msg);
}
