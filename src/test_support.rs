// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Shared fixtures for unit tests.

use ndarray::{ArrayD, IxDyn};

use crate::archive::{Archive, FieldArray};
use crate::fields;

/// Build a schema-conforming archive with `rows` points and deterministic,
/// distinguishable values in every field.
pub(crate) fn sample_archive(rows: usize) -> Archive {
    let mut archive = Archive::new();

    let mut points = Vec::with_capacity(rows * 3);
    for row in 0..rows {
        points.push(row as f64 + 0.25);
        points.push(row as f64 + 0.5);
        points.push(row as f64 + 0.75);
    }
    archive.insert(
        fields::POINTS,
        FieldArray::Float(ArrayD::from_shape_vec(IxDyn(&[rows, 3]), points).unwrap()),
    );

    let float_attr = |scale: f64| {
        let values: Vec<f64> = (0..rows).map(|row| row as f64 * scale).collect();
        FieldArray::Float(ArrayD::from_shape_vec(IxDyn(&[rows]), values).unwrap())
    };
    archive.insert(fields::AZIMUTH, float_attr(0.1));
    archive.insert(fields::COL, float_attr(2.0));
    archive.insert(fields::DEPTH, float_attr(1.5));
    archive.insert(fields::DISTANCE, float_attr(3.0));
    archive.insert(fields::ROW, float_attr(1.0));

    let int_attr = |offset: i64| {
        let values: Vec<i64> = (0..rows).map(|row| row as i64 + offset).collect();
        FieldArray::Int(ArrayD::from_shape_vec(IxDyn(&[rows]), values).unwrap())
    };
    archive.insert(fields::BOUNDARY, int_attr(0));
    archive.insert(fields::LIDAR_ID, int_attr(1));
    archive.insert(fields::RECTIME, int_attr(1_554_130_776_000_000));
    archive.insert(fields::REFLECTANCE, int_attr(40));
    archive.insert(fields::TIMESTAMP, int_attr(1_554_130_776_000_000));

    archive.insert(
        fields::VALID,
        FieldArray::Bool(ArrayD::from_elem(IxDyn(&[rows]), true)),
    );

    archive
}
