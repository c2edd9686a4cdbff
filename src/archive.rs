// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Point cloud archive table and pre-flight validation.
//!
//! An [`Archive`] is the in-memory form of one multi-array capture file:
//! a mapping from the twelve canonical field names to typed numeric arrays.
//! Nothing downstream (record iteration, encoding) may run until
//! [`validate`] has accepted the archive; every failure carries the
//! offending field and the observed-vs-expected values so a conversion run
//! can report exactly why a capture was rejected.
//!
//! Validation proceeds in ordered step groups and completes each scan
//! across all fields before failing, so e.g. a missing-field report names
//! every absent field rather than the first one found.

use std::collections::BTreeMap;
use std::fmt;

use log::warn;
use ndarray::{ArrayD, ArrayView1, ArrayView2, Ix1, Ix2};

use crate::fields::{self, DtypeClass};
use crate::time::{valid_timestamp, TIMESTAMP_LIMIT};

/// One archive array with its storage class.
#[derive(Clone, Debug)]
pub enum FieldArray {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
    Bool(ArrayD<bool>),
}

impl FieldArray {
    pub fn dtype(&self) -> DtypeClass {
        match self {
            FieldArray::Float(_) => DtypeClass::Float,
            FieldArray::Int(_) => DtypeClass::Int,
            FieldArray::Bool(_) => DtypeClass::Bool,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            FieldArray::Float(a) => a.shape(),
            FieldArray::Int(a) => a.shape(),
            FieldArray::Bool(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Row count: the leading dimension.
    pub fn rows(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }
}

/// A named collection of numeric arrays from one capture.
#[derive(Clone, Debug, Default)]
pub struct Archive {
    fields: BTreeMap<String, FieldArray>,
}

impl Archive {
    pub fn new() -> Self {
        Archive::default()
    }

    /// Build an archive from named arrays.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, FieldArray)>,
    {
        Archive {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, array: FieldArray) {
        self.fields.insert(name.into(), array);
    }

    pub fn get(&self, name: &str) -> Option<&FieldArray> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldArray)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The points array as a rank-2 float view, if present and well-shaped.
    pub fn points_view(&self) -> Option<ArrayView2<'_, f64>> {
        match self.get(fields::POINTS)? {
            FieldArray::Float(a) => a.view().into_dimensionality::<Ix2>().ok(),
            _ => None,
        }
    }

    /// A rank-1 float attribute view.
    pub fn float_view(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        match self.get(name)? {
            FieldArray::Float(a) => a.view().into_dimensionality::<Ix1>().ok(),
            _ => None,
        }
    }

    /// A rank-1 integer attribute view.
    pub fn int_view(&self, name: &str) -> Option<ArrayView1<'_, i64>> {
        match self.get(name)? {
            FieldArray::Int(a) => a.view().into_dimensionality::<Ix1>().ok(),
            _ => None,
        }
    }

    /// A rank-1 boolean attribute view.
    pub fn bool_view(&self, name: &str) -> Option<ArrayView1<'_, bool>> {
        match self.get(name)? {
            FieldArray::Bool(a) => a.view().into_dimensionality::<Ix1>().ok(),
            _ => None,
        }
    }
}

/// Why an archive was rejected.
///
/// Structure variants cover the field set and array shapes; semantic
/// variants cover element-level sign and range rules.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationError {
    /// Wrong number of fields in the archive.
    FieldCount { expected: usize, actual: usize },
    /// One or more required fields are absent; lists every missing name.
    MissingFields(Vec<String>),
    /// Points array does not have exactly two dimensions.
    PointsRank(usize),
    /// Points array rows do not have exactly three components.
    PointsColumns(usize),
    /// Attribute array does not have exactly one dimension.
    FieldRank { field: String, actual: usize },
    /// Attribute length disagrees with the points row count.
    RowCount {
        field: String,
        expected: usize,
        actual: usize,
    },
    /// Array storage class differs from the schema.
    DtypeMismatch {
        field: String,
        expected: DtypeClass,
        actual: DtypeClass,
    },
    /// Integer field contains a negative element.
    NegativeInteger { field: String, value: i64 },
    /// Float field contains a negative element.
    NegativeValue { field: String, value: f64 },
    /// Timestamp whose seconds component overflows 32 bits.
    TimestampRange { value: u64, limit: u64 },
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationError::FieldCount { expected, actual } => {
                write!(
                    f,
                    "expected archive to have {} fields, but it has {}",
                    expected, actual
                )
            }
            ValidationError::MissingFields(names) => {
                write!(f, "archive is missing fields: {}", names.join(", "))
            }
            ValidationError::PointsRank(actual) => {
                write!(
                    f,
                    "points array must have exactly two dimensions, instead it has {}",
                    actual
                )
            }
            ValidationError::PointsColumns(actual) => {
                write!(
                    f,
                    "points must have three components, instead they have {}",
                    actual
                )
            }
            ValidationError::FieldRank { field, actual } => {
                write!(
                    f,
                    "expected {} to have exactly one dimension, instead it has {}",
                    field, actual
                )
            }
            ValidationError::RowCount {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "expected {} to have exactly {} rows, instead it has {}",
                    field, expected, actual
                )
            }
            ValidationError::DtypeMismatch {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "expected {} to be {}, instead it is {}",
                    field, expected, actual
                )
            }
            ValidationError::NegativeInteger { field, value } => {
                write!(
                    f,
                    "expected {} to be strictly non-negative, instead it contains {}",
                    field, value
                )
            }
            ValidationError::NegativeValue { field, value } => {
                write!(
                    f,
                    "expected {} to be strictly non-negative, instead it contains {}",
                    field, value
                )
            }
            ValidationError::TimestampRange { value, limit } => {
                write!(
                    f,
                    "timestamp {} has unsupported magnitude: timestamps on or after {} \
                     (Feb 7 2106 06:28:16 UTC) cannot be represented",
                    value, limit
                )
            }
        }
    }
}

/// Validation policy knobs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidateOptions {
    /// Also require row/col image indices to be non-negative. The dataset
    /// documentation does not state whether negative indices are legal, so
    /// this is off by default; a lenient pass still warns when negatives
    /// are present.
    pub enforce_row_col_sign: bool,
}

/// Check an archive against the fixed 12-field schema.
///
/// Steps, in order: field set, points shape, per-field rank and row count,
/// storage classes, sign constraints, timestamp range. The first failing
/// step group aborts with a single terminal reason; callers must not
/// proceed to iteration or encoding on any failure.
pub fn validate(archive: &Archive, options: &ValidateOptions) -> Result<(), ValidationError> {
    check_field_set(archive)?;
    let expected_rows = check_points_shape(archive)?;
    check_attribute_shapes(archive, expected_rows)?;
    check_dtypes(archive)?;
    check_signs(archive, options)?;
    check_timestamp_range(archive)?;
    Ok(())
}

fn check_field_set(archive: &Archive) -> Result<(), ValidationError> {
    if archive.len() != fields::FIELD_NAMES.len() {
        return Err(ValidationError::FieldCount {
            expected: fields::FIELD_NAMES.len(),
            actual: archive.len(),
        });
    }

    let missing: Vec<String> = fields::FIELD_NAMES
        .iter()
        .filter(|name| archive.get(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }
    Ok(())
}

fn check_points_shape(archive: &Archive) -> Result<usize, ValidationError> {
    // field set check guarantees presence
    let points = archive
        .get(fields::POINTS)
        .expect("field set checked before shapes");

    if points.ndim() != 2 {
        return Err(ValidationError::PointsRank(points.ndim()));
    }
    if points.shape()[1] != 3 {
        return Err(ValidationError::PointsColumns(points.shape()[1]));
    }
    Ok(points.rows())
}

fn check_attribute_shapes(archive: &Archive, expected_rows: usize) -> Result<(), ValidationError> {
    for (name, array) in archive.iter() {
        if name == fields::POINTS {
            continue;
        }
        if array.ndim() != 1 {
            return Err(ValidationError::FieldRank {
                field: name.to_string(),
                actual: array.ndim(),
            });
        }
        if array.rows() != expected_rows {
            return Err(ValidationError::RowCount {
                field: name.to_string(),
                expected: expected_rows,
                actual: array.rows(),
            });
        }
    }
    Ok(())
}

fn check_dtypes(archive: &Archive) -> Result<(), ValidationError> {
    for (name, array) in archive.iter() {
        let expected = fields::expected_dtype(name).expect("field set checked before dtypes");
        if array.dtype() != expected {
            return Err(ValidationError::DtypeMismatch {
                field: name.to_string(),
                expected,
                actual: array.dtype(),
            });
        }
    }
    Ok(())
}

fn check_signs(archive: &Archive, options: &ValidateOptions) -> Result<(), ValidationError> {
    for name in [fields::TIMESTAMP, fields::RECTIME, fields::LIDAR_ID] {
        let view = archive.int_view(name).expect("dtypes checked before signs");
        if let Some(&value) = view.iter().find(|&&v| v < 0) {
            return Err(ValidationError::NegativeInteger {
                field: name.to_string(),
                value,
            });
        }
    }

    for name in [fields::DEPTH, fields::DISTANCE] {
        let view = archive
            .float_view(name)
            .expect("dtypes checked before signs");
        if let Some(&value) = view.iter().find(|&&v| v < 0.0) {
            return Err(ValidationError::NegativeValue {
                field: name.to_string(),
                value,
            });
        }
    }

    for name in [fields::ROW, fields::COL] {
        let view = archive
            .float_view(name)
            .expect("dtypes checked before signs");
        if let Some(&value) = view.iter().find(|&&v| v < 0.0) {
            if options.enforce_row_col_sign {
                return Err(ValidationError::NegativeValue {
                    field: name.to_string(),
                    value,
                });
            }
            warn!("{} contains negative value {}; not enforced", name, value);
        }
    }
    Ok(())
}

fn check_timestamp_range(archive: &Archive) -> Result<(), ValidationError> {
    let view = archive
        .int_view(fields::TIMESTAMP)
        .expect("dtypes checked before range");
    for &value in view.iter() {
        // sign check guarantees the cast is lossless
        let value = value as u64;
        if !valid_timestamp(value) {
            return Err(ValidationError::TimestampRange {
                value,
                limit: TIMESTAMP_LIMIT,
            });
        }
    }
    Ok(())
}

/// Whether any element of the `valid` field is false.
///
/// A read-only scan, not a filter: invalid points stay in the cloud and
/// only affect the density flag.
pub fn any_points_invalid(archive: &Archive) -> bool {
    match archive.bool_view(fields::VALID) {
        Some(view) => view.iter().any(|&v| !v),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_archive;
    use ndarray::{ArrayD, IxDyn};

    fn opts() -> ValidateOptions {
        ValidateOptions::default()
    }

    #[test]
    fn test_valid_archive_accepted() {
        let archive = sample_archive(4);
        assert_eq!(validate(&archive, &opts()), Ok(()));
    }

    #[test]
    fn test_missing_field_reported_by_name() {
        let mut archive = sample_archive(4);
        archive.fields.remove(fields::VALID);

        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FieldCount {
                expected: 12,
                actual: 11
            }
        );

        // same count, wrong name: the missing-field report must name `valid`
        archive.insert(
            "pcloud_attr.bogus",
            FieldArray::Bool(ArrayD::from_elem(IxDyn(&[4]), true)),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![fields::VALID.to_string()])
        );
    }

    #[test]
    fn test_wrong_points_columns_rejected() {
        let mut archive = sample_archive(10);
        archive.insert(
            fields::POINTS,
            FieldArray::Float(ArrayD::zeros(IxDyn(&[10, 2]))),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(err, ValidationError::PointsColumns(2));
    }

    #[test]
    fn test_wrong_points_rank_rejected() {
        let mut archive = sample_archive(10);
        archive.insert(
            fields::POINTS,
            FieldArray::Float(ArrayD::zeros(IxDyn(&[10, 3, 1]))),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(err, ValidationError::PointsRank(3));
    }

    #[test]
    fn test_attribute_rank_and_row_count() {
        let mut archive = sample_archive(4);
        archive.insert(
            fields::AZIMUTH,
            FieldArray::Float(ArrayD::zeros(IxDyn(&[4, 1]))),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FieldRank {
                field: fields::AZIMUTH.to_string(),
                actual: 2
            }
        );

        let mut archive = sample_archive(4);
        archive.insert(
            fields::DEPTH,
            FieldArray::Float(ArrayD::zeros(IxDyn(&[3]))),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RowCount {
                field: fields::DEPTH.to_string(),
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_dtype_mismatch_rejected() {
        let mut archive = sample_archive(4);
        archive.insert(
            fields::TIMESTAMP,
            FieldArray::Float(ArrayD::zeros(IxDyn(&[4]))),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DtypeMismatch {
                field: fields::TIMESTAMP.to_string(),
                expected: DtypeClass::Int,
                actual: DtypeClass::Float,
            }
        );
    }

    #[test]
    fn test_negative_timestamp_rejected() {
        let mut archive = sample_archive(4);
        archive.insert(
            fields::TIMESTAMP,
            FieldArray::Int(ArrayD::from_shape_vec(IxDyn(&[4]), vec![1, 2, -3, 4]).unwrap()),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeInteger {
                field: fields::TIMESTAMP.to_string(),
                value: -3
            }
        );
    }

    #[test]
    fn test_negative_distance_rejected() {
        let mut archive = sample_archive(4);
        archive.insert(
            fields::DISTANCE,
            FieldArray::Float(
                ArrayD::from_shape_vec(IxDyn(&[4]), vec![1.0, -0.5, 2.0, 3.0]).unwrap(),
            ),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                field: fields::DISTANCE.to_string(),
                value: -0.5
            }
        );
    }

    #[test]
    fn test_row_col_sign_policy() {
        let mut archive = sample_archive(4);
        archive.insert(
            fields::ROW,
            FieldArray::Float(
                ArrayD::from_shape_vec(IxDyn(&[4]), vec![0.0, -1.0, 2.0, 3.0]).unwrap(),
            ),
        );

        // permissive by default
        assert_eq!(validate(&archive, &opts()), Ok(()));

        let strict = ValidateOptions {
            enforce_row_col_sign: true,
        };
        let err = validate(&archive, &strict).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NegativeValue {
                field: fields::ROW.to_string(),
                value: -1.0
            }
        );
    }

    #[test]
    fn test_timestamp_over_limit_rejected() {
        let mut archive = sample_archive(2);
        archive.insert(
            fields::TIMESTAMP,
            FieldArray::Int(
                ArrayD::from_shape_vec(IxDyn(&[2]), vec![1, 4294967296_000000]).unwrap(),
            ),
        );
        let err = validate(&archive, &opts()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TimestampRange {
                value: 4294967296_000000,
                limit: 4294967296_000000
            }
        );
    }

    #[test]
    fn test_any_points_invalid() {
        let archive = sample_archive(4);
        assert!(!any_points_invalid(&archive));

        let mut archive = sample_archive(4);
        archive.insert(
            fields::VALID,
            FieldArray::Bool(
                ArrayD::from_shape_vec(IxDyn(&[4]), vec![true, false, true, true]).unwrap(),
            ),
        );
        assert!(any_points_invalid(&archive));
    }
}
