// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Synchronized row iteration over a validated archive.
//!
//! A [`PointRecord`] is one row across all twelve archive arrays, already
//! narrowed to the storage types of the packed wire layout. [`RecordIter`]
//! holds non-owning views into the archive and advances all cursors in
//! lock-step, yielding rows in index order exactly once.

use ndarray::{ArrayView1, ArrayView2};

use crate::archive::{Archive, ValidationError};
use crate::fields;

/// One fully-populated point in wire storage types.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub azimuth: f32,
    pub boundary: u8,
    pub col: f32,
    pub depth: f32,
    pub distance: f32,
    pub lidar_id: u8,
    pub rectime: u64,
    pub reflectance: u8,
    pub row: f32,
    pub timestamp: u64,
    pub valid: u8,
}

/// Lock-step cursor over all archive fields.
///
/// Construction resolves every field by name; it fails if the archive has
/// not passed validation (missing field, wrong storage class, or wrong
/// points rank). Iteration itself cannot fail and yields exactly one
/// record per points row, in ascending row order.
pub struct RecordIter<'a> {
    points: ArrayView2<'a, f64>,
    azimuth: ArrayView1<'a, f64>,
    boundary: ArrayView1<'a, i64>,
    col: ArrayView1<'a, f64>,
    depth: ArrayView1<'a, f64>,
    distance: ArrayView1<'a, f64>,
    lidar_id: ArrayView1<'a, i64>,
    rectime: ArrayView1<'a, i64>,
    reflectance: ArrayView1<'a, i64>,
    row: ArrayView1<'a, f64>,
    timestamp: ArrayView1<'a, i64>,
    valid: ArrayView1<'a, bool>,
    cursor: usize,
    rows: usize,
}

impl<'a> RecordIter<'a> {
    /// Resolve all field views from a validated archive.
    pub fn new(archive: &'a Archive) -> Result<Self, ValidationError> {
        let points = archive
            .points_view()
            .ok_or_else(|| match archive.get(fields::POINTS) {
                Some(array) => ValidationError::PointsRank(array.ndim()),
                None => missing(fields::POINTS),
            })?;
        let rows = points.nrows();

        Ok(RecordIter {
            points,
            azimuth: float_view(archive, fields::AZIMUTH)?,
            boundary: int_view(archive, fields::BOUNDARY)?,
            col: float_view(archive, fields::COL)?,
            depth: float_view(archive, fields::DEPTH)?,
            distance: float_view(archive, fields::DISTANCE)?,
            lidar_id: int_view(archive, fields::LIDAR_ID)?,
            rectime: int_view(archive, fields::RECTIME)?,
            reflectance: int_view(archive, fields::REFLECTANCE)?,
            row: float_view(archive, fields::ROW)?,
            timestamp: int_view(archive, fields::TIMESTAMP)?,
            valid: bool_view(archive, fields::VALID)?,
            cursor: 0,
            rows,
        })
    }

    /// Rows remaining in front of the cursor.
    pub fn remaining(&self) -> usize {
        self.rows - self.cursor
    }
}

fn missing(name: &str) -> ValidationError {
    ValidationError::MissingFields(vec![name.to_string()])
}

/// Best-effort reason why resolving an attribute view failed: absent
/// field, wrong storage class, or wrong rank.
fn resolve_err(archive: &Archive, name: &str) -> ValidationError {
    match archive.get(name) {
        None => missing(name),
        Some(array) => match fields::expected_dtype(name) {
            Some(expected) if array.dtype() != expected => ValidationError::DtypeMismatch {
                field: name.to_string(),
                expected,
                actual: array.dtype(),
            },
            _ => ValidationError::FieldRank {
                field: name.to_string(),
                actual: array.ndim(),
            },
        },
    }
}

fn float_view<'a>(
    archive: &'a Archive,
    name: &str,
) -> Result<ArrayView1<'a, f64>, ValidationError> {
    archive
        .float_view(name)
        .ok_or_else(|| resolve_err(archive, name))
}

fn int_view<'a>(archive: &'a Archive, name: &str) -> Result<ArrayView1<'a, i64>, ValidationError> {
    archive
        .int_view(name)
        .ok_or_else(|| resolve_err(archive, name))
}

fn bool_view<'a>(
    archive: &'a Archive,
    name: &str,
) -> Result<ArrayView1<'a, bool>, ValidationError> {
    archive
        .bool_view(name)
        .ok_or_else(|| resolve_err(archive, name))
}

impl Iterator for RecordIter<'_> {
    type Item = PointRecord;

    fn next(&mut self) -> Option<PointRecord> {
        if self.cursor >= self.rows {
            return None;
        }
        let i = self.cursor;
        self.cursor += 1;

        Some(PointRecord {
            x: self.points[[i, 0]] as f32,
            y: self.points[[i, 1]] as f32,
            z: self.points[[i, 2]] as f32,
            azimuth: self.azimuth[i] as f32,
            // stored as 0/1 flags; any nonzero source value means set
            boundary: (self.boundary[i] != 0) as u8,
            col: self.col[i] as f32,
            depth: self.depth[i] as f32,
            distance: self.distance[i] as f32,
            lidar_id: self.lidar_id[i] as u8,
            rectime: self.rectime[i] as u64,
            reflectance: self.reflectance[i] as u8,
            row: self.row[i] as f32,
            timestamp: self.timestamp[i] as u64,
            valid: self.valid[i] as u8,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIter<'_> {}
