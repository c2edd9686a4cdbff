// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Packed point cloud encoding.
//!
//! This module converts point records into the packed little-endian binary
//! format required by PointCloud2 messages, using the fixed 52-byte layout
//! from [`crate::fields`]. Encoding is total: all input checking happens in
//! archive validation, never here.

use crate::fields::{
    AZIMUTH_OFFSET, BOUNDARY_OFFSET, COL_OFFSET, DEPTH_OFFSET, DISTANCE_OFFSET, LIDAR_ID_OFFSET,
    POINT_STEP, RECTIME_OFFSET, REFLECTANCE_OFFSET, ROW_OFFSET, TIMESTAMP_OFFSET, VALID_OFFSET,
    WIRE_FIELDS, X_OFFSET, Y_OFFSET, Z_OFFSET,
};
use crate::msg::{Header, PointCloud2, PointField};
use crate::records::PointRecord;
use crate::time::split_time;

/// Rows in the fixed output window. The archive format streams clouds in
/// three-point windows, so row_step is `3 * point_step` rather than the
/// full cloud width.
const ROW_WINDOW: u32 = 3;

/// Build the channel descriptor table for the packed layout.
///
/// Offsets accumulate over the declared field order; the table fully
/// describes the buffer for any downstream consumer.
pub fn cloud_fields() -> Vec<PointField> {
    let mut fields = Vec::with_capacity(WIRE_FIELDS.len());
    let mut offset = 0u32;
    for field in &WIRE_FIELDS {
        fields.push(PointField {
            name: String::from(field.name),
            offset,
            datatype: field.datatype as u8,
            count: 1,
        });
        offset += field.width as u32;
    }
    fields
}

/// Pack one record into its slot in the output buffer.
///
/// # Panics
///
/// Panics if `out` is shorter than one point step.
#[inline]
fn pack_record(record: &PointRecord, out: &mut [u8]) {
    out[X_OFFSET..X_OFFSET + 4].copy_from_slice(&record.x.to_le_bytes());
    out[Y_OFFSET..Y_OFFSET + 4].copy_from_slice(&record.y.to_le_bytes());
    out[Z_OFFSET..Z_OFFSET + 4].copy_from_slice(&record.z.to_le_bytes());
    out[AZIMUTH_OFFSET..AZIMUTH_OFFSET + 4].copy_from_slice(&record.azimuth.to_le_bytes());
    out[BOUNDARY_OFFSET] = record.boundary;
    out[COL_OFFSET..COL_OFFSET + 4].copy_from_slice(&record.col.to_le_bytes());
    out[DEPTH_OFFSET..DEPTH_OFFSET + 4].copy_from_slice(&record.depth.to_le_bytes());
    out[DISTANCE_OFFSET..DISTANCE_OFFSET + 4].copy_from_slice(&record.distance.to_le_bytes());
    out[LIDAR_ID_OFFSET] = record.lidar_id;
    out[RECTIME_OFFSET..RECTIME_OFFSET + 8].copy_from_slice(&record.rectime.to_le_bytes());
    out[REFLECTANCE_OFFSET] = record.reflectance;
    out[ROW_OFFSET..ROW_OFFSET + 4].copy_from_slice(&record.row.to_le_bytes());
    out[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 8].copy_from_slice(&record.timestamp.to_le_bytes());
    out[VALID_OFFSET] = record.valid;
}

/// Pack records into a fresh buffer of exactly `n * point_step` bytes.
pub fn encode_records<I>(records: I) -> Vec<u8>
where
    I: ExactSizeIterator<Item = PointRecord>,
{
    let mut data = vec![0u8; POINT_STEP * records.len()];
    for (index, record) in records.enumerate() {
        let offset = index * POINT_STEP;
        pack_record(&record, &mut data[offset..offset + POINT_STEP]);
    }
    data
}

/// Encode records into a complete point cloud message.
///
/// `stamp` is the capture timestamp in dataset microseconds, already
/// range-checked by archive validation. The buffer is little-endian, one
/// row high, `records.len()` points wide.
pub fn build_cloud<I>(records: I, frame_id: &str, stamp: u64, is_dense: bool) -> PointCloud2
where
    I: ExactSizeIterator<Item = PointRecord>,
{
    let width = records.len() as u32;
    let data = encode_records(records);

    PointCloud2 {
        header: Header {
            stamp: split_time(stamp),
            frame_id: String::from(frame_id),
        },
        height: 1,
        width,
        fields: cloud_fields(),
        is_bigendian: false,
        point_step: POINT_STEP as u32,
        row_step: ROW_WINDOW * POINT_STEP as u32,
        data,
        is_dense,
    }
}
