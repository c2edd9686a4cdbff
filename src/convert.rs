// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! One-shot archive-to-cloud conversion.
//!
//! Ties the pipeline together for a single capture: validate the archive,
//! scan point validity for the density flag, iterate records, and encode
//! the packed cloud message. Any validation failure aborts before a single
//! output byte is produced; there are no partial clouds.

use log::debug;

use crate::archive::{any_points_invalid, validate, Archive, ValidateOptions, ValidationError};
use crate::formats::build_cloud;
use crate::msg::PointCloud2;
use crate::records::RecordIter;
use crate::time::{valid_timestamp, TIMESTAMP_LIMIT};

/// Convert one validated capture into a point cloud message.
///
/// `capture_time_us` is the frame timestamp in dataset microseconds
/// (typically taken from the paired camera frame info) and must be
/// representable as split time. The cloud is dense iff every point in the
/// archive is marked valid; invalid points are kept, not filtered.
pub fn archive_to_cloud(
    archive: &Archive,
    frame_id: &str,
    capture_time_us: u64,
    options: &ValidateOptions,
) -> Result<PointCloud2, ValidationError> {
    if !valid_timestamp(capture_time_us) {
        return Err(ValidationError::TimestampRange {
            value: capture_time_us,
            limit: TIMESTAMP_LIMIT,
        });
    }

    validate(archive, options)?;

    let is_dense = !any_points_invalid(archive);
    let records = RecordIter::new(archive)?;
    debug!(
        "encoding {} points for frame {} (dense: {})",
        records.len(),
        frame_id,
        is_dense
    );

    Ok(build_cloud(records, frame_id, capture_time_us, is_dense))
}
