// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! A2D2 Dataset Conversion Library
//!
//! This library converts A2D2 sensor dataset recordings — per-sensor JSON
//! calibration plus archived multi-field point cloud arrays — into
//! ROS-compatible message structures: packed binary point clouds,
//! coordinate-frame transforms, and the ego vehicle bounding-box shape.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Archive    │ ──► │  validate()  │ ──► │  RecordIter  │
//! │ (12 arrays)  │     │ (pre-flight) │     │ (lock-step)  │
//! └──────────────┘     └──────────────┘     └──────┬───────┘
//!                                                  ▼
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ calibration  │ ──► │ orthonormal  │     │ build_cloud  │
//! │  JSON (DOM)  │     │    basis     │     │ (52B stride) │
//! └──────────────┘     └──────┬───────┘     └──────────────┘
//!                             ▼
//!                      ┌──────────────┐
//!                      │ TF + shape   │
//!                      │  messages    │
//!                      └──────────────┘
//! ```
//!
//! The caller owns all file I/O and transport: this crate consumes
//! already-parsed arrays and JSON documents and produces in-memory
//! messages only. Validation always runs before encoding; no partial
//! output is ever produced for a rejected capture.
//!
//! # Modules
//!
//! - [`archive`]: archive table and pre-flight validation
//! - [`records`]: synchronized per-row record iteration
//! - [`formats`]: packed point cloud encoding
//! - [`fields`]: canonical field tables and wire layout
//! - [`transform`]: sensor pose geometry from calibration axes
//! - [`calib`]: calibration document access and frame naming
//! - [`bbox`]: ego vehicle bounding box shape
//! - [`time`]: dataset timestamp conversion
//! - [`msg`]: message types and CDR encoding
//! - [`convert`]: one-shot archive-to-cloud conversion
//!
//! # Example
//!
//! ```ignore
//! use a2d2ros::{archive_to_cloud, Archive, ValidateOptions};
//!
//! let archive: Archive = load_npz(path)?; // caller-provided reader
//! let msg = archive_to_cloud(
//!     &archive,
//!     "cameras_front_center",
//!     capture_time_us,
//!     &ValidateOptions::default(),
//! )?;
//! ```

pub mod archive;
pub mod bbox;
pub mod calib;
pub mod convert;
pub mod fields;
pub mod formats;
pub mod msg;
pub mod records;
pub mod time;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenience
pub use archive::{any_points_invalid, validate, Archive, FieldArray, ValidateOptions, ValidationError};
pub use convert::archive_to_cloud;
pub use fields::{PointFieldType, FIELD_NAMES, POINT_STEP};
pub use records::{PointRecord, RecordIter};
pub use transform::{orthonormal_basis, sensor_pose, SensorPose};
