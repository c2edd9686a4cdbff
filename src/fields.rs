// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Canonical archive field tables and the packed wire layout.
//!
//! An archive carries exactly twelve arrays: one rank-2 points array plus
//! eleven rank-1 per-point attributes. The encoded cloud carries fourteen
//! channels because the points array contributes x, y, and z separately.
//!
//! # Wire layout (little-endian, per point)
//!
//! ```text
//! ┌───────┬───────┬───────┬─────────┬──────────┬───────┬─────────┬──────────┐
//! │ x:f32 │ y:f32 │ z:f32 │ azi:f32 │ bound:u8 │ col:f32│ dep:f32 │ dist:f32 │
//! │ 0     │ 4     │ 8     │ 12      │ 16       │ 17    │ 21      │ 25       │
//! ├───────┼───────┼───────┼─────────┼──────────┼───────┼─────────┼──────────┤
//! │ id:u8 │ rectime:u64   │ refl:u8 │ row:f32  │ timestamp:u64 │ valid:u8  │
//! │ 29    │ 30            │ 38      │ 39       │ 43            │ 51        │
//! └───────┴───────────────┴─────────┴──────────┴───────────────┴───────────┘
//! ```
//!
//! Offsets and the point step are derived from the width table at compile
//! time rather than hardcoded, so a layout change cannot leave them stale.

/// Point field data types for point cloud messages.
///
/// These values correspond to the sensor_msgs/PointField datatype field.
/// All variants are defined for completeness, even if not all are currently
/// used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(dead_code)]
pub enum PointFieldType {
    INT8 = 1,
    UINT8 = 2,
    INT16 = 3,
    UINT16 = 4,
    INT32 = 5,
    UINT32 = 6,
    FLOAT32 = 7,
    FLOAT64 = 8,
}

/// Archive field names, in canonical (sorted) order.
pub const POINTS: &str = "pcloud_points";
pub const AZIMUTH: &str = "pcloud_attr.azimuth";
pub const BOUNDARY: &str = "pcloud_attr.boundary";
pub const COL: &str = "pcloud_attr.col";
pub const DEPTH: &str = "pcloud_attr.depth";
pub const DISTANCE: &str = "pcloud_attr.distance";
pub const LIDAR_ID: &str = "pcloud_attr.lidar_id";
pub const RECTIME: &str = "pcloud_attr.rectime";
pub const REFLECTANCE: &str = "pcloud_attr.reflectance";
pub const ROW: &str = "pcloud_attr.row";
pub const TIMESTAMP: &str = "pcloud_attr.timestamp";
pub const VALID: &str = "pcloud_attr.valid";

/// The complete expected field set of one archive.
pub const FIELD_NAMES: [&str; 12] = [
    POINTS, AZIMUTH, BOUNDARY, COL, DEPTH, DISTANCE, LIDAR_ID, RECTIME, REFLECTANCE, ROW,
    TIMESTAMP, VALID,
];

/// Storage class of an archive array as read from the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DtypeClass {
    /// 64-bit IEEE float
    Float,
    /// 64-bit signed integer
    Int,
    /// boolean
    Bool,
}

impl std::fmt::Display for DtypeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DtypeClass::Float => write!(f, "float64"),
            DtypeClass::Int => write!(f, "int64"),
            DtypeClass::Bool => write!(f, "bool"),
        }
    }
}

/// Expected storage class for each archive field.
pub fn expected_dtype(field: &str) -> Option<DtypeClass> {
    match field {
        POINTS | AZIMUTH | COL | DEPTH | DISTANCE | ROW => Some(DtypeClass::Float),
        BOUNDARY | LIDAR_ID | RECTIME | REFLECTANCE | TIMESTAMP => Some(DtypeClass::Int),
        VALID => Some(DtypeClass::Bool),
        _ => None,
    }
}

/// One channel of the packed point layout.
pub struct WireField {
    pub name: &'static str,
    pub width: usize,
    pub datatype: PointFieldType,
}

/// Encoded channels in declared order. The points array contributes x/y/z;
/// attribute channels keep their archive names. PointField has no 64-bit
/// integer type, so rectime and timestamp carry the FLOAT64 tag; booleans
/// are carried as u8.
pub const WIRE_FIELDS: [WireField; 14] = [
    WireField {
        name: "x",
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: "y",
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: "z",
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: AZIMUTH,
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: BOUNDARY,
        width: 1,
        datatype: PointFieldType::UINT8,
    },
    WireField {
        name: COL,
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: DEPTH,
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: DISTANCE,
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: LIDAR_ID,
        width: 1,
        datatype: PointFieldType::UINT8,
    },
    WireField {
        name: RECTIME,
        width: 8,
        datatype: PointFieldType::FLOAT64,
    },
    WireField {
        name: REFLECTANCE,
        width: 1,
        datatype: PointFieldType::UINT8,
    },
    WireField {
        name: ROW,
        width: 4,
        datatype: PointFieldType::FLOAT32,
    },
    WireField {
        name: TIMESTAMP,
        width: 8,
        datatype: PointFieldType::FLOAT64,
    },
    WireField {
        name: VALID,
        width: 1,
        datatype: PointFieldType::UINT8,
    },
];

/// Byte offset of the wire field at `index`, accumulated from the widths
/// of all preceding fields.
pub const fn wire_offset(index: usize) -> usize {
    let mut i = 0;
    let mut offset = 0;
    while i < index {
        offset += WIRE_FIELDS[i].width;
        i += 1;
    }
    offset
}

/// Bytes occupied by one packed point: the sum of all channel widths.
pub const POINT_STEP: usize = wire_offset(WIRE_FIELDS.len());

pub(crate) const X_OFFSET: usize = wire_offset(0);
pub(crate) const Y_OFFSET: usize = wire_offset(1);
pub(crate) const Z_OFFSET: usize = wire_offset(2);
pub(crate) const AZIMUTH_OFFSET: usize = wire_offset(3);
pub(crate) const BOUNDARY_OFFSET: usize = wire_offset(4);
pub(crate) const COL_OFFSET: usize = wire_offset(5);
pub(crate) const DEPTH_OFFSET: usize = wire_offset(6);
pub(crate) const DISTANCE_OFFSET: usize = wire_offset(7);
pub(crate) const LIDAR_ID_OFFSET: usize = wire_offset(8);
pub(crate) const RECTIME_OFFSET: usize = wire_offset(9);
pub(crate) const REFLECTANCE_OFFSET: usize = wire_offset(10);
pub(crate) const ROW_OFFSET: usize = wire_offset(11);
pub(crate) const TIMESTAMP_OFFSET: usize = wire_offset(12);
pub(crate) const VALID_OFFSET: usize = wire_offset(13);
