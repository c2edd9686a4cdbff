// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! ROS-compatible message types and CDR wire encoding.
//!
//! These structs mirror the `std_msgs`, `sensor_msgs`, `geometry_msgs`,
//! `tf2_msgs`, and `shape_msgs` definitions used by downstream consumers.
//! Field order matters: CDR serialization is positional, so the struct
//! layouts here are the wire contract.

use serde::{Deserialize, Serialize};

/// Split time value: whole seconds plus nanoseconds within the second.
///
/// Seconds are unsigned 32-bit, which bounds representable dataset
/// timestamps to Feb 7 2106 06:28:16 UTC. See [`crate::time`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Time {
    pub sec: u32,
    pub nanosec: u32,
}

/// Standard message header: timestamp plus originating frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

/// Describes one channel of a point cloud buffer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointField {
    pub name: String,
    pub offset: u32,
    pub datatype: u8,
    pub count: u32,
}

/// Packed binary point cloud message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointCloud2 {
    pub header: Header,
    pub height: u32,
    pub width: u32,
    pub fields: Vec<PointField>,
    pub is_bigendian: bool,
    pub point_step: u32,
    pub row_step: u32,
    pub data: Vec<u8>,
    pub is_dense: bool,
}

/// 3D translation vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Rotation as a unit quaternion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// Rigid transform: translation then rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,
}

/// A transform between two named frames at a point in time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub transform: Transform,
}

/// A batch of stamped transforms.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TFMessage {
    pub transforms: Vec<TransformStamped>,
}

/// Primitive shape descriptor. Only the box type is produced here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolidPrimitive {
    pub primitive_type: u8,
    pub dimensions: Vec<f64>,
}

impl SolidPrimitive {
    pub const BOX: u8 = 1;

    pub const BOX_X: usize = 0;
    pub const BOX_Y: usize = 1;
    pub const BOX_Z: usize = 2;
}

/// Serialize a message to little-endian CDR bytes for transport or storage.
pub fn to_cdr<T: Serialize>(msg: &T) -> Result<Vec<u8>, cdr::Error> {
    cdr::serialize::<_, _, cdr::CdrLe>(msg, cdr::Infinite)
}
