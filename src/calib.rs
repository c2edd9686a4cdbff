// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Sensor calibration access and frame naming.
//!
//! The calibration document is keyed by sensor category ("lidars" or
//! "cameras"), then mounting position, and stores each sensor's view as
//! two axis vectors and an origin:
//!
//! ```json
//! { "lidars": { "front_center": { "view": {
//!       "x-axis": [1.0, 0.0, 0.0],
//!       "y-axis": [0.0, 1.0, 0.0],
//!       "origin": [1.7, 0.0, 1.6] } } } }
//! ```
//!
//! The document is schema-validated by the caller before it gets here, so
//! access is soft: missing or non-numeric entries turn into NaN components
//! which flow into a degenerate basis and are rejected at pose checking.
//!
//! Frame naming follows the dataset's file layout: capture filenames embed
//! a positional token (`frontcenter`), while calibration and transform
//! frames use the underscored sensor name (`front_center`).

use std::fmt;

use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde_json::Value;

use crate::msg::{Header, TFMessage, Time, TransformStamped};
use crate::transform::{orthonormal_basis, sensor_pose, SensorPose};

/// Sensor category keys in the calibration document.
pub const LIDARS: &str = "lidars";
pub const CAMERAS: &str = "cameras";

/// Positional tokens as they appear in capture filenames.
pub const FRAME_TOKENS: [&str; 8] = [
    "frontcenter",
    "frontleft",
    "frontright",
    "sideleft",
    "sideright",
    "rearcenter",
    "rearleft",
    "rearright",
];

/// Sensor frame names as they appear in calibration and transform frames.
pub const SENSOR_FRAMES: [&str; 8] = [
    "front_center",
    "front_left",
    "front_right",
    "side_left",
    "side_right",
    "rear_center",
    "rear_left",
    "rear_right",
];

const SIDE_LEFT_IDX: usize = 3;
const SIDE_RIGHT_IDX: usize = 4;
const REAR_CENTER_IDX: usize = 5;
const REAR_LEFT_IDX: usize = 6;
const REAR_RIGHT_IDX: usize = 7;

/// Whether a lidar is mounted at the given position index.
pub fn lidar_mounted_at(position: usize) -> bool {
    !matches!(position, SIDE_LEFT_IDX | SIDE_RIGHT_IDX | REAR_CENTER_IDX)
}

/// Whether a camera is mounted at the given position index.
pub fn camera_mounted_at(position: usize) -> bool {
    !matches!(position, REAR_LEFT_IDX | REAR_RIGHT_IDX)
}

/// Transform frame name for a sensor: `{category}_{frame}`.
pub fn tf_frame_name(category: &str, frame: &str) -> String {
    format!("{}_{}", category, frame)
}

/// Frame name for the motion-compensated variant of a sensor stream.
pub fn motion_compensated_frame_name(category: &str, frame: &str) -> String {
    tf_frame_name(category, &format!("{}_motion_compensated", frame))
}

/// Derive the camera file basename paired with a lidar file basename by
/// substring replacement. Returns `None` when the basename has no `lidar`
/// component, rather than an empty string a caller could mistake for a
/// real name.
pub fn camera_name_from_lidar_name(basename: &str) -> Option<String> {
    basename
        .find("lidar")
        .map(|pos| format!("{}camera{}", &basename[..pos], &basename[pos + "lidar".len()..]))
}

/// Find the positional token embedded in a capture filename.
///
/// Exactly one token must occur; zero or several matches mean the filename
/// does not identify a frame.
pub fn frame_from_filename(filename: &str) -> Option<&'static str> {
    let mut found = None;
    for token in FRAME_TOKENS {
        if filename.contains(token) {
            if found.is_some() {
                return None;
            }
            found = Some(token);
        }
    }
    found
}

/// Map a filename token to the underscored sensor frame name.
pub fn sensor_name_from_frame_token(token: &str) -> Option<&'static str> {
    FRAME_TOKENS
        .iter()
        .position(|t| *t == token)
        .map(|i| SENSOR_FRAMES[i])
}

/// Read a 3-vector from a calibration array node. Missing or non-numeric
/// components become NaN.
pub fn json_axis(node: &Value) -> Vector3<f64> {
    let component = |index: usize| node[index].as_f64().unwrap_or(f64::NAN);
    Vector3::new(component(0), component(1), component(2))
}

/// Build the sensor basis from the configured view axes.
pub fn basis_from_config(
    config: &Value,
    category: &str,
    frame: &str,
    epsilon: f64,
) -> Matrix3<f64> {
    let view = &config[category][frame]["view"];
    let x_axis = json_axis(&view["x-axis"]);
    let y_axis = json_axis(&view["y-axis"]);
    orthonormal_basis(&x_axis, &y_axis, epsilon)
}

/// Read the sensor origin from the configured view.
pub fn origin_from_config(config: &Value, category: &str, frame: &str) -> Vector3<f64> {
    json_axis(&config[category][frame]["view"]["origin"])
}

/// Transform-set construction failure.
#[derive(Clone, Debug, PartialEq)]
pub enum CalibrationError {
    /// A configured sensor produced a degenerate basis or non-finite
    /// origin; no transforms are emitted for the document.
    DegenerateGeometry { category: String, frame: String },
}

impl std::error::Error for CalibrationError {}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalibrationError::DegenerateGeometry { category, frame } => {
                write!(
                    f,
                    "calibration for {}/{} produced degenerate geometry",
                    category, frame
                )
            }
        }
    }
}

/// Build the full transform set for one calibration document.
///
/// Emits one chassis→sensor transform per mounted sensor position in each
/// category, plus a single wheels→chassis identity. Any degenerate sensor
/// geometry aborts the whole set; partial transform trees are never
/// emitted.
pub fn build_transform_set(
    config: &Value,
    stamp: Time,
    epsilon: f64,
) -> Result<TFMessage, CalibrationError> {
    let mut transforms = Vec::new();

    for category in [CAMERAS, LIDARS] {
        for (position, frame) in SENSOR_FRAMES.iter().enumerate() {
            let mounted = match category {
                LIDARS => lidar_mounted_at(position),
                _ => camera_mounted_at(position),
            };
            if !mounted {
                continue;
            }

            let basis = basis_from_config(config, category, frame, epsilon);
            let origin = origin_from_config(config, category, frame);
            let pose = sensor_pose(basis, origin);
            if pose.is_degenerate() {
                return Err(CalibrationError::DegenerateGeometry {
                    category: category.to_string(),
                    frame: frame.to_string(),
                });
            }

            debug!("{}/{} pose accepted", category, frame);
            transforms.push(TransformStamped {
                header: Header {
                    stamp,
                    frame_id: String::from("chassis"),
                },
                child_frame_id: tf_frame_name(category, frame),
                transform: pose.to_transform_msg(),
            });
        }
    }

    transforms.push(TransformStamped {
        header: Header {
            stamp,
            frame_id: String::from("wheels"),
        },
        child_frame_id: String::from("chassis"),
        transform: SensorPose::identity().to_transform_msg(),
    });

    Ok(TFMessage { transforms })
}
