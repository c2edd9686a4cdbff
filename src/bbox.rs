// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Ego vehicle bounding box.
//!
//! The vehicle configuration carries three (min, max) ranges along x/y/z.
//! They must be finite and strictly ordered before the solid-box shape
//! descriptor is built; a zero-measure box is rejected.

use serde_json::Value;

use crate::msg::SolidPrimitive;

/// Whether six range parameters describe a usable box: all finite and
/// min < max on every axis.
pub fn verify_bbox(
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    z_min: f64,
    z_max: f64,
) -> bool {
    let vals = [x_min, x_max, y_min, y_max, z_min, z_max];
    let all_finite = vals.iter().all(|v| v.is_finite());

    let x_ordered = x_min < x_max;
    let y_ordered = y_min < y_max;
    let z_ordered = z_min < z_max;
    let all_ordered = x_ordered && y_ordered && z_ordered;

    all_finite && all_ordered
}

/// Build the solid-box shape descriptor from validated ranges.
///
/// Dimensions are the per-axis side lengths. Total: callers gate on
/// [`verify_bbox`] first.
pub fn box_shape(x_min: f64, x_max: f64, y_min: f64, y_max: f64, z_min: f64, z_max: f64)
    -> SolidPrimitive {
    let side_length = |min: f64, max: f64| max - min;

    let mut dimensions = vec![0.0; 3];
    dimensions[SolidPrimitive::BOX_X] = side_length(x_min, x_max);
    dimensions[SolidPrimitive::BOX_Y] = side_length(y_min, y_max);
    dimensions[SolidPrimitive::BOX_Z] = side_length(z_min, z_max);

    SolidPrimitive {
        primitive_type: SolidPrimitive::BOX,
        dimensions,
    }
}

/// Read the ego dimension ranges from a vehicle configuration document:
/// `vehicle / ego-dimensions / {x,y,z}-range`, each a [min, max] pair.
///
/// Missing or non-numeric entries become NaN so that [`verify_bbox`]
/// rejects the result instead of silently defaulting.
pub fn ego_ranges(config: &Value) -> [f64; 6] {
    let dims = &config["vehicle"]["ego-dimensions"];
    let bound = |range: &str, index: usize| dims[range][index].as_f64().unwrap_or(f64::NAN);
    [
        bound("x-range", 0),
        bound("x-range", 1),
        bound("y-range", 0),
        bound("y-range", 1),
        bound("z-range", 0),
        bound("z-range", 1),
    ]
}
