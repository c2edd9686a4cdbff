// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Sensor pose geometry.
//!
//! Calibration stores each sensor's view as two axis vectors and an origin.
//! The axes are only approximately orthogonal, so the basis construction
//! keeps the x-axis as the reference direction and re-derives the other two
//! columns to guarantee a right-handed orthonormal frame.
//!
//! Geometry failures are soft: invalid or colinear axes produce the zero
//! matrix rather than an error, and callers must check for degeneracy
//! before emitting any transform built from it.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};

use crate::msg;

/// Whether all components of a vector are finite.
pub fn vector_is_valid(v: &Vector3<f64>) -> bool {
    v.norm().is_finite()
}

/// Whether a vector is usable as a calibration axis: finite with a norm
/// large enough to normalize safely.
pub fn axis_is_valid(axis: &Vector3<f64>, epsilon: f64) -> bool {
    vector_is_valid(axis) && (axis.norm() > epsilon)
}

/// Whether two axes can span a basis: each valid and not approximately
/// equal. Equality uses relative tolerance against the smaller norm.
pub fn axes_are_valid(axis1: &Vector3<f64>, axis2: &Vector3<f64>, epsilon: f64) -> bool {
    let axis1_valid = axis_is_valid(axis1, epsilon);
    let axis2_valid = axis_is_valid(axis2, epsilon);
    if !axis1_valid || !axis2_valid {
        return false;
    }
    let axes_not_equal = (axis1 - axis2).norm() > epsilon * axis1.norm().min(axis2.norm());
    axes_not_equal
}

/// Build a right-handed orthonormal basis from two calibration axes.
///
/// Returns the zero matrix when the axes are invalid or colinear. When
/// valid, the x-axis direction is preserved exactly and the y-axis is
/// corrected to be orthogonal to it:
/// Z = X × Y, Y' = Z × X, columns = (X̂, Ŷ', Ẑ).
pub fn orthonormal_basis(x: &Vector3<f64>, y: &Vector3<f64>, epsilon: f64) -> Matrix3<f64> {
    if !axes_are_valid(x, y, epsilon) {
        return Matrix3::zeros();
    }

    let z = x.cross(y);
    if z.norm() <= epsilon {
        // colinear axes that are not equal, e.g. y = -x
        return Matrix3::zeros();
    }
    let y_ortho = z.cross(x);

    Matrix3::from_columns(&[x.normalize(), y_ortho.normalize(), z.normalize()])
}

/// Whether a basis is the degenerate zero matrix.
pub fn basis_is_degenerate(basis: &Matrix3<f64>) -> bool {
    *basis == Matrix3::zeros()
}

/// Sensor-to-parent pose: rotation basis plus translation origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorPose {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl SensorPose {
    /// Identity pose.
    pub fn identity() -> Self {
        SensorPose {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// A pose is degenerate when its basis is the zero matrix or its
    /// translation is non-finite. Degenerate poses must never be emitted.
    pub fn is_degenerate(&self) -> bool {
        basis_is_degenerate(&self.rotation) || !vector_is_valid(&self.translation)
    }

    /// Convert to a transform message, rotation encoded as a quaternion.
    ///
    /// Precondition: the pose is not degenerate.
    pub fn to_transform_msg(&self) -> msg::Transform {
        let rotation = Rotation3::from_matrix_unchecked(self.rotation);
        let q = UnitQuaternion::from_rotation_matrix(&rotation);
        msg::Transform {
            translation: msg::Vector3 {
                x: self.translation.x,
                y: self.translation.y,
                z: self.translation.z,
            },
            rotation: msg::Quaternion {
                x: q.i,
                y: q.j,
                z: q.k,
                w: q.w,
            },
        }
    }
}

/// Compose a basis and origin into a pose. Total: a degenerate basis
/// composes into a degenerate pose for the caller to reject.
pub fn sensor_pose(basis: Matrix3<f64>, origin: Vector3<f64>) -> SensorPose {
    SensorPose {
        rotation: basis,
        translation: origin,
    }
}
