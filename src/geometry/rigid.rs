//! Rigid body transform in 3D: a rotation + translation pair.
//!
//! We use the notation `T_target_source`: a transform maps points expressed
//! in the `source` frame into the `target` frame,
//!
//! ```text
//! p_target = T_target_source * p_source
//! ```
//!
//! Composition follows the same convention: `T_a_c = T_a_b ∘ T_b_c`.

use nalgebra::{UnitQuaternion, Vector3};

/// A rigid 3D transform (member of SE(3)): unit-quaternion rotation plus
/// translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rigid3 {
    pub rotation: UnitQuaternion<f64>,
    pub translation: Vector3<f64>,
}

impl Rigid3 {
    /// The identity transform (no rotation, no translation).
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
        }
    }

    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Compose with another transform: `self ∘ other`.
    ///
    /// If `self` is `T_a_b` and `other` is `T_b_c`, the result is `T_a_c`.
    pub fn compose(&self, other: &Rigid3) -> Rigid3 {
        Rigid3 {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// The inverse transform: if `self` is `T_a_b`, returns `T_b_a`.
    pub fn inverse(&self) -> Rigid3 {
        let rotation = self.rotation.inverse();
        Rigid3 {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    /// Apply the transform to a point.
    pub fn transform_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * p + self.translation
    }

    /// Euclidean norm of the translation component.
    pub fn translation_norm(&self) -> f64 {
        self.translation.norm()
    }
}

impl Default for Rigid3 {
    fn default() -> Self {
        Self::identity()
    }
}
