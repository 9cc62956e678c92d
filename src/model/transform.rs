//! Rigid-body operator mapping a reference chain frame onto a copy's frame.

use super::types::{Point, Rotation, Translation};

/// Rotation tolerance used when classifying a spatial operator as identity.
///
/// Legacy reports carry four decimals, so anything tighter than 1e-2 would
/// reject operators the original toolkit accepts.
pub const IDENTITY_EPS: f64 = 0.01;

/// One rigid-body operator owned by the transform registry.
///
/// `copy ≈ rotation · reference + translation` for every paired atom. The
/// member representing the group's reference carries the identity operator
/// and `rmsd == 0`. Immutable after registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NcsTransform {
    pub rotation: Rotation,
    pub translation: Translation,
    /// Owning group, 1-based.
    pub ncs_group_id: usize,
    /// Globally unique serial, 1-based, monotonic in discovery order.
    pub serial_num: usize,
    /// RMSD of the superposition that produced this operator.
    pub rmsd: f64,
    /// True for the reference member's identity operator.
    pub is_master: bool,
}

impl NcsTransform {
    /// Whether the spatial part is the identity operator within `eps`.
    pub fn is_identity(&self, eps: f64) -> bool {
        rotation_is_identity(&self.rotation, eps)
            && self.translation.amax() <= eps
    }

    /// Applies the operator to a point.
    pub fn apply(&self, p: &Point) -> Point {
        Point::from(self.rotation * p.coords + self.translation)
    }
}

/// Whether a rotation matrix is the identity within `eps`, element-wise.
pub fn rotation_is_identity(rotation: &Rotation, eps: f64) -> bool {
    (rotation - Rotation::identity()).amax() <= eps
}

/// Registry key for a serial number, zero-padded to ten digits.
pub fn serial_key(serial_num: usize) -> String {
    format!("{serial_num:010}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity() {
        let t = NcsTransform {
            rotation: Rotation::identity(),
            translation: Translation::zeros(),
            ncs_group_id: 1,
            serial_num: 1,
            rmsd: 0.0,
            is_master: true,
        };

        assert!(t.is_identity(IDENTITY_EPS));
    }

    #[test]
    fn rotated_transform_is_not_identity() {
        let t = NcsTransform {
            rotation: Rotation::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, 0.0),
            translation: Translation::zeros(),
            ncs_group_id: 1,
            serial_num: 2,
            rmsd: 0.0,
            is_master: false,
        };

        assert!(!t.is_identity(IDENTITY_EPS));
    }

    #[test]
    fn apply_rotates_and_translates() {
        let t = NcsTransform {
            rotation: Rotation::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            translation: Translation::new(1.0, 0.0, 0.0),
            ncs_group_id: 1,
            serial_num: 2,
            rmsd: 0.0,
            is_master: false,
        };

        let p = t.apply(&Point::new(1.0, 0.0, 0.0));
        assert!((p - Point::new(1.0, 1.0, 0.0)).amax() < 1e-12);
    }

    #[test]
    fn serial_key_pads_to_ten_digits() {
        assert_eq!(serial_key(3), "0000000003");
        assert_eq!(serial_key(42), "0000000042");
    }
}
