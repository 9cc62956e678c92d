//! Shared numeric type aliases used across the crate.

/// Cartesian position in ångströms.
pub type Point = nalgebra::Point3<f64>;

/// 3×3 rotation matrix (orthonormal within tolerance).
pub type Rotation = nalgebra::Matrix3<f64>;

/// Translation vector in ångströms.
pub type Translation = nalgebra::Vector3<f64>;
