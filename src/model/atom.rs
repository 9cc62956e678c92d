//! Fundamental atom representation comprising name and Cartesian position.
//!
//! Atoms are instantiated by the PDB reader or directly by callers building
//! structures in code, and are consumed read-only by selection evaluation,
//! superposition, and the legacy report writer.

use super::types::Point;
use smol_str::SmolStr;
use std::fmt;

/// Labeled atom with a Cartesian position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name as it appears in crystallographic files (e.g., `CA`).
    pub name: SmolStr,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
}

impl Atom {
    /// Creates a new atom from a name and position.
    ///
    /// The position is copied as-is; no normalization is performed.
    pub fn new(name: &str, pos: Point) -> Self {
        Self {
            name: SmolStr::new(name),
            pos,
        }
    }

    /// Computes the Euclidean distance to another atom in ångströms.
    pub fn distance(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.pos, &other.pos)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ name: \"{}\", pos: [{:.3}, {:.3}, {:.3}] }}",
            self.name, self.pos.x, self.pos.y, self.pos.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_new_creates_correct_atom() {
        let atom = Atom::new("CA", Point::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.pos, Point::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn atom_distance_is_euclidean() {
        let a = Atom::new("N", Point::new(0.0, 0.0, 0.0));
        let b = Atom::new("CA", Point::new(3.0, 4.0, 0.0));

        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }
}
