use super::atom::Atom;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// Residue sequence number as found in the source file.
    pub id: i32,
    /// Residue name (e.g., `LYS`, `UNK`).
    pub name: String,
    atoms: Vec<Atom>,
}

impl Residue {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            atoms: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, atom: Atom) {
        debug_assert!(
            self.atom(&atom.name).is_none(),
            "Attempted to add a duplicate atom name '{}' to residue '{}'",
            atom.name,
            self.name
        );
        self.atoms.push(atom);
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.atom(name).is_some()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn iter_atoms(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Residue {{ id: {}, name: \"{}\", atoms: {} }}",
            self.id,
            self.name,
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Point;

    #[test]
    fn residue_add_atom_adds_atom_correctly() {
        let mut residue = Residue::new(1, "THR");
        residue.add_atom(Atom::new("CA", Point::origin()));

        assert_eq!(residue.atom_count(), 1);
        assert!(residue.has_atom("CA"));
    }

    #[test]
    fn residue_atom_returns_none_for_missing_name() {
        let residue = Residue::new(1, "THR");

        assert!(residue.atom("CB").is_none());
    }
}
