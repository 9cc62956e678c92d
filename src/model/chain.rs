use super::residue::Residue;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: String,
    residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            residues: Vec::new(),
        }
    }

    pub fn add_residue(&mut self, residue: Residue) {
        debug_assert!(
            self.residue(residue.id).is_none(),
            "Attempted to add a duplicate residue ID '{}' to chain '{}'",
            residue.id,
            self.id
        );
        self.residues.push(residue);
    }

    pub fn residue(&self, id: i32) -> Option<&Residue> {
        self.residues.iter().find(|r| r.id == id)
    }

    pub fn residue_mut(&mut self, id: i32) -> Option<&mut Residue> {
        self.residues.iter_mut().find(|r| r.id == id)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atom_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn iter_residues(&self) -> std::slice::Iter<'_, Residue> {
        self.residues.iter()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &super::atom::Atom> {
        self.residues.iter().flat_map(|r| r.iter_atoms())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chain {{ id: \"{}\", residues: {} }}",
            self.id,
            self.residue_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::Point;

    #[test]
    fn chain_new_creates_correct_chain() {
        let chain = Chain::new("A");

        assert_eq!(chain.id, "A");
        assert!(chain.is_empty());
    }

    #[test]
    fn chain_add_residue_adds_residue_correctly() {
        let mut chain = Chain::new("A");
        chain.add_residue(Residue::new(1, "THR"));

        assert_eq!(chain.residue_count(), 1);
        assert!(chain.residue(1).is_some());
    }

    #[test]
    fn chain_residue_returns_none_for_nonexistent_residue() {
        let chain = Chain::new("A");

        assert!(chain.residue(999).is_none());
    }

    #[test]
    fn chain_atom_count_sums_over_residues() {
        let mut chain = Chain::new("A");
        let mut r1 = Residue::new(1, "THR");
        r1.add_atom(Atom::new("N", Point::origin()));
        r1.add_atom(Atom::new("CA", Point::origin()));
        let mut r2 = Residue::new(2, "THR");
        r2.add_atom(Atom::new("N", Point::origin()));
        chain.add_residue(r1);
        chain.add_residue(r2);

        assert_eq!(chain.atom_count(), 3);
    }
}
