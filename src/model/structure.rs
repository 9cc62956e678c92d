use super::atom::Atom;
use super::chain::Chain;
use super::residue::Residue;
use std::fmt;

/// Ordered collection of chains; the structural hierarchy every NCS
/// construction mode evaluates selections against.
///
/// Chain and residue order is the order of first appearance, and atom order
/// within a residue is file order. Global atom indices used by the derived
/// NCS views are positions in `iter_atoms_with_context` order, so the
/// structure must not be reordered after NCS construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_chain(&mut self, chain: Chain) {
        debug_assert!(
            self.chain(&chain.id).is_none(),
            "Attempted to add a duplicate chain ID '{}'",
            chain.id
        );
        self.chains.push(chain);
    }

    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn chain_mut(&mut self, id: &str) -> Option<&mut Chain> {
        self.chains.iter_mut().find(|c| c.id == id)
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn iter_chains(&self) -> std::slice::Iter<'_, Chain> {
        self.chains.iter()
    }

    pub fn iter_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.chains.iter().flat_map(|c| c.iter_atoms())
    }

    pub fn iter_atoms_with_context(
        &self,
    ) -> impl Iterator<Item = (&Chain, &Residue, &Atom)> {
        self.chains.iter().flat_map(|chain| {
            chain.iter_residues().flat_map(move |residue| {
                residue.iter_atoms().map(move |atom| (chain, residue, atom))
            })
        })
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Structure {{ chains: {}, atoms: {} }}",
            self.chain_count(),
            self.atom_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Point;

    fn single_atom_chain(id: &str) -> Chain {
        let mut residue = Residue::new(1, "GLY");
        residue.add_atom(Atom::new("CA", Point::origin()));
        let mut chain = Chain::new(id);
        chain.add_residue(residue);
        chain
    }

    #[test]
    fn structure_add_chain_preserves_order() {
        let mut structure = Structure::new();
        structure.add_chain(single_atom_chain("B"));
        structure.add_chain(single_atom_chain("A"));

        let ids: Vec<&str> = structure.iter_chains().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }

    #[test]
    fn structure_atom_count_sums_over_chains() {
        let mut structure = Structure::new();
        structure.add_chain(single_atom_chain("A"));
        structure.add_chain(single_atom_chain("B"));

        assert_eq!(structure.atom_count(), 2);
    }

    #[test]
    fn structure_iter_atoms_with_context_yields_global_order() {
        let mut structure = Structure::new();
        structure.add_chain(single_atom_chain("A"));
        structure.add_chain(single_atom_chain("B"));

        let chains: Vec<&str> = structure
            .iter_atoms_with_context()
            .map(|(c, _, _)| c.id.as_str())
            .collect();
        assert_eq!(chains, ["A", "B"]);
    }
}
