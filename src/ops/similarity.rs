//! Approximate chain similarity for automatic NCS detection.

use crate::model::chain::Chain;

/// Fraction of atoms two chains share, in `[0, 1]`.
///
/// Residues are compared positionally over the shorter chain; a position
/// contributes only when both residue names agree, and then counts the
/// atoms whose names occur in both residues. The count is normalized by
/// the larger chain's atom total, so only atom names present in both
/// chains participate and chains of unequal length remain comparable.
/// More matching atoms at equal positions always means a higher fraction.
pub fn chain_similarity(a: &Chain, b: &Chain) -> f64 {
    let denominator = a.atom_count().max(b.atom_count());
    if denominator == 0 {
        return 0.0;
    }
    let mut matched = 0usize;
    for (ra, rb) in a.iter_residues().zip(b.iter_residues()) {
        if ra.name != rb.name {
            continue;
        }
        matched += ra
            .iter_atoms()
            .filter(|atom| rb.has_atom(&atom.name))
            .count();
    }
    matched as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::types::Point;

    fn chain_with(id: &str, residues: &[(i32, &str, &[&str])]) -> Chain {
        let mut chain = Chain::new(id);
        for (resseq, name, atoms) in residues {
            let mut residue = Residue::new(*resseq, name);
            for atom in *atoms {
                residue.add_atom(Atom::new(atom, Point::origin()));
            }
            chain.add_residue(residue);
        }
        chain
    }

    #[test]
    fn identical_chains_score_one() {
        let a = chain_with("A", &[(1, "THR", &["N", "CA", "C", "O"])]);
        let b = chain_with("B", &[(1, "THR", &["N", "CA", "C", "O"])]);

        assert!((chain_similarity(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn partial_atom_overlap_scores_fraction_of_larger_chain() {
        let a = chain_with(
            "A",
            &[(1, "THR", &["N", "CA", "C", "O", "CB", "OG1", "CG2"])],
        );
        let b = chain_with("B", &[(1, "THR", &["N", "CA", "C", "O"])]);

        let s = chain_similarity(&a, &b);
        assert!((s - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_residue_names_score_zero() {
        let a = chain_with("A", &[(1, "THR", &["N", "CA"])]);
        let b = chain_with("B", &[(1, "GLY", &["N", "CA"])]);

        assert_eq!(chain_similarity(&a, &b), 0.0);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = chain_with("A", &[(1, "THR", &["N", "CA", "C", "O", "CB"])]);
        let b = chain_with("B", &[(1, "THR", &["N", "CA"])]);

        assert_eq!(chain_similarity(&a, &b), chain_similarity(&b, &a));
    }

    #[test]
    fn empty_chain_scores_zero() {
        let a = chain_with("A", &[]);
        let b = chain_with("B", &[(1, "THR", &["N"])]);

        assert_eq!(chain_similarity(&a, &b), 0.0);
    }
}
