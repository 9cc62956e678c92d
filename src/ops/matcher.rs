//! Construction of NCS models: explicit groups, explicit transform lists,
//! and chain-similarity auto-detection.
//!
//! The three modes are mutually exclusive per invocation; each populates
//! one fresh transform registry and produces the group list, then hands
//! off to the view assembler. Validation of declarative group records
//! happens here, once: the declarative reader produces raw records and
//! relies on this pass.

use log::warn;
use smol_str::SmolStr;

use crate::io;
use crate::io::spec::SpecOperator;
use crate::model::chain::Chain;
use crate::model::group::{GroupSpec, NcsGroup};
use crate::model::ncs::{NcsCopy, NcsModel, NcsRestraintGroup};
use crate::model::registry::TransformRegistry;
use crate::model::selection;
use crate::model::structure::Structure;
use crate::model::transform::{rotation_is_identity, IDENTITY_EPS};
use crate::model::types::{Point, Rotation, Translation};
use crate::ops::error::Error;
use crate::ops::select;
use crate::ops::similarity::chain_similarity;
use crate::ops::superpose::Superpose;
use crate::ops::views::assemble;

/// Default sequence-identity threshold for auto-detection.
pub const DEFAULT_CHAIN_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Validates declarative group records.
///
/// Every group must declare at least one copy, and no selection string may
/// appear twice anywhere across references and copies (compared after
/// canonical whitespace). A reference reused as another group's copy is
/// the classic inconsistency this rejects.
pub fn validate_group_specs(specs: &[GroupSpec]) -> Result<(), Error> {
    let mut seen: Vec<String> = Vec::new();
    for (i, spec) in specs.iter().enumerate() {
        if spec.copies.is_empty() {
            return Err(Error::inconsistent_grouping(format!(
                "group {} declares no copies",
                i + 1
            )));
        }
        for sel in std::iter::once(&spec.reference).chain(spec.copies.iter()) {
            let canonical = selection::canonical(sel);
            if seen.contains(&canonical) {
                return Err(Error::inconsistent_grouping(format!(
                    "selection '{sel}' appears in more than one group"
                )));
            }
            seen.push(canonical);
        }
    }
    Ok(())
}

/// Explicit-groups mode.
///
/// With a structure, each copy's operator comes from the superposition
/// oracle applied to the evaluated reference and copy coordinate sets.
/// Without one, serial bookkeeping still happens but every copy operator
/// is an undetermined identity-valued placeholder.
pub fn from_group_specs(
    specs: &[GroupSpec],
    structure: Option<&Structure>,
    oracle: &dyn Superpose,
) -> Result<NcsModel, Error> {
    validate_group_specs(specs)?;

    let mut registry = TransformRegistry::new();
    let mut groups = Vec::new();

    for (i, spec) in specs.iter().enumerate() {
        let group_id = i + 1;
        let _ = registry.identity_for(group_id)?;

        if let Some(structure) = structure {
            let reference_coords = selection_coords(structure, &spec.reference)?;
            for copy in &spec.copies {
                let copy_coords = selection_coords(structure, copy)?;
                if copy_coords.len() != reference_coords.len() {
                    return Err(Error::inconsistent_grouping(format!(
                        "selection '{}' selects {} atoms but its reference '{}' selects {}",
                        copy,
                        copy_coords.len(),
                        spec.reference,
                        reference_coords.len()
                    )));
                }
                let fit = oracle.fit(&reference_coords, &copy_coords)?;
                let _ = registry.register(fit.rotation, fit.translation, group_id, fit.rmsd);
            }
        } else {
            for _ in &spec.copies {
                let _ = registry.register(
                    Rotation::identity(),
                    Translation::zeros(),
                    group_id,
                    0.0,
                );
            }
        }

        groups.push(NcsGroup {
            group_id,
            reference_selection: spec.reference.clone(),
            copy_selections: spec.copies.clone(),
        });
    }

    assemble(groups, registry, structure, None)
}

/// Explicit transform-list mode.
///
/// Creates a single implicit group whose reference is the supplied
/// structure; each transform claims the next equal-sized contiguous atom
/// block after the reference block, in input order. Requires a structure
/// to know the block size.
pub fn from_transform_list(
    rotations: &[Rotation],
    translations: &[Translation],
    structure: Option<&Structure>,
) -> Result<NcsModel, Error> {
    let structure = structure.ok_or_else(|| {
        Error::missing_structure(
            "explicit rotation/translation lists need atom counts to partition copies",
        )
    })?;
    if rotations.len() != translations.len() {
        return Err(Error::inconsistent_grouping(format!(
            "{} rotations but {} translations",
            rotations.len(),
            translations.len()
        )));
    }
    if rotations.is_empty() {
        return Err(Error::inconsistent_grouping(
            "transform-list mode needs at least one rotation/translation pair",
        ));
    }
    let block = structure.atom_count();
    if block == 0 {
        return Err(Error::inconsistent_grouping(
            "cannot partition an empty structure",
        ));
    }

    let reference = structure
        .iter_chains()
        .map(|c| format!("chain {}", c.id))
        .collect::<Vec<_>>()
        .join(" or ");

    let mut registry = TransformRegistry::new();
    let _ = registry.identity_for(1)?;

    let master_iselection: Vec<usize> = (0..block).collect();
    let mut copies = Vec::new();
    for (i, (rotation, translation)) in rotations.iter().zip(translations).enumerate() {
        let _ = registry.register(*rotation, *translation, 1, 0.0);
        let start = block * (i + 1);
        copies.push(NcsCopy {
            iselection: (start..start + block).collect(),
            rotation: *rotation,
            translation: *translation,
            rmsd: 0.0,
        });
    }

    let group = NcsGroup {
        group_id: 1,
        reference_selection: reference.clone(),
        copy_selections: vec![reference; rotations.len()],
    };
    let restraints = vec![NcsRestraintGroup {
        master_iselection,
        copies,
    }];

    assemble(vec![group], registry, Some(structure), Some(restraints))
}

/// Auto-detection mode.
///
/// Chains are grouped greedily by pairwise similarity to the first
/// unassigned chain; candidate groups with fewer than two members are
/// discarded, and their chains stay in the static (non-NCS) region.
pub fn detect_from_structure(
    structure: &Structure,
    chain_similarity_threshold: f64,
    oracle: &dyn Superpose,
) -> Result<NcsModel, Error> {
    if !(0.0..=1.0).contains(&chain_similarity_threshold) {
        return Err(Error::inconsistent_grouping(format!(
            "chain similarity threshold {chain_similarity_threshold} is outside [0, 1]"
        )));
    }

    let chains: Vec<&Chain> = structure.iter_chains().collect();
    let mut assigned = vec![false; chains.len()];
    let mut registry = TransformRegistry::new();
    let mut groups = Vec::new();

    for i in 0..chains.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let mut members = vec![i];
        for j in (i + 1)..chains.len() {
            if !assigned[j]
                && chain_similarity(chains[i], chains[j]) >= chain_similarity_threshold
            {
                assigned[j] = true;
                members.push(j);
            }
        }
        if members.len() < 2 {
            continue;
        }

        let group_id = groups.len() + 1;
        let member_chains: Vec<&Chain> = members.iter().map(|&m| chains[m]).collect();
        let reference_pos = reference_member(&member_chains);
        let common_names = group_common_atom_names(&member_chains, reference_pos);

        let reference_chain = member_chains[reference_pos];
        let reference_coords = matched_coords(reference_chain, &member_chains);
        let reference_selection = member_selection(reference_chain, &common_names);

        let _ = registry.identity_for(group_id)?;
        let mut copy_selections = Vec::new();
        for (pos, &chain) in member_chains.iter().enumerate() {
            if pos == reference_pos {
                continue;
            }
            let copy_coords = matched_coords(chain, &member_chains);
            let fit = oracle.fit(&reference_coords, &copy_coords)?;
            let _ = registry.register(fit.rotation, fit.translation, group_id, fit.rmsd);
            copy_selections.push(member_selection(chain, &common_names));
        }

        groups.push(NcsGroup {
            group_id,
            reference_selection,
            copy_selections,
        });
    }

    assemble(groups, registry, Some(structure), None)
}

/// Builds a model from a parsed legacy fixed-format report.
///
/// The first operator of each `new_ncs_group` block is the master; its
/// operator is assumed identity and its RMSD forced to zero regardless of
/// file content. A non-identity operator in master position is skipped
/// with a diagnostic rather than aborting the import, as are groups left
/// with no identity operator or no copies.
///
/// The report stores each operator mapping the copy onto the master, the
/// opposite of the registry's master-onto-copy convention, so every copy
/// operator is inverted on the way in.
pub fn from_legacy_spec(
    text: &str,
    structure: Option<&Structure>,
) -> Result<NcsModel, Error> {
    let blocks = io::spec::read(text)?;

    let mut registry = TransformRegistry::new();
    let mut groups = Vec::new();

    for block in &blocks {
        let mut start = 0;
        while start < block.len()
            && !rotation_is_identity(&block[start].rotation, IDENTITY_EPS)
        {
            warn!(
                "{}",
                io::Error::UnmatchedSymmetryOperator {
                    line_number: block[start].line_number
                }
            );
            start += 1;
        }
        if start == block.len() {
            warn!("skipping NCS group with no identity operator");
            continue;
        }
        let master = &block[start];
        let copies = &block[start + 1..];
        if copies.is_empty() {
            warn!(
                "skipping single-member NCS group for chain {}",
                master.chain_id
            );
            continue;
        }

        let group_id = groups.len() + 1;
        let _ = registry.identity_for(group_id)?;
        let reference_selection = operator_selection(master, structure);
        let mut copy_selections = Vec::new();
        for copy in copies {
            let rotation = copy.rotation.transpose();
            let translation = -rotation * copy.translation;
            let _ = registry.register(rotation, translation, group_id, copy.rmsd);
            copy_selections.push(operator_selection(copy, structure));
        }

        groups.push(NcsGroup {
            group_id,
            reference_selection,
            copy_selections,
        });
    }

    assemble(groups, registry, structure, None)
}

fn selection_coords(structure: &Structure, expression: &str) -> Result<Vec<Point>, Error> {
    let sites = select::sites(structure);
    let indices = select::evaluate(structure, expression)?;
    if indices.is_empty() {
        return Err(Error::inconsistent_grouping(format!(
            "selection '{expression}' selects no atoms"
        )));
    }
    Ok(indices.iter().map(|&i| sites[i].atom.pos).collect())
}

/// Member with the most atoms; first wins on ties.
fn reference_member(members: &[&Chain]) -> usize {
    let mut best = 0;
    for (pos, chain) in members.iter().enumerate().skip(1) {
        if chain.atom_count() > members[best].atom_count() {
            best = pos;
        }
    }
    best
}

/// Atom names shared by every member at each residue position, ordered as
/// in the reference chain, one list per position.
///
/// Positions where the members disagree on the residue name contribute
/// nothing; comparison runs over the shortest member.
fn group_common_atom_names(members: &[&Chain], reference_pos: usize) -> Vec<Vec<SmolStr>> {
    let reference = members[reference_pos];
    let positions = members
        .iter()
        .map(|c| c.residue_count())
        .min()
        .unwrap_or(0);

    let mut common = Vec::with_capacity(positions);
    for j in 0..positions {
        let ref_residue = &reference.residues()[j];
        let uniform_name = members
            .iter()
            .all(|c| c.residues()[j].name == ref_residue.name);
        if !uniform_name {
            common.push(Vec::new());
            continue;
        }
        common.push(
            ref_residue
                .iter_atoms()
                .filter(|atom| {
                    members
                        .iter()
                        .all(|c| c.residues()[j].has_atom(&atom.name))
                })
                .map(|atom| atom.name.clone())
                .collect(),
        );
    }
    common
}

/// Coordinates of a member's atoms restricted to the group-common names,
/// in reference order, so member coordinate sets pair positionally.
fn matched_coords(chain: &Chain, members: &[&Chain]) -> Vec<Point> {
    // Recomputing the common names per member keeps the pairing order
    // identical for every member of the group.
    let reference_pos = reference_member(members);
    let common = group_common_atom_names(members, reference_pos);
    let mut coords = Vec::new();
    for (j, names) in common.iter().enumerate() {
        let residue = &chain.residues()[j];
        for name in names {
            if let Some(atom) = residue.atom(name) {
                coords.push(atom.pos);
            }
        }
    }
    coords
}

/// Selection string for one auto-detected member.
///
/// Bare `chain X` when the chain's atoms are exactly the group-common
/// set; otherwise the chain is narrowed with a `name` disjunction. The
/// asymmetry between the two forms mirrors the serialized output the
/// legacy toolchain produces.
fn member_selection(chain: &Chain, common_names: &[Vec<SmolStr>]) -> String {
    let matched: usize = common_names.iter().map(Vec::len).sum();
    if matched == chain.atom_count() {
        return format!("chain {}", chain.id);
    }
    let mut names: Vec<&str> = Vec::new();
    for position in common_names {
        for name in position {
            if !names.contains(&name.as_str()) {
                names.push(name.as_str());
            }
        }
    }
    let filter = names
        .iter()
        .map(|n| format!("name {n}"))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("(chain {} and ({}))", chain.id, filter)
}

/// Reconstructs a member's selection from a legacy operator record.
fn operator_selection(operator: &SpecOperator, structure: Option<&Structure>) -> String {
    let base = format!("chain {}", operator.chain_id);
    if operator.ranges.is_empty() {
        return base;
    }
    if let Some(chain) = structure.and_then(|s| s.chain(&operator.chain_id)) {
        let mut resseqs: Vec<i32> = chain.iter_residues().map(|r| r.id).collect();
        resseqs.sort_unstable();
        resseqs.dedup();
        if select::merge_runs(&resseqs) == operator.ranges {
            return base;
        }
    }
    let ranges = operator
        .ranges
        .iter()
        .map(|(a, b)| format!("resseq {a}:{b}"))
        .collect::<Vec<_>>()
        .join(" or ");
    format!("{base} and ({ranges})")
}
