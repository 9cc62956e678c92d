//! Assembly of the derived NCS views from finalized groups and transforms.

use std::collections::BTreeMap;

use crate::model::group::NcsGroup;
use crate::model::ncs::{NcsCopy, NcsModel, NcsRestraintGroup};
use crate::model::registry::TransformRegistry;
use crate::model::selection;
use crate::model::structure::Structure;
use crate::model::transform::serial_key;
use crate::ops::error::Error;
use crate::ops::select;

/// Builds the finalized [`NcsModel`] from groups and their registry.
///
/// With a structure, selections are evaluated to populate the membership
/// mask, the compact index maps, and (unless precomputed restraints are
/// supplied, as in explicit transform-list mode) the restraint groups.
/// Reference/copy atom-count equality is enforced here: unequal
/// cardinality is a construction error, never silently repaired.
pub(crate) fn assemble(
    groups: Vec<NcsGroup>,
    registry: TransformRegistry,
    structure: Option<&Structure>,
    precomputed_restraints: Option<Vec<NcsRestraintGroup>>,
) -> Result<NcsModel, Error> {
    let reference_selections: Vec<String> = groups
        .iter()
        .map(|g| g.reference_selection.clone())
        .collect();
    let combined_selection = selection::join_or(&reference_selections);

    let mut reference_to_copies = BTreeMap::new();
    let mut compact_to_asu = BTreeMap::new();
    let mut transform_assignment = Vec::new();

    for group in &groups {
        let _ = reference_to_copies.insert(
            group.reference_selection.clone(),
            group.copy_selections.clone(),
        );

        let copy_serials: Vec<usize> = registry
            .copy_transforms(group.group_id)
            .map(|t| t.serial_num)
            .collect();
        if copy_serials.len() != group.copy_count() {
            return Err(Error::inconsistent_grouping(format!(
                "group {} declares {} copies but owns {} copy transforms",
                group.group_id,
                group.copy_count(),
                copy_serials.len()
            )));
        }
        for (copy, serial) in group.copy_selections.iter().zip(copy_serials) {
            let key = format!("{}_{}", group.reference_selection, serial_key(serial));
            let _ = compact_to_asu.insert(
                key.clone(),
                (group.reference_selection.clone(), copy.clone()),
            );
            transform_assignment.push(key);
        }
    }

    let mut membership_mask = Vec::new();
    let mut asu_to_compact = BTreeMap::new();
    let mut restraints = Vec::new();

    if let Some(structure) = structure {
        membership_mask = vec![false; structure.atom_count()];
        let mut compact_offset = 0usize;

        for group in &groups {
            let reference_indices =
                select::evaluate(structure, &group.reference_selection)?;
            if reference_indices.is_empty() {
                return Err(Error::inconsistent_grouping(format!(
                    "reference selection '{}' selects no atoms",
                    group.reference_selection
                )));
            }
            for &index in &reference_indices {
                membership_mask[index] = true;
            }
            let _ = asu_to_compact.insert(
                group.reference_selection.clone(),
                (compact_offset..compact_offset + reference_indices.len()).collect(),
            );
            compact_offset += reference_indices.len();

            let mut copies = Vec::new();
            for (copy_selection, transform) in group
                .copy_selections
                .iter()
                .zip(registry.copy_transforms(group.group_id))
            {
                let copy_indices = select::evaluate(structure, copy_selection)?;
                if copy_indices.len() != reference_indices.len() {
                    return Err(Error::inconsistent_grouping(format!(
                        "selection '{}' selects {} atoms but its reference '{}' selects {}",
                        copy_selection,
                        copy_indices.len(),
                        group.reference_selection,
                        reference_indices.len()
                    )));
                }
                for &index in &copy_indices {
                    membership_mask[index] = true;
                }
                copies.push(NcsCopy {
                    iselection: copy_indices,
                    rotation: transform.rotation,
                    translation: transform.translation,
                    rmsd: transform.rmsd,
                });
            }
            restraints.push(NcsRestraintGroup {
                master_iselection: reference_indices,
                copies,
            });
        }
    }

    if let Some(precomputed) = precomputed_restraints {
        restraints = precomputed;
    }

    Ok(NcsModel {
        groups,
        registry,
        combined_selection,
        reference_to_copies,
        reference_selections,
        membership_mask,
        asu_to_compact,
        compact_to_asu,
        transform_assignment,
        restraints,
    })
}
