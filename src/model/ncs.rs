//! The canonical NCS model: groups, transforms, and derived query views.

use std::collections::BTreeMap;

use super::group::NcsGroup;
use super::registry::TransformRegistry;
use super::structure::Structure;
use super::types::{Rotation, Translation};
use crate::ops::error::Error;

/// One symmetry copy inside a restraint group: the atoms it claims and the
/// operator mapping the reference onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct NcsCopy {
    pub iselection: Vec<usize>,
    pub rotation: Rotation,
    pub translation: Translation,
    pub rmsd: f64,
}

/// Reference atom indices plus every copy, ready for restraint generation.
#[derive(Debug, Clone, PartialEq)]
pub struct NcsRestraintGroup {
    pub master_iselection: Vec<usize>,
    pub copies: Vec<NcsCopy>,
}

/// The finalized NCS model.
///
/// Owns every group and the transform registry, plus the derived views
/// computed at construction time. Construction is write-once: after a
/// matcher mode returns a model, nothing mutates it, so it is safe to share
/// across any number of concurrent readers.
///
/// Structure-dependent views (membership mask, index maps, restraint
/// groups) are empty when the model was built without a structure;
/// selection bookkeeping is still fully populated in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NcsModel {
    pub(crate) groups: Vec<NcsGroup>,
    pub(crate) registry: TransformRegistry,
    pub(crate) combined_selection: String,
    pub(crate) reference_to_copies: BTreeMap<String, Vec<String>>,
    pub(crate) reference_selections: Vec<String>,
    pub(crate) membership_mask: Vec<bool>,
    pub(crate) asu_to_compact: BTreeMap<String, Vec<usize>>,
    pub(crate) compact_to_asu: BTreeMap<String, (String, String)>,
    pub(crate) transform_assignment: Vec<String>,
    pub(crate) restraints: Vec<NcsRestraintGroup>,
}

impl NcsModel {
    /// Groups in detection/declaration order.
    pub fn groups(&self) -> &[NcsGroup] {
        &self.groups
    }

    pub fn number_of_groups(&self) -> usize {
        self.groups.len()
    }

    /// The transform registry, serials `1..=N` in discovery order.
    pub fn transforms(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Disjunction of every group's reference selection; carves the NCS
    /// part out of the whole structure.
    pub fn combined_selection_string(&self) -> &str {
        &self.combined_selection
    }

    /// Reference selection → ordered copy selections.
    pub fn reference_to_copies_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.reference_to_copies
    }

    /// Per-group reference selections, in group order.
    pub fn group_reference_selections(&self) -> &[String] {
        &self.reference_selections
    }

    /// One flag per structure atom; true when the atom belongs to any
    /// reference or copy selection. Empty without a structure.
    pub fn atom_membership_mask(&self) -> &[bool] {
        &self.membership_mask
    }

    /// Reference selection → compact (0-based, contiguous across groups in
    /// group order) indices into the concatenated reference atoms.
    pub fn asu_to_compact_index_map(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.asu_to_compact
    }

    /// `"<reference>_<serial>"` → (reference selection, copy selection),
    /// for non-identity transforms only.
    pub fn compact_to_asu_index_map(&self) -> &BTreeMap<String, (String, String)> {
        &self.compact_to_asu
    }

    /// Keys of [`Self::compact_to_asu_index_map`] in group and copy order.
    pub fn transform_assignment(&self) -> &[String] {
        &self.transform_assignment
    }

    /// Restraint groups (reference indices plus per-copy indices and
    /// operators). Empty without a structure.
    pub fn restraint_groups(&self) -> &[NcsRestraintGroup] {
        &self.restraints
    }

    /// Serializes the model as declarative `ncs_group` blocks, 80-column
    /// wrapped.
    pub fn print_declarative(&self) -> String {
        crate::io::phil::write_groups(&self.groups)
    }

    /// Emits the legacy fixed-format NCS report for this model.
    ///
    /// Centroids, atom counts, and residue ranges come from the supplied
    /// structure, so every selection must evaluate against it.
    pub fn export_legacy_spec(&self, structure: &Structure) -> Result<String, Error> {
        crate::io::spec::write(self, structure)
    }

    /// Builds a model from a legacy fixed-format NCS report.
    ///
    /// With a structure, selections that span an entire chain are
    /// simplified to the bare chain form; without one, the residue-range
    /// form from the report is kept.
    pub fn import_legacy_spec(
        text: &str,
        structure: Option<&Structure>,
    ) -> Result<Self, Error> {
        crate::ops::matcher::from_legacy_spec(text, structure)
    }
}
