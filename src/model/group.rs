//! NCS group records: validated input specs and the canonical group type.

/// One declarative group record: a reference selection plus its copies.
///
/// This is the validated, explicit form of the declarative `ncs_group`
/// block; the phil reader produces these and the group matcher consumes
/// them. Validation (selection reuse, copy cardinality) happens once, in
/// the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub reference: String,
    pub copies: Vec<String>,
}

impl GroupSpec {
    pub fn new(reference: &str, copies: &[&str]) -> Self {
        Self {
            reference: reference.to_string(),
            copies: copies.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// One reference selection plus its symmetry-related copies.
///
/// Groups are ordered by detection or declaration order; that order is
/// externally observable through serialization and must stay stable. The
/// number of copy selections always equals the number of non-reference
/// transforms registered for this group id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcsGroup {
    /// 1-based id, also carried by every transform of this group.
    pub group_id: usize,
    /// Selection denoting the reference (master) atoms.
    pub reference_selection: String,
    /// One selection per copy, in copy order.
    pub copy_selections: Vec<String>,
}

impl NcsGroup {
    pub fn copy_count(&self) -> usize {
        self.copy_selections.len()
    }
}
