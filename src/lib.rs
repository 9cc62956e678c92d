//! Non-crystallographic symmetry (NCS) group modeling.
//!
//! The crate builds an [`NcsModel`] from one of three inputs: explicit
//! group records (reference selection plus copies), explicit
//! rotation/translation lists, or automatic detection over a parsed
//! structure. The finalized model owns every rigid-body operator in a
//! serial-numbered registry and precomputes the derived views downstream
//! consumers ask for: the combined selection, atom membership mask,
//! compact index maps, and restraint groups.
//!
//! Two text formats round-trip the model: declarative `ncs_group` blocks
//! ([`io::phil`]) and the legacy fixed-format report ([`io::spec`]).
//! Structures come from PDB files via [`io::pdb`].

pub mod io;
pub mod model;
pub mod ops;

pub use model::atom::Atom;
pub use model::chain::Chain;
pub use model::group::{GroupSpec, NcsGroup};
pub use model::ncs::{NcsCopy, NcsModel, NcsRestraintGroup};
pub use model::registry::TransformRegistry;
pub use model::residue::Residue;
pub use model::structure::Structure;
pub use model::transform::NcsTransform;
pub use model::types::{Point, Rotation, Translation};
pub use ops::{
    chain_similarity, detect_from_structure, from_group_specs, from_legacy_spec,
    from_transform_list, validate_group_specs, Error, FitResult, LeastSquaresFit,
    Superpose, DEFAULT_CHAIN_SIMILARITY_THRESHOLD,
};
