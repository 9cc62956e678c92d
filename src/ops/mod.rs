//! Operations over the model: selection evaluation, chain similarity,
//! rigid-body superposition, and the group matcher that ties them together.

pub mod error;
pub mod matcher;
pub mod select;
pub mod similarity;
pub mod superpose;
pub(crate) mod views;

pub use error::Error;
pub use matcher::{
    detect_from_structure, from_group_specs, from_legacy_spec, from_transform_list,
    validate_group_specs, DEFAULT_CHAIN_SIMILARITY_THRESHOLD,
};
pub use similarity::chain_similarity;
pub use superpose::{FitResult, LeastSquaresFit, Superpose};
