//! File formats: PDB coordinates, declarative `ncs_group` blocks, and the
//! legacy fixed-format NCS report.

pub mod error;
pub mod pdb;
pub mod phil;
pub mod spec;

pub use error::Error;
