//! Core data structures for the NCS group model.
//!
//! This module defines the structural hierarchy the matcher evaluates
//! selections against, the selection-expression algebra, the rigid-body
//! transform registry, and the finalized [`ncs::NcsModel`] aggregate with
//! its derived views.

pub mod atom;
pub mod chain;
pub mod group;
pub mod ncs;
pub mod registry;
pub mod residue;
pub mod selection;
pub mod structure;
pub mod transform;
pub mod types;
