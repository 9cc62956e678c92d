//! Declarative `ncs_group` block format: human-editable group records with
//! 80-column continuation wrapping.

mod reader;
mod writer;

pub use reader::read_groups;
pub use writer::{format_80, write_groups};
