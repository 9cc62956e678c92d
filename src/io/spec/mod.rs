//! Legacy fixed-format NCS report: `new_ncs_group` / `new_operator` blocks
//! with fixed-width operator matrices.

mod reader;
mod writer;

pub use reader::{read, SpecOperator};
pub use writer::write;
