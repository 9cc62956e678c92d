//! Legacy PDB coordinate format.

mod reader;

pub use reader::{read, read_path, read_str};
