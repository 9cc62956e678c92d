//! PDB coordinate reader.
//!
//! Reads `ATOM`/`HETATM` records into a [`Structure`], preserving chain,
//! residue, and atom order exactly as encountered. Order matters: the
//! derived NCS index maps address atoms by their position in this order,
//! so nothing here sorts or regroups. Alternate locations keep the first
//! conformer (blank or `A`); later ones are dropped.

use std::io::BufRead;
use std::ops::Range;
use std::path::Path;

use crate::io::error::Error;
use crate::model::atom::Atom;
use crate::model::chain::Chain;
use crate::model::residue::Residue;
use crate::model::structure::Structure;
use crate::model::types::Point;

/// Parses a PDB stream into a [`Structure`].
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut structure = Structure::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(Error::from_io)?;
        let line_number = idx + 1;

        if !(line.starts_with("ATOM  ") || line.starts_with("HETATM")) {
            continue;
        }
        parse_atom_record(&line, line_number, &mut structure)?;
    }
    Ok(structure)
}

/// Parses an in-memory PDB text.
pub fn read_str(text: &str) -> Result<Structure, Error> {
    read(text.as_bytes())
}

/// Reads a PDB file from disk.
pub fn read_path(path: &Path) -> Result<Structure, Error> {
    let file = std::fs::File::open(path).map_err(Error::from_io)?;
    read(std::io::BufReader::new(file))
}

fn parse_atom_record(
    line: &str,
    line_number: usize,
    structure: &mut Structure,
) -> Result<(), Error> {
    let alt_loc = line.chars().nth(16).unwrap_or(' ');
    if alt_loc != ' ' && alt_loc != 'A' {
        return Ok(());
    }

    let name = field(line, 12..16, line_number, "atom name")?.trim().to_string();
    let res_name = field(line, 17..20, line_number, "residue name")?
        .trim()
        .to_string();
    let chain_id = field(line, 20..22, line_number, "chain ID")?.trim().to_string();
    let res_seq: i32 = parse_field(line, 22..26, line_number, "residue number")?;
    let x: f64 = parse_field(line, 30..38, line_number, "x coordinate")?;
    let y: f64 = parse_field(line, 38..46, line_number, "y coordinate")?;
    let z: f64 = parse_field(line, 46..54, line_number, "z coordinate")?;

    if structure.chain(&chain_id).is_none() {
        structure.add_chain(Chain::new(&chain_id));
    }
    if let Some(chain) = structure.chain_mut(&chain_id) {
        if chain.residue(res_seq).is_none() {
            chain.add_residue(Residue::new(res_seq, &res_name));
        }
        if let Some(residue) = chain.residue_mut(res_seq) {
            // First conformer wins for repeated atom names.
            if !residue.has_atom(&name) {
                residue.add_atom(Atom::new(&name, Point::new(x, y, z)));
            }
        }
    }
    Ok(())
}

fn field<'a>(
    line: &'a str,
    range: Range<usize>,
    line_number: usize,
    what: &str,
) -> Result<&'a str, Error> {
    line.get(range).ok_or_else(|| {
        Error::parse("PDB", line_number, format!("record too short for {what}"))
    })
}

fn parse_field<T: std::str::FromStr>(
    line: &str,
    range: Range<usize>,
    line_number: usize,
    what: &str,
) -> Result<T, Error> {
    let raw = field(line, range, line_number, what)?.trim();
    raw.parse().map_err(|_| {
        Error::parse("PDB", line_number, format!("invalid {what} '{raw}'"))
    })
}
