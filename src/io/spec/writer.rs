//! Emission of the legacy fixed-format NCS report.

use crate::model::ncs::NcsModel;
use crate::model::structure::Structure;
use crate::model::transform::NcsTransform;
use crate::model::types::{Rotation, Translation};
use crate::ops::error::Error;
use crate::ops::select;

/// Writes the legacy fixed-format report for a model.
///
/// Every member selection is evaluated against the structure to recover
/// the chain ID, atom count, centroid, and residue ranges its record
/// carries. Column widths are fixed at four decimals in ten-character
/// fields, matching what the legacy readers expect. Report operators map
/// the copy onto the master, so each registry transform is inverted on
/// the way out.
pub fn write(model: &NcsModel, structure: &Structure) -> Result<String, Error> {
    let sites = select::sites(structure);
    let mut out = String::from("Summary of NCS information\n\n");

    for group in model.groups() {
        out.push_str("new_ncs_group\n");

        let master = model
            .transforms()
            .group_transforms(group.group_id)
            .find(|t| t.is_master)
            .ok_or_else(|| {
                Error::inconsistent_grouping(format!(
                    "group {} has no reference transform",
                    group.group_id
                ))
            })?;

        let members = std::iter::once((&group.reference_selection, master)).chain(
            group
                .copy_selections
                .iter()
                .zip(model.transforms().copy_transforms(group.group_id)),
        );

        for (selection, transform) in members {
            let indices = select::evaluate(structure, selection)?;
            if indices.is_empty() {
                return Err(Error::inconsistent_grouping(format!(
                    "selection '{selection}' selects no atoms"
                )));
            }
            let ranges = select::residue_number_ranges(structure, selection)?;
            let chain_id = sites[indices[0]].chain_id;

            let mut centroid = Translation::zeros();
            for &i in &indices {
                centroid += sites[i].atom.pos.coords;
            }
            centroid /= indices.len() as f64;

            write_operator(
                &mut out,
                transform,
                chain_id,
                &centroid,
                indices.len(),
                &ranges,
            );
        }
    }
    Ok(out)
}

fn write_operator(
    out: &mut String,
    transform: &NcsTransform,
    chain_id: &str,
    center: &Translation,
    matching: usize,
    ranges: &[(i32, i32)],
) {
    let file_rotation = transform.rotation.transpose();
    // Negating an exact zero yields IEEE -0.0, which would print with a
    // sign; adding 0.0 normalizes it without changing any other value.
    let file_translation = (-file_rotation * transform.translation).map(|v| v + 0.0);

    out.push_str("new_operator\n\n");
    for i in 0..3 {
        out.push_str(&rota_row(&file_rotation, i));
        out.push('\n');
    }
    let t = &file_translation;
    out.push_str(&format!("tran_orth {:10.4}{:10.4}{:10.4}\n\n", t.x, t.y, t.z));
    out.push_str(&format!(
        "center_orth{:10.4}{:10.4}{:10.4}\n",
        center.x, center.y, center.z
    ));
    out.push_str(&format!("CHAIN {chain_id}\n"));
    out.push_str(&format!("RMSD {}\n", format_rmsd(transform.rmsd)));
    out.push_str(&format!("MATCHING {matching}\n"));
    for (start, end) in ranges {
        out.push_str(&format!("  RESSEQ {start}:{end}\n"));
    }
    out.push('\n');
}

fn rota_row(rotation: &Rotation, row: usize) -> String {
    format!(
        "rota_matrix{:10.4}{:10.4}{:10.4}",
        rotation[(row, 0)],
        rotation[(row, 1)],
        rotation[(row, 2)]
    )
}

/// Four decimals with trailing zeros trimmed; zero stays `0.0`.
fn format_rmsd(rmsd: f64) -> String {
    let mut s = format!("{rmsd:.4}");
    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::chain::Chain;
    use crate::model::group::GroupSpec;
    use crate::model::residue::Residue;
    use crate::model::types::Point;
    use crate::ops::matcher::from_group_specs;
    use crate::ops::superpose::LeastSquaresFit;

    fn two_chain_structure() -> Structure {
        let mut structure = Structure::new();
        for (chain_id, shift) in [("A", 0.0), ("B", 10.0)] {
            let mut chain = Chain::new(chain_id);
            for resseq in 1..=3 {
                let mut residue = Residue::new(resseq, "GLY");
                for (k, name) in ["N", "CA", "C"].iter().enumerate() {
                    residue.add_atom(Atom::new(
                        name,
                        Point::new(resseq as f64, k as f64, shift),
                    ));
                }
                chain.add_residue(residue);
            }
            structure.add_chain(chain);
        }
        structure
    }

    #[test]
    fn write_emits_fixed_columns() {
        let structure = two_chain_structure();
        let specs = [GroupSpec::new("chain A", &["chain B"])];
        let model =
            from_group_specs(&specs, Some(&structure), &LeastSquaresFit).unwrap();

        let text = model.export_legacy_spec(&structure).unwrap();

        assert!(text.starts_with("Summary of NCS information\n\n"));
        assert!(text.contains("new_ncs_group\n"));
        assert!(text.contains("rota_matrix    1.0000    0.0000    0.0000\n"));
        assert!(text.contains("tran_orth     0.0000    0.0000    0.0000\n"));
        assert!(text.contains("CHAIN A\n"));
        assert!(text.contains("CHAIN B\n"));
        assert!(text.contains("RMSD 0.0\n"));
        assert!(text.contains("MATCHING 9\n"));
        assert!(text.contains("  RESSEQ 1:3\n"));
        // The copy is the reference shifted by 10 along z; the report
        // carries the copy-onto-master direction, hence the sign.
        assert!(text.contains("tran_orth     0.0000    0.0000  -10.0000\n"));
    }

    #[test]
    fn write_round_trips_through_import() {
        let structure = two_chain_structure();
        let specs = [GroupSpec::new("chain A", &["chain B"])];
        let model =
            from_group_specs(&specs, Some(&structure), &LeastSquaresFit).unwrap();

        let text = model.export_legacy_spec(&structure).unwrap();
        let restored = NcsModel::import_legacy_spec(&text, Some(&structure)).unwrap();

        assert_eq!(restored.number_of_groups(), 1);
        assert_eq!(restored.groups()[0].reference_selection, "chain A");
        assert_eq!(restored.groups()[0].copy_selections, ["chain B"]);
        let copy = restored.transforms().get(2).unwrap();
        assert!((copy.translation.z - 10.0).abs() < 1e-3);
    }

    #[test]
    fn format_rmsd_trims_trailing_zeros() {
        assert_eq!(format_rmsd(0.0), "0.0");
        assert_eq!(format_rmsd(0.0005), "0.0005");
        assert_eq!(format_rmsd(0.05), "0.05");
        assert_eq!(format_rmsd(1.0), "1.0");
    }
}
