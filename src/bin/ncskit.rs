use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use ncs_kit::{
    detect_from_structure, from_group_specs, io, LeastSquaresFit, NcsModel, Structure,
    DEFAULT_CHAIN_SIMILARITY_THRESHOLD,
};

/// NCS group detection and format conversion.
#[derive(Debug, Parser)]
#[command(name = "ncskit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GroupFormat {
    /// Declarative `ncs_group` blocks.
    Phil,
    /// Legacy fixed-format NCS report.
    Spec,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Detects NCS groups from chain similarity in a PDB file.
    Detect {
        /// Input PDB file.
        pdb: PathBuf,
        /// Minimum chain similarity for two chains to share a group.
        #[arg(long, default_value_t = DEFAULT_CHAIN_SIMILARITY_THRESHOLD)]
        threshold: f64,
        /// Output format.
        #[arg(long, value_enum, default_value_t = GroupFormat::Phil)]
        format: GroupFormat,
    },
    /// Converts NCS group definitions between formats.
    Convert {
        /// Input group definition file.
        input: PathBuf,
        /// Format of the input file.
        #[arg(long, value_enum)]
        from: GroupFormat,
        /// Format to emit.
        #[arg(long, value_enum)]
        to: GroupFormat,
        /// PDB file the selections refer to. Required when emitting the
        /// legacy report, which needs coordinates.
        #[arg(long)]
        pdb: Option<PathBuf>,
    },
    /// Summarizes the groups defined in a declarative file.
    Groups {
        /// Input file with `ncs_group` blocks.
        input: PathBuf,
        /// PDB file to evaluate selections against.
        #[arg(long)]
        pdb: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Detect {
            pdb,
            threshold,
            format,
        } => detect(&pdb, threshold, format),
        Command::Convert {
            input,
            from,
            to,
            pdb,
        } => convert(&input, from, to, pdb.as_deref()),
        Command::Groups { input, pdb } => groups(&input, pdb.as_deref()),
    }
}

fn read_structure(path: &std::path::Path) -> Result<Structure> {
    io::pdb::read_path(path)
        .with_context(|| format!("failed to read PDB file {}", path.display()))
}

fn detect(pdb: &std::path::Path, threshold: f64, format: GroupFormat) -> Result<()> {
    let structure = read_structure(pdb)?;
    let model = detect_from_structure(&structure, threshold, &LeastSquaresFit)
        .context("NCS detection failed")?;
    if model.number_of_groups() == 0 {
        bail!("no NCS groups found at threshold {threshold}");
    }
    match format {
        GroupFormat::Phil => print!("{}", model.print_declarative()),
        GroupFormat::Spec => print!("{}", model.export_legacy_spec(&structure)?),
    }
    Ok(())
}

fn convert(
    input: &std::path::Path,
    from: GroupFormat,
    to: GroupFormat,
    pdb: Option<&std::path::Path>,
) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let structure = pdb.map(read_structure).transpose()?;

    let model = match from {
        GroupFormat::Phil => {
            let specs = io::phil::read_groups(&text)?;
            from_group_specs(&specs, structure.as_ref(), &LeastSquaresFit)?
        }
        GroupFormat::Spec => NcsModel::import_legacy_spec(&text, structure.as_ref())?,
    };

    match to {
        GroupFormat::Phil => print!("{}", model.print_declarative()),
        GroupFormat::Spec => {
            let structure = structure
                .context("emitting the legacy report requires --pdb for coordinates")?;
            print!("{}", model.export_legacy_spec(&structure)?);
        }
    }
    Ok(())
}

fn groups(input: &std::path::Path, pdb: Option<&std::path::Path>) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let specs = io::phil::read_groups(&text)?;
    let structure = pdb.map(read_structure).transpose()?;
    let model = from_group_specs(&specs, structure.as_ref(), &LeastSquaresFit)?;

    println!("groups: {}", model.number_of_groups());
    println!("transforms: {}", model.transforms().len());
    println!("combined selection: {}", model.combined_selection_string());
    for group in model.groups() {
        println!(
            "group {}: reference '{}' with {} copies",
            group.group_id,
            group.reference_selection,
            group.copy_count()
        );
    }
    Ok(())
}
