//! methylbed CLI entry point
//!
//! Converts downloaded GDC Methylation Beta Value files into annotated,
//! coordinate-sorted BED files plus a header.schema sidecar.

use clap::{Parser, Subcommand};
use methylbed::config::Settings;
use methylbed::core::AnnotationResources;
use methylbed::formats;
use methylbed::locate::{file_uuid, AliquotLocator, FileUuidLocator, ManifestLocator};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "methylbed")]
#[command(about = "Convert GDC methylation beta values into annotated, sorted BED files")]
#[command(version)]
#[command(author = "methylbed Contributors")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every methylation file in a download directory
    Convert {
        /// Directory with downloaded input files (<file_uuid>_<name>)
        input_dir: PathBuf,
        /// Directory for converted BED files and header.schema
        output_dir: PathBuf,
        /// Settings file with reference asset paths
        #[arg(short = 's', long, default_value = "settings.toml")]
        settings: PathBuf,
        /// Optional manifest mapping file uuids to aliquot ids
        /// (without it, outputs are named after the file uuid)
        #[arg(short = 'm', long)]
        manifest: Option<PathBuf>,
    },
    /// Write the header.schema sidecar only
    Schema {
        /// Directory for header.schema
        output_dir: PathBuf,
    },
}

fn run_convert(
    input_dir: &PathBuf,
    output_dir: &PathBuf,
    settings_path: &PathBuf,
    manifest: Option<&PathBuf>,
) -> anyhow::Result<()> {
    let start = Instant::now();

    eprintln!("Loading settings: {:?}", settings_path);
    let settings = Settings::load(settings_path)?;

    let locator: Box<dyn AliquotLocator> = match manifest {
        Some(path) => {
            let manifest = ManifestLocator::from_file(path)
                .map_err(|e| anyhow::anyhow!("Failed to read manifest {:?}: {}", path, e))?;
            eprintln!("Loaded manifest with {} entries", manifest.len());
            Box::new(manifest)
        }
        None => Box::new(FileUuidLocator),
    };

    eprintln!("Loading reference assets");
    let mut resources = AnnotationResources::load(&settings)?;
    eprintln!("Assets loaded in {:.2}s", start.elapsed().as_secs_f64());

    // Collect input files in a stable order
    let mut inputs: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    inputs.sort();

    if inputs.is_empty() {
        anyhow::bail!("No input files found in {:?}", input_dir);
    }
    eprintln!("Files to convert: {}", inputs.len());

    if !output_dir.exists() {
        std::fs::create_dir_all(output_dir)?;
    }
    formats::dump_schema(output_dir)?;

    let mut converted_files = 0usize;
    let mut skipped_files = 0usize;
    let mut total_rows = 0usize;
    let mut dropped_rows = 0usize;

    for input in &inputs {
        let uuid = match file_uuid(input) {
            Some(uuid) => uuid,
            None => {
                log::warn!("Skipping {:?}: unusable file name", input);
                skipped_files += 1;
                continue;
            }
        };
        let aliquot = match locator.locate(&uuid) {
            Some(aliquot) => aliquot,
            None => {
                log::warn!("Skipping {:?}: no aliquot id for uuid {}", input, uuid);
                skipped_files += 1;
                continue;
            }
        };

        eprintln!("Converting {:?}", input);
        match formats::convert_file(input, output_dir, &aliquot, &mut resources)? {
            Some((out_path, stats)) => {
                eprintln!(
                    "  -> {:?} ({} rows, {} dropped)",
                    out_path, stats.converted, stats.dropped
                );
                converted_files += 1;
                total_rows += stats.converted;
                dropped_rows += stats.dropped;
            }
            None => {
                eprintln!("  -> no convertible rows, skipped");
                skipped_files += 1;
            }
        }
    }

    eprintln!("\n=== Conversion Statistics ===");
    eprintln!("Files converted: {}", converted_files);
    eprintln!("Files skipped:   {}", skipped_files);
    eprintln!("Rows written:    {}", total_rows);
    eprintln!("Rows dropped:    {}", dropped_rows);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            settings,
            manifest,
        } => run_convert(&input_dir, &output_dir, &settings, manifest.as_ref())?,

        Commands::Schema { output_dir } => {
            if !output_dir.exists() {
                std::fs::create_dir_all(&output_dir)?;
            }
            let path = formats::dump_schema(&output_dir)?;
            eprintln!("Wrote {:?}", path);
        }
    }

    Ok(())
}
