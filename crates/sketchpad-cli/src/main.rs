//! Headless Sketchpad tools: inspect, normalize and configure documents.

use clap::{Parser, Subcommand};
use sketchpad_core::storage::{read_document, write_document};
use sketchpad_core::{EditorConfig, Shape, StorageResult, serialize_shapes};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Sketchpad command line
///
/// Examples:
///   sketchpad info drawing.svg
///   sketchpad normalize drawing.svg clean.svg
///   sketchpad defaults --write
#[derive(Parser, Debug)]
#[clap(name = "sketchpad", version, about = "Inspect and rewrite Sketchpad documents")]
struct Cli {
    /// Config file to use instead of the per-user one
    #[clap(long = "config", short = 'c', global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the shapes a document contains
    Info {
        /// Document to read
        file: PathBuf,
    },
    /// Read a document and write it back in canonical form
    Normalize {
        input: PathBuf,
        output: PathBuf,
    },
    /// Print the effective editor config
    Defaults {
        /// Also write it to the config file
        #[clap(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config.clone().map(Ok).unwrap_or_else(EditorConfig::default_path) {
        Ok(path) => path,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let config = EditorConfig::load_or_default(&config_path);

    let result = match cli.command {
        Commands::Info { file } => info(&file),
        Commands::Normalize { input, output } => normalize(&input, &output, &config),
        Commands::Defaults { write } => defaults(&config, &config_path, write),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn info(path: &Path) -> StorageResult<()> {
    let shapes = read_document(path)?;
    println!("{}: {} shapes", path.display(), shapes.len());
    for (index, shape) in shapes.iter().enumerate() {
        let b = shape.bounds();
        println!(
            "  {:>3}  {:<18} ({}, {}) {} x {}",
            index,
            shape.kind().name(),
            b.x0,
            b.y0,
            b.width(),
            b.height()
        );
    }
    Ok(())
}

fn normalize(input: &Path, output: &Path, config: &EditorConfig) -> StorageResult<()> {
    let shapes = read_document(input)?;
    let refs: Vec<&Shape> = shapes.iter().collect();
    write_document(output, &serialize_shapes(&refs, config.canvas_size()))?;
    log::info!("Wrote {} shapes to {}", shapes.len(), output.display());
    Ok(())
}

fn defaults(config: &EditorConfig, path: &Path, write: bool) -> StorageResult<()> {
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| sketchpad_core::StorageError::Serialization(e.to_string()))?;
    println!("{}", json);
    if write {
        config.save(path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}
