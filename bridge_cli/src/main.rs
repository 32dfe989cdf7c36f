//! # Bridge CLI
//!
//! Command line front-end for `bridge_core`: print the input schema and the
//! reference catalog, and validate a bridge input file.
//!
//! Exit status of `validate`: 0 when the inputs pass, 1 when validation
//! fails, 2 on any engine or file error.

mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bridge_core::file_io::{load_design, load_inputs, save_design, FileLock, DESIGN_EXTENSION};
use bridge_core::{DesignFile, Engine, EngineError, EngineResult, EngineSettings, InputMap};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Highway plate girder bridge input validation
#[derive(Parser, Debug)]
#[command(name = "bridge_cli")]
#[command(version, about = "Validate and derive plate girder bridge inputs")]
struct Args {
    /// Log engine activity at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the input fields and their constraints
    Schema {
        #[arg(long, default_value = "text", value_enum)]
        format: Format,
    },
    /// Print steel grades, concrete grades and rolled sections
    Catalog {
        #[arg(long, default_value = "text", value_enum)]
        format: Format,
    },
    /// Validate an input map or a saved design and print the outcome
    Validate {
        /// JSON input map or .bdf design file
        input: PathBuf,

        /// Engine settings JSON (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the inputs and results to a .bdf design file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Engineer recorded in a newly saved design
        #[arg(short, long, default_value = "")]
        engineer: String,

        #[arg(long, default_value = "text", value_enum)]
        format: Format,
    },
    /// Print version information
    Version,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!("{json}");
            }
            ExitCode::from(2)
        }
    }
}

fn run(command: Command) -> EngineResult<ExitCode> {
    match command {
        Command::Schema { format } => {
            let engine = Engine::bridge(EngineSettings::default())?;
            match format {
                Format::Text => print!("{}", output::schema_text(engine.get_schema())),
                Format::Json => println!("{}", to_json(engine.get_schema())?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Catalog { format } => {
            let engine = Engine::bridge(EngineSettings::default())?;
            match format {
                Format::Text => print!("{}", output::catalog_text(engine.catalog())),
                Format::Json => println!("{}", to_json(engine.catalog())?),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate {
            input,
            config,
            save,
            engineer,
            format,
        } => {
            let passed = validate(&input, config.as_deref(), save.as_deref(), engineer, format)?;
            Ok(if passed { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        Command::Version => {
            println!("bridge_cli {}", env!("CARGO_PKG_VERSION"));
            println!("design file schema {}", bridge_core::project::SCHEMA_VERSION);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Submit the file's inputs; true when they pass validation
fn validate(
    input: &Path,
    config: Option<&Path>,
    save: Option<&Path>,
    engineer: String,
    format: Format,
) -> EngineResult<bool> {
    let (inputs, design) = read_input(input)?;

    // Explicit config beats the settings stored in a design file
    let settings = match (config, &design) {
        (Some(path), _) => EngineSettings::from_json_file(path)?,
        (None, Some(design)) => design.settings.clone(),
        (None, None) => EngineSettings::default(),
    };

    let engine = Engine::bridge(settings.clone())?;
    let snapshot = engine.submit(inputs)?;

    match format {
        Format::Text => print!("{}", output::snapshot_text(&snapshot, engine.schema())),
        Format::Json => println!("{}", to_json(snapshot.as_ref())?),
    }

    if let Some(path) = save {
        let design = match design {
            Some(mut design) => {
                design.settings = settings;
                design.record(&snapshot);
                design
            }
            None => DesignFile::from_snapshot(engineer.as_str(), settings, &snapshot),
        };
        let user = if engineer.is_empty() { "bridge_cli" } else { engineer.as_str() };
        let _lock = FileLock::acquire(path, user)?;
        save_design(&design, path)?;
        eprintln!("Saved {}", path.display());
    }

    Ok(snapshot.validation.ok)
}

/// Inputs from the file, plus the whole design when it is a `.bdf`
fn read_input(path: &Path) -> EngineResult<(InputMap, Option<DesignFile>)> {
    if path.extension().is_some_and(|e| e == DESIGN_EXTENSION) {
        let design = load_design(path)?;
        if let Some(holder) = FileLock::check(path) {
            tracing::warn!(
                user = %holder.user_id,
                machine = %holder.machine,
                "design is open elsewhere"
            );
        }
        return Ok((design.inputs.clone(), Some(design)));
    }
    Ok((load_inputs(path)?, None))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> EngineResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| EngineError::SerializationError {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let args = Args::parse_from([
            "bridge_cli",
            "validate",
            "girder.json",
            "--save",
            "girder.bdf",
            "--engineer",
            "A. Engineer",
            "--format",
            "json",
        ]);
        match args.command {
            Command::Validate {
                input,
                save,
                engineer,
                format,
                config,
            } => {
                assert_eq!(input, PathBuf::from("girder.json"));
                assert_eq!(save, Some(PathBuf::from("girder.bdf")));
                assert_eq!(engineer, "A. Engineer");
                assert_eq!(format, Format::Json);
                assert!(config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_failure_and_errors() {
        let dir = std::env::temp_dir();
        let bad = dir.join("bridge_cli_test_bad.json");
        std::fs::write(&bad, r#"{"span": 60}"#).unwrap();
        assert!(!validate(&bad, None, None, String::new(), Format::Json).unwrap());

        let missing = dir.join("bridge_cli_test_missing.json");
        let err = validate(&missing, None, None, String::new(), Format::Text).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");

        let _ = std::fs::remove_file(&bad);
    }

    #[test]
    fn test_validate_refuses_negative_density_config() {
        let config = std::env::temp_dir().join("bridge_cli_test_negative_density.json");
        std::fs::write(&config, r#"{"steel_density": -78.5}"#).unwrap();
        let input = demo("highway_bridge.json");
        let err = validate(&input, Some(&config), None, String::new(), Format::Text).unwrap_err();
        let _ = std::fs::remove_file(&config);
        assert_eq!(err.error_code(), "INVALID_SETTING");
    }

    fn demo(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../demos").join(name)
    }

    #[test]
    fn test_demo_inputs() {
        let settings = demo("settings.json");
        let valid = demo("highway_bridge.json");
        assert!(validate(&valid, Some(&settings), None, String::new(), Format::Text).unwrap());
        let invalid = demo("out_of_range.json");
        assert!(!validate(&invalid, None, None, String::new(), Format::Text).unwrap());
    }

    #[test]
    fn test_save_then_revalidate_design() {
        let path = std::env::temp_dir().join("bridge_cli_test_demo.bdf");
        let engineer = "A. Engineer".to_string();
        let input = demo("highway_bridge.json");
        assert!(validate(&input, None, Some(&path), engineer, Format::Json).unwrap());

        let saved = load_design(&path).unwrap();
        assert_eq!(saved.meta.engineer, "A. Engineer");
        assert!(saved.is_valid());

        assert!(validate(&path, None, Some(&path), String::new(), Format::Json).unwrap());
        let resaved = load_design(&path).unwrap();
        assert_eq!(resaved.meta.id, saved.meta.id);
        assert_eq!(resaved.meta.engineer, "A. Engineer");

        let _ = std::fs::remove_file(&path);
    }
}
