//! Command-line interface for model checking.
//!
//! Loads model files (already-parsed metamodel JSON or YAML), registers
//! them with one [`ModelManager`], runs the validation pass and prints the
//! resolved declarations.

use crate::config::load_introspect_config;
use crate::introspect::{ModelManager, ResolvedDeclaration, ResolvedModel};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use metamodel_core::prelude::*;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Validate metamodel files and print their resolved declarations
#[derive(Parser, Debug)]
#[command(name = "metamodel-check", author, version, about, long_about = None)]
pub struct Cli {
    /// Model files (`.json`, `.yaml` or `.yml`)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Available output formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Pretty,
    /// `JSON` output
    Json,
}

/// Configure the tracing subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read one model file into a JSON tree
fn read_model(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let value: std::result::Result<Value, MetamodelError> = if is_yaml {
        serde_yaml::from_str(&text).map_err(MetamodelError::from)
    } else {
        serde_json::from_str(&text).map_err(MetamodelError::from)
    };
    value.with_context(|| format!("failed to parse {}", path.display()))
}

/// Build a manager from the files named on the command line
///
/// # Errors
///
/// Returns the first read, parse or registration error
pub fn load_manager(files: &[PathBuf], config: IntrospectConfig) -> anyhow::Result<ModelManager> {
    let mut manager = ModelManager::with_config(config);
    for path in files {
        let value = read_model(path)?;
        manager
            .add_model_value(&value)
            .with_context(|| format!("invalid model file {}", path.display()))?;
    }
    Ok(manager)
}

/// Run the CLI
///
/// # Errors
///
/// Returns the first configuration, loading or validation error
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_introspect_config(path)
            .with_context(|| format!("invalid configuration {}", path.display()))?,
        None => IntrospectConfig::default(),
    };

    let manager = load_manager(&cli.files, config)?;
    let model = manager.resolve().context("model validation failed")?;

    match cli.format {
        OutputFormat::Pretty => print_pretty(&model),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&model))?),
    }
    Ok(())
}

fn kind_label(declaration: &ResolvedDeclaration<'_>) -> String {
    let declaration = declaration.declaration();
    match (declaration.class_kind(), declaration.scalar()) {
        (Some(kind), _) => kind.to_string(),
        (None, Some(scalar)) => format!("{} scalar", scalar.primitive()),
        (None, None) => "Enum".to_string(),
    }
}

fn print_pretty(model: &ResolvedModel<'_>) {
    for declaration in model.declarations() {
        let mut header = format!(
            "{} {} ({})",
            "✓".green(),
            declaration.fully_qualified_name().bold(),
            kind_label(declaration)
        );
        if let Some(parent) = declaration.super_type().and_then(|id| model.get(id)) {
            header.push_str(&format!(" extends {}", parent.fully_qualified_name()));
        }
        println!("{header}");
        for property in declaration.properties() {
            println!("    {property}");
        }
    }
    println!(
        "{}",
        format!("{} declarations valid", model.len()).green().bold()
    );
}

fn to_json(model: &ResolvedModel<'_>) -> Value {
    let declarations: Vec<Value> = model
        .declarations()
        .map(|declaration| {
            serde_json::json!({
                "name": declaration.fully_qualified_name(),
                "kind": kind_label(declaration),
                "abstract": declaration.declaration().is_abstract(),
                "superType": declaration
                    .super_type()
                    .and_then(|id| model.get(id))
                    .map(ResolvedDeclaration::fully_qualified_name),
                "properties": declaration
                    .properties()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    Value::Array(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from(["metamodel-check", "a.json", "b.yaml", "-v", "--format", "json"]);
        assert_eq!(cli.files.len(), 2);
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_files_required() {
        assert!(Cli::try_parse_from(["metamodel-check"]).is_err());
    }
}
