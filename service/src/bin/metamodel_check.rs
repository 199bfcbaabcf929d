//! `metamodel-check` command-line interface
//!
//! Validates metamodel files and prints their resolved declarations.

use clap::Parser;
use metamodel_introspect::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    run(&Cli::parse())
}
