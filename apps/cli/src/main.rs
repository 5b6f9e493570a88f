//! Docflow CLI — workflow document inspection tool.
//!
//! Parses workflow markdown into its typed model: frontmatter fields,
//! step records, inferred data-flow edges, and reference-file groups.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
