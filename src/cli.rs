//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `graflink`.
#[derive(Debug, Parser)]
#[command(name = "graflink", version, about = "Build and parse Grafana Explore deep links")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply a patch to a link template and print the resulting URL.
    Build {
        /// YAML file containing the pane patch to apply.
        #[arg(short = 'p', long)]
        patch_file: PathBuf,
        /// Directory containing link template YAML files.
        /// Defaults to `$GRAFLINK_TEMPLATES`, then `.graflink`.
        #[arg(short = 't', long)]
        templates: Option<PathBuf>,
        /// Open the generated URL in a browser.
        #[arg(long)]
        open: bool,
    },
    /// Parse an Explore URL back into a link resource.
    Parse {
        /// The URL to parse.
        #[arg(short = 'u', long)]
        url: String,
        /// File to write the link to. Written to stdout when omitted.
        #[arg(short = 'o', long)]
        link_file: Option<PathBuf>,
        /// Name to give the link resource when saving.
        #[arg(short = 'n', long)]
        name: Option<String>,
    },
}
