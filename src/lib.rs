//! Core library entry for the `graflink` CLI.
//!
//! The crate turns a link template plus a patch document into a shareable
//! Grafana Explore URL, and can decode such a URL back into the structured
//! link that produced it. The core lives in [`patch`] (merge engine),
//! [`reltime`] (relative time resolution), and [`codec`] (link⇄URL); the
//! CLI in [`cli`] and [`commands`] is a thin wrapper around those.

pub mod adapters;
pub mod cli;
pub mod codec;
pub mod commands;
pub mod error;
pub mod link;
pub mod patch;
pub mod ports;
pub mod reltime;
pub mod store;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
