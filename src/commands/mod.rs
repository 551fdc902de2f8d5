//! Command dispatch and handlers.

pub mod build;
pub mod parse;

use crate::cli::Command;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Build { patch_file, templates, open } => {
            build::run(patch_file, templates.as_deref(), *open)
        }
        Command::Parse { url, link_file, name } => {
            parse::run(url, link_file.as_deref(), name.as_deref())
        }
    }
}
