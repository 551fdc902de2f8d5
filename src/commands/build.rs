//! `graflink build` command.

use std::env;
use std::path::{Path, PathBuf};

use crate::adapters::LiveClock;
use crate::codec;
use crate::link::Patch;
use crate::patch::Patcher;
use crate::store;

/// Execute the `build` command.
///
/// Loads link templates from the templates directory, applies the patch from
/// `patch_file`, and prints the resulting Explore URL. With `open_url` set,
/// also opens the URL in the default browser.
///
/// # Errors
///
/// Returns an error string if templates or the patch cannot be loaded, the
/// patch fails to apply, or the browser cannot be opened.
pub fn run(patch_file: &Path, templates: Option<&Path>, open_url: bool) -> Result<(), String> {
    let templates_dir = templates.map_or_else(default_templates_dir, Path::to_path_buf);
    let mut bases = store::load_links_in_dir(&templates_dir)?;

    let patch = read_patch(patch_file)?;

    let patcher = Patcher::new(Box::new(LiveClock));
    let link = patcher
        .apply(&mut bases, &patch)
        .map_err(|e| format!("Failed to apply patch from {}: {e}", patch_file.display()))?;

    let url = codec::link_to_url(link).map_err(|e| format!("Failed to build URL: {e}"))?;
    println!("Explore URL:\n{url}");

    if open_url {
        open::that(&url).map_err(|e| format!("Failed to open URL {url}: {e}"))?;
    }
    Ok(())
}

fn read_patch(path: &Path) -> Result<Patch, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read patch file {}: {e}", path.display()))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse patch file {}: {e}", path.display()))
}

fn default_templates_dir() -> PathBuf {
    env::var("GRAFLINK_TEMPLATES").map_or_else(|_| PathBuf::from(".graflink"), PathBuf::from)
}
