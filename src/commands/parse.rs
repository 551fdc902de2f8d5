//! `graflink parse` command.

use std::path::Path;

use crate::codec;

/// Execute the `parse` command.
///
/// Decodes the URL into a link resource, prints the non-`panes` query
/// parameters, and writes the link as YAML to `link_file` or stdout. The
/// resource name comes from `name`, falling back to the output file stem.
///
/// # Errors
///
/// Returns an error string if the URL fails to decode or the output cannot
/// be written.
pub fn run(url: &str, link_file: Option<&Path>, name: Option<&str>) -> Result<(), String> {
    let (base_url, query_args, panes) =
        codec::parse_url(url).map_err(|e| format!("Failed to parse URL: {e}"))?;

    println!("Query arguments:");
    for (key, values) in &query_args {
        println!("  {key}: {}", values.join(", "));
    }

    let mut link = codec::link_from_panes(base_url, panes)
        .map_err(|e| format!("Failed to parse URL: {e}"))?;

    link.metadata.name = resource_name(link_file, name);

    let yaml = serde_yaml::to_string(&link).map_err(|e| format!("Failed to encode link: {e}"))?;
    match link_file {
        Some(path) => std::fs::write(path, &yaml)
            .map_err(|e| format!("Failed to write link to {}: {e}", path.display())),
        None => {
            print!("{yaml}");
            Ok(())
        }
    }
}

/// Picks the resource name: explicit flag first, then the output file stem.
fn resource_name(link_file: Option<&Path>, name: Option<&str>) -> String {
    if let Some(name) = name {
        return name.to_string();
    }
    link_file
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{Link, Panes};

    fn sample_url() -> String {
        let panes: Panes = serde_yaml::from_str(
            "eja:\n  queries:\n    - refId: A\n      customarg: customvalue\n",
        )
        .unwrap();
        crate::codec::panes_to_url("https://grafana.example.com", "1", &panes).unwrap()
    }

    #[test]
    fn parse_writes_link_file_named_after_stem() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mylink.yaml");

        run(&sample_url(), Some(&out), None).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        let link: Link = serde_yaml::from_str(&written).unwrap();
        assert_eq!(link.metadata.name, "mylink");
        assert_eq!(link.base_url, "https://grafana.example.com");
        assert_eq!(link.panes["eja"].queries[0].ref_id, "A");
    }

    #[test]
    fn explicit_name_wins_over_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("mylink.yaml");

        run(&sample_url(), Some(&out), Some("custom")).unwrap();

        let link: Link = serde_yaml::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(link.metadata.name, "custom");
    }

    #[test]
    fn parse_to_stdout_succeeds() {
        assert!(run(&sample_url(), None, None).is_ok());
    }

    #[test]
    fn parse_rejects_url_without_panes() {
        let err = run("https://grafana.example.com/explore?orgId=1", None, None).unwrap_err();
        assert!(err.contains("no panes"));
    }

    #[test]
    fn parse_rejects_repeated_panes_parameter() {
        let url = "https://grafana.example.com/explore?panes=%7B%7D&panes=%7B%7D";
        let err = run(url, None, None).unwrap_err();
        assert!(err.contains("2 panes"));
    }

    #[test]
    fn resource_name_falls_back_to_empty() {
        assert_eq!(resource_name(None, None), "");
        assert_eq!(resource_name(Some(Path::new("dir/out.yaml")), None), "out");
        assert_eq!(resource_name(Some(Path::new("out.yaml")), Some("n")), "n");
    }
}
