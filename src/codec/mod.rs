//! Link⇄URL codec for Explore deep links.
//!
//! Encoding builds `<baseURL>/explore?orgId=1&schemaVersion=1&panes=<json>`
//! with the pane mapping serialized to JSON and percent-encoded as a query
//! value. Decoding inverts it: parse the URL, split the `panes` parameter
//! from the rest, and deserialize the pane mapping.
//!
//! Decoding reconstructs the base URL as `scheme://host[:port]` only: any
//! path segments on the input URL are discarded. Callers that round-trip a
//! link through a URL with a path suffix get the suffix-free base back.

use std::collections::BTreeMap;

use url::{Position, Url};

use crate::error::ParseError;
use crate::link::{self, Link, Panes};

/// Default organization id baked into generated links.
pub const DEFAULT_ORG_ID: &str = "1";

/// Query parameters other than `panes`, grouped by key with every value
/// preserved.
pub type QueryArgs = BTreeMap<String, Vec<String>>;

/// Encodes a link into a shareable Explore URL.
///
/// # Errors
///
/// Returns a [`ParseError`] if the pane mapping cannot be serialized.
pub fn link_to_url(link: &Link) -> Result<String, ParseError> {
    panes_to_url(&link.base_url, DEFAULT_ORG_ID, &link.panes)
}

/// Builds an Explore URL from its parts.
///
/// The pane JSON is deterministic: pane and extension maps are sorted, and
/// empty/default query fields are omitted.
///
/// # Errors
///
/// Returns a [`ParseError`] if the pane mapping cannot be serialized.
pub fn panes_to_url(base_url: &str, org_id: &str, panes: &Panes) -> Result<String, ParseError> {
    let panes_json = serde_json::to_string(panes).map_err(ParseError::EncodePanes)?;

    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("orgId", org_id)
        .append_pair("schemaVersion", "1")
        .append_pair("panes", &panes_json)
        .finish();

    Ok(format!("{base_url}/explore?{query}"))
}

/// Parses an Explore URL into its base URL, non-`panes` query parameters,
/// and every decoded `panes` value.
///
/// The base URL keeps only scheme and host; path segments are dropped.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is not a valid URL or a `panes`
/// value is not valid pane JSON.
pub fn parse_url(input: &str) -> Result<(String, QueryArgs, Vec<Panes>), ParseError> {
    let parsed = Url::parse(input).map_err(|source| ParseError::Url {
        url: input.to_string(),
        source,
    })?;

    let mut panes_json = Vec::new();
    let mut query_args = QueryArgs::new();
    for (key, value) in parsed.query_pairs() {
        if key == "panes" {
            panes_json.push(value.into_owned());
        } else {
            query_args.entry(key.into_owned()).or_default().push(value.into_owned());
        }
    }

    let mut panes = Vec::with_capacity(panes_json.len());
    for json in &panes_json {
        panes.push(serde_json::from_str(json).map_err(ParseError::DecodePanes)?);
    }

    let base_url = parsed[..Position::BeforePath].to_string();
    Ok((base_url, query_args, panes))
}

/// Decodes an Explore URL into a [`Link`].
///
/// The URL must carry exactly one `panes` parameter: zero is an error, and a
/// repeated parameter is rejected as ambiguous rather than resolved by
/// picking one. Callers that already hold a [`parse_url`] result can build
/// the link with [`link_from_panes`] instead of parsing twice.
///
/// # Errors
///
/// Returns a [`ParseError`] for a malformed URL, malformed pane JSON, or a
/// `panes` parameter count other than one.
pub fn url_to_link(input: &str) -> Result<Link, ParseError> {
    let (base_url, _, panes) = parse_url(input)?;
    link_from_panes(base_url, panes)
}

/// Builds a [`Link`] from an already-parsed base URL and `panes` values,
/// enforcing the exactly-one-mapping rule.
///
/// # Errors
///
/// Returns a [`ParseError`] when `panes` holds zero or multiple mappings.
pub fn link_from_panes(base_url: String, mut panes: Vec<Panes>) -> Result<Link, ParseError> {
    let pane_map = match panes.len() {
        0 => return Err(ParseError::NoPanes),
        1 => panes.remove(0),
        n => return Err(ParseError::MultiplePanes(n)),
    };

    Ok(Link {
        api_version: link::api_version(),
        kind: link::LINK_KIND.to_string(),
        base_url,
        panes: pane_map,
        ..Link::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{PaneBody, TimeRange};
    use serde_json::json;

    fn sample_panes() -> Panes {
        let mut panes = Panes::new();
        panes.insert(
            "eja".to_string(),
            PaneBody {
                datasource: "ds-uid".to_string(),
                queries: vec![serde_json::from_value(json!({
                    "refId": "A",
                    "builderOptions": {"database": "db", "table": "logs"},
                    "customarg": "customvalue"
                }))
                .unwrap()],
                range: TimeRange {
                    from: "1708863900000".to_string(),
                    to: "1708867500000".to_string(),
                },
                panels_state: None,
            },
        );
        panes
    }

    fn sample_link() -> Link {
        Link {
            api_version: crate::link::api_version(),
            kind: crate::link::LINK_KIND.to_string(),
            base_url: "https://grafana.example.com".to_string(),
            panes: sample_panes(),
            ..Link::default()
        }
    }

    #[test]
    fn encode_produces_explore_url_with_fixed_parameters() {
        let url = link_to_url(&sample_link()).unwrap();

        assert!(url.starts_with("https://grafana.example.com/explore?"));
        assert!(url.contains("orgId=1"));
        assert!(url.contains("schemaVersion=1"));
        assert!(url.contains("panes="));
    }

    #[test]
    fn encode_is_deterministic() {
        let link = sample_link();
        assert_eq!(link_to_url(&link).unwrap(), link_to_url(&link).unwrap());
    }

    #[test]
    fn decode_inverts_encode() {
        let link = sample_link();
        let url = link_to_url(&link).unwrap();

        let decoded = url_to_link(&url).unwrap();
        assert_eq!(decoded.base_url, link.base_url);
        assert_eq!(decoded.panes, link.panes);
        assert_eq!(decoded.kind, crate::link::LINK_KIND);
    }

    #[test]
    fn round_trip_preserves_extension_fields() {
        let url = link_to_url(&sample_link()).unwrap();
        let decoded = url_to_link(&url).unwrap();

        let query = &decoded.panes["eja"].queries[0];
        assert_eq!(query.additional_fields["customarg"], json!("customvalue"));
        assert_eq!(query.ref_id, "A");
    }

    #[test]
    fn decode_groups_other_query_parameters() {
        let panes_json = serde_json::to_string(&sample_panes()).unwrap();
        let url = format!(
            "https://grafana.example.com/explore?orgId=1&tag=a&tag=b&panes={}",
            url::form_urlencoded::byte_serialize(panes_json.as_bytes()).collect::<String>()
        );

        let (base_url, args, panes) = parse_url(&url).unwrap();
        assert_eq!(base_url, "https://grafana.example.com");
        assert_eq!(args["orgId"], vec!["1"]);
        assert_eq!(args["tag"], vec!["a", "b"]);
        assert_eq!(panes.len(), 1);
    }

    #[test]
    fn decode_discards_path_segments() {
        let url = link_to_url(&sample_link()).unwrap();
        let decoded = url_to_link(&url).unwrap();
        // The `/explore` suffix does not survive the round trip.
        assert_eq!(decoded.base_url, "https://grafana.example.com");
    }

    #[test]
    fn decode_keeps_the_port() {
        let mut link = sample_link();
        link.base_url = "http://localhost:3000".to_string();
        let url = link_to_url(&link).unwrap();

        let decoded = url_to_link(&url).unwrap();
        assert_eq!(decoded.base_url, "http://localhost:3000");
    }

    #[test]
    fn decode_without_panes_fails() {
        let err = url_to_link("https://grafana.example.com/explore?orgId=1").unwrap_err();
        assert!(matches!(err, ParseError::NoPanes));
    }

    #[test]
    fn decode_with_repeated_panes_fails() {
        let panes_json = serde_json::to_string(&sample_panes()).unwrap();
        let encoded: String =
            url::form_urlencoded::byte_serialize(panes_json.as_bytes()).collect();
        let url = format!(
            "https://grafana.example.com/explore?panes={encoded}&panes={encoded}"
        );

        let err = url_to_link(&url).unwrap_err();
        assert!(matches!(err, ParseError::MultiplePanes(2)));
    }

    #[test]
    fn link_from_panes_requires_exactly_one_mapping() {
        let base = "https://grafana.example.com".to_string();

        let err = link_from_panes(base.clone(), vec![]).unwrap_err();
        assert!(matches!(err, ParseError::NoPanes));

        let err =
            link_from_panes(base.clone(), vec![sample_panes(), sample_panes()]).unwrap_err();
        assert!(matches!(err, ParseError::MultiplePanes(2)));

        let link = link_from_panes(base, vec![sample_panes()]).unwrap();
        assert_eq!(link.panes, sample_panes());
    }

    #[test]
    fn decode_rejects_malformed_pane_json() {
        let err = url_to_link("https://grafana.example.com/explore?panes=not-json").unwrap_err();
        assert!(matches!(err, ParseError::DecodePanes(_)));
    }

    #[test]
    fn decode_rejects_invalid_url() {
        let err = url_to_link("not a url").unwrap_err();
        assert!(matches!(err, ParseError::Url { .. }));
    }

    #[test]
    fn pane_json_keys_are_sorted() {
        let panes_json = serde_json::to_string(&sample_panes()).unwrap();
        // Extension key sorts between known keys alphabetically.
        let builder = panes_json.find("builderOptions").unwrap();
        let custom = panes_json.find("customarg").unwrap();
        let ref_id = panes_json.find("refId").unwrap();
        assert!(builder < custom);
        assert!(custom < ref_id);
    }
}
