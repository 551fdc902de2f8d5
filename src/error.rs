//! Error types for the core link transformations.
//!
//! Two kinds cover every failure mode: [`ValidationError`] for caller input
//! that fails a structural check (bad patch, wrong pane/query cardinality)
//! and [`ParseError`] for malformed tokens, URLs, and payloads. Lower-level
//! errors are wrapped with one layer of context and surfaced unchanged.

use thiserror::Error;

/// A caller-input problem detected while applying a patch.
///
/// Never worth retrying: the same input always reproduces the same failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The patch did not name a template.
    #[error("patch must name a template; set `template` to the name of the link to patch")]
    MissingTemplate,

    /// The patch did not carry a query object.
    #[error("patch must carry a query; set `query` to a non-empty object to merge")]
    MissingQuery,

    /// No loaded link matched the requested template name.
    #[error(
        "no template named `{template}` among the loaded links (known templates: {known:?}); \
         add it to your templates or pick one of the existing names"
    )]
    UnknownTemplate {
        /// The name the patch asked for.
        template: String,
        /// Names of every link that was available.
        known: Vec<String>,
    },

    /// The selected link did not have exactly one pane.
    #[error("link `{template}` has {count} panes; expected exactly 1")]
    PaneCount {
        /// Name of the selected link.
        template: String,
        /// Number of panes actually present.
        count: usize,
    },

    /// The selected pane did not have exactly one query.
    #[error("pane `{pane}` has {count} queries; expected exactly 1")]
    QueryCount {
        /// Id of the pane that was inspected.
        pane: String,
        /// Number of queries actually present.
        count: usize,
    },

    /// A relative-time bound in the patch range failed to resolve.
    #[error("failed to resolve relative time in `range.{bound}`: {source}")]
    Time {
        /// Which bound failed: `from` or `to`.
        bound: &'static str,
        /// The underlying token error.
        source: ParseError,
    },

    /// The merged query could not round-trip through its serialized form.
    #[error("failed to apply query patch: {0}")]
    QueryPatch(#[from] serde_json::Error),
}

/// A malformed token, URL, or payload.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An empty relative-time token.
    #[error("empty relative time; use `now` for the current time")]
    EmptyTime,

    /// A token that is neither `now` nor `now-<amount><unit>`.
    #[error(
        "invalid relative time `{0}`; expected `now` or `now-<amount><unit>` \
         with unit one of s, m, h, d, w, M, y"
    )]
    InvalidTime(String),

    /// The input could not be parsed as a URL at all.
    #[error("failed to parse URL `{url}`: {source}")]
    Url {
        /// The input that was rejected.
        url: String,
        /// The underlying URL parse error.
        source: url::ParseError,
    },

    /// The URL carried no `panes` query parameter.
    #[error("no panes found in URL")]
    NoPanes,

    /// The URL repeated the `panes` query parameter.
    #[error("found {0} panes values in URL; expected exactly 1")]
    MultiplePanes(usize),

    /// A `panes` value was not valid pane JSON.
    #[error("failed to decode panes JSON: {0}")]
    DecodePanes(#[source] serde_json::Error),

    /// A pane mapping could not be serialized to JSON.
    #[error("failed to encode panes to JSON: {0}")]
    EncodePanes(#[source] serde_json::Error),
}
