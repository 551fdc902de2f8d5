//! Data model for link templates, panes, and patches.
//!
//! A [`Link`] is a named resource pointing at an Explore view: a base URL
//! plus a mapping of pane ids to pane bodies. A [`Patch`] names one link
//! template and carries a free-form query object to merge into it. Both are
//! plain serde types; the interesting serialization logic (known fields vs.
//! extension fields) lives in [`query`].

pub mod query;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use query::{BuilderOptions, Column, Datasource, Meta, Query};

/// API group for link and patch resources.
pub const GROUP: &str = "graflink.dev";
/// API version for link and patch resources.
pub const VERSION: &str = "v1alpha1";
/// `kind` of a link template resource.
pub const LINK_KIND: &str = "ExploreLink";
/// `kind` of a pane patch resource.
pub const PATCH_KIND: &str = "PanePatch";

/// Returns the `apiVersion` string for this crate's resources.
#[must_use]
pub fn api_version() -> String {
    format!("{GROUP}/{VERSION}")
}

/// Mapping from pane id to pane body. Pane order is irrelevant; a sorted
/// map keeps serialization deterministic.
pub type Panes = BTreeMap<String, PaneBody>;

/// A link to an Explore view, usable as a template for patching.
///
/// Identity is `metadata.name`; that is what a patch's `template` field
/// matches against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// API version of the resource, e.g. `graflink.dev/v1alpha1`.
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Resource kind; [`LINK_KIND`] for links.
    #[serde(default)]
    pub kind: String,
    /// Resource metadata; `name` identifies the template.
    #[serde(default)]
    pub metadata: Metadata,
    /// Base URL that generated links are rooted at.
    #[serde(rename = "baseURL", default)]
    pub base_url: String,
    /// Mapping from pane id to pane body.
    #[serde(default)]
    pub panes: Panes,
}

/// Metadata carried by link and patch resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the resource.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Optional namespace.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Free-form labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Free-form annotations.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// One pane of an Explore view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaneBody {
    /// UID of the pane's datasource.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub datasource: String,
    /// Queries shown in the pane. Patching requires exactly one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<Query>,
    /// Time range of the pane; relative tokens in templates, rewritten to
    /// absolute epoch-millisecond strings when a patch freezes time.
    #[serde(default, skip_serializing_if = "TimeRange::is_empty")]
    pub range: TimeRange,
    /// Optional panel visualization state.
    #[serde(rename = "panelsState", default, skip_serializing_if = "Option::is_none")]
    pub panels_state: Option<PanelsState>,
}

/// A pair of time bounds: relative tokens (`now`, `now-5m`) or absolute
/// epoch-millisecond strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
    /// End of the range.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
}

impl TimeRange {
    /// Returns `true` when both bounds are unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}

/// Visualization state of a pane's panels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelsState {
    /// State of the logs panel, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<LogsState>,
}

/// State of a logs panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsState {
    /// Displayed column configuration, keyed by position.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, String>,
    /// Selected visualisation type.
    #[serde(rename = "visualisationType", default, skip_serializing_if = "String::is_empty")]
    pub visualisation_type: String,
}

/// A patch to apply to one link template's single query.
///
/// Read once, applied once, discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// API version of the resource.
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,
    /// Resource kind; [`PATCH_KIND`] for patches.
    #[serde(default)]
    pub kind: String,
    /// Resource metadata.
    #[serde(default)]
    pub metadata: Metadata,
    /// Name of the link template to patch. Required.
    #[serde(default)]
    pub template: String,
    /// Free-form object merged into the template's query. Required,
    /// non-empty; may carry keys the template has never seen.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub query: serde_json::Map<String, serde_json::Value>,
    /// Relative time range for the generated link.
    #[serde(default, skip_serializing_if = "TimeRange::is_empty")]
    pub range: TimeRange,
    /// Whether to freeze the range to absolute time. Defaults to `true`.
    #[serde(rename = "fixTime", default, skip_serializing_if = "Option::is_none")]
    pub fix_time: Option<bool>,
}

impl Patch {
    /// Returns the effective freeze-time setting (default `true`).
    #[must_use]
    pub fn fix_time(&self) -> bool {
        self.fix_time.unwrap_or(true)
    }
}
