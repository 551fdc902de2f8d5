//! Query type with an open schema: known fields plus an extension map.
//!
//! Grafana datasource plugins attach fields we have no schema for. A
//! [`Query`] therefore splits into a fixed set of known fields and a sorted
//! extension map holding everything else. Decoding lifts known keys out of a
//! generic document and strips them from the extension map, so the two never
//! overlap; encoding serializes the known fields into a generic document and
//! overlays the extensions on top. Every extension field survives an
//! encode/decode round trip verbatim.

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Field names a [`Query`] has a declared schema for. Decoding strips these
/// from the extension map.
pub const KNOWN_FIELDS: [&str; 8] = [
    "refId",
    "datasource",
    "editorType",
    "rawSql",
    "builderOptions",
    "pluginVersion",
    "format",
    "queryType",
];

/// A single query within a pane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Reference id of the query within the pane, e.g. `A`.
    pub ref_id: String,
    /// Datasource the query runs against.
    pub datasource: Datasource,
    /// Editor kind, e.g. `sql` or `builder`.
    pub editor_type: String,
    /// Raw query text.
    pub raw_sql: String,
    /// Structured builder options.
    pub builder_options: BuilderOptions,
    /// Version of the datasource plugin that authored the query.
    pub plugin_version: String,
    /// Numeric format code.
    pub format: i64,
    /// Query type discriminator.
    pub query_type: String,
    /// Every field not in [`KNOWN_FIELDS`], preserved verbatim.
    pub additional_fields: Map<String, Value>,
}

/// Datasource descriptor inside a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    /// Plugin type, e.g. `grafana-clickhouse-datasource`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// UID of the datasource instance.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
}

/// Options for the query builder panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuilderOptions {
    /// Database to query.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub database: String,
    /// Table to query.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub table: String,
    /// Builder query type.
    #[serde(rename = "queryType", default, skip_serializing_if = "String::is_empty")]
    pub query_type: String,
    /// Builder mode.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mode: String,
    /// Selected columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<Column>,
    /// Builder metadata.
    #[serde(default, skip_serializing_if = "is_default")]
    pub meta: Meta,
    /// Row limit.
    #[serde(default, skip_serializing_if = "is_default")]
    pub limit: i64,
    /// Simple log query expression.
    #[serde(rename = "simplelogQuery", default, skip_serializing_if = "String::is_empty")]
    pub simplelog_query: String,
}

/// A column selection in the builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Semantic hint, e.g. `time` or `log_level`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hint: String,
}

/// Builder metadata flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Whether OpenTelemetry columns are enabled.
    #[serde(rename = "otelEnabled", default, skip_serializing_if = "is_default")]
    pub otel_enabled: bool,
}

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// Serde mirror of the known fields only. Kept in sync with [`KNOWN_FIELDS`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct KnownFields {
    #[serde(rename = "refId", default, skip_serializing_if = "String::is_empty")]
    ref_id: String,
    #[serde(default, skip_serializing_if = "is_default")]
    datasource: Datasource,
    #[serde(rename = "editorType", default, skip_serializing_if = "String::is_empty")]
    editor_type: String,
    #[serde(rename = "rawSql", default, skip_serializing_if = "String::is_empty")]
    raw_sql: String,
    #[serde(rename = "builderOptions", default, skip_serializing_if = "is_default")]
    builder_options: BuilderOptions,
    #[serde(rename = "pluginVersion", default, skip_serializing_if = "String::is_empty")]
    plugin_version: String,
    #[serde(default, skip_serializing_if = "is_default")]
    format: i64,
    #[serde(rename = "queryType", default, skip_serializing_if = "String::is_empty")]
    query_type: String,
}

impl Serialize for Query {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let known = KnownFields {
            ref_id: self.ref_id.clone(),
            datasource: self.datasource.clone(),
            editor_type: self.editor_type.clone(),
            raw_sql: self.raw_sql.clone(),
            builder_options: self.builder_options.clone(),
            plugin_version: self.plugin_version.clone(),
            format: self.format,
            query_type: self.query_type.clone(),
        };
        let mut value = serde_json::to_value(&known).map_err(S::Error::custom)?;
        if let Value::Object(map) = &mut value {
            // Extension keys never collide with known keys: decoding strips
            // known keys from the extension map.
            for (key, val) in &self.additional_fields {
                map.insert(key.clone(), val.clone());
            }
        }
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Query {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let known: KnownFields = serde_json::from_value(Value::Object(fields.clone()))
            .map_err(D::Error::custom)?;
        for key in KNOWN_FIELDS {
            fields.remove(key);
        }
        Ok(Query {
            ref_id: known.ref_id,
            datasource: known.datasource,
            editor_type: known.editor_type,
            raw_sql: known.raw_sql,
            builder_options: known.builder_options,
            plugin_version: known.plugin_version,
            format: known.format,
            query_type: known.query_type,
            additional_fields: fields,
        })
    }
}
