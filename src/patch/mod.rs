//! Patch merge engine: applies a [`Patch`] to one link template.
//!
//! The engine selects the base template by name, checks that it has exactly
//! one pane holding exactly one query, merge-patches the patch's query object
//! into that query, and (unless `fixTime` is false) freezes the patch's
//! relative time range to absolute epoch-millisecond bounds.
//!
//! The selected base is mutated in place and a mutable reference to it is
//! returned; callers must not assume the template collection is unmodified
//! after a successful apply.

use serde_json::Value;

use crate::error::ValidationError;
use crate::link::{Link, PaneBody, Patch};
use crate::ports::Clock;
use crate::reltime::parse_relative_time;

/// Applies patches to link templates using an injected clock.
pub struct Patcher {
    clock: Box<dyn Clock>,
}

impl Patcher {
    /// Creates a patcher that resolves relative times against `clock`.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Applies `patch` to the base in `bases` whose metadata name matches
    /// `patch.template`, returning a mutable reference to the patched base.
    ///
    /// All validation (patch completeness, template match, pane and query
    /// cardinality) runs before any mutation, so a validation failure leaves
    /// every base untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the patch is incomplete, no
    /// template matches, the base does not hold exactly one pane with
    /// exactly one query, or a relative-time bound fails to resolve.
    pub fn apply<'a>(
        &self,
        bases: &'a mut [Link],
        patch: &Patch,
    ) -> Result<&'a mut Link, ValidationError> {
        if patch.template.is_empty() {
            return Err(ValidationError::MissingTemplate);
        }
        if patch.query.is_empty() {
            return Err(ValidationError::MissingQuery);
        }

        let Some(index) = bases
            .iter()
            .position(|base| base.metadata.name == patch.template)
        else {
            return Err(ValidationError::UnknownTemplate {
                template: patch.template.clone(),
                known: bases.iter().map(|base| base.metadata.name.clone()).collect(),
            });
        };
        let base = &mut bases[index];

        if base.panes.len() != 1 {
            return Err(ValidationError::PaneCount {
                template: patch.template.clone(),
                count: base.panes.len(),
            });
        }

        for (pane_id, pane) in &mut base.panes {
            patch_pane(pane_id, pane, patch)?;

            if patch.fix_time() {
                // Resolve both bounds before touching the range so a bad
                // bound leaves it whole.
                let from = parse_relative_time(&patch.range.from, self.clock.as_ref())
                    .map_err(|source| ValidationError::Time { bound: "from", source })?;
                let to = parse_relative_time(&patch.range.to, self.clock.as_ref())
                    .map_err(|source| ValidationError::Time { bound: "to", source })?;
                pane.range.from = epoch_millis(&from);
                pane.range.to = epoch_millis(&to);
            }
        }

        Ok(base)
    }
}

/// Merge-patches `patch.query` into the pane's single query.
fn patch_pane(pane_id: &str, pane: &mut PaneBody, patch: &Patch) -> Result<(), ValidationError> {
    if pane.queries.len() != 1 {
        return Err(ValidationError::QueryCount {
            pane: pane_id.to_string(),
            count: pane.queries.len(),
        });
    }

    // Merge over the full serialized form so known-field updates type-check
    // on the way back in and unknown keys land in the extension map.
    let mut merged = serde_json::to_value(&pane.queries[0])?;
    merge_value(&mut merged, &Value::Object(patch.query.clone()));
    pane.queries[0] = serde_json::from_value(merged)?;
    Ok(())
}

/// Recursive merge-patch over generic JSON documents (RFC 7386 semantics).
///
/// Object keys union with the patch taking precedence recursively; a `null`
/// patch value removes the key; arrays and scalars are replaced wholesale,
/// never element-merged.
pub fn merge_value(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                let slot = target_map.entry(key.clone()).or_insert(Value::Null);
                merge_value(slot, value);
            }
        }
    }
}

/// Formats an instant as a Grafana epoch-millisecond string.
///
/// Sub-second precision is truncated; the wire format only needs whole
/// seconds scaled to milliseconds.
fn epoch_millis(instant: &chrono::DateTime<chrono::Utc>) -> String {
    (instant.timestamp() * 1000).to_string()
}
