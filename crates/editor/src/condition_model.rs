use models::{Condition, Reducer};
use serde_json::Value;
use std::collections::BTreeMap;
use validation::BoundVariable;

/// Descriptor of one editable segment row: a part's type tag and its
/// rendered parameters. The view layer maps these onto segment widgets.
#[derive(Clone, Debug, PartialEq)]
pub struct PartDescriptor {
    pub kind: String,
    pub params: Vec<String>,
}

/// Transient editing companion to one persisted condition.
///
/// The editor keeps these index-aligned with the rule's condition
/// sequence; the two must never diverge in length.
#[derive(Clone, Debug, Default)]
pub struct ConditionModel {
    /// The query reference row, for `"query"` conditions.
    pub query_part: Option<PartDescriptor>,
    pub reducer_part: Option<PartDescriptor>,
    /// Unlinked view variables bound to this condition, keyed by name.
    pub variables: BTreeMap<String, BoundVariable>,
}

impl ConditionModel {
    pub fn build(condition: &Condition) -> Self {
        match condition.as_query() {
            Some(query) => Self {
                query_part: Some(PartDescriptor {
                    kind: "query".to_string(),
                    params: query.query.params.clone(),
                }),
                reducer_part: Some(build_reducer_part(&query.reducer)),
                variables: BTreeMap::new(),
            },
            None => Self::default(),
        }
    }
}

pub(crate) fn build_reducer_part(reducer: &Reducer) -> PartDescriptor {
    PartDescriptor {
        kind: reducer.kind.as_str().to_string(),
        params: reducer.params.iter().map(render_param).collect(),
    }
}

fn render_param(param: &Value) -> String {
    match param {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
