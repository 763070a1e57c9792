use super::{Evaluator, Reducer, ReducerKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Condition is one clause of an alert rule, pairing a panel query
/// reference with a reducer and a threshold evaluator.
///
/// `"query"` is the only condition type with query semantics. Conditions
/// of any other type are opaque to this library: they're carried through
/// edit operations byte-for-byte, and target resolution treats them as
/// not applicable.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Condition {
    Query(QueryCondition),
    Other(Value),
}

impl Condition {
    pub fn as_query(&self) -> Option<&QueryCondition> {
        match self {
            Condition::Query(query) => Some(query),
            Condition::Other(_) => None,
        }
    }

    pub fn as_query_mut(&mut self) -> Option<&mut QueryCondition> {
        match self {
            Condition::Query(query) => Some(query),
            Condition::Other(_) => None,
        }
    }
}

/// A `"query"` alert condition.
///
/// Every field other than the type tag is defaulted, because rules edited
/// by hand or by very old frontends may omit them.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct QueryCondition {
    #[serde(rename = "type")]
    tag: ConditionTag,
    #[serde(default)]
    pub query: ConditionQuery,
    #[serde(default)]
    pub reducer: Reducer,
    #[serde(default)]
    pub evaluator: Evaluator,
    #[serde(default)]
    pub operator: Operator,
    /// Stored per-variable value overrides, keyed by variable name.
    /// Written by the variable binder; never populated by the server.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Value>,
    /// Remaining condition fields, preserved as-is.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ConditionTag {
    #[default]
    #[serde(rename = "query")]
    Query,
}

impl QueryCondition {
    /// The condition synthesized for a brand-new rule,
    /// and appended by the "add condition" operation.
    pub fn default_condition() -> Self {
        Self {
            tag: ConditionTag::Query,
            query: ConditionQuery {
                params: vec!["A".to_string(), "5m".to_string(), "now".to_string()],
                model: None,
                extra: BTreeMap::new(),
            },
            reducer: Reducer {
                kind: ReducerKind::Avg,
                params: Vec::new(),
            },
            evaluator: Evaluator::default(),
            operator: Operator::default(),
            variables: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// The query reference of a condition: positional params
/// `[refId, from, to]`, plus the materialized query model written back
/// by variable interpolation.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConditionQuery {
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Value>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ConditionQuery {
    /// The `refId` of the panel target this query references.
    pub fn ref_id(&self) -> Option<&str> {
        self.params.first().map(String::as_str)
    }

    /// Point this query at another target. Repairs an empty params list.
    pub fn set_ref_id(&mut self, ref_id: &str) {
        if self.params.is_empty() {
            self.params.push(ref_id.to_string());
        } else {
            self.params[0] = ref_id.to_string();
        }
    }
}

/// Combines this condition's outcome with the previous condition's
/// during server-side evaluation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Operator {
    #[serde(rename = "type")]
    pub kind: OperatorKind,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperatorKind {
    #[default]
    And,
    Or,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn query_condition_round_trips() {
        let fixture = json!({
            "type": "query",
            "query": {"params": ["A", "5m", "now"], "datasourceId": 3},
            "reducer": {"type": "max"},
            "evaluator": {"type": "outside_range", "params": [1.5, 10.0]},
            "operator": {"type": "or"},
        });

        let condition: Condition = serde_json::from_value(fixture.clone()).unwrap();
        let query = condition.as_query().expect("parses as a query condition");
        assert_eq!(query.query.ref_id(), Some("A"));
        assert_eq!(query.reducer.kind, ReducerKind::Max);
        assert_eq!(query.operator.kind, OperatorKind::Or);
        assert_eq!(query.evaluator.params, vec![Some(1.5), Some(10.0)]);
        // The datasourceId we don't model is preserved.
        assert_eq!(serde_json::to_value(&condition).unwrap(), fixture);
    }

    #[test]
    fn minimal_query_condition_gets_field_defaults() {
        let condition: Condition =
            serde_json::from_value(json!({"type": "query", "query": {"params": ["B"]}})).unwrap();

        let query = condition.as_query().unwrap();
        assert_eq!(query.query.ref_id(), Some("B"));
        assert_eq!(query.reducer.kind, ReducerKind::Avg);
        assert_eq!(query.evaluator.params, vec![None]);
    }

    #[test]
    fn unmodeled_condition_fields_round_trip() {
        let fixture = json!({
            "type": "query",
            "query": {"params": ["A", "5m", "now"]},
            "frontendVersion": 2,
        });
        let condition: Condition = serde_json::from_value(fixture.clone()).unwrap();
        assert!(condition.as_query().is_some());
        assert_eq!(serde_json::to_value(&condition).unwrap(), fixture);
    }

    #[test]
    fn unrecognized_evaluator_tag_falls_back_to_opaque() {
        let fixture = json!({
            "type": "query",
            "query": {"params": ["A"]},
            "evaluator": {"type": "ge", "params": [1.0]},
        });
        let condition: Condition = serde_json::from_value(fixture.clone()).unwrap();

        // An evaluator kind this library doesn't know makes the whole
        // condition opaque: it keeps round-tripping unchanged, but loses
        // query semantics until the unknown kind is modeled.
        assert!(condition.as_query().is_none());
        assert_eq!(serde_json::to_value(&condition).unwrap(), fixture);
    }

    #[test]
    fn unknown_condition_type_is_opaque_and_round_trips() {
        let fixture = json!({"type": "deadman", "timeout": "10m"});
        let condition: Condition = serde_json::from_value(fixture.clone()).unwrap();

        assert!(condition.as_query().is_none());
        assert_eq!(serde_json::to_value(&condition).unwrap(), fixture);
    }

    #[test]
    fn set_ref_id_repairs_empty_params() {
        let mut query = ConditionQuery::default();
        assert_eq!(query.ref_id(), None);

        query.set_ref_id("A");
        assert_eq!(query.ref_id(), Some("A"));

        query.params = vec!["A".to_string(), "5m".to_string(), "now".to_string()];
        query.set_ref_id("C");
        assert_eq!(query.params, vec!["C", "5m", "now"]);
    }
}
