use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregation applied to a query's time series before its value is
/// handed to the evaluator.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Reducer {
    #[serde(rename = "type")]
    pub kind: ReducerKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Value>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReducerKind {
    #[default]
    Avg,
    Min,
    Max,
    Sum,
    Count,
    Last,
    Median,
    Diff,
    DiffAbs,
    PercentDiff,
    PercentDiffAbs,
    CountNonNull,
}

impl ReducerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReducerKind::Avg => "avg",
            ReducerKind::Min => "min",
            ReducerKind::Max => "max",
            ReducerKind::Sum => "sum",
            ReducerKind::Count => "count",
            ReducerKind::Last => "last",
            ReducerKind::Median => "median",
            ReducerKind::Diff => "diff",
            ReducerKind::DiffAbs => "diff_abs",
            ReducerKind::PercentDiff => "percent_diff",
            ReducerKind::PercentDiffAbs => "percent_diff_abs",
            ReducerKind::CountNonNull => "count_non_null",
        }
    }

    pub fn all() -> &'static [ReducerKind] {
        &[
            ReducerKind::Avg,
            ReducerKind::Min,
            ReducerKind::Max,
            ReducerKind::Sum,
            ReducerKind::Count,
            ReducerKind::Last,
            ReducerKind::Median,
            ReducerKind::Diff,
            ReducerKind::DiffAbs,
            ReducerKind::PercentDiff,
            ReducerKind::PercentDiffAbs,
            ReducerKind::CountNonNull,
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_tags_match_persisted_values() {
        for kind in ReducerKind::all() {
            let tag = serde_json::to_value(kind).unwrap();
            assert_eq!(tag, serde_json::Value::String(kind.as_str().to_string()));
        }
    }

    #[test]
    fn empty_params_are_omitted() {
        let reducer = Reducer {
            kind: ReducerKind::PercentDiff,
            params: Vec::new(),
        };
        assert_eq!(
            serde_json::to_string(&reducer).unwrap(),
            r#"{"type":"percent_diff"}"#
        );
    }
}
