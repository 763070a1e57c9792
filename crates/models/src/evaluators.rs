use serde::{Deserialize, Serialize};

/// Threshold test applied to a condition's reduced value.
///
/// Invariant: `params.len()` always equals `kind.arity()`. Operations
/// which change the kind go through `set_kind` to keep it that way.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Evaluator {
    #[serde(rename = "type")]
    pub kind: EvaluatorKind,
    /// Threshold values. A `null` entry is a threshold the user hasn't
    /// filled in yet.
    #[serde(default)]
    pub params: Vec<Option<f64>>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvaluatorKind {
    Gt,
    Lt,
    OutsideRange,
    WithinRange,
    NoValue,
}

impl EvaluatorKind {
    /// Number of threshold parameters this kind requires.
    pub fn arity(&self) -> usize {
        match self {
            EvaluatorKind::Gt | EvaluatorKind::Lt => 1,
            EvaluatorKind::OutsideRange | EvaluatorKind::WithinRange => 2,
            EvaluatorKind::NoValue => 0,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            kind: EvaluatorKind::Gt,
            params: vec![None],
        }
    }
}

impl Evaluator {
    /// Change the evaluator kind, re-sizing params to its arity.
    /// Extra parameters are truncated; added ones start unset.
    pub fn set_kind(&mut self, kind: EvaluatorKind) {
        self.kind = kind;
        self.params.resize(kind.arity(), None);
    }

    /// Write one dragged threshold handle, returning false if the handle
    /// index exceeds the kind's arity (the params array never grows here).
    pub fn set_param(&mut self, index: usize, value: f64) -> bool {
        match self.params.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn set_kind_resizes_to_arity() {
        for (kind, arity) in [
            (EvaluatorKind::Lt, 1),
            (EvaluatorKind::Gt, 1),
            (EvaluatorKind::WithinRange, 2),
            (EvaluatorKind::OutsideRange, 2),
            (EvaluatorKind::NoValue, 0),
        ] {
            // Starting from shorter, equal, and longer params arrays.
            for start in [0, 1, 2, 5] {
                let mut evaluator = Evaluator {
                    kind: EvaluatorKind::Gt,
                    params: vec![Some(7.0); start],
                };
                evaluator.set_kind(kind);
                assert_eq!(evaluator.params.len(), arity, "{kind:?} from {start}");
            }
        }
    }

    #[test]
    fn grow_keeps_prefix_and_pads_unset() {
        let mut evaluator = Evaluator {
            kind: EvaluatorKind::Gt,
            params: vec![Some(3.0)],
        };
        evaluator.set_kind(EvaluatorKind::WithinRange);
        assert_eq!(evaluator.params, vec![Some(3.0), None]);
    }

    #[test]
    fn set_param_rejects_out_of_range_handles() {
        let mut evaluator = Evaluator::default();
        assert!(evaluator.set_param(0, 12.5));
        assert!(!evaluator.set_param(1, 99.0));
        assert_eq!(evaluator.params, vec![Some(12.5)]);
    }

    #[test]
    fn null_params_round_trip() {
        let evaluator: Evaluator =
            serde_json::from_str(r#"{"type": "gt", "params": [null]}"#).unwrap();
        assert_eq!(evaluator.params, vec![None]);
        assert_eq!(
            serde_json::to_string(&evaluator).unwrap(),
            r#"{"type":"gt","params":[null]}"#
        );
    }
}
