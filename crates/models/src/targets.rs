use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One metric query belonging to the panel, addressed by `refId`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Target {
    #[serde(rename = "refId")]
    pub ref_id: String,
    /// The target's own data source name, when it overrides the panel's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    /// Remaining query fields, preserved as-is and passed through to
    /// variable interpolation.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Target {
    pub fn new(ref_id: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            datasource: None,
            extra: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn unmodeled_query_fields_round_trip() {
        let fixture = json!({
            "refId": "A",
            "datasource": "prometheus",
            "expr": "up{job=\"$job\"}",
            "intervalMs": 30000,
        });
        let target: Target = serde_json::from_value(fixture.clone()).unwrap();
        assert_eq!(target.ref_id, "A");
        assert_eq!(target.datasource.as_deref(), Some("prometheus"));
        assert_eq!(serde_json::to_value(&target).unwrap(), fixture);
    }
}
