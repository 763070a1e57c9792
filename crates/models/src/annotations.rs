use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One alert state-change annotation, as returned by the annotations API.
/// Presentation of entries (time formatting, state display) is left to
/// the consuming view layer.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub id: i64,
    /// Epoch milliseconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub new_state: String,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
