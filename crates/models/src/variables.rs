use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A template variable as read from the global variable registry.
///
/// Registry reads yield snapshots: the registry clones on read and the
/// binder deep-copies again before exposing a variable to per-condition
/// editing, so nothing downstream aliases live registry state.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Current selection, e.g. `{"text": "prod", "value": "prod"}`.
    #[serde(default)]
    pub current: Value,
    /// Selectable options.
    #[serde(default)]
    pub options: Vec<Value>,
}
