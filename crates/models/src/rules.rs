use super::{ChannelRef, Condition, QueryCondition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// The alert rule document persisted within a dashboard panel.
///
/// Optional fields stay `Option` so that a rule which never defined them
/// round-trips unchanged; they're materialized once by `apply_defaults`
/// when the rule is first opened for editing.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertRule {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_data_state: Option<NoDataState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_error_state: Option<ExecutionErrorState>,
    /// Evaluation interval, e.g. `"1m"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    /// How long the rule must breach before firing, e.g. `"5m"`.
    /// Existing rules default to `"0m"` to avoid changing their behavior.
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_: Option<String>,
    /// Legacy handler id, carried for rules saved by older frontends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<ChannelRef>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alert_rule_tags: BTreeMap<String, String>,
}

/// What the rule reports when its query returns no data.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoDataState {
    NoData,
    Alerting,
    Ok,
    KeepState,
}

/// What the rule reports when evaluation itself fails or times out.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionErrorState {
    Alerting,
    KeepState,
}

/// Defaults applied to fields a rule doesn't define yet.
/// These come from application configuration, not from this library.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleDefaults {
    pub no_data_state: NoDataState,
    pub execution_error_state: ExecutionErrorState,
    pub frequency: String,
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self {
            no_data_state: NoDataState::NoData,
            execution_error_state: ExecutionErrorState::Alerting,
            frequency: "1m".to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("invalid duration {input:?}")]
pub struct DurationError {
    input: String,
    #[source]
    source: humantime::DurationError,
}

impl AlertRule {
    /// Fill in every field an editing session relies on.
    /// Fields the rule already defines are left alone, and a rule with no
    /// conditions gets the default one so the sequence is never empty.
    pub fn apply_defaults(&mut self, defaults: &RuleDefaults, panel_title: &str) {
        if self.conditions.is_empty() {
            self.conditions
                .push(Condition::Query(QueryCondition::default_condition()));
        }
        if self.no_data_state.is_none() {
            self.no_data_state = Some(defaults.no_data_state);
        }
        if self.execution_error_state.is_none() {
            self.execution_error_state = Some(defaults.execution_error_state);
        }
        if self.frequency.is_none() {
            self.frequency = Some(defaults.frequency.clone());
        }
        if self.handler.is_none() {
            self.handler = Some(1);
        }
        if self.for_.is_none() {
            self.for_ = Some("0m".to_string());
        }
        if self.name.is_empty() {
            self.name = format!("{} alert", panel_title);
        }
    }

    /// Parsed evaluation interval.
    pub fn frequency_duration(&self) -> Result<Duration, DurationError> {
        parse_interval(self.frequency.as_deref().unwrap_or("1m"))
    }

    /// Parsed pending period (the `for` field).
    pub fn pending_duration(&self) -> Result<Duration, DurationError> {
        parse_interval(self.for_.as_deref().unwrap_or("0m"))
    }
}

fn parse_interval(input: &str) -> Result<Duration, DurationError> {
    humantime::parse_duration(input).map_err(|source| DurationError {
        input: input.to_string(),
        source,
    })
}
