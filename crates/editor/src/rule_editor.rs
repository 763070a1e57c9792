use crate::condition_model::{build_reducer_part, ConditionModel};
use crate::{AlertingApi, EditorConfig, EditorObserver, Panel, PanelHook};
use models::{
    AlertRule, Annotation, ChannelRef, Condition, EvaluatorKind, NotificationChannel,
    QueryCondition, ReducerKind,
};
use serde_json::Value;
use std::sync::Arc;
use validation::{Datasources, VariableRegistry};

/// A channel entry shown in the rule's attached-notifications list.
/// Default channels always appear here but are never persisted as
/// explicit rule references.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedChannel {
    pub name: String,
    pub kind: String,
    pub is_default: bool,
    pub uid: Option<String>,
    pub id: Option<i64>,
}

impl AttachedChannel {
    fn from_channel(channel: &NotificationChannel, is_default: bool) -> Self {
        Self {
            name: channel.name.clone(),
            kind: channel.kind.clone(),
            is_default,
            uid: Some(channel.uid.clone()),
            id: Some(channel.id),
        }
    }

    pub fn channel_ref(&self) -> ChannelRef {
        ChannelRef {
            uid: self.uid.clone(),
            id: self.id,
        }
    }
}

/// The view model for editing a panel's alert rule.
///
/// Owns the editable rule document and every derived editing structure,
/// and delegates all external lookups to collaborator traits. Every
/// operation that changes user-visible state applies the change and
/// then notifies the observer; nothing refreshes implicitly.
pub struct RuleEditor {
    config: EditorConfig,
    rule: AlertRule,
    is_new: bool,
    condition_models: Vec<ConditionModel>,
    channels: Vec<NotificationChannel>,
    attached: Vec<AttachedChannel>,
    history: Vec<Annotation>,
    error: String,
    panel: Panel,
    dashboard_id: i64,

    api: Arc<dyn AlertingApi>,
    datasources: Arc<dyn Datasources>,
    variables: Arc<dyn VariableRegistry>,
    hook: Box<dyn PanelHook>,
    observer: Box<dyn EditorObserver>,
}

impl RuleEditor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rule: Option<AlertRule>,
        panel: Panel,
        dashboard_id: i64,
        config: EditorConfig,
        api: Arc<dyn AlertingApi>,
        datasources: Arc<dyn Datasources>,
        variables: Arc<dyn VariableRegistry>,
        hook: Box<dyn PanelHook>,
        observer: Box<dyn EditorObserver>,
    ) -> Self {
        let is_new = rule.is_none();
        Self {
            config,
            rule: rule.unwrap_or_default(),
            is_new,
            condition_models: Vec::new(),
            channels: Vec::new(),
            attached: Vec::new(),
            history: Vec::new(),
            error: String::new(),
            panel,
            dashboard_id,
            api,
            datasources,
            variables,
            hook,
            observer,
        }
    }

    pub fn rule(&self) -> &AlertRule {
        &self.rule
    }

    /// Direct access for plain-field edits (name, message, frequency...).
    /// Structural edits go through the operations below.
    pub fn rule_mut(&mut self) -> &mut AlertRule {
        &mut self.rule
    }

    /// The rule's single error message; empty when the last validation
    /// passed. Accurate only once in-flight validations have settled.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn condition_models(&self) -> &[ConditionModel] {
        &self.condition_models
    }

    pub fn channels(&self) -> &[NotificationChannel] {
        &self.channels
    }

    pub fn attached_channels(&self) -> &[AttachedChannel] {
        &self.attached
    }

    pub fn history(&self) -> &[Annotation] {
        &self.history
    }

    /// Load notification channels and start the editing session. A panel
    /// without a persisted rule has one synthesized and enabled.
    pub async fn init(&mut self) -> anyhow::Result<()> {
        self.channels = self.api.lookup_channels().await?;

        if self.is_new {
            self.enable();
        } else {
            self.init_model();
        }
        self.bind_all_variables().await;
        self.validate().await;
        Ok(())
    }

    /// Turn alerting on. New rules wait before firing; existing rules
    /// keep their `"0m"` default so enabling twice is harmless.
    pub fn enable(&mut self) {
        self.init_model();
        self.rule.for_ = Some(self.config.new_rule_for.clone());
    }

    fn init_model(&mut self) {
        self.rule
            .apply_defaults(&self.config.rule_defaults, &self.panel.title);
        self.condition_models = self
            .rule
            .conditions
            .iter()
            .map(ConditionModel::build)
            .collect();

        self.attached.clear();
        for reference in &self.rule.notifications {
            let channel = self
                .channels
                .iter()
                .find(|c| reference.uid.as_deref() == Some(c.uid.as_str()))
                // Fall back to the legacy id for references saved before
                // channels had uids.
                .or_else(|| self.channels.iter().find(|c| reference.id == Some(c.id)));

            match channel {
                Some(channel) if !channel.is_default => self
                    .attached
                    .push(AttachedChannel::from_channel(channel, false)),
                _ => (),
            }
        }
        for channel in self.channels.iter().filter(|c| c.is_default) {
            self.attached
                .push(AttachedChannel::from_channel(channel, true));
        }

        self.hook.set_editing_thresholds(true);
        self.hook.sync_thresholds(&self.rule);
        self.hook.render();
    }

    /// Re-check every condition against live data source capabilities,
    /// replacing the rule's single error message. Idempotent and safe to
    /// re-run after any edit; a superseded run simply leaves a possibly
    /// stale message until the next one settles.
    pub async fn validate(&mut self) {
        let result = validation::validate_rule(
            &mut self.rule,
            &self.panel.targets,
            self.panel.datasource.as_deref(),
            self.datasources.as_ref(),
        )
        .await;

        self.error = match result {
            Ok(()) => String::new(),
            Err(err) => err.to_string(),
        };
        self.observer.changed();
    }

    /// Append a default condition to the rule and its view model,
    /// keeping both sequences index-aligned, and bind the new
    /// condition's variables right away.
    pub async fn add_condition(&mut self) {
        let condition = Condition::Query(QueryCondition::default_condition());
        self.condition_models.push(ConditionModel::build(&condition));
        self.rule.conditions.push(condition);
        debug_assert_eq!(self.rule.conditions.len(), self.condition_models.len());
        self.bind_condition_variables(self.rule.conditions.len() - 1)
            .await;
    }

    /// Remove the condition at `index` from both sequences in lockstep.
    pub fn remove_condition(&mut self, index: usize) {
        if index < self.rule.conditions.len() {
            self.rule.conditions.remove(index);
            self.condition_models.remove(index);
        }
        debug_assert_eq!(self.rule.conditions.len(), self.condition_models.len());
        self.observer.changed();
    }

    /// Change a condition's evaluator kind, re-sizing its params to the
    /// kind's arity and propagating the thresholds to the graph.
    pub fn evaluator_type_changed(&mut self, index: usize, kind: EvaluatorKind) {
        let Some(query) = self
            .rule
            .conditions
            .get_mut(index)
            .and_then(Condition::as_query_mut)
        else {
            return;
        };
        query.evaluator.set_kind(kind);
        self.evaluator_params_changed();
    }

    /// Propagate edited evaluator params to the graph threshold markers.
    pub fn evaluator_params_changed(&mut self) {
        self.hook.sync_thresholds(&self.rule);
        self.hook.render();
        self.observer.changed();
    }

    /// A threshold handle was dragged on the graph overlay. Writes the
    /// value into the first `"query"` condition's evaluator; further
    /// query conditions are unaffected, a long-standing limitation of
    /// graph threshold editing that is kept as-is.
    pub fn graph_threshold_changed(&mut self, handle_index: usize, value: f64) {
        let Some(query) = self
            .rule
            .conditions
            .iter_mut()
            .find_map(Condition::as_query_mut)
        else {
            return;
        };
        if !query.evaluator.set_param(handle_index, value) {
            tracing::warn!(
                handle_index,
                "dragged threshold handle exceeds the evaluator's arity",
            );
        }
        self.evaluator_params_changed();
    }

    /// Replace a condition's reducer kind and rebuild its derived part.
    pub fn reducer_type_changed(&mut self, index: usize, kind: ReducerKind) {
        let Some(query) = self
            .rule
            .conditions
            .get_mut(index)
            .and_then(Condition::as_query_mut)
        else {
            return;
        };
        query.reducer.kind = kind;
        let part = build_reducer_part(&query.reducer);

        if let Some(model) = self.condition_models.get_mut(index) {
            model.reducer_part = Some(part);
        }
        self.observer.changed();
    }

    /// A query parameter of condition `index` changed. The referenced
    /// variable set can change with the query, so re-bind the condition's
    /// variables and re-validate the rule. Binding runs before the view
    /// parts are rebuilt so a repaired target reference shows through.
    pub async fn query_param_changed(&mut self, index: usize) {
        self.bind_condition_variables(index).await;
        self.rebuild_parts(index);
        self.validate().await;
    }

    /// refId choices for a condition's query reference row.
    pub fn target_ref_options(&self) -> Vec<String> {
        self.panel
            .targets
            .iter()
            .map(|target| target.ref_id.clone())
            .collect()
    }

    fn rebuild_parts(&mut self, index: usize) {
        if let (Some(condition), Some(model)) = (
            self.rule.conditions.get(index),
            self.condition_models.get_mut(index),
        ) {
            let rebuilt = ConditionModel::build(condition);
            model.query_part = rebuilt.query_part;
            model.reducer_part = rebuilt.reducer_part;
        }
    }

    /// Re-resolve the unlinked view variables bound to condition `index`.
    /// A failed data source lookup doesn't fail the editor; the binding
    /// is left as-is until the next re-bind, and the validator reports
    /// data source problems itself.
    pub async fn bind_condition_variables(&mut self, index: usize) {
        let Some(query) = self
            .rule
            .conditions
            .get_mut(index)
            .and_then(Condition::as_query_mut)
        else {
            return;
        };

        match validation::bind_variables(
            query,
            &self.panel.targets,
            self.panel.datasource.as_deref(),
            self.datasources.as_ref(),
            self.variables.as_ref(),
        )
        .await
        {
            Ok(bound) => {
                if let Some(model) = self.condition_models.get_mut(index) {
                    model.variables = bound;
                }
            }
            Err(err) => {
                tracing::warn!(%err, condition = index, "failed to bind condition variables");
            }
        }
        self.observer.changed();
    }

    async fn bind_all_variables(&mut self) {
        for index in 0..self.rule.conditions.len() {
            self.bind_condition_variables(index).await;
        }
    }

    /// Set a bound variable's current selection and apply it to the
    /// condition's stored override and materialized query.
    pub async fn set_variable_current(&mut self, index: usize, name: &str, current: Value) {
        match self
            .condition_models
            .get_mut(index)
            .and_then(|model| model.variables.get_mut(name))
        {
            Some(variable) => variable.current = current,
            None => return,
        }
        self.variable_updated(index, name).await;
    }

    /// Apply condition `index`'s bound variable `name` back into the
    /// persisted condition: the stored override takes the clone's value
    /// and, when the data source interpolates, the stored query model is
    /// recomputed. Global template state is never touched.
    pub async fn variable_updated(&mut self, index: usize, name: &str) {
        let Some(bound) = self
            .condition_models
            .get(index)
            .map(|model| model.variables.clone())
        else {
            return;
        };
        let Some(query) = self
            .rule
            .conditions
            .get_mut(index)
            .and_then(Condition::as_query_mut)
        else {
            return;
        };

        if let Err(err) = validation::update_variable(
            query,
            &bound,
            name,
            &self.panel.targets,
            self.panel.datasource.as_deref(),
            self.datasources.as_ref(),
        )
        .await
        {
            tracing::warn!(%err, variable = name, "failed to apply variable update");
        }
        self.observer.changed();
    }

    /// Attach the channel named `name`. The persisted reference list is
    /// deduplicated by uid or legacy id, so repeat adds are idempotent.
    pub fn notification_added(&mut self, name: &str) {
        let Some(channel) = self.channels.iter().find(|c| c.name == name).cloned() else {
            return;
        };

        self.attached
            .push(AttachedChannel::from_channel(&channel, false));

        if !self
            .rule
            .notifications
            .iter()
            .any(|reference| reference.matches_channel(&channel))
        {
            self.rule
                .notifications
                .push(ChannelRef::by_uid(channel.uid.clone()));
        }
        self.observer.changed();
    }

    /// Detach a channel, matching by uid or legacy id so references from
    /// before channels had uids stay removable.
    pub fn remove_notification(&mut self, reference: &ChannelRef) {
        self.rule.notifications.retain(|r| !r.matches(reference));
        self.attached
            .retain(|entry| !entry.channel_ref().matches(reference));
        self.observer.changed();
    }

    /// Add one rule tag. Tag names are unique, so re-adding a name
    /// overwrites its value. Empty names are ignored.
    pub fn add_tag(&mut self, name: &str, value: &str) {
        if name.is_empty() {
            return;
        }
        self.rule
            .alert_rule_tags
            .insert(name.to_string(), value.to_string());
        self.observer.changed();
    }

    pub fn remove_tag(&mut self, name: &str) {
        self.rule.alert_rule_tags.remove(name);
        self.observer.changed();
    }

    /// Load the rule's recent state-change history.
    pub async fn load_history(&mut self) -> anyhow::Result<()> {
        self.history = self
            .api
            .list_history(self.dashboard_id, self.panel.id, self.config.history_limit)
            .await?;
        self.observer.changed();
        Ok(())
    }

    /// Delete all history and annotations for this alert. Confirming the
    /// deletion with the user is the caller's concern.
    pub async fn clear_history(&mut self) -> anyhow::Result<()> {
        self.api
            .clear_history(self.dashboard_id, self.panel.id)
            .await?;
        self.history.clear();
        self.hook.refresh();
        self.observer.changed();
        Ok(())
    }

    /// End the editing session: the panel leaves threshold-editing mode
    /// and re-renders without the editing chrome.
    pub fn close(&mut self) {
        self.hook.set_editing_thresholds(false);
        self.hook.render();
    }
}
