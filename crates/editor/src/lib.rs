use futures::future::BoxFuture;
use models::{AlertRule, Annotation, NotificationChannel, RuleDefaults, Target};

mod condition_model;
mod rule_editor;

pub use condition_model::{ConditionModel, PartDescriptor};
pub use rule_editor::{AttachedChannel, RuleEditor};

/// Persistence API surface consumed by the editor. Implementations wrap
/// the dashboarding backend's HTTP API.
pub trait AlertingApi: Send + Sync {
    /// `GET /api/alert-notifications/lookup`
    fn lookup_channels(&self) -> BoxFuture<'_, anyhow::Result<Vec<NotificationChannel>>>;

    /// `GET /api/annotations?dashboardId=..&panelId=..&limit=..&type=alert`
    fn list_history(
        &self,
        dashboard_id: i64,
        panel_id: i64,
        limit: u32,
    ) -> BoxFuture<'_, anyhow::Result<Vec<Annotation>>>;

    /// `POST /api/annotations/mass-delete {dashboardId, panelId}`
    fn clear_history(&self, dashboard_id: i64, panel_id: i64) -> BoxFuture<'_, anyhow::Result<()>>;
}

/// Host-panel operations the editor triggers.
pub trait PanelHook: Send {
    /// Re-derive the panel's graphical threshold markers from the rule.
    fn sync_thresholds(&mut self, rule: &AlertRule);
    fn render(&mut self);
    fn refresh(&mut self);
    fn set_editing_thresholds(&mut self, editing: bool);
}

/// Notified after every completed operation that changed user-visible
/// state. Nothing refreshes implicitly when an asynchronous lookup
/// lands; this call is the signal to re-read the editor.
pub trait EditorObserver: Send {
    fn changed(&self);
}

impl EditorObserver for () {
    fn changed(&self) {}
}

/// The slice of panel state the editor works against.
#[derive(Clone, Debug, Default)]
pub struct Panel {
    pub id: i64,
    pub title: String,
    /// The panel-wide data source, used by targets that don't name their own.
    pub datasource: Option<String>,
    pub targets: Vec<Target>,
}

/// Application-level defaults the editor applies to rules.
#[derive(serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub rule_defaults: RuleDefaults,
    /// Page size for the alert history list.
    pub history_limit: u32,
    /// Pending period applied when alerting is first enabled on a panel.
    /// Pre-existing rules keep `"0m"` so their behavior doesn't change.
    pub new_rule_for: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            rule_defaults: RuleDefaults::default(),
            history_limit: 50,
            new_rule_for: "5m".to_string(),
        }
    }
}
