use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;

mod errors;
mod noop;
mod rule;
mod target;
mod variables;

pub use errors::Error;
pub use noop::NoOpDatasources;
pub use rule::validate_rule;
pub use target::{resolve_query_target, resolve_target, Resolution};
pub use variables::{bind_variables, update_variable, BoundVariable};

/// Capability metadata declared by a data source plugin.
#[derive(Clone, Copy, Debug, Default)]
pub struct DatasourceMeta {
    /// Whether the data source supports alerting queries.
    pub alerting: bool,
}

/// A resolved data source descriptor.
///
/// `template_variables` and `interpolate_queries` model optional plugin
/// capabilities; data sources lacking them return `None`, which is
/// distinct from a data source that has the capability and reports an
/// empty result.
pub trait Datasource: Send + Sync {
    fn meta(&self) -> DatasourceMeta;

    /// Names of the template variables referenced by `target`'s query.
    fn template_variables(&self, _target: &models::Target) -> Option<Vec<String>> {
        None
    }

    /// Materialize `targets` with `variables` substituted in, yielding
    /// one query model per target.
    fn interpolate_queries(
        &self,
        _targets: &[models::Target],
        _variables: &BTreeMap<String, BoundVariable>,
    ) -> Option<Vec<serde_json::Value>> {
        None
    }
}

/// Datasources is a delegated trait -- provided to validation and
/// variable binding -- through which data source descriptors are looked
/// up by name. `None` asks for the installation's default data source.
pub trait Datasources: Send + Sync {
    fn get<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Arc<dyn Datasource>>>;
}

/// Read access to the global template-variable registry.
/// Lookups yield snapshots, and misses are not errors.
pub trait VariableRegistry: Send + Sync {
    fn get(&self, name: &str) -> Option<models::Variable>;
}
