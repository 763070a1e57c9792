use super::{resolve_query_target, Datasources, VariableRegistry};
use models::{QueryCondition, Target};
use serde_json::Value;
use std::collections::BTreeMap;

/// A per-condition template variable, detached ("unlinked") from the
/// global registry. It carries its own deep copies of the current value
/// and options, so edits to it never propagate back to shared state.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundVariable {
    pub name: String,
    pub current: Value,
    pub options: Vec<Value>,
}

/// Resolve the template variables referenced by `condition`'s target
/// query into unlinked per-condition copies.
///
/// The data source reports which variable names the query references;
/// data sources without that capability reference none. Each clone's
/// `current` value is seeded from the condition's stored override when
/// one exists, else from a deep copy of the registry value, and that
/// seed is written back into the condition's stored overrides. Names
/// missing from the registry are skipped silently.
///
/// Re-run this whenever the condition's target or query parameters
/// change: the referenced variable set changes with the query.
pub async fn bind_variables(
    condition: &mut QueryCondition,
    targets: &[Target],
    panel_datasource: Option<&str>,
    datasources: &dyn Datasources,
    registry: &dyn VariableRegistry,
) -> anyhow::Result<BTreeMap<String, BoundVariable>> {
    let target = match resolve_query_target(condition, targets) {
        Ok(target) => target.clone(),
        // An unresolvable condition is the validator's to report.
        Err(_) => return Ok(BTreeMap::new()),
    };

    let name = target.datasource.as_deref().or(panel_datasource);
    let datasource = datasources.get(name).await?;
    let names = datasource.template_variables(&target).unwrap_or_default();

    let mut bound = BTreeMap::new();
    for name in names {
        let Some(variable) = registry.get(&name) else {
            tracing::debug!(
                variable = %name,
                "query references a template variable that is not defined",
            );
            continue;
        };

        let current = condition
            .variables
            .entry(name.clone())
            .or_insert_with(|| variable.current.clone())
            .clone();

        bound.insert(
            name.clone(),
            BoundVariable {
                name,
                current,
                options: variable.options.clone(),
            },
        );
    }
    Ok(bound)
}

/// Apply one edited variable back into the condition: the stored
/// override takes the clone's current value, and a data source which can
/// interpolate variables recomputes the query's materialized model.
/// Global template state is never touched.
pub async fn update_variable(
    condition: &mut QueryCondition,
    bound: &BTreeMap<String, BoundVariable>,
    name: &str,
    targets: &[Target],
    panel_datasource: Option<&str>,
    datasources: &dyn Datasources,
) -> anyhow::Result<()> {
    let Some(variable) = bound.get(name) else {
        anyhow::bail!("variable {name:?} is not bound to this condition");
    };
    condition
        .variables
        .insert(name.to_string(), variable.current.clone());

    let target = match resolve_query_target(condition, targets) {
        Ok(target) => target.clone(),
        Err(_) => return Ok(()),
    };
    let ds_name = target.datasource.as_deref().or(panel_datasource);
    let datasource = datasources.get(ds_name).await?;

    if let Some(queries) = datasource.interpolate_queries(std::slice::from_ref(&target), bound) {
        if let Some(query) = queries.into_iter().next() {
            condition.query.model = Some(query);
        }
    }
    Ok(())
}
