use super::{resolve_target, Datasources, Error, Resolution};
use futures::future::{BoxFuture, FutureExt};
use models::{AlertRule, Target};

/// Check that every condition of `rule` resolves to a panel target whose
/// data source declares alerting support.
///
/// Conditions without query semantics contribute nothing. Data source
/// lookups for the remaining conditions run concurrently, and the
/// function waits for all of them to settle: the first failure in
/// condition order becomes the rule's single error. Resolution repairs
/// stale query references in place, so the rule may be mutated even when
/// validation succeeds.
pub async fn validate_rule(
    rule: &mut AlertRule,
    targets: &[Target],
    panel_datasource: Option<&str>,
    datasources: &dyn Datasources,
) -> Result<(), Error> {
    let mut tasks: Vec<BoxFuture<'_, Result<(), Error>>> = Vec::new();

    for condition in rule.conditions.iter_mut() {
        match resolve_target(condition, targets) {
            Resolution::NotApplicable => (),
            Resolution::Failed(err) => {
                tasks.push(futures::future::ready(Err(err)).boxed());
            }
            Resolution::Found(target) => {
                let name = target.datasource.as_deref().or(panel_datasource);

                tasks.push(
                    async move {
                        let datasource = datasources
                            .get(name)
                            .await
                            .map_err(Error::DatasourceLookup)?;

                        if !datasource.meta().alerting {
                            return Err(Error::AlertingNotSupported);
                        }
                        Ok(())
                    }
                    .boxed(),
                );
            }
        }
    }

    let settled = futures::future::join_all(tasks).await;
    match settled.into_iter().find_map(Result::err) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
