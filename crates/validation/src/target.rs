use super::Error;
use models::{Condition, QueryCondition, Target};

/// Outcome of resolving a condition against the panel's targets.
#[derive(Debug)]
pub enum Resolution<'a> {
    /// The condition has no query semantics; there is nothing to resolve
    /// and nothing to validate.
    NotApplicable,
    Found(&'a Target),
    Failed(Error),
}

/// Resolve `condition` to the panel target its query references.
pub fn resolve_target<'a>(condition: &mut Condition, targets: &'a [Target]) -> Resolution<'a> {
    match condition.as_query_mut() {
        Some(query) => match resolve_query_target(query, targets) {
            Ok(target) => Resolution::Found(target),
            Err(err) => Resolution::Failed(err),
        },
        None => Resolution::NotApplicable,
    }
}

/// As `resolve_target`, for a condition already known to be a query.
///
/// A stale reference (its target was deleted or renamed) is repaired in
/// place to point at the panel's first target rather than failing the
/// whole editor. Only a panel with no targets at all is an error.
pub fn resolve_query_target<'a>(
    condition: &mut QueryCondition,
    targets: &'a [Target],
) -> Result<&'a Target, Error> {
    let ref_id = condition.query.ref_id();

    if let Some(found) = targets.iter().find(|t| Some(t.ref_id.as_str()) == ref_id) {
        return Ok(found);
    }

    match targets.first() {
        Some(first) => {
            tracing::debug!(
                stale = ?ref_id,
                repaired = %first.ref_id,
                "repaired stale query reference",
            );
            condition.query.set_ref_id(&first.ref_id);
            Ok(first)
        }
        None => Err(Error::NoMetricQueries),
    }
}
