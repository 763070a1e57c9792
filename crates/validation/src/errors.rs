/// Errors surfaced into a rule's single error slot.
///
/// Display strings are user-facing and load-bearing: the view layer
/// shows them verbatim, so they must not change casually.
#[must_use]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not find any metric queries")]
    NoMetricQueries,
    #[error("The datasource does not support alerting queries")]
    AlertingNotSupported,
    #[error(transparent)]
    DatasourceLookup(anyhow::Error),
}
