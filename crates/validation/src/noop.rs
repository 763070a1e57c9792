use super::{Datasource, DatasourceMeta, Datasources};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// NoOpDatasources is a permissive placeholder registry: every lookup
/// succeeds with a data source that supports alerting and declares no
/// optional capabilities.
#[derive(Clone, Debug)]
pub struct NoOpDatasources;

struct NoOpDatasource;

impl Datasource for NoOpDatasource {
    fn meta(&self) -> DatasourceMeta {
        DatasourceMeta { alerting: true }
    }
}

impl Datasources for NoOpDatasources {
    fn get<'a>(
        &'a self,
        _name: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Arc<dyn Datasource>>> {
        futures::future::ready(Ok(Arc::new(NoOpDatasource) as Arc<dyn Datasource>)).boxed()
    }
}
