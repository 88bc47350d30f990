use job_tracker::applications::RepositoryError;
use job_tracker::store::SqliteApplicationRepository;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Opens the database file and brings its schema up to date.
pub(crate) fn open_store(path: &Path) -> Result<SqliteApplicationRepository, RepositoryError> {
    let store = SqliteApplicationRepository::open(path)?;
    store.migrate()?;
    Ok(store)
}
