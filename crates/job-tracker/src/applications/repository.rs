use super::domain::{ApplicationDraft, ApplicationId, JobApplication};
use super::query::ApplicationQuery;
use super::summary::ApplicationSummary;

/// Storage abstraction so the service can run against SQLite or memory alike.
///
/// Every call is one unit of work; there is no cross-call transaction or conflict detection.
pub trait ApplicationRepository: Send + Sync {
    /// Persists a new record and returns it with its assigned id.
    fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError>;
    /// Replaces every mutable field of an existing record.
    fn update(&self, application: &JobApplication) -> Result<(), RepositoryError>;
    fn fetch(&self, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError>;
    /// Removes a record and returns what was removed.
    fn delete(&self, id: ApplicationId) -> Result<JobApplication, RepositoryError>;
    /// Matching records, newest application date first.
    fn list(&self, query: &ApplicationQuery) -> Result<Vec<JobApplication>, RepositoryError>;
    /// Counts over the full record set.
    fn summarize(&self) -> Result<ApplicationSummary, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored application {id} is unreadable: {reason}")]
    Corrupt { id: ApplicationId, reason: String },
    #[error("migration v{version} failed: {reason}")]
    Migration { version: u32, reason: String },
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
