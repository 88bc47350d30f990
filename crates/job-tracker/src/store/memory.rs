use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::applications::{
    ApplicationDraft, ApplicationId, ApplicationQuery, ApplicationRepository, ApplicationSummary,
    JobApplication, RepositoryError,
};

#[derive(Debug, Default)]
struct Records {
    next_id: i64,
    by_id: BTreeMap<ApplicationId, JobApplication>,
}

/// Volatile store keyed by id. Cloning shares the same records.
#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<Records>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, draft: ApplicationDraft) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.lock()?;
        guard.next_id += 1;
        let application = draft.into_application(ApplicationId(guard.next_id));
        guard.by_id.insert(application.id, application.clone());
        Ok(application)
    }

    fn update(&self, application: &JobApplication) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        match guard.by_id.get_mut(&application.id) {
            Some(stored) => {
                stored.apply(application.draft());
                Ok(())
            }
            None => Err(RepositoryError::NotFound(application.id)),
        }
    }

    fn fetch(&self, id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.by_id.get(&id).cloned())
    }

    fn delete(&self, id: ApplicationId) -> Result<JobApplication, RepositoryError> {
        let mut guard = self.lock()?;
        guard.by_id.remove(&id).ok_or(RepositoryError::NotFound(id))
    }

    fn list(&self, query: &ApplicationQuery) -> Result<Vec<JobApplication>, RepositoryError> {
        let guard = self.lock()?;
        Ok(query.apply(guard.by_id.values().cloned()))
    }

    fn summarize(&self) -> Result<ApplicationSummary, RepositoryError> {
        let guard = self.lock()?;
        Ok(ApplicationSummary::tally(guard.by_id.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(company: &str, day: u32) -> ApplicationDraft {
        ApplicationDraft::new(company, "Engineer")
            .applied_on(NaiveDate::from_ymd_opt(2024, 5, day).expect("valid date"))
    }

    #[test]
    fn ids_are_assigned_sequentially_and_never_reused() {
        let repository = InMemoryApplicationRepository::new();
        let first = repository.insert(draft("Acme", 1)).expect("insert");
        let second = repository.insert(draft("Globex", 2)).expect("insert");
        assert_eq!(first.id, ApplicationId(1));
        assert_eq!(second.id, ApplicationId(2));

        repository.delete(second.id).expect("delete");
        let third = repository.insert(draft("Initech", 3)).expect("insert");
        assert_eq!(third.id, ApplicationId(3));
    }

    #[test]
    fn update_and_delete_report_unknown_ids() {
        let repository = InMemoryApplicationRepository::new();
        let ghost = draft("Acme", 1).into_application(ApplicationId(42));

        assert!(matches!(
            repository.update(&ghost),
            Err(RepositoryError::NotFound(ApplicationId(42)))
        ));
        assert!(matches!(
            repository.delete(ApplicationId(42)),
            Err(RepositoryError::NotFound(ApplicationId(42)))
        ));
    }

    #[test]
    fn clones_share_records() {
        let repository = InMemoryApplicationRepository::new();
        let handle = repository.clone();
        handle.insert(draft("Acme", 1)).expect("insert");
        assert_eq!(repository.summarize().expect("summary").total, 1);
    }
}
