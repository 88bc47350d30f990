use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{ApplicationDraft, ApplicationId, JobApplication};
use super::form::{ApplicationForm, ValidationError};
use super::query::ApplicationQuery;
use super::repository::{ApplicationRepository, RepositoryError};
use super::summary::ApplicationSummary;
use crate::export::{self, ExportError, ExportFormat, SpreadsheetExport};

/// Service composing validation, the record store, and the exporter.
pub struct ApplicationService<R> {
    repository: Arc<R>,
}

/// Everything the dashboard shows: the filtered listing plus unfiltered counts.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub applications: Vec<JobApplication>,
    pub summary: ApplicationSummary,
}

impl<R> Clone for ApplicationService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> ApplicationService<R>
where
    R: ApplicationRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn list(
        &self,
        query: &ApplicationQuery,
    ) -> Result<Vec<JobApplication>, ApplicationServiceError> {
        Ok(self.repository.list(query)?)
    }

    pub fn summarize(&self) -> Result<ApplicationSummary, ApplicationServiceError> {
        Ok(self.repository.summarize()?)
    }

    pub fn dashboard(&self, query: &ApplicationQuery) -> Result<Dashboard, ApplicationServiceError> {
        Ok(Dashboard {
            applications: self.list(query)?,
            summary: self.summarize()?,
        })
    }

    pub fn get(&self, id: ApplicationId) -> Result<JobApplication, ApplicationServiceError> {
        self.repository
            .fetch(id)?
            .ok_or(ApplicationServiceError::NotFound(id))
    }

    /// Validates a submitted form and persists it as a new record.
    pub fn create(&self, form: &ApplicationForm) -> Result<JobApplication, ApplicationServiceError> {
        let draft = form.validate()?;
        self.create_draft(draft)
    }

    /// Persists an already-typed draft, bypassing form validation.
    pub fn create_draft(
        &self,
        draft: ApplicationDraft,
    ) -> Result<JobApplication, ApplicationServiceError> {
        let stored = self.repository.insert(draft)?;
        info!(id = %stored.id, company = %stored.company, "application added");
        Ok(stored)
    }

    /// Replaces every mutable field of an existing record. Unknown ids fail before the form is
    /// looked at.
    pub fn update(
        &self,
        id: ApplicationId,
        form: &ApplicationForm,
    ) -> Result<JobApplication, ApplicationServiceError> {
        let mut application = self.get(id)?;
        let draft = form.validate()?;
        application.apply(draft);
        self.repository.update(&application)?;
        info!(id = %application.id, company = %application.company, "application updated");
        Ok(application)
    }

    pub fn delete(&self, id: ApplicationId) -> Result<JobApplication, ApplicationServiceError> {
        let removed = self.repository.delete(id)?;
        info!(id = %removed.id, company = %removed.company, "application deleted");
        Ok(removed)
    }

    /// Exports every record, ignoring whatever view is active.
    pub fn export(&self, format: ExportFormat) -> Result<SpreadsheetExport, ApplicationServiceError> {
        let applications = self.list(&ApplicationQuery::all())?;
        let rendered = export::render(format, &applications)?;
        info!(rows = rendered.rows, file = rendered.file_name(), "export rendered");
        Ok(rendered)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("application {0} not found")]
    NotFound(ApplicationId),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<RepositoryError> for ApplicationServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}
