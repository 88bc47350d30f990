//! Job application records: validation, filtering, summaries and the HTTP surface.
//!
//! Storage is abstracted behind [`ApplicationRepository`]; the concrete stores live in
//! [`crate::store`].

pub mod domain;
pub mod form;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
pub mod summary;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{ApplicationDraft, ApplicationId, ApplicationStatus, JobApplication};
pub use form::{ApplicationForm, RequiredField, ValidationError};
pub use query::{ApplicationQuery, ListParams};
pub use repository::{ApplicationRepository, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationService, ApplicationServiceError, Dashboard};
pub use summary::ApplicationSummary;
