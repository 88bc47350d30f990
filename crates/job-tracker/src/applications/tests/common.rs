use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;

use crate::applications::form::DATE_FORMAT;
use crate::applications::{
    application_router, ApplicationDraft, ApplicationForm, ApplicationId, ApplicationQuery,
    ApplicationRepository, ApplicationService, ApplicationSummary, JobApplication,
    RepositoryError,
};
use crate::store::InMemoryApplicationRepository;

pub(super) type MemoryService = ApplicationService<InMemoryApplicationRepository>;

pub(super) fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).expect("valid date")
}

pub(super) fn build_service() -> Arc<MemoryService> {
    Arc::new(ApplicationService::new(Arc::new(
        InMemoryApplicationRepository::new(),
    )))
}

pub(super) fn seed(
    service: &MemoryService,
    company: &str,
    applied: &str,
    status: &str,
) -> JobApplication {
    service
        .create_draft(
            ApplicationDraft::new(company, "Engineer")
                .applied_on(date(applied))
                .with_status(status),
        )
        .expect("seed application")
}

pub(super) fn form(company: &str, role: &str, date_applied: &str, status: &str) -> ApplicationForm {
    ApplicationForm {
        company: company.to_string(),
        role: role.to_string(),
        date_applied: date_applied.to_string(),
        status: Some(status.to_string()),
        notes: String::new(),
    }
}

pub(super) fn router_for(service: Arc<MemoryService>) -> Router {
    application_router(service)
}

pub(super) fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

pub(super) fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub(super) async fn read_text_body(response: Response) -> String {
    String::from_utf8(read_body(response).await).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json body")
}

pub(super) fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

/// Store that fails every call, for exercising the 500 paths.
pub(super) struct UnavailableRepository;

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _draft: ApplicationDraft) -> Result<JobApplication, RepositoryError> {
        Err(unavailable())
    }

    fn update(&self, _application: &JobApplication) -> Result<(), RepositoryError> {
        Err(unavailable())
    }

    fn fetch(&self, _id: ApplicationId) -> Result<Option<JobApplication>, RepositoryError> {
        Err(unavailable())
    }

    fn delete(&self, _id: ApplicationId) -> Result<JobApplication, RepositoryError> {
        Err(unavailable())
    }

    fn list(&self, _query: &ApplicationQuery) -> Result<Vec<JobApplication>, RepositoryError> {
        Err(unavailable())
    }

    fn summarize(&self) -> Result<ApplicationSummary, RepositoryError> {
        Err(unavailable())
    }
}

fn unavailable() -> RepositoryError {
    RepositoryError::Unavailable("disk on fire".to_string())
}
