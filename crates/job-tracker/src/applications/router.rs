use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::ApplicationId;
use super::form::{ApplicationForm, ValidationError};
use super::query::{ApplicationQuery, ListParams};
use super::repository::ApplicationRepository;
use super::service::{ApplicationService, ApplicationServiceError};
use super::views::{DashboardPage, Flash, FormNotice, FormPage, NotFoundPage, Notice};
use crate::export::ExportFormat;

/// Router serving the HTML pages, the exports and the JSON listing.
pub fn application_router<R>(service: Arc<ApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/", get(dashboard_handler::<R>))
        .route("/add", get(add_form_handler).post(add_submit_handler::<R>))
        .route(
            "/edit/:id",
            get(edit_form_handler::<R>).post(edit_submit_handler::<R>),
        )
        .route("/delete/:id", post(delete_handler::<R>))
        .route("/export", get(export_xlsx_handler::<R>))
        .route("/export.csv", get(export_csv_handler::<R>))
        .route("/api/v1/applications", get(list_json_handler::<R>))
        .route("/api/v1/applications/summary", get(summary_json_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardParams {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    notice: Option<String>,
    #[serde(default)]
    company: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FormParams {
    #[serde(default)]
    error: Option<String>,
}

impl FormParams {
    fn message(&self) -> Option<String> {
        self.error
            .as_deref()
            .and_then(FormNotice::from_param)
            .map(|notice| notice.message().to_string())
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Query(params): Query<DashboardParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let status = params.status.as_deref().unwrap_or_default();
    let search = params.search.as_deref().unwrap_or_default();
    let query = ApplicationQuery::from_params(Some(status), Some(search));

    match service.dashboard(&query) {
        Ok(dashboard) => {
            let notice =
                Flash::from_params(params.notice.as_deref(), params.company.as_deref());
            let page = DashboardPage::new(
                &dashboard.applications,
                dashboard.summary,
                status,
                search,
                notice,
            );
            render_page(StatusCode::OK, &page)
        }
        Err(other) => failure_response(other),
    }
}

pub(crate) async fn add_form_handler(Query(params): Query<FormParams>) -> Response {
    let form = ApplicationForm::blank(Local::now().date_naive());
    render_page(StatusCode::OK, &FormPage::add(form, params.message()))
}

pub(crate) async fn add_submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Form(form): Form<ApplicationForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.create(&form) {
        Ok(created) => Redirect::to(&Notice::Added.location(&created.company)).into_response(),
        Err(ApplicationServiceError::Validation(ValidationError::InvalidDate { .. })) => {
            invalid_date_redirect("/add")
        }
        Err(ApplicationServiceError::Validation(error)) => render_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            &FormPage::add(form, Some(error.to_string())),
        ),
        Err(other) => failure_response(other),
    }
}

pub(crate) async fn edit_form_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(id): Path<i64>,
    Query(params): Query<FormParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(id);
    match service.get(id) {
        Ok(application) => {
            let form = ApplicationForm::from_application(&application);
            render_page(StatusCode::OK, &FormPage::edit(id, form, params.message()))
        }
        Err(other) => failure_response(other),
    }
}

pub(crate) async fn edit_submit_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(id): Path<i64>,
    Form(form): Form<ApplicationForm>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(id);
    match service.update(id, &form) {
        Ok(updated) => Redirect::to(&Notice::Updated.location(&updated.company)).into_response(),
        Err(ApplicationServiceError::Validation(ValidationError::InvalidDate { .. })) => {
            invalid_date_redirect(&format!("/edit/{id}"))
        }
        Err(ApplicationServiceError::Validation(error)) => render_page(
            StatusCode::UNPROCESSABLE_ENTITY,
            &FormPage::edit(id, form, Some(error.to_string())),
        ),
        Err(other) => failure_response(other),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Path(id): Path<i64>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.delete(ApplicationId(id)) {
        Ok(removed) => Redirect::to(&Notice::Deleted.location(&removed.company)).into_response(),
        Err(other) => failure_response(other),
    }
}

pub(crate) async fn export_xlsx_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    export_response(&service, ExportFormat::Xlsx)
}

pub(crate) async fn export_csv_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    export_response(&service, ExportFormat::Csv)
}

pub(crate) async fn list_json_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.list(&ApplicationQuery::from(&params)) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(other) => json_failure(other),
    }
}

pub(crate) async fn summary_json_handler<R>(
    State(service): State<Arc<ApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.summarize() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(other) => json_failure(other),
    }
}

fn export_response<R>(service: &ApplicationService<R>, format: ExportFormat) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.export(format) {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, export.content_type().to_string()),
                (header::CONTENT_DISPOSITION, export.content_disposition()),
            ],
            export.bytes,
        )
            .into_response(),
        Err(other) => failure_response(other),
    }
}

fn invalid_date_redirect(path: &str) -> Response {
    let location = format!("{path}?error={}", FormNotice::InvalidDate.param());
    Redirect::to(&location).into_response()
}

fn render_page<T: Template>(status: StatusCode, page: &T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %err, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed").into_response()
        }
    }
}

fn failure_response(error: ApplicationServiceError) -> Response {
    match error {
        ApplicationServiceError::NotFound(id) => {
            let page = NotFoundPage {
                message: format!("No application with id {id}."),
            };
            render_page(StatusCode::NOT_FOUND, &page)
        }
        other => {
            error!(error = %other, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

fn json_failure(error: ApplicationServiceError) -> Response {
    error!(error = %error, "request failed");
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
