use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::domain::{
    ApplicationId, Documents, Education, PersonalInfo, References, Section, WorkExperience,
};
use super::service::{parse_status, ApplicationService, ApplicationServiceError, ReviewDecision};
use super::rules::ValidationFailure;
use super::store::{ApplicationFilter, ApplicationStore};

/// Router builder exposing the application endpoints.
pub fn application_router<S>(service: Arc<ApplicationService<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            post(create_handler::<S>).get(list_handler::<S>),
        )
        .route(
            "/api/applications/:application_id",
            get(application_handler::<S>),
        )
        .route(
            "/api/applications/:application_id/submit",
            post(submit_handler::<S>),
        )
        .route(
            "/api/applications/:application_id/status",
            put(status_handler::<S>),
        )
        .route(
            "/api/applications/:application_id/review",
            post(review_handler::<S>),
        )
        .route(
            "/api/applications/:application_id/completeness",
            get(completeness_handler::<S>),
        )
        .route(
            "/api/applications/:application_id/personal-info",
            post(save_section_handler::<S, PersonalInfo>).get(section_handler::<S, PersonalInfo>),
        )
        .route(
            "/api/applications/:application_id/education",
            post(save_section_handler::<S, Education>).get(section_handler::<S, Education>),
        )
        .route(
            "/api/applications/:application_id/work-experience",
            post(save_section_handler::<S, WorkExperience>)
                .get(section_handler::<S, WorkExperience>),
        )
        .route(
            "/api/applications/:application_id/references",
            post(save_section_handler::<S, References>).get(section_handler::<S, References>),
        )
        .route(
            "/api/applications/:application_id/documents",
            post(save_section_handler::<S, Documents>).get(section_handler::<S, Documents>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub license_type_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListApplicationsQuery {
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub license_type_id: Option<String>,
}

pub(crate) async fn create_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    body: Result<axum::Json<CreateApplicationRequest>, JsonRejection>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let request = match body {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejected_body(rejection),
    };
    match service.create_application(&request.user_id, &request.license_type_id) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Query(query): Query<ListApplicationsQuery>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let status = match query.status.as_deref().map(|raw| parse_status("status", raw)) {
        Some(Ok(status)) => Some(status),
        Some(Err(failure)) => return error_response(failure.into()),
        None => None,
    };
    let filter = ApplicationFilter {
        status,
        user_id: query.user_id,
        license_type_id: query.license_type_id,
    };
    respond(StatusCode::OK, service.list_applications(&filter))
}

pub(crate) async fn application_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    respond(
        StatusCode::OK,
        service.application(&ApplicationId(application_id)),
    )
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    respond(
        StatusCode::OK,
        service.submit_application(&ApplicationId(application_id)),
    )
}

pub(crate) async fn status_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
    body: Result<axum::Json<StatusUpdateRequest>, JsonRejection>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let request = match body {
        Ok(axum::Json(request)) => request,
        Err(rejection) => return rejected_body(rejection),
    };
    respond(
        StatusCode::OK,
        service.update_status(&ApplicationId(application_id), &request.status),
    )
}

pub(crate) async fn review_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
    body: Result<axum::Json<ReviewDecision>, JsonRejection>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    let decision = match body {
        Ok(axum::Json(decision)) => decision,
        Err(rejection) => return rejected_body(rejection),
    };
    respond(
        StatusCode::OK,
        service.record_review(&ApplicationId(application_id), decision),
    )
}

pub(crate) async fn completeness_handler<S>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    respond(
        StatusCode::OK,
        service.completeness(&ApplicationId(application_id)),
    )
}

pub(crate) async fn save_section_handler<S, T>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
    body: Result<axum::Json<T>, JsonRejection>,
) -> Response
where
    S: ApplicationStore + 'static,
    T: Section + Serialize + DeserializeOwned,
{
    let payload = match body {
        Ok(axum::Json(payload)) => payload,
        Err(rejection) => return rejected_body(rejection),
    };
    respond(
        StatusCode::OK,
        service.save_section(&ApplicationId(application_id), payload),
    )
}

/// A section that has not been saved yet answers `204 No Content`.
pub(crate) async fn section_handler<S, T>(
    State(service): State<Arc<ApplicationService<S>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    T: Section + Serialize,
{
    match service.section::<T>(&ApplicationId(application_id)) {
        Ok(Some(section)) => (StatusCode::OK, axum::Json(section)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn respond<T: Serialize>(status: StatusCode, outcome: Result<T, ApplicationServiceError>) -> Response {
    match outcome {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Malformed or wrongly typed JSON is reported like any other validation failure.
fn rejected_body(rejection: JsonRejection) -> Response {
    error_response(ValidationFailure::new("body", rejection.body_text()).into())
}

pub(crate) fn status_for(error: &ApplicationServiceError) -> StatusCode {
    match error {
        ApplicationServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
        ApplicationServiceError::InvalidState(_) => StatusCode::CONFLICT,
        ApplicationServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ApplicationServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(error: ApplicationServiceError) -> Response {
    let status = status_for(&error);
    let payload = match &error {
        ApplicationServiceError::Validation(failure) => json!({
            "code": error.code(),
            "message": failure.message,
            "field": failure.field,
        }),
        ApplicationServiceError::Store(source) => {
            error!(error = %source, "application store failure");
            json!({
                "code": error.code(),
                "message": "An unexpected error occurred",
                "error": source.to_string(),
            })
        }
        _ => json!({
            "code": error.code(),
            "message": error.to_string(),
        }),
    };
    (status, axum::Json(payload)).into_response()
}
