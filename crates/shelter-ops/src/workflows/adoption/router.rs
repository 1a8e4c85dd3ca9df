use std::sync::Arc;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::json;

use super::domain::{AdoptionRequestId, AdoptionStatus, AnimalId, ProcessDecision, UserId};
use super::repository::AdoptionRepository;
use super::service::{AdoptionWorkflowError, AdoptionWorkflowService};

/// Router builder exposing the adoption workflow endpoints.
///
/// Authentication itself lives upstream; the already-authenticated identity
/// arrives through the `x-actor-id` and `x-actor-role` headers and is read by
/// the [`Actor`] extractor.
pub fn adoption_router<R>(service: Arc<AdoptionWorkflowService<R>>) -> Router
where
    R: AdoptionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/adoptions",
            post(submit_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/adoptions/:request_id", get(get_handler::<R>))
        .route(
            "/api/v1/adoptions/:request_id/process",
            put(process_handler::<R>),
        )
        .route(
            "/api/v1/adoptions/:request_id/cancel",
            put(cancel_handler::<R>),
        )
        .with_state(service)
}

/// Role supplied by the upstream auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Adopter,
    Staff,
    Admin,
}

impl ActorRole {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "adopter" => Some(Self::Adopter),
            "staff" => Some(Self::Staff),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Authenticated caller identity, extracted from request headers.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: UserId,
    pub role: ActorRole,
}

impl Actor {
    pub fn can_process_requests(&self) -> bool {
        matches!(self.role, ActorRole::Staff | ActorRole::Admin)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-actor-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let role = parts
            .headers
            .get("x-actor-role")
            .and_then(|value| value.to_str().ok())
            .and_then(ActorRole::parse);

        match (user_id, role) {
            (Some(id), Some(role)) => Ok(Actor {
                user_id: UserId(id),
                role,
            }),
            _ => Err(error_response(
                StatusCode::UNAUTHORIZED,
                "missing or invalid actor identity",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitPayload {
    pub animal_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProcessPayload {
    pub status: AdoptionStatus,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub interview_date: Option<NaiveDateTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelPayload {
    #[serde(default)]
    pub comments: Option<String>,
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<AdoptionWorkflowService<R>>>,
    actor: Actor,
    payload: Result<Json<SubmitPayload>, JsonRejection>,
) -> Response
where
    R: AdoptionRepository + 'static,
{
    let payload = match json_payload(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match service.submit(AnimalId(payload.animal_id), actor.user_id) {
        Ok(request) => (StatusCode::CREATED, Json(request.view())).into_response(),
        Err(error) => workflow_error_response(&error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<AdoptionWorkflowService<R>>>,
    _actor: Actor,
) -> Response
where
    R: AdoptionRepository + 'static,
{
    match service.list() {
        Ok(requests) => {
            let views: Vec<_> = requests.iter().map(|request| request.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => workflow_error_response(&error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<AdoptionWorkflowService<R>>>,
    _actor: Actor,
    Path(request_id): Path<u64>,
) -> Response
where
    R: AdoptionRepository + 'static,
{
    match service.get(AdoptionRequestId(request_id)) {
        Ok(request) => (StatusCode::OK, Json(request.view())).into_response(),
        Err(error) => workflow_error_response(&error),
    }
}

pub(crate) async fn process_handler<R>(
    State(service): State<Arc<AdoptionWorkflowService<R>>>,
    actor: Actor,
    Path(request_id): Path<u64>,
    payload: Result<Json<ProcessPayload>, JsonRejection>,
) -> Response
where
    R: AdoptionRepository + 'static,
{
    if !actor.can_process_requests() {
        return error_response(
            StatusCode::FORBIDDEN,
            "processing adoption requests requires the staff or admin role",
        );
    }

    let payload = match json_payload(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    let decision = ProcessDecision {
        status: payload.status,
        comments: payload.comments,
        interview_at: payload.interview_date,
        processed_by: actor.user_id,
    };

    match service.process(AdoptionRequestId(request_id), decision) {
        Ok(request) => (StatusCode::OK, Json(request.view())).into_response(),
        Err(error) => workflow_error_response(&error),
    }
}

pub(crate) async fn cancel_handler<R>(
    State(service): State<Arc<AdoptionWorkflowService<R>>>,
    actor: Actor,
    Path(request_id): Path<u64>,
    payload: Result<Json<CancelPayload>, JsonRejection>,
) -> Response
where
    R: AdoptionRepository + 'static,
{
    if !actor.can_process_requests() {
        return error_response(
            StatusCode::FORBIDDEN,
            "cancelling adoption requests requires the staff or admin role",
        );
    }

    let payload = match json_payload(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };

    match service.cancel(AdoptionRequestId(request_id), actor.user_id, payload.comments) {
        Ok(request) => (StatusCode::OK, Json(request.view())).into_response(),
        Err(error) => workflow_error_response(&error),
    }
}

pub fn workflow_status_code(error: &AdoptionWorkflowError) -> StatusCode {
    match error {
        AdoptionWorkflowError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdoptionWorkflowError::InvalidTransition { .. } => StatusCode::CONFLICT,
        AdoptionWorkflowError::RequestNotFound | AdoptionWorkflowError::AnimalNotFound => {
            StatusCode::NOT_FOUND
        }
        AdoptionWorkflowError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn workflow_error_response(error: &AdoptionWorkflowError) -> Response {
    error_response(workflow_status_code(error), error.to_string())
}

/// Unwrap a JSON body, turning axum's plain-text rejection into the same
/// error envelope every other failure uses.
fn json_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(error_response(rejection.status(), rejection.body_text())),
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(json!({ "success": false, "message": message.into() }));
    (status, body).into_response()
}

/// Accepts `YYYY-MM-DDTHH:MM` (and with seconds) as the interview timestamp.
fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_datetime(&value).map_err(serde::de::Error::custom))
        .transpose()
}

pub(crate) fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM ({err})"))
}
