//! HTTP API server for the Diploma node.
//!
//! Provides REST endpoints for students, institutions, and the credential
//! lifecycle. Privileged requests carry the shared-secret `token` in their
//! JSON body.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, Method, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};

use diploma_core::{
    CoreError, Credential, CredentialShare, Institution, Notification, Student,
};
use diploma_registry::SearchFilter;

use crate::commands::{NodeCommand, Reply};
use crate::error::ApiError;
use crate::state::NodeState;

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

// --- Request types ---

#[derive(Deserialize)]
pub struct CreateStudentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct CreateInstitutionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCredentialRequest {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub institution_id: String,
    #[serde(default)]
    pub course: String,
    #[serde(default)]
    pub degree: String,
    pub graduation_year: Option<i32>,
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct RevokeCredentialRequest {
    #[serde(default)]
    pub reason: String,
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct RenewCredentialRequest {
    pub token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareCredentialRequest {
    #[serde(default)]
    pub recipient_id: String,
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCredentialRequest {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub institution_id: String,
}

// --- Response types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct StudentResponse {
    pub student: Student,
}

#[derive(Serialize)]
pub struct StudentsResponse {
    pub students: Vec<Student>,
}

#[derive(Serialize)]
pub struct InstitutionResponse {
    pub institution: Institution,
}

#[derive(Serialize)]
pub struct InstitutionsResponse {
    pub institutions: Vec<Institution>,
}

#[derive(Serialize)]
pub struct CredentialResponse {
    pub credential: Credential,
}

#[derive(Serialize)]
pub struct CredentialsResponse {
    pub credentials: Vec<Credential>,
}

/// Reply to a renew or revoke.
#[derive(Serialize)]
pub struct LifecycleResponse {
    pub status: String,
    pub message: String,
    pub credential: Credential,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub message: String,
    pub credential: Credential,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub credential_share: CredentialShare,
}

#[derive(Serialize)]
pub struct SharesResponse {
    pub shares: Vec<CredentialShare>,
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

// --- Handlers ---

async fn handle_health(State(state): State<Arc<NodeState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_create_student(
    State(state): State<Arc<NodeState>>,
    body: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Created<StudentResponse> {
    let req = read_json(body)?;
    let student = dispatch(&state, |reply| NodeCommand::CreateStudent {
        name: req.name,
        email: req.email,
        reply,
    })
    .await?;
    Ok((StatusCode::CREATED, Json(StudentResponse { student })))
}

async fn handle_list_students(State(state): State<Arc<NodeState>>) -> ApiResult<StudentsResponse> {
    let students = dispatch(&state, |reply| NodeCommand::ListStudents { reply }).await?;
    Ok(Json(StudentsResponse { students }))
}

async fn handle_get_student(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> ApiResult<StudentResponse> {
    let student = dispatch(&state, |reply| NodeCommand::GetStudent { id, reply }).await?;
    Ok(Json(StudentResponse { student }))
}

async fn handle_create_institution(
    State(state): State<Arc<NodeState>>,
    body: Result<Json<CreateInstitutionRequest>, JsonRejection>,
) -> Created<InstitutionResponse> {
    let req = read_json(body)?;
    let institution = dispatch(&state, |reply| NodeCommand::CreateInstitution {
        name: req.name,
        address: req.address,
        reply,
    })
    .await?;
    Ok((StatusCode::CREATED, Json(InstitutionResponse { institution })))
}

async fn handle_list_institutions(
    State(state): State<Arc<NodeState>>,
) -> ApiResult<InstitutionsResponse> {
    let institutions = dispatch(&state, |reply| NodeCommand::ListInstitutions { reply }).await?;
    Ok(Json(InstitutionsResponse { institutions }))
}

async fn handle_get_institution(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> ApiResult<InstitutionResponse> {
    let institution = dispatch(&state, |reply| NodeCommand::GetInstitution { id, reply }).await?;
    Ok(Json(InstitutionResponse { institution }))
}

async fn handle_issue_credential(
    State(state): State<Arc<NodeState>>,
    body: Result<Json<IssueCredentialRequest>, JsonRejection>,
) -> Created<CredentialResponse> {
    let req = read_json(body)?;
    authorize(&state, req.token.as_deref(), "issue_credential")?;
    let graduation_year = req
        .graduation_year
        .ok_or_else(|| CoreError::missing("graduationYear"))?;

    let credential = dispatch(&state, |reply| NodeCommand::IssueCredential {
        student_id: req.student_id,
        institution_id: req.institution_id,
        course: req.course,
        degree: req.degree,
        graduation_year,
        reply,
    })
    .await?;
    Ok((StatusCode::CREATED, Json(CredentialResponse { credential })))
}

async fn handle_list_credentials(
    State(state): State<Arc<NodeState>>,
) -> ApiResult<CredentialsResponse> {
    let credentials = dispatch(&state, |reply| NodeCommand::ListCredentials { reply }).await?;
    Ok(Json(CredentialsResponse { credentials }))
}

async fn handle_get_credential(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> ApiResult<CredentialResponse> {
    let credential = dispatch(&state, |reply| NodeCommand::GetCredential { id, reply }).await?;
    Ok(Json(CredentialResponse { credential }))
}

async fn handle_revoke_credential(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
    body: Result<Json<RevokeCredentialRequest>, JsonRejection>,
) -> ApiResult<LifecycleResponse> {
    let req = read_json(body)?;
    authorize(&state, req.token.as_deref(), "revoke_credential")?;
    let credential = dispatch(&state, |reply| NodeCommand::RevokeCredential {
        id,
        reason: req.reason,
        reply,
    })
    .await?;
    Ok(Json(LifecycleResponse {
        status: "200".into(),
        message: "Credential successfully revoked".into(),
        credential,
    }))
}

async fn handle_renew_credential(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
    body: Result<Json<RenewCredentialRequest>, JsonRejection>,
) -> ApiResult<LifecycleResponse> {
    let req = read_json(body)?;
    authorize(&state, req.token.as_deref(), "renew_credential")?;
    let credential = dispatch(&state, |reply| NodeCommand::RenewCredential { id, reply }).await?;
    Ok(Json(LifecycleResponse {
        status: "200".into(),
        message: "Credential successfully renewed".into(),
        credential,
    }))
}

async fn handle_share_credential(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
    body: Result<Json<ShareCredentialRequest>, JsonRejection>,
) -> Created<ShareResponse> {
    let req = read_json(body)?;
    authorize(&state, req.token.as_deref(), "share_credential")?;
    let expiration_date = req
        .expiration_date
        .ok_or_else(|| CoreError::missing("expirationDate"))?;

    let credential_share = dispatch(&state, |reply| NodeCommand::ShareCredential {
        id,
        recipient_id: req.recipient_id,
        expiration_date,
        permissions: req.permissions,
        reply,
    })
    .await?;
    Ok((StatusCode::CREATED, Json(ShareResponse { credential_share })))
}

async fn handle_list_shares(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> ApiResult<SharesResponse> {
    let shares = dispatch(&state, |reply| NodeCommand::ListShares { id, reply }).await?;
    Ok(Json(SharesResponse { shares }))
}

async fn handle_search_credentials(
    State(state): State<Arc<NodeState>>,
    body: Result<Json<SearchFilter>, JsonRejection>,
) -> ApiResult<CredentialsResponse> {
    let filter = read_json(body)?;
    let credentials =
        dispatch(&state, |reply| NodeCommand::SearchCredentials { filter, reply }).await?;
    Ok(Json(CredentialsResponse { credentials }))
}

async fn handle_verify_credential(
    State(state): State<Arc<NodeState>>,
    body: Result<Json<VerifyCredentialRequest>, JsonRejection>,
) -> ApiResult<VerifyResponse> {
    let req = read_json(body)?;
    let credential = dispatch(&state, |reply| NodeCommand::VerifyCredential {
        student_id: req.student_id,
        institution_id: req.institution_id,
        reply,
    })
    .await?;
    Ok(Json(VerifyResponse {
        message: "Credential verified successfully".into(),
        credential,
    }))
}

async fn handle_notifications(
    State(state): State<Arc<NodeState>>,
    Path(recipient_id): Path<String>,
) -> ApiResult<NotificationsResponse> {
    let notifications = dispatch(&state, |reply| NodeCommand::Notifications {
        recipient_id,
        reply,
    })
    .await?;
    Ok(Json(NotificationsResponse { notifications }))
}

/// Unwrap a JSON body. A request without a JSON content type reads as `{}`;
/// any other rejection becomes a 400 with the usual error body.
fn read_json<T: DeserializeOwned>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Json::<T>::from_bytes(b"{}")?.0),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Reject the request unless `token` is the configured shared secret.
fn authorize(state: &NodeState, token: Option<&str>, operation: &str) -> Result<(), ApiError> {
    if state.is_authorized(token) {
        Ok(())
    } else {
        tracing::warn!(operation, "rejected request with invalid token");
        Err(ApiError::Unauthorized)
    }
}

/// Send a command to the event loop and await its reply.
async fn dispatch<T>(
    state: &NodeState,
    command: impl FnOnce(Reply<T>) -> NodeCommand,
) -> Result<T, ApiError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    let cmd = command(reply_tx);
    let name = cmd.name();

    state
        .command_tx
        .send(cmd)
        .await
        .map_err(|_| ApiError::Unavailable("node event loop not running"))?;

    match reply_rx.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::warn!(command = name, error = %e, "operation failed");
            Err(e.into())
        }
        Err(_) => Err(ApiError::Unavailable("event loop dropped the reply channel")),
    }
}

// --- Server ---

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route(
            "/students",
            post(handle_create_student).get(handle_list_students),
        )
        .route("/student/{id}", get(handle_get_student))
        .route(
            "/institutions",
            post(handle_create_institution).get(handle_list_institutions),
        )
        .route("/institutions/{id}", get(handle_get_institution))
        .route("/institution/{id}", get(handle_get_institution))
        .route(
            "/credentials",
            post(handle_issue_credential).get(handle_list_credentials),
        )
        .route("/credential/{id}", get(handle_get_credential))
        .route("/credential/{id}/revoke", patch(handle_revoke_credential))
        .route("/credentials/{id}/renew", patch(handle_renew_credential))
        .route("/credentials/{id}/share", post(handle_share_credential))
        .route("/credentials/{id}/shares", get(handle_list_shares))
        .route("/search-credentials", post(handle_search_credentials))
        .route("/verify-credential", post(handle_verify_credential))
        .route("/notifications/{recipient_id}", get(handle_notifications))
        .layer(cors_layer())
        .with_state(state)
}

pub async fn start_api_server(listener: TcpListener, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    tracing::info!(listen_addr = %listener.local_addr()?, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
