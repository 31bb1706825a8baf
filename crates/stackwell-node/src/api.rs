//! HTTP API server for the Stackwell node.
//!
//! Provides REST endpoints for node status, document registration and
//! issuance, public verification, and issuer administration. Writes go
//! through the node's command lane; reads are answered from shared state.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use stackwell_core::{DocumentId, DocumentRecord, Identity, VerificationStatus};
use stackwell_registry::{RegistryError, VerificationResult};

use crate::commands::{IssuerResponse, NodeCommand};
use crate::node::{issuer_response, submission};
use crate::state::NodeState;

// --- Response types ---

#[derive(Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub name: String,
    pub documents: usize,
    pub verified_documents: usize,
    pub authorized_issuers: usize,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub record: DocumentRecord,
    pub status: VerificationStatus,
}

impl From<DocumentRecord> for DocumentResponse {
    fn from(record: DocumentRecord) -> Self {
        let status = record.status();
        Self { record, status }
    }
}

#[derive(Serialize)]
pub struct OwnerDocumentsResponse {
    pub owner: String,
    pub documents: Vec<DocumentResponse>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub content_hash: String,
    #[serde(flatten)]
    pub result: VerificationResult,
    pub status: Option<VerificationStatus>,
}

#[derive(Deserialize)]
pub struct RegisterDocumentRequest {
    pub owner: String,
    pub document_type: String,
    pub content_hash: String,
    #[serde(default)]
    pub aux_hash: Option<String>,
    #[serde(default)]
    pub metadata_uri: Option<String>,
    pub jurisdiction: String,
}

#[derive(Deserialize)]
pub struct IssueDocumentRequest {
    pub issuer: String,
    pub owner: String,
    pub document_type: String,
    pub content_hash: String,
    #[serde(default)]
    pub aux_hash: Option<String>,
    #[serde(default)]
    pub metadata_uri: Option<String>,
    pub jurisdiction: String,
    #[serde(default)]
    pub issuer_label: String,
}

#[derive(Deserialize)]
pub struct AuthorizeIssuerRequest {
    pub caller: String,
    pub identity: String,
    pub display_name: String,
}

#[derive(Deserialize)]
pub struct RevokeIssuerRequest {
    pub caller: String,
    pub identity: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a registry error.
pub fn status_for(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::DuplicateDocument { .. } => StatusCode::CONFLICT,
        RegistryError::NotAuthorizedIssuer(_) | RegistryError::PermissionDenied(_) => {
            StatusCode::FORBIDDEN
        }
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::InvalidInput(_) | RegistryError::InvalidHash(_) => StatusCode::BAD_REQUEST,
        RegistryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn registry_error(err: RegistryError) -> ApiError {
    (
        status_for(&err),
        Json(ErrorResponse {
            error: err.to_string(),
            kind: err.kind().into(),
        }),
    )
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.into(),
            kind: "internal".into(),
        }),
    )
}

fn parse_identity(raw: &str) -> Result<Identity, ApiError> {
    Identity::new(raw).map_err(|e| registry_error(e.into()))
}

fn parse_document_id(raw: &str) -> Result<DocumentId, ApiError> {
    raw.parse::<DocumentId>()
        .map_err(|e| registry_error(e.into()))
}

/// Unwrap a JSON body, reporting malformed payloads in the API's error shape.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| registry_error(RegistryError::InvalidInput(e.body_text())))
}

// --- Handlers ---

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn handle_status(State(state): State<Arc<NodeState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: state.name.clone(),
        documents: state.registry.len(),
        verified_documents: state.registry.verified_count(),
        authorized_issuers: state.directory.authorized_count(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_register_document(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RegisterDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let req = json_body(payload)?;
    let submission = submission(
        req.document_type,
        &req.content_hash,
        req.aux_hash,
        req.metadata_uri,
        req.jurisdiction,
    )
    .map_err(registry_error)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::SelfRegister {
        owner: parse_identity(&req.owner)?,
        submission,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx)
        .await
        .map(|Json(record)| Json(record.into()))
}

async fn handle_issue_document(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<IssueDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let req = json_body(payload)?;
    let submission = submission(
        req.document_type,
        &req.content_hash,
        req.aux_hash,
        req.metadata_uri,
        req.jurisdiction,
    )
    .map_err(registry_error)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::IssueOfficial {
        issuer: parse_identity(&req.issuer)?,
        owner: parse_identity(&req.owner)?,
        submission,
        issuer_label: req.issuer_label,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx)
        .await
        .map(|Json(record)| Json(record.into()))
}

async fn handle_get_document(
    State(state): State<Arc<NodeState>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let id = parse_document_id(&id)?;
    state
        .verifier
        .document(id)
        .map(|record| Json(record.into()))
        .map_err(registry_error)
}

async fn handle_owner_documents(
    State(state): State<Arc<NodeState>>,
    Path(owner): Path<String>,
) -> Result<Json<OwnerDocumentsResponse>, ApiError> {
    let owner = parse_identity(&owner)?;
    let documents: Vec<DocumentResponse> = state
        .verifier
        .documents_of(&owner)
        .into_iter()
        .map(DocumentResponse::from)
        .collect();
    let count = documents.len();
    Ok(Json(OwnerDocumentsResponse {
        owner: owner.to_string(),
        documents,
        count,
    }))
}

async fn handle_verify(
    State(state): State<Arc<NodeState>>,
    Path(hash): Path<String>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let content_hash = stackwell_core::ContentHash::parse(&hash)
        .map_err(|e| registry_error(e.into()))?
        .to_hex();
    let result = state.verifier.verify(&hash).map_err(registry_error)?;
    let status = result.status();
    Ok(Json(VerifyResponse {
        content_hash,
        result,
        status,
    }))
}

async fn handle_get_issuer(
    State(state): State<Arc<NodeState>>,
    Path(identity): Path<String>,
) -> Result<Json<IssuerResponse>, ApiError> {
    let identity = parse_identity(&identity)?;
    Ok(Json(issuer_response(&state.directory, &identity)))
}

async fn handle_authorize_issuer(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<AuthorizeIssuerRequest>, JsonRejection>,
) -> Result<Json<IssuerResponse>, ApiError> {
    let req = json_body(payload)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::AuthorizeIssuer {
        caller: parse_identity(&req.caller)?,
        identity: parse_identity(&req.identity)?,
        display_name: req.display_name,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

async fn handle_revoke_issuer(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<RevokeIssuerRequest>, JsonRejection>,
) -> Result<Json<IssuerResponse>, ApiError> {
    let req = json_body(payload)?;
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::RevokeIssuer {
        caller: parse_identity(&req.caller)?,
        identity: parse_identity(&req.identity)?,
        reply: reply_tx,
    };

    send_command_and_await(&state, cmd, reply_rx).await
}

/// Helper to send a command and await the reply.
async fn send_command_and_await<T: Serialize>(
    state: &Arc<NodeState>,
    cmd: NodeCommand,
    reply_rx: tokio::sync::oneshot::Receiver<Result<T, RegistryError>>,
) -> Result<Json<T>, ApiError> {
    state
        .command_tx
        .send(cmd)
        .await
        .map_err(|_| internal_error("node event loop not running"))?;

    match reply_rx.await {
        Ok(Ok(resp)) => Ok(Json(resp)),
        Ok(Err(e)) => Err(registry_error(e)),
        Err(_) => Err(internal_error("event loop dropped the reply channel")),
    }
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/documents/register", post(handle_register_document))
        .route("/api/v1/documents/issue", post(handle_issue_document))
        .route("/api/v1/documents/{id}", get(handle_get_document))
        .route("/api/v1/owners/{owner}/documents", get(handle_owner_documents))
        .route("/api/v1/verify/{hash}", get(handle_verify))
        .route("/api/v1/issuers/authorize", post(handle_authorize_issuer))
        .route("/api/v1/issuers/revoke", post(handle_revoke_issuer))
        .route("/api/v1/issuers/{identity}", get(handle_get_issuer))
        .with_state(state)
}

pub async fn start_api_server(
    listen_addr: SocketAddr,
    state: Arc<NodeState>,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(%listen_addr, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
