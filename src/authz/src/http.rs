//! HTTP adapter for the authorization guard
//!
//! Maps [`Decision`]s onto axum responses, runs the guard as route
//! middleware, and exposes the decision service routes. Nothing in the guard
//! depends on this module.

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};
use uuid::Uuid;

use crate::error::AuthzError;
use crate::guard::{AuthorizationGuard, Decision, DenialReason};
use crate::types::{Assignment, Principal, ScopeParams};

/// Header carrying the authenticated principal id, set by the upstream gateway
pub const PRINCIPAL_ID_HEADER: &str = "x-principal-id";

/// Header carrying the principal's global role, set by the upstream gateway
pub const PRINCIPAL_ROLE_HEADER: &str = "x-principal-role";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub guard: Arc<AuthorizationGuard>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(guard: AuthorizationGuard) -> Self {
        Self {
            guard: Arc::new(guard),
            start_time: Instant::now(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The assignment store failed; never reported as a denial
    Store(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Store(msg) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
        };

        let body = Json(ErrorResponse {
            error: error.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::DatabaseError(msg) => AppError::Store(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl DenialReason {
    /// Conventional status: 401 for missing authentication, 403 otherwise
    pub fn status_code(self) -> StatusCode {
        match self {
            DenialReason::Unauthenticated => StatusCode::UNAUTHORIZED,
            DenialReason::InsufficientRole
            | DenialReason::MissingScope
            | DenialReason::NoDirectAssignment
            | DenialReason::NoParentAssignment => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for DenialReason {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.outcome().to_string(),
            message: self.message().to_string(),
        });

        (self.status_code(), body).into_response()
    }
}

/// Evaluation request body
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub principal: Option<Principal>,
    #[serde(default)]
    pub scope: ScopeParams,
}

/// Evaluation response body
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub decision_id: String,
    pub allowed: bool,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub decision: Decision,
    pub timestamp: i64,
}

/// Body returned by guarded routes once access is granted
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessResponse {
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Assignment>,
}

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    uptime_seconds: u64,
    version: String,
}

/// Build a [`Principal`] from gateway-set headers and attach it to the request
///
/// Stand-in for an upstream authentication layer: requests without an id
/// header carry no principal, requests without a role header carry a
/// principal with no role.
pub async fn trusted_principal_headers(mut request: Request, next: Next) -> Response {
    if let Some(principal) = principal_from_headers(request.headers()) {
        request.extensions_mut().insert(principal);
    }
    next.run(request).await
}

fn principal_from_headers(headers: &HeaderMap) -> Option<Principal> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    };

    let id = header(PRINCIPAL_ID_HEADER)?;
    Some(Principal {
        id,
        global_role: header(PRINCIPAL_ROLE_HEADER),
    })
}

/// Route middleware running the guard against the matched path parameters
///
/// On allow, the [`Decision`] and any matched [`Assignment`] are inserted
/// into the request extensions for the inner handler.
pub async fn scoped_access(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let config = state.guard.config();
    let scope = ScopeParams {
        direct_scope_id: params.get(&config.direct_scope_param).cloned(),
        parent_scope_id: params.get(&config.parent_scope_param).cloned(),
    };

    let principal = request.extensions().get::<Principal>().cloned();
    let decision = state.guard.evaluate(principal.as_ref(), &scope).await.map_err(|e| {
        error!("Guard evaluation failed: {}", e);
        AppError::from(e)
    })?;

    match decision.denial() {
        Some(reason) => {
            info!(outcome = reason.outcome(), "Request denied");
            Ok(reason.into_response())
        }
        None => {
            if let Some(assignment) = decision.assignment() {
                request.extensions_mut().insert(assignment.clone());
            }
            request.extensions_mut().insert(decision);
            Ok(next.run(request).await)
        }
    }
}

/// POST /v1/evaluate - Evaluate a request without acting on it
async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let decision = state.guard.evaluate(req.principal.as_ref(), &req.scope).await?;

    info!(
        principal = req.principal.as_ref().map(|p| p.id.as_str()).unwrap_or("-"),
        outcome = decision.outcome(),
        "Evaluated authorization request"
    );

    Ok(Json(EvaluateResponse {
        decision_id: Uuid::new_v4().to_string(),
        allowed: decision.is_allowed(),
        outcome: decision.outcome().to_string(),
        message: decision.denial().map(|r| r.message().to_string()),
        decision,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }))
}

/// Guarded handler reporting how access was granted
async fn access(
    Extension(decision): Extension<Decision>,
    assignment: Option<Extension<Assignment>>,
) -> Json<AccessResponse> {
    Json(AccessResponse {
        outcome: decision.outcome().to_string(),
        assignment: assignment.map(|Extension(a)| a),
    })
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: crate::VERSION.to_string(),
    })
}

/// GET /metrics - Prometheus metrics endpoint
async fn metrics(State(state): State<AppState>) -> Response {
    let body = format!(
        "# HELP authz_uptime_seconds Server uptime in seconds\n\
         # TYPE authz_uptime_seconds gauge\n\
         authz_uptime_seconds {}\n\
         \n\
         # HELP authz_version Server version info\n\
         # TYPE authz_version gauge\n\
         authz_version{{version=\"{}\"}} 1\n",
        state.start_time.elapsed().as_secs(),
        crate::VERSION
    );

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}

/// Create the HTTP router with all endpoints
pub fn create_router(state: AppState) -> Router {
    let config = state.guard.config().clone();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http()
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let guarded = Router::new()
        .route(
            &format!("/v1/sections/:{}/access", config.direct_scope_param),
            get(access),
        )
        .route(
            &format!("/v1/courses/:{}/access", config.parent_scope_param),
            get(access),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), scoped_access));

    Router::new()
        .route("/v1/evaluate", post(evaluate))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .merge(guarded)
        .layer(
            ServiceBuilder::new()
                .layer(trace)
                .layer(cors)
                .layer(middleware::from_fn(trusted_principal_headers)),
        )
        .with_state(state)
}
