use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::post};
use log::info;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{ServerConfig, SolverConfig};
use crate::data::{Class, ClassInput, ScheduleOutput, Subject, Teacher, TeacherInput};
use crate::error::{GenerationFailed, RegistryError};
use crate::registry::Registry;
use crate::solver;

/// Entities registered through this server plus the solver settings.
#[derive(Debug, Default)]
pub struct Session {
    pub registry: Registry,
    pub config: SolverConfig,
}

pub type SharedSession = Arc<RwLock<Session>>;

pub enum ApiError {
    Registry(RegistryError),
    Generation(GenerationFailed),
    /// The blocking generation task panicked or was cancelled.
    Internal(String),
}

impl From<RegistryError> for ApiError {
    fn from(e: RegistryError) -> Self {
        ApiError::Registry(e)
    }
}

impl From<GenerationFailed> for ApiError {
    fn from(e: GenerationFailed) -> Self {
        ApiError::Generation(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Registry(e) => {
                let status = match e {
                    RegistryError::DuplicateEntity { .. } => StatusCode::CONFLICT,
                    RegistryError::InvalidSlotKey(_) => StatusCode::BAD_REQUEST,
                };
                (status, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Generation(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": e.to_string(),
                    "class": e.class,
                    "subject": e.subject,
                    "reason": e.reason.reason(),
                })),
            )
                .into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
        }
    }
}

async fn add_teacher(
    State(session): State<SharedSession>,
    Json(input): Json<TeacherInput>,
) -> Result<Json<Value>, ApiError> {
    let teacher = Teacher::try_from(input).map_err(RegistryError::from)?;
    session.write().await.registry.register_teacher(teacher)?;
    Ok(Json(json!({ "message": "Teacher added successfully" })))
}

async fn add_class(
    State(session): State<SharedSession>,
    Json(input): Json<ClassInput>,
) -> Result<Json<Value>, ApiError> {
    session.write().await.registry.register_class(Class::from(input))?;
    Ok(Json(json!({ "message": "Class added successfully" })))
}

async fn add_subject(
    State(session): State<SharedSession>,
    Json(subject): Json<Subject>,
) -> Result<Json<Value>, ApiError> {
    session.write().await.registry.register_subject(subject)?;
    Ok(Json(json!({ "message": "Subject added successfully" })))
}

/// Runs the search on the blocking pool over a copy of the registry, so the
/// session lock is released before any CPU work starts.
async fn generate_schedule(State(session): State<SharedSession>) -> Result<Json<ScheduleOutput>, ApiError> {
    let (registry, config) = {
        let session = session.read().await;
        (session.registry.clone(), session.config)
    };
    let output = tokio::task::spawn_blocking(move || solver::solve(&registry, config))
        .await
        .map_err(|e| ApiError::Internal(format!("schedule generation task failed: {e}")))??;
    Ok(Json(output))
}

/// Routes over a fresh, empty session.
pub fn router(config: SolverConfig) -> Router {
    let session = Arc::new(RwLock::new(Session {
        registry: Registry::new(),
        config,
    }));
    Router::new()
        .route("/api/teachers", post(add_teacher))
        .route("/api/classes", post(add_class))
        .route("/api/subjects", post(add_subject))
        .route("/api/schedule", post(generate_schedule))
        .with_state(session)
}

pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let app = router(config.solver);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
