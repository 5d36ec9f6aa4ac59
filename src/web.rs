use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::engine::{CompletionOutcome, DiagnosticOutcome, DiagnosticSubmission, Engine};
use crate::error::RecapError;
use crate::model::{DashboardStats, ProgressRecord, Revision, WeakConcept};
use crate::store::Store;

type SharedEngine = Arc<Mutex<Engine>>;

impl IntoResponse for RecapError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecapError::NotFound => StatusCode::NOT_FOUND,
            RecapError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecapError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

// -- Route handlers --

async fn submit_diagnostic(
    State(engine): State<SharedEngine>,
    Json(submission): Json<DiagnosticSubmission>,
) -> Result<Json<DiagnosticOutcome>, RecapError> {
    let outcome = engine
        .lock()
        .await
        .submit_diagnostic(submission, Utc::now())
        .await?;
    Ok(Json(outcome))
}

#[derive(serde::Deserialize)]
struct DueQuery {
    #[serde(rename = "asOf")]
    as_of: Option<DateTime<Utc>>,
}

async fn due_revisions(
    State(engine): State<SharedEngine>,
    Path(user_id): Path<String>,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<Revision>>, RecapError> {
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let due = engine.lock().await.due_revisions_for(&user_id, as_of)?;
    Ok(Json(due))
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRequest {
    recall_score: u8,
}

async fn complete_revision(
    State(engine): State<SharedEngine>,
    Path((user_id, revision_id)): Path<(String, String)>,
    Json(request): Json<CompleteRequest>,
) -> Result<Json<CompletionOutcome>, RecapError> {
    let outcome = engine
        .lock()
        .await
        .complete_revision(&user_id, &revision_id, request.recall_score, Utc::now())
        .await?;
    Ok(Json(outcome))
}

async fn dashboard(
    State(engine): State<SharedEngine>,
    Path(user_id): Path<String>,
) -> Result<Json<DashboardStats>, RecapError> {
    let stats = engine.lock().await.dashboard_stats(&user_id, Utc::now())?;
    Ok(Json(stats))
}

async fn weak_concepts(
    State(engine): State<SharedEngine>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<WeakConcept>>, RecapError> {
    let concepts = engine.lock().await.weak_concepts_for(&user_id)?;
    Ok(Json(concepts))
}

async fn progress(
    State(engine): State<SharedEngine>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ProgressRecord>>, RecapError> {
    let records = engine.lock().await.progress_for(&user_id)?;
    Ok(Json(records))
}

// -- Router & entry point --

pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/api/diagnostics", post(submit_diagnostic))
        .route("/api/users/{user_id}/revisions/due", get(due_revisions))
        .route(
            "/api/users/{user_id}/revisions/{revision_id}/complete",
            post(complete_revision),
        )
        .route("/api/users/{user_id}/dashboard", get(dashboard))
        .route("/api/users/{user_id}/weak-concepts", get(weak_concepts))
        .route("/api/users/{user_id}/progress", get(progress))
        .with_state(engine)
}

pub async fn serve(data_path: String, port: u16) {
    let store = match Store::open(&data_path).await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %data_path, "store opened");

    let engine = Arc::new(Mutex::new(Engine::new(store)));
    let app = router(engine);

    let addr = format!("0.0.0.0:{port}");
    println!("Serving at http://localhost:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
