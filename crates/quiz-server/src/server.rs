//! Axum HTTP server: the quiz API consumed by the web client.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/questions` | The full question catalog |
//! | POST | `/api/analyze` | Score a completed submission and store the result |
//! | GET | `/api/result/{session_id}` | Fetch a stored result for sharing |
//!
//! Handlers validate the submission precondition, run the scoring engine
//! synchronously to completion, then generate the narrative and persist the
//! assembled result under a fresh session id.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use quiz_common::session::new_session_id;

use crate::catalog::QuestionCatalog;
use crate::descriptions::DescriptionTable;
use crate::error::AppError;
use crate::model::{AnalysisResult, Answer, CategoryScore, Demographics, Question, Tendency};
use crate::narrative::NarrativeService;
use crate::scoring;
use crate::storage::ResultStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<QuestionCatalog>,
    pub descriptions: Arc<DescriptionTable>,
    pub narrative: Arc<NarrativeService>,
    pub store: Arc<ResultStore>,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/questions", get(handle_questions))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/result/{session_id}", get(handle_result))
        .layer(cors)
        .with_state(state)
}

// --- Request/Response types ---

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub demographics: Option<Demographics>,
}

#[derive(Debug, Serialize)]
pub struct QuestionListResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    pub session_id: String,
    pub political_score: u8,
    pub political_label: Tendency,
    pub ai_analysis: String,
    pub category_scores: IndexMap<String, CategoryScore>,
}

impl From<&AnalysisResult> for QuizResultResponse {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            session_id: result.session_id.clone(),
            political_score: result.political_score,
            political_label: result.political_label,
            ai_analysis: result.ai_analysis.clone(),
            category_scores: result.category_scores.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::InvalidAnswer { .. } => (
                StatusCode::BAD_REQUEST,
                "invalid_answer",
                "존재하지 않는 질문에 대한 응답이 포함되어 있습니다.",
            ),
            AppError::DuplicateAnswer { .. } => (
                StatusCode::BAD_REQUEST,
                "duplicate_answer",
                "같은 질문에 대한 응답이 중복되었습니다.",
            ),
            AppError::IncompleteSubmission { .. } => (
                StatusCode::BAD_REQUEST,
                "incomplete_submission",
                "모든 질문에 응답해야 결과를 분석할 수 있습니다.",
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                "not_found",
                "결과를 찾을 수 없습니다.",
            ),
            AppError::Common(_) | AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "정치 성향 분석 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.",
            ),
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": kind,
            "message": message,
        });
        (status, Json(body)).into_response()
    }
}

// --- Handlers ---

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_questions(State(state): State<AppState>) -> Json<QuestionListResponse> {
    Json(QuestionListResponse {
        questions: state.catalog.questions().to_vec(),
    })
}

async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<QuizResultResponse>, AppError> {
    scoring::validate_submission(&request.answers, &state.catalog)?;

    let (score, label) = scoring::overall_score(&request.answers, &state.catalog);
    let category_scores =
        scoring::category_scores(&request.answers, &state.catalog, &state.descriptions);

    let ai_analysis = state
        .narrative
        .analyze(
            &request.answers,
            request.demographics.as_ref(),
            score,
            label,
            &category_scores,
        )
        .await;

    let result = AnalysisResult {
        session_id: new_session_id(),
        political_score: score,
        political_label: label,
        ai_analysis,
        category_scores,
        answers: request.answers,
        demographics: request.demographics,
        created_at: Utc::now(),
    };
    state.store.put(&result).await;

    info!(
        session_id = %result.session_id,
        score,
        label = %label,
        "analysis stored"
    );

    Ok(Json(QuizResultResponse::from(&result)))
}

async fn handle_result(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<QuizResultResponse>, AppError> {
    let result = state
        .store
        .get(&session_id)
        .await
        .ok_or(AppError::NotFound(session_id))?;
    Ok(Json(QuizResultResponse::from(&result)))
}
