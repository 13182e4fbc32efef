use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::error::{AppError, AppResult};
use super::state::AppState;

/// Request payload for `/predict` and `/chat`.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub intent: String,
    pub answer: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

fn extract_question(payload: Result<Json<QuestionRequest>, JsonRejection>) -> AppResult<String> {
    let Json(body) = payload?;
    if body.question.trim().is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    Ok(body.question)
}

/// Handler: GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

/// Handler: POST /predict
///
/// ```bash
/// curl -X POST http://127.0.0.1:8000/predict \
///   -H 'content-type: application/json' \
///   -d '{"question":"what is the fee structure"}'
/// ```
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let question = extract_question(payload)?;
    let (intent, answer, confidence) = state.answer(&question)?;
    log::debug!("predict {:?} -> {} ({:.3})", question, intent, confidence);
    Ok(Json(PredictResponse {
        intent,
        answer,
        confidence,
    }))
}

/// Handler: POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let question = extract_question(payload)?;
    let (intent, response, _) = state.answer(&question)?;
    log::debug!("chat {:?} -> {}", question, intent);
    Ok(Json(ChatResponse { response }))
}
