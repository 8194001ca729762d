use crate::core::batch::submit_batch;
use crate::core::deck::DEFAULT_DECK;
use crate::domain::model::Card;
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::utils::validation::validate_delay;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn default_deck_name() -> String {
    DEFAULT_DECK.to_string()
}

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub front: String,
    pub back: String,
    #[serde(default = "default_deck_name")]
    pub deck_name: String,
}

#[derive(Debug, Deserialize)]
pub struct MultipleCardsRequest {
    pub cards: Vec<Card>,
    #[serde(default = "default_deck_name")]
    pub deck_name: String,
    /// Seconds between requests; the server default applies when absent.
    pub delay: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<Value>,
}

pub async fn add_card_handler(
    State(state): State<AppState>,
    Json(request): Json<CardRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let card = Card::new(request.front, request.back);
    let receipt = state.sink.add_card(&card, &request.deck_name).await?;

    tracing::info!("✅ {}", receipt.message);
    Ok(Json(ApiResponse {
        success: true,
        message: receipt.message,
        data: Some(json!({ "status_code": receipt.status_code })),
    }))
}

pub async fn add_multiple_cards_handler(
    State(state): State<AppState>,
    Json(request): Json<MultipleCardsRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let delay = request.delay.unwrap_or(state.default_delay);
    validate_delay("delay", delay).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let summary =
        submit_batch(state.sink.as_ref(), &request.cards, &request.deck_name, delay).await;

    Ok(Json(ApiResponse {
        success: summary.success > 0,
        message: summary.message(),
        data: Some(json!({
            "total": summary.total,
            "success": summary.success,
            "failed": summary.failed,
        })),
    }))
}

pub async fn decks_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "decks": state.decks.list_names() }))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
