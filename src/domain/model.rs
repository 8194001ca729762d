use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Front and back text of a single flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub front: String,
    pub back: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

/// What AnkiWeb acknowledged for an accepted card.
#[derive(Debug, Clone, Serialize)]
pub struct CardReceipt {
    pub status_code: u16,
    pub deck_name: String,
    pub payload_len: usize,
    pub message: String,
}

/// Per-card line of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct CardOutcome {
    pub index: usize,
    pub success: bool,
    pub status_code: Option<u16>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub results: Vec<CardOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchSummary {
    pub fn message(&self) -> String {
        format!("Added {} out of {} cards", self.success, self.total)
    }
}
