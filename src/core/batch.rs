use crate::domain::model::{BatchSummary, Card, CardOutcome};
use crate::domain::ports::CardSink;
use chrono::Utc;
use std::time::Duration;

/// Submits `cards` one after another, sleeping `delay_seconds` between requests.
///
/// A failed card is recorded and the batch carries on. No sleep happens after
/// the last card or when the delay is not positive.
pub async fn submit_batch(
    sink: &dyn CardSink,
    cards: &[Card],
    deck_name: &str,
    delay_seconds: f64,
) -> BatchSummary {
    let started_at = Utc::now();
    let total = cards.len();
    let mut results = Vec::with_capacity(total);
    let mut success = 0;

    for (index, card) in cards.iter().enumerate() {
        tracing::debug!("Adding card {}/{}", index + 1, total);

        let outcome = match sink.add_card(card, deck_name).await {
            Ok(receipt) => {
                success += 1;
                CardOutcome {
                    index,
                    success: true,
                    status_code: Some(receipt.status_code),
                    message: receipt.message,
                }
            }
            Err(e) => {
                tracing::warn!("Card {}/{} failed: {}", index + 1, total, e);
                CardOutcome {
                    index,
                    success: false,
                    status_code: e.status_code(),
                    message: e.user_friendly_message(),
                }
            }
        };
        results.push(outcome);

        if index + 1 < total && delay_seconds > 0.0 {
            match Duration::try_from_secs_f64(delay_seconds) {
                Ok(pause) => {
                    tracing::debug!("Waiting {} seconds before next request...", delay_seconds);
                    tokio::time::sleep(pause).await;
                }
                Err(e) => tracing::warn!("⚠️ Skipping delay of {} seconds: {}", delay_seconds, e),
            }
        }
    }

    let summary = BatchSummary {
        total,
        success,
        failed: total - success,
        results,
        started_at,
        finished_at: Utc::now(),
    };

    tracing::info!(
        "📊 Batch for deck '{}': {} total, {} added, {} failed",
        deck_name,
        summary.total,
        summary.success,
        summary.failed
    );

    summary
}
