use crate::core::deck::DeckRegistry;
use crate::core::encoding::encode_payload;
use crate::domain::model::{Card, CardReceipt};
use crate::domain::ports::{CardSink, ConfigProvider};
use crate::utils::error::{BridgeError, Result};
use crate::utils::logger::redact_cookie;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, ORIGIN, REFERER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::sync::Arc;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Submits cards to the AnkiWeb editor endpoint, one POST per card.
pub struct AnkiWebClient {
    client: Client,
    endpoint: String,
    decks: Arc<DeckRegistry>,
}

impl AnkiWebClient {
    pub fn new<C: ConfigProvider>(config: &C, decks: Arc<DeckRegistry>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(OCTET_STREAM));
        headers.insert(COOKIE, header_value("cookie", config.cookie())?);
        headers.insert(USER_AGENT, header_value("user_agent", config.user_agent())?);
        headers.insert(ORIGIN, header_value("origin", config.origin())?);
        headers.insert(REFERER, header_value("referer", config.referer())?);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()?;

        tracing::debug!(
            "AnkiWeb client ready: endpoint={}, cookie={}",
            config.endpoint(),
            redact_cookie(config.cookie())
        );

        Ok(Self {
            client,
            endpoint: config.endpoint().to_string(),
            decks,
        })
    }

    pub fn decks(&self) -> &DeckRegistry {
        &self.decks
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| BridgeError::InvalidConfigValueError {
        field: field.to_string(),
        value: if field == "cookie" {
            redact_cookie(value)
        } else {
            value.to_string()
        },
        reason: format!("Not a valid HTTP header value: {}", e),
    })
}

#[async_trait]
impl CardSink for AnkiWebClient {
    async fn add_card(&self, card: &Card, deck_name: &str) -> Result<CardReceipt> {
        let deck = self.decks.resolve(deck_name);
        let payload = encode_payload(&card.front, &card.back, deck);
        let payload_len = payload.len();

        tracing::debug!(
            "Adding card to deck '{}': front={:?}, payload={} bytes",
            deck_name,
            card.front,
            payload_len
        );

        let response = self.client.post(&self.endpoint).body(payload).send().await?;
        let status = response.status();
        tracing::debug!("AnkiWeb response status: {}", status);

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("❌ AnkiWeb rejected card ({}): {}", status, body);
            return Err(BridgeError::RejectedError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(CardReceipt {
            status_code: status.as_u16(),
            deck_name: deck_name.to_string(),
            payload_len,
            message: format!("Card successfully added to deck '{}'", deck_name),
        })
    }
}
