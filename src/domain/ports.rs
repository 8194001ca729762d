use crate::domain::model::{Card, CardReceipt};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Settings needed to talk to the card-creation endpoint.
pub trait ConfigProvider: Send + Sync {
    fn endpoint(&self) -> &str;
    fn cookie(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn origin(&self) -> &str;
    fn referer(&self) -> &str;
    fn request_timeout(&self) -> Duration;
}

/// Anything that can file a card into a named deck.
#[async_trait]
pub trait CardSink: Send + Sync {
    async fn add_card(&self, card: &Card, deck_name: &str) -> Result<CardReceipt>;
}
