pub mod batch;
pub mod client;
pub mod deck;
pub mod encoding;
pub mod import;

pub use crate::domain::model::{BatchSummary, Card, CardOutcome, CardReceipt};
pub use crate::domain::ports::{CardSink, ConfigProvider};
pub use crate::utils::error::Result;
