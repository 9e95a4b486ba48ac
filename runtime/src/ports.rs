use async_trait::async_trait;
use pairmatch_protocol::FaceToken;
use serde_json::Value;
use thiserror::Error;

use crate::StoreError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcquireError {
    #[error("cancelled by the player")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

/// Source of card faces, e.g. a camera or a picture library.
///
/// May hand back fewer faces than asked for when the player backs out part way; callers treat
/// that like a cancellation.
#[async_trait]
pub trait ImageSupplier: Send + Sync {
    async fn acquire_faces(&self, count: usize) -> Result<Vec<FaceToken>, AcquireError>;
}

/// Key-value store holding one JSON record per key.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Fire-and-forget cues for match and mismatch, e.g. sound or vibration.
pub trait FeedbackService: Send + Sync {
    fn on_match(&self);
    fn on_mismatch(&self);
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoFeedback;

impl FeedbackService for NoFeedback {
    fn on_match(&self) {}
    fn on_mismatch(&self) {}
}
