use pairmatch_core::GameError;
use pairmatch_protocol::RecordError;
use thiserror::Error;

/// Failure reported by a [`PersistenceGateway`](crate::PersistenceGateway) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Image acquisition failed: {0}")]
    ImageAcquisitionFailed(String),
    #[error("Image acquisition gave up after {attempts} attempts")]
    AcquisitionAborted { attempts: u32 },
    #[error("Persistence failure at {key}: {source}")]
    PersistenceFailure {
        key: &'static str,
        #[source]
        source: StoreError,
    },
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl SessionError {
    pub(crate) fn persistence(key: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::PersistenceFailure { key, source }
    }

    /// Whether gameplay can carry on after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Game(_))
    }
}

pub type Result<T> = core::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_engine_errors_end_the_game() {
        assert!(!SessionError::from(GameError::UnknownDifficulty).is_recoverable());
        assert!(SessionError::AcquisitionAborted { attempts: 3 }.is_recoverable());
        assert!(SessionError::ImageAcquisitionFailed("no camera".into()).is_recoverable());
        let store_down = SessionError::persistence("pairmatch:high-score:v1")(StoreError::Backend(
            "offline".into(),
        ));
        assert!(store_down.is_recoverable());
    }
}
