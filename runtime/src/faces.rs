use pairmatch_core::BoardConfig;
use pairmatch_protocol::{FaceToken, StoredFaces};
use std::sync::Arc;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FaceOrigin {
    /// Reused from the faces saved by an earlier board.
    Stored,
    /// Freshly handed out by the [`ImageSupplier`].
    Acquired,
}

#[derive(Debug)]
pub struct LoadedFaces {
    pub faces: Vec<FaceToken>,
    pub origin: FaceOrigin,
    /// Set when freshly acquired faces could not be saved for next time.
    pub save_error: Option<SessionError>,
}

/// Gathers exactly as many unique faces as a board needs, never fewer.
pub struct FaceLoader {
    gateway: Arc<dyn PersistenceGateway>,
    supplier: Arc<dyn ImageSupplier>,
    max_attempts: u32,
}

impl FaceLoader {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        supplier: Arc<dyn ImageSupplier>,
        settings: &SessionSettings,
    ) -> Self {
        Self {
            gateway,
            supplier,
            max_attempts: settings.max_acquire_attempts.max(1),
        }
    }

    /// Reuses stored faces when there are enough of them, otherwise asks the supplier.
    pub async fn load(&self, config: BoardConfig) -> Result<LoadedFaces> {
        config.validate()?;
        let count = usize::from(config.pairs_needed());

        match load_record::<StoredFaces>(self.gateway.as_ref()).await {
            Ok(Some(stored)) => {
                if let Some(faces) = stored.take(count) {
                    log::debug!("Reusing {} stored faces", count);
                    return Ok(LoadedFaces {
                        faces,
                        origin: FaceOrigin::Stored,
                        save_error: None,
                    });
                }
                log::debug!(
                    "Only {} stored faces, board needs {}",
                    stored.faces.len(),
                    count
                );
            }
            Ok(None) => {}
            Err(err) => log::warn!("Could not read stored faces: {}", err),
        }

        self.acquire_fresh(count).await
    }

    /// Always asks the supplier, then saves what it handed out.
    pub async fn acquire_fresh(&self, count: usize) -> Result<LoadedFaces> {
        let faces = self.acquire(count).await?;
        let save_error = save_record(self.gateway.as_ref(), &StoredFaces::new(faces.clone()))
            .await
            .err();
        if let Some(err) = &save_error {
            log::warn!("Could not save faces: {}", err);
        }
        Ok(LoadedFaces {
            faces,
            origin: FaceOrigin::Acquired,
            save_error,
        })
    }

    async fn acquire(&self, count: usize) -> Result<Vec<FaceToken>> {
        for attempt in 1..=self.max_attempts {
            match self.supplier.acquire_faces(count).await {
                Ok(faces) => {
                    let mut unique: Vec<FaceToken> = Vec::with_capacity(count);
                    for face in faces {
                        if !unique.contains(&face) {
                            unique.push(face);
                        }
                    }
                    if unique.len() >= count {
                        unique.truncate(count);
                        return Ok(unique);
                    }
                    log::warn!(
                        "Attempt {}: got {} of {} faces, asking again",
                        attempt,
                        unique.len(),
                        count
                    );
                }
                Err(AcquireError::Cancelled) => {
                    log::debug!("Attempt {}: acquisition cancelled", attempt);
                }
                Err(AcquireError::Failed(reason)) => {
                    return Err(SessionError::ImageAcquisitionFailed(reason));
                }
            }
        }
        Err(SessionError::AcquisitionAborted {
            attempts: self.max_attempts,
        })
    }
}
