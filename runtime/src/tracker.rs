use chrono::{DateTime, Utc};
use pairmatch_core::{Score, is_new_high_score};
use pairmatch_protocol::{HighScoreRecord, Initials};
use std::sync::Arc;

use crate::*;

#[derive(Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// The score became the new best record.
    Saved(HighScoreRecord),
    /// The stored record is at least as good, nothing was written.
    NotBest { best: HighScoreRecord },
}

/// Keeps the single best finished score in the store.
pub struct ScoreTracker {
    gateway: Arc<dyn PersistenceGateway>,
    best: Option<HighScoreRecord>,
}

impl ScoreTracker {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self {
            gateway,
            best: None,
        }
    }

    /// Record as of the last successful read or commit.
    pub fn best(&self) -> Option<&HighScoreRecord> {
        self.best.as_ref()
    }

    /// Re-reads the stored record. On failure the last known record is kept.
    pub async fn refresh(&mut self) -> Result<Option<&HighScoreRecord>> {
        self.best = load_record(self.gateway.as_ref()).await?;
        Ok(self.best.as_ref())
    }

    /// Compares against the record last read; call [`refresh`](Self::refresh) first for a fresh answer.
    pub fn is_new_high_score(&self, score: Score) -> bool {
        is_new_high_score(score, self.best.as_ref().map(|record| record.score))
    }

    /// Reads the current record and tells whether a finished session with `score` beats it.
    pub async fn on_game_completed(&mut self, score: Score) -> Result<bool> {
        self.refresh().await?;
        let is_new = self.is_new_high_score(score);
        log::debug!("Session finished with {}, new high score: {}", score, is_new);
        Ok(is_new)
    }

    pub async fn commit(&mut self, score: Score, initials: Initials) -> Result<CommitOutcome> {
        self.commit_at(score, initials, Utc::now()).await
    }

    /// Stores `score` as the best record unless the stored one is at least as high.
    pub async fn commit_at(
        &mut self,
        score: Score,
        initials: Initials,
        now: DateTime<Utc>,
    ) -> Result<CommitOutcome> {
        self.refresh().await?;
        if let Some(best) = &self.best {
            if !is_new_high_score(score, Some(best.score)) {
                return Ok(CommitOutcome::NotBest { best: best.clone() });
            }
        }

        let record = HighScoreRecord::new(initials, score, now);
        save_record(self.gateway.as_ref(), &record).await?;
        log::debug!("New high score {} by {}", record.score, record.initials);
        self.best = Some(record.clone());
        Ok(CommitOutcome::Saved(record))
    }
}
