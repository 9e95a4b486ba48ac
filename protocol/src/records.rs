use chrono::{DateTime, Utc};
use core::fmt;
use pairmatch_core::Score;
use serde::{Deserialize, Serialize};

use crate::*;

/// Opaque identifier of a card face, e.g. the URI of a captured picture.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceToken(String);

impl FaceToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FaceToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for FaceToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for FaceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player initials shown next to a high score, upper-cased and at most three characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Initials(String);

impl Initials {
    pub const MAX_LEN: usize = 3;

    /// Upper-cases first, so the length limit holds for what is actually stored.
    pub fn new(initials: &str) -> Result<Self> {
        let initials = initials.trim().to_uppercase();
        let len = initials.chars().count();
        if len > Self::MAX_LEN {
            return Err(RecordError::InitialsTooLong {
                len,
                max: Self::MAX_LEN,
            });
        }
        if initials
            .chars()
            .any(|c| c.is_control() || c.is_whitespace())
        {
            return Err(RecordError::InvalidInitials);
        }
        Ok(Self(initials))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for Initials {
    type Error = RecordError;

    fn try_from(initials: String) -> Result<Self> {
        Self::new(&initials)
    }
}

impl From<Initials> for String {
    fn from(initials: Initials) -> Self {
        initials.0
    }
}

impl fmt::Display for Initials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("---")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Faces collected for an earlier board, reused instead of asking the supplier again.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredFaces {
    pub schema: u32,
    pub faces: Vec<FaceToken>,
}

impl StoredFaces {
    pub fn new(faces: Vec<FaceToken>) -> Self {
        Self {
            schema: Self::SCHEMA,
            faces,
        }
    }

    /// The first `count` faces, when enough were stored.
    pub fn take(&self, count: usize) -> Option<Vec<FaceToken>> {
        (self.faces.len() >= count).then(|| self.faces[..count].to_vec())
    }
}

impl StorageKey for StoredFaces {
    const KEY: &'static str = "pairmatch:faces:v1";
}

impl Record for StoredFaces {
    const SCHEMA: u32 = 1;

    fn schema(&self) -> u32 {
        self.schema
    }

    fn validate_fields(&self) -> Result<()> {
        if self.faces.is_empty() {
            return Err(RecordError::EmptyFaces);
        }
        for (i, face) in self.faces.iter().enumerate() {
            if face.as_str().trim().is_empty() {
                return Err(RecordError::BlankFace);
            }
            if self.faces[..i].contains(face) {
                return Err(RecordError::DuplicateFace(face.to_string()));
            }
        }
        Ok(())
    }
}

/// The single best finished session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub schema: u32,
    pub initials: Initials,
    pub score: Score,
    pub achieved_at: DateTime<Utc>,
}

impl HighScoreRecord {
    pub fn new(initials: Initials, score: Score, achieved_at: DateTime<Utc>) -> Self {
        Self {
            schema: Self::SCHEMA,
            initials,
            score,
            achieved_at,
        }
    }
}

impl StorageKey for HighScoreRecord {
    const KEY: &'static str = "pairmatch:high-score:v1";
}

impl Record for HighScoreRecord {
    const SCHEMA: u32 = 1;

    fn schema(&self) -> u32 {
        self.schema
    }

    fn validate_fields(&self) -> Result<()> {
        Ok(())
    }
}
