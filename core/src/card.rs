use serde::{Deserialize, Serialize};

use crate::CardCount;

/// Stable identity of a card within one dealt board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub CardCount);

/// A single card on the board.
///
/// Two cards form a pair when their tokens compare equal; the id only tells
/// the two halves of a pair apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card<T> {
    id: CardId,
    pair_token: T,
    flipped: bool,
    matched: bool,
}

impl<T> Card<T> {
    /// Face-down, unmatched card.
    pub const fn new(id: CardId, pair_token: T) -> Self {
        Self {
            id,
            pair_token,
            flipped: false,
            matched: false,
        }
    }

    pub const fn id(&self) -> CardId {
        self.id
    }

    pub const fn pair_token(&self) -> &T {
        &self.pair_token
    }

    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    /// Whether the face is currently visible, either mid-turn or as part of a found pair.
    pub const fn is_face_up(&self) -> bool {
        self.flipped || self.matched
    }

    pub(crate) fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub(crate) fn set_matched(&mut self) {
        self.matched = true;
    }
}

impl<T: PartialEq> Card<T> {
    pub fn pairs_with(&self, other: &Self) -> bool {
        self.id != other.id && self.pair_token == other.pair_token
    }
}
