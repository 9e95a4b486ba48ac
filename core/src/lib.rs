#![no_std]

extern crate alloc;

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use score::*;
pub use types::*;

mod card;
mod engine;
mod error;
mod generator;
mod score;
mod types;

/// Board shape, always passed explicitly to the generator and the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: Dim,
    pub cols: Dim,
}

impl BoardConfig {
    pub const fn new_unchecked(rows: Dim, cols: Dim) -> Self {
        Self { rows, cols }
    }

    pub fn new(rows: Dim, cols: Dim) -> Result<Self> {
        let config = Self::new_unchecked(rows, cols);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let total = self.total_cards();
        if total == 0 || total % 2 != 0 {
            return Err(BoardIssue::OddOrEmpty {
                rows: self.rows,
                cols: self.cols,
            }
            .into());
        }
        Ok(())
    }

    pub const fn total_cards(&self) -> CardCount {
        mult(self.rows, self.cols)
    }

    /// How many unique faces a board of this shape needs.
    pub const fn pairs_needed(&self) -> CardCount {
        self.total_cards() / 2
    }

    pub fn contains(&self, index: CardIndex) -> bool {
        index < self.total_cards()
    }

    pub fn pos_of(&self, index: CardIndex) -> Option<Pos2> {
        if !self.contains(index) || self.cols == 0 {
            return None;
        }
        let cols = CardCount::from(self.cols);
        Some(((index / cols) as Dim, (index % cols) as Dim))
    }

    pub fn index_of(&self, (row, col): Pos2) -> Option<CardIndex> {
        if row < self.rows && col < self.cols {
            Some(CardCount::from(row) * CardCount::from(self.cols) + CardCount::from(col))
        } else {
            None
        }
    }
}

impl From<Difficulty> for BoardConfig {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.board_config()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn board_config(self) -> BoardConfig {
        use Difficulty::*;
        match self {
            Easy => BoardConfig::new_unchecked(2, 2),
            Medium => BoardConfig::new_unchecked(4, 4),
            Hard => BoardConfig::new_unchecked(6, 6),
        }
    }

    pub const fn name(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "easy",
            Medium => "medium",
            Hard => "hard",
        }
    }

    /// Parse a preset name, falling back to [`Difficulty::Easy`] for anything unknown.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown difficulty {:?}, fallback to easy", name);
            Self::default()
        })
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(GameError::UnknownDifficulty)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
