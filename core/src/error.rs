use thiserror::Error;

use crate::{CardCount, Dim};

/// Why a board could not be built from the given shape and faces.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BoardIssue {
    #[error("{rows}x{cols} does not hold an even, positive number of cards")]
    OddOrEmpty { rows: Dim, cols: Dim },
    #[error("expected {expected} unique faces, got {actual}")]
    FaceCount { expected: CardCount, actual: usize },
    #[error("face tokens must be unique")]
    DuplicateFace,
    #[error("expected {expected} cards, got {actual}")]
    CardCount { expected: CardCount, actual: usize },
    #[error("every face must appear on exactly two cards")]
    UnpairedLayout,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration: {0}")]
    InvalidBoardConfiguration(#[from] BoardIssue),
    #[error("Unknown difficulty preset")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
