use alloc::vec::Vec;

use crate::*;
pub use shuffle::*;

mod shuffle;

pub trait BoardGenerator {
    fn generate<T: Clone + PartialEq>(self, faces: &[T], config: BoardConfig) -> Result<Vec<Card<T>>>;
}

/// Checks that `faces` can fill a board of shape `config`.
pub fn validate_faces<T: PartialEq>(faces: &[T], config: BoardConfig) -> Result<()> {
    config.validate()?;

    let expected = config.pairs_needed();
    if faces.len() != usize::from(expected) {
        return Err(BoardIssue::FaceCount {
            expected,
            actual: faces.len(),
        }
        .into());
    }

    for (i, face) in faces.iter().enumerate() {
        if faces[..i].contains(face) {
            return Err(BoardIssue::DuplicateFace.into());
        }
    }

    Ok(())
}

/// Duplicates every face and numbers the copies sequentially, before any shuffling.
pub fn paired_deck<T: Clone>(faces: &[T]) -> Vec<Card<T>> {
    let mut next_id = 0;
    let mut deck = Vec::with_capacity(faces.len() * 2);
    for face in faces {
        for _ in 0..2 {
            deck.push(Card::new(CardId(next_id), face.clone()));
            next_id += 1;
        }
    }
    deck
}

/// Builds a board from an explicit, already-ordered layout of tokens.
///
/// Useful for replaying a known board: every token must appear exactly twice and the layout must
/// fill `config`.
pub fn deal_layout<T: Clone + PartialEq>(layout: &[T], config: BoardConfig) -> Result<Vec<Card<T>>> {
    config.validate()?;

    let expected = config.total_cards();
    if layout.len() != usize::from(expected) {
        return Err(BoardIssue::CardCount {
            expected,
            actual: layout.len(),
        }
        .into());
    }

    for token in layout {
        if layout.iter().filter(|&other| other == token).count() != 2 {
            return Err(BoardIssue::UnpairedLayout.into());
        }
    }

    Ok(layout
        .iter()
        .enumerate()
        .map(|(i, token)| Card::new(CardId(i as CardCount), token.clone()))
        .collect())
}
