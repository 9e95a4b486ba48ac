use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How long a mismatched pair stays face up before it is turned back down.
pub const DEFAULT_REVERSAL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

/// Valid transitions:
/// - Idle -> AwaitingInput (a board is dealt)
/// - AwaitingInput -> PendingResolution (second card of a turn is a mismatch)
/// - PendingResolution -> AwaitingInput (mismatched cards turned back down)
/// - AwaitingInput -> Completed (last pair matched)
/// - any -> Idle (reset)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Idle,
    AwaitingInput,
    PendingResolution,
    Completed,
}

impl EngineState {
    pub const fn accepts_flips(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Board state for one dealt game, owned by [`FlipEngine`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession<T> {
    config: BoardConfig,
    cards: Vec<Card<T>>,
    pending_flips: SmallVec<[CardIndex; 2]>,
    matched_pairs: CardCount,
    score: Score,
    status: SessionStatus,
}

impl<T> GameSession<T> {
    fn new(config: BoardConfig, cards: Vec<Card<T>>) -> Self {
        Self {
            config,
            cards,
            pending_flips: SmallVec::new(),
            matched_pairs: 0,
            score: 0,
            status: SessionStatus::InProgress,
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn rows(&self) -> Dim {
        self.config.rows
    }

    pub fn cols(&self) -> Dim {
        self.config.cols
    }

    pub fn cards(&self) -> &[Card<T>] {
        &self.cards
    }

    pub fn card(&self, index: CardIndex) -> Option<&Card<T>> {
        self.cards.get(index.to_usize_index())
    }

    pub fn pending_flips(&self) -> &[CardIndex] {
        &self.pending_flips
    }

    pub fn matched_pair_count(&self) -> CardCount {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> CardCount {
        self.config.pairs_needed()
    }

    pub fn pairs_left(&self) -> CardCount {
        self.total_pairs() - self.matched_pairs
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.status, SessionStatus::Completed)
    }

    fn can_flip(&self, index: CardIndex) -> bool {
        if self.is_completed() || self.pending_flips.len() >= 2 {
            return false;
        }
        self.card(index)
            .is_some_and(|card| !card.is_flipped() && !card.is_matched())
    }
}

impl<T: Clone + PartialEq> GameSession<T> {
    fn resolve_turn(
        &mut self,
        first: CardIndex,
        second: CardIndex,
        generation: Generation,
    ) -> FlipOutcome<T> {
        let (a, b) = (first.to_usize_index(), second.to_usize_index());

        if !self.cards[a].pairs_with(&self.cards[b]) {
            log::debug!("Cards {} and {} do not match", first, second);
            return FlipOutcome::Mismatched(ReversalTicket {
                generation,
                first,
                second,
            });
        }

        let pair_token = self.cards[a].pair_token().clone();
        self.cards[a].set_matched();
        self.cards[b].set_matched();
        self.pending_flips.clear();
        self.matched_pairs += 1;
        self.score += 1;

        if usize::from(self.matched_pairs) * 2 == self.cards.len() {
            self.status = SessionStatus::Completed;
            log::debug!("Board cleared with score {}", self.score);
            FlipOutcome::Completed {
                pair_token,
                score: self.score,
            }
        } else {
            log::debug!(
                "Cards {} and {} match, {} pairs left",
                first,
                second,
                self.pairs_left()
            );
            FlipOutcome::Matched {
                pair_token,
                score: self.score,
            }
        }
    }
}

/// Handle for a deferred face-down of two mismatched cards.
///
/// Only valid for the generation it was issued in; a ticket that outlives its session is ignored
/// by [`FlipEngine::reverse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversalTicket {
    pub generation: Generation,
    pub first: CardIndex,
    pub second: CardIndex,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlipOutcome<T> {
    /// Flip was ignored.
    NoChange,
    /// First card of a turn is now face up.
    Revealed(CardIndex),
    /// Second card completed a pair.
    Matched { pair_token: T, score: Score },
    /// Second card completed the last pair on the board.
    Completed { pair_token: T, score: Score },
    /// Second card did not match, both stay face up until the ticket is redeemed.
    Mismatched(ReversalTicket),
}

impl<T> FlipOutcome<T> {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub fn pair_token(&self) -> Option<&T> {
        match self {
            Self::Matched { pair_token, .. } | Self::Completed { pair_token, .. } => {
                Some(pair_token)
            }
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReversalOutcome {
    /// Ticket belonged to a discarded session or turn.
    Stale,
    Reversed { first: CardIndex, second: CardIndex },
}

/// The turn engine: owns the current [`GameSession`] and applies flips to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlipEngine<T> {
    config: BoardConfig,
    generation: Generation,
    session: Option<GameSession<T>>,
}

impl<T: Clone + PartialEq> FlipEngine<T> {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            config,
            generation: 0,
            session: None,
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn state(&self) -> EngineState {
        match &self.session {
            None => EngineState::Idle,
            Some(session) if session.is_completed() => EngineState::Completed,
            Some(session) if session.pending_flips.len() == 2 => EngineState::PendingResolution,
            Some(_) => EngineState::AwaitingInput,
        }
    }

    pub fn session(&self) -> Option<&GameSession<T>> {
        self.session.as_ref()
    }

    /// Owned copy of the current session for readers outside the engine.
    pub fn snapshot(&self) -> Option<GameSession<T>> {
        self.session.clone()
    }

    pub fn score(&self) -> Score {
        self.session.as_ref().map_or(0, GameSession::score)
    }

    /// Turn that is waiting to be flipped back, if any.
    pub fn pending_reversal(&self) -> Option<ReversalTicket> {
        match *self.session.as_ref()?.pending_flips.as_slice() {
            [first, second] => Some(ReversalTicket {
                generation: self.generation,
                first,
                second,
            }),
            _ => None,
        }
    }

    pub fn can_flip(&self, index: CardIndex) -> bool {
        self.state().accepts_flips()
            && self
                .session
                .as_ref()
                .is_some_and(|session| session.can_flip(index))
    }

    /// Starts a session on freshly dealt `cards`, discarding any current one.
    pub fn start(&mut self, cards: Vec<Card<T>>) -> Result<Generation> {
        self.config.validate()?;

        let expected = self.config.total_cards();
        if cards.len() != usize::from(expected) {
            return Err(BoardIssue::CardCount {
                expected,
                actual: cards.len(),
            }
            .into());
        }
        for card in &cards {
            let copies = cards
                .iter()
                .filter(|other| other.pair_token() == card.pair_token())
                .count();
            if copies != 2 {
                return Err(BoardIssue::UnpairedLayout.into());
            }
        }

        let cards = cards
            .into_iter()
            .map(|card| Card::new(card.id(), card.pair_token().clone()))
            .collect();
        self.generation += 1;
        self.session = Some(GameSession::new(self.config, cards));
        log::debug!(
            "Session {} started on {}x{} board",
            self.generation,
            self.config.rows,
            self.config.cols
        );
        Ok(self.generation)
    }

    /// Discards the current session, any outstanding ticket becomes stale.
    pub fn reset(&mut self) -> Generation {
        self.generation += 1;
        if let Some(session) = self.session.take() {
            log::debug!(
                "Session discarded with score {}, now at generation {}",
                session.score,
                self.generation
            );
        }
        self.generation
    }

    /// Discards the current session and switches to another board shape.
    pub fn reset_with(&mut self, config: BoardConfig) -> Generation {
        self.config = config;
        self.reset()
    }

    pub fn flip(&mut self, index: CardIndex) -> FlipOutcome<T> {
        let generation = self.generation;
        let Some(session) = self.session.as_mut() else {
            log::trace!("Ignored flip of {}, no board dealt", index);
            return FlipOutcome::NoChange;
        };

        if !session.can_flip(index) {
            log::trace!("Ignored flip of {}", index);
            return FlipOutcome::NoChange;
        }

        session.cards[index.to_usize_index()].set_flipped(true);
        session.pending_flips.push(index);

        let pending = session.pending_flips.clone();
        match *pending.as_slice() {
            [first] => FlipOutcome::Revealed(first),
            [first, second] => session.resolve_turn(first, second, generation),
            _ => FlipOutcome::NoChange,
        }
    }

    /// Turns a mismatched pair back face down, if `ticket` still refers to the current turn.
    pub fn reverse(&mut self, ticket: ReversalTicket) -> ReversalOutcome {
        if ticket.generation != self.generation {
            log::trace!(
                "Ignored reversal from generation {}, now at {}",
                ticket.generation,
                self.generation
            );
            return ReversalOutcome::Stale;
        }

        let Some(session) = self.session.as_mut() else {
            return ReversalOutcome::Stale;
        };
        if session.pending_flips.as_slice() != [ticket.first, ticket.second] {
            return ReversalOutcome::Stale;
        }

        for index in [ticket.first, ticket.second] {
            session.cards[index.to_usize_index()].set_flipped(false);
        }
        session.pending_flips.clear();
        ReversalOutcome::Reversed {
            first: ticket.first,
            second: ticket.second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(layout: &[&'static str]) -> FlipEngine<&'static str> {
        let config = BoardConfig::new_unchecked(2, (layout.len() / 2) as Dim);
        let mut engine = FlipEngine::new(config);
        engine.start(deal_layout(layout, config).unwrap()).unwrap();
        engine
    }

    fn session<'a>(engine: &'a FlipEngine<&'static str>) -> &'a GameSession<&'static str> {
        engine.session().unwrap()
    }

    #[test]
    fn mismatch_blocks_flips_until_reversed() {
        let mut engine = engine_with(&["A", "B", "A", "B"]);

        assert_eq!(engine.flip(0), FlipOutcome::Revealed(0));
        let FlipOutcome::Mismatched(ticket) = engine.flip(1) else {
            panic!("expected a mismatch");
        };
        assert_eq!(engine.state(), EngineState::PendingResolution);
        assert!(!engine.state().accepts_flips());
        assert!(!engine.can_flip(2));
        assert_eq!(engine.pending_reversal(), Some(ticket));

        assert_eq!(engine.flip(2), FlipOutcome::NoChange);
        assert!(!session(&engine).cards()[2].is_flipped());
        assert_eq!(session(&engine).score(), 0);

        assert_eq!(
            engine.reverse(ticket),
            ReversalOutcome::Reversed {
                first: 0,
                second: 1
            }
        );
        assert!(!session(&engine).cards()[0].is_flipped());
        assert!(!session(&engine).cards()[1].is_flipped());
        assert!(session(&engine).pending_flips().is_empty());
        assert_eq!(engine.state(), EngineState::AwaitingInput);

        assert_eq!(engine.flip(2), FlipOutcome::Revealed(2));
    }

    #[test]
    fn matching_every_pair_completes_once() {
        let mut engine = engine_with(&["A", "A", "B", "B"]);

        assert_eq!(engine.flip(0), FlipOutcome::Revealed(0));
        assert_eq!(
            engine.flip(1),
            FlipOutcome::Matched {
                pair_token: "A",
                score: 1
            }
        );
        assert_eq!(session(&engine).matched_pair_count(), 1);
        assert_eq!(session(&engine).status(), SessionStatus::InProgress);
        assert!(session(&engine).cards()[0].is_face_up());
        assert!(!session(&engine).cards()[2].is_face_up());

        engine.flip(2);
        let last = engine.flip(3);
        assert_eq!(last.pair_token(), Some(&"B"));
        assert_eq!(
            last,
            FlipOutcome::Completed {
                pair_token: "B",
                score: 2
            }
        );
        assert_eq!(session(&engine).matched_pair_count(), 2);
        assert_eq!(engine.state(), EngineState::Completed);
        assert!(engine.state().is_finished());
        assert!(!engine.state().accepts_flips());
        assert_eq!(FlipOutcome::<&str>::Revealed(0).pair_token(), None);

        for index in 0..4 {
            assert_eq!(engine.flip(index), FlipOutcome::NoChange);
        }
        assert_eq!(engine.score(), 2);
    }

    #[test]
    fn flipping_face_up_or_matched_cards_changes_nothing() {
        let mut engine = engine_with(&["A", "A", "B", "B"]);
        engine.flip(0);
        engine.flip(1);
        engine.flip(2);
        let before = engine.snapshot();

        assert_eq!(engine.flip(0), FlipOutcome::NoChange);
        assert_eq!(engine.flip(1), FlipOutcome::NoChange);
        assert_eq!(engine.flip(2), FlipOutcome::NoChange);
        assert_eq!(engine.flip(9), FlipOutcome::NoChange);
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn flips_before_dealing_are_ignored() {
        let mut engine: FlipEngine<&str> = FlipEngine::new(BoardConfig::new_unchecked(2, 2));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.flip(0), FlipOutcome::NoChange);
        assert!(engine.snapshot().is_none());
    }

    #[test]
    fn ticket_from_discarded_session_is_stale() {
        let mut engine = engine_with(&["A", "B", "A", "B"]);
        engine.flip(0);
        let FlipOutcome::Mismatched(ticket) = engine.flip(1) else {
            panic!("expected a mismatch");
        };

        engine.reset();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.reverse(ticket), ReversalOutcome::Stale);

        let config = engine.config();
        engine
            .start(deal_layout(&["B", "A", "B", "A"], config).unwrap())
            .unwrap();
        engine.flip(0);
        engine.flip(1);
        assert_eq!(engine.reverse(ticket), ReversalOutcome::Stale);
        assert!(session(&engine).cards()[0].is_flipped());
        assert_eq!(session(&engine).pending_flips(), &[0, 1]);
    }

    #[test]
    fn start_rejects_boards_of_the_wrong_shape() {
        let mut engine: FlipEngine<&str> = FlipEngine::new(BoardConfig::new_unchecked(2, 2));
        let cards = deal_layout(&["A", "A"], BoardConfig::new_unchecked(1, 2)).unwrap();
        assert_eq!(
            engine.start(cards),
            Err(GameError::from(BoardIssue::CardCount {
                expected: 4,
                actual: 2
            }))
        );
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn score_only_grows_by_one_per_match() {
        let config = Difficulty::Hard.board_config();
        let faces: Vec<u8> = (0..config.pairs_needed() as u8).collect();
        let cards = ShuffledBoardGenerator::from_seed(5)
            .generate(&faces, config)
            .unwrap();
        let tokens: Vec<u8> = cards.iter().map(|card| *card.pair_token()).collect();
        let mut engine = FlipEngine::new(config);
        engine.start(cards).unwrap();

        let mut completions = 0;
        let mut last_score = 0;
        for face in faces {
            let mut halves = tokens
                .iter()
                .enumerate()
                .filter(|&(_, &token)| token == face)
                .map(|(i, _)| i as CardIndex);
            let (first, second) = (halves.next().unwrap(), halves.next().unwrap());

            // a wrong guess first, whenever another face is still hidden
            let decoy = (0..config.total_cards()).find(|&i| {
                i != first && i != second && engine.can_flip(i)
            });
            if let Some(decoy) = decoy {
                engine.flip(first);
                if let FlipOutcome::Mismatched(ticket) = engine.flip(decoy) {
                    assert_eq!(engine.score(), last_score);
                    engine.reverse(ticket);
                }
            }

            engine.flip(first);
            match engine.flip(second) {
                FlipOutcome::Matched { score, .. } => assert_eq!(score, last_score + 1),
                FlipOutcome::Completed { score, .. } => {
                    assert_eq!(score, last_score + 1);
                    completions += 1;
                }
                other => panic!("expected a match, got {:?}", other),
            }
            last_score = engine.score();
        }

        assert_eq!(completions, 1);
        assert_eq!(engine.score(), Score::from(config.pairs_needed()));
        assert_eq!(engine.state(), EngineState::Completed);
    }
}
