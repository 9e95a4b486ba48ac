use pairmatch_core::*;
use pairmatch_protocol::FaceToken;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{FeedbackService, Result, SessionSettings};

/// What a presentation layer hears about while a board is played.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    SessionStarted {
        generation: Generation,
        config: BoardConfig,
    },
    CardRevealed(CardIndex),
    MatchFound(FaceToken),
    Mismatch {
        first: CardIndex,
        second: CardIndex,
    },
    CardsHidden {
        first: CardIndex,
        second: CardIndex,
    },
    GameCompleted(Score),
}

/// Drives a [`FlipEngine`] on the current tokio runtime.
///
/// Mismatches are turned back down by a one-shot timer task that posts its ticket to an internal
/// queue; the owner drains it with [`next_reversal`](Self::next_reversal) and hands tickets back
/// through [`apply_reversal`](Self::apply_reversal), so every mutation runs on the owner's task.
/// Flipping must happen inside a runtime since it may spawn that timer.
pub struct SessionDriver {
    engine: FlipEngine<FaceToken>,
    settings: SessionSettings,
    feedback: Arc<dyn FeedbackService>,
    faces: Vec<FaceToken>,
    events: mpsc::UnboundedSender<GameEvent>,
    timer_tx: mpsc::UnboundedSender<ReversalTicket>,
    timer_rx: mpsc::UnboundedReceiver<ReversalTicket>,
    reversal_timer: Option<JoinHandle<()>>,
}

impl SessionDriver {
    pub fn new(
        config: BoardConfig,
        settings: SessionSettings,
        feedback: Arc<dyn FeedbackService>,
    ) -> (Self, mpsc::UnboundedReceiver<GameEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let driver = Self {
            engine: FlipEngine::new(config),
            settings,
            feedback,
            faces: Vec::new(),
            events,
            timer_tx,
            timer_rx,
            reversal_timer: None,
        };
        (driver, events_rx)
    }

    pub fn engine(&self) -> &FlipEngine<FaceToken> {
        &self.engine
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn config(&self) -> BoardConfig {
        self.engine.config()
    }

    pub fn snapshot(&self) -> Option<GameSession<FaceToken>> {
        self.engine.snapshot()
    }

    pub fn has_pending_reversal(&self) -> bool {
        self.reversal_timer.is_some()
    }

    /// Deals `faces` into a new board, replacing the current session.
    ///
    /// The current session and its reversal timer are left untouched when the faces do not fit
    /// the board.
    pub fn deal<G: BoardGenerator>(
        &mut self,
        faces: Vec<FaceToken>,
        generator: G,
    ) -> Result<Generation> {
        let cards = generator.generate(&faces, self.engine.config())?;
        let generation = self.engine.start(cards)?;
        self.cancel_timer();
        self.faces = faces;
        self.emit(GameEvent::SessionStarted {
            generation,
            config: self.engine.config(),
        });
        Ok(generation)
    }

    /// Deals a fresh shuffle of the faces used by the last board.
    pub fn restart<G: BoardGenerator>(&mut self, generator: G) -> Result<Generation> {
        let faces = self.faces.clone();
        self.deal(faces, generator)
    }

    /// Discards the session; a new board must be dealt before flipping again.
    pub fn reset(&mut self) -> Generation {
        self.cancel_timer();
        self.engine.reset()
    }

    /// Discards the session and switches to another board shape.
    pub fn reconfigure(&mut self, config: BoardConfig) -> Generation {
        self.cancel_timer();
        self.faces.clear();
        self.engine.reset_with(config)
    }

    pub fn flip(&mut self, index: CardIndex) -> FlipOutcome<FaceToken> {
        let outcome = self.engine.flip(index);
        match &outcome {
            FlipOutcome::NoChange => {}
            FlipOutcome::Revealed(index) => self.emit(GameEvent::CardRevealed(*index)),
            FlipOutcome::Matched { pair_token, .. } => {
                self.feedback.on_match();
                self.emit(GameEvent::MatchFound(pair_token.clone()));
            }
            FlipOutcome::Completed { pair_token, score } => {
                self.feedback.on_match();
                self.emit(GameEvent::MatchFound(pair_token.clone()));
                self.emit(GameEvent::GameCompleted(*score));
            }
            FlipOutcome::Mismatched(ticket) => {
                self.feedback.on_mismatch();
                self.emit(GameEvent::Mismatch {
                    first: ticket.first,
                    second: ticket.second,
                });
                self.schedule_reversal(*ticket);
            }
        }
        outcome
    }

    /// Waits for the reversal timer to post its ticket.
    ///
    /// Pending forever while no timer is running, which makes it safe to use as a `select!` arm.
    pub async fn next_reversal(&mut self) -> ReversalTicket {
        loop {
            if let Some(ticket) = self.timer_rx.recv().await {
                return ticket;
            }
        }
    }

    pub fn apply_reversal(&mut self, ticket: ReversalTicket) -> ReversalOutcome {
        let outcome = self.engine.reverse(ticket);
        match outcome {
            ReversalOutcome::Reversed { first, second } => {
                self.reversal_timer = None;
                self.emit(GameEvent::CardsHidden { first, second });
            }
            ReversalOutcome::Stale => {
                log::trace!("Dropped stale reversal {:?}", ticket);
            }
        }
        outcome
    }

    /// Waits for the outstanding reversal, if any, and applies it.
    ///
    /// Tickets left over from an earlier board are dropped on the way.
    pub async fn settle(&mut self) -> Option<ReversalOutcome> {
        while self.has_pending_reversal() {
            let ticket = self.next_reversal().await;
            let outcome = self.apply_reversal(ticket);
            if outcome != ReversalOutcome::Stale {
                return Some(outcome);
            }
        }
        None
    }

    fn schedule_reversal(&mut self, ticket: ReversalTicket) {
        self.cancel_timer();
        let timer_tx = self.timer_tx.clone();
        let delay = self.settings.reversal_delay;
        self.reversal_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // receiver lives as long as the driver
            let _ = timer_tx.send(ticket);
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.reversal_timer.take() {
            handle.abort();
            log::trace!("Cancelled pending reversal");
        }
    }

    fn emit(&self, event: GameEvent) {
        if self.events.send(event).is_err() {
            log::trace!("No one is listening for game events");
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
