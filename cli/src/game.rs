use anyhow::Context;
use pairmatch_core::*;
use pairmatch_protocol::{FaceToken, HighScoreRecord, Initials};
use pairmatch_runtime::{CommitOutcome, GameEvent, ScoreTracker, SessionDriver};
use rand::Rng;
use rand::rngs::SmallRng;
use std::io::Write;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::input::Input;
use crate::render::render_board;

const HELP: &str = "\
commands:
  <row> <col>  flip a card, e.g. `2 3`
  n            new board with the same faces
  b            show the best score
  q            quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Zero-based position.
    Flip(Pos2),
    Restart,
    Best,
    Help,
    Quit,
}

impl Command {
    /// Parses a line typed by the player; positions are entered 1-based.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "n" | "new" => return Some(Self::Restart),
            "b" | "best" => return Some(Self::Best),
            "h" | "help" | "?" => return Some(Self::Help),
            "q" | "quit" | "exit" => return Some(Self::Quit),
            _ => {}
        }
        let mut parts = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty());
        let row: Dim = parts.next()?.parse().ok()?;
        let col: Dim = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::Flip((row.checked_sub(1)?, col.checked_sub(1)?)))
    }
}

pub struct Game {
    driver: SessionDriver,
    events: UnboundedReceiver<GameEvent>,
    tracker: ScoreTracker,
    input: Input,
    initials: Option<Initials>,
    seeds: SmallRng,
}

impl Game {
    pub fn new(
        driver: SessionDriver,
        events: UnboundedReceiver<GameEvent>,
        tracker: ScoreTracker,
        input: Input,
        initials: Option<Initials>,
        seeds: SmallRng,
    ) -> Self {
        Self {
            driver,
            events,
            tracker,
            input,
            initials,
            seeds,
        }
    }

    fn generator(&mut self) -> ShuffledBoardGenerator<SmallRng> {
        ShuffledBoardGenerator::from_seed(self.seeds.random())
    }

    pub async fn run(mut self, faces: Vec<FaceToken>) -> anyhow::Result<()> {
        let generator = self.generator();
        self.driver
            .deal(faces, generator)
            .context("Could not deal the board")?;
        match self.tracker.refresh().await {
            Ok(best) => show_best(best),
            Err(err) => log::warn!("Could not read the high score: {}", err),
        }
        println!("{HELP}");
        self.handle_events().await?;

        loop {
            tokio::select! {
                ticket = self.driver.next_reversal() => {
                    self.driver.apply_reversal(ticket);
                }
                line = self.input.line() => {
                    let Some(line) = line.context("Could not read input")? else {
                        break;
                    };
                    if !self.handle_line(&line).await? {
                        break;
                    }
                }
            }
            self.handle_events().await?;
        }
        Ok(())
    }

    /// Returns `false` once the player wants out.
    async fn handle_line(&mut self, line: &str) -> anyhow::Result<bool> {
        if line.is_empty() {
            return Ok(true);
        }
        match Command::parse(line) {
            Some(Command::Flip(pos)) => self.flip(pos),
            Some(Command::Restart) => {
                let generator = self.generator();
                self.driver.restart(generator)?;
            }
            Some(Command::Best) => match self.tracker.refresh().await {
                Ok(best) => show_best(best),
                Err(err) if err.is_recoverable() => {
                    println!("Could not read the high score: {err}")
                }
                Err(err) => return Err(err.into()),
            },
            Some(Command::Help) => println!("{HELP}"),
            Some(Command::Quit) => return Ok(false),
            None => println!("Unknown command {line:?}, type h for help"),
        }
        Ok(true)
    }

    fn flip(&mut self, pos: Pos2) {
        let config = self.driver.config();
        let Some(index) = config.index_of(pos) else {
            println!(
                "No card at {} {}, the board is {}x{}",
                pos.0 + 1,
                pos.1 + 1,
                config.rows,
                config.cols
            );
            return;
        };
        if !self.driver.flip(index).has_update() {
            let state = self.driver.state();
            if state.is_finished() {
                println!("Board is done, type n for a new one");
            } else if !state.accepts_flips() {
                println!("Wait for the cards to turn back");
            } else {
                println!("That card is already face up");
            }
        }
    }

    async fn handle_events(&mut self) -> anyhow::Result<()> {
        let mut redraw = false;
        while let Ok(event) = self.events.try_recv() {
            redraw = true;
            match event {
                GameEvent::SessionStarted { generation, config } => {
                    log::debug!("Board {} dealt as {:?}", generation, config);
                    println!("New {}x{} board", config.rows, config.cols);
                }
                GameEvent::MatchFound(face) => println!("Match: {face}"),
                GameEvent::Mismatch { .. } => println!("No match"),
                GameEvent::GameCompleted(score) => {
                    if let Some(session) = self.driver.engine().session() {
                        println!("{}", render_board(session));
                    }
                    redraw = false;
                    self.finish(score).await?;
                }
                GameEvent::CardRevealed(_) | GameEvent::CardsHidden { .. } => {}
            }
        }
        if redraw {
            if let Some(session) = self.driver.engine().session() {
                println!("{}", render_board(session));
            }
        }
        Ok(())
    }

    async fn finish(&mut self, score: Score) -> anyhow::Result<()> {
        println!("All pairs found with a score of {score}");
        match self.tracker.on_game_completed(score).await {
            Ok(true) => {
                if !self.ask_save().await? {
                    println!("High score not saved");
                } else {
                    let initials = match self.initials.clone() {
                        Some(initials) => initials,
                        None => self.ask_initials().await?,
                    };
                    match self.tracker.commit(score, initials).await {
                        Ok(CommitOutcome::Saved(record)) => {
                            println!("New high score: {} by {}", record.score, record.initials)
                        }
                        Ok(CommitOutcome::NotBest { best }) => show_best(Some(&best)),
                        Err(err) if err.is_recoverable() => {
                            println!("Could not save the high score: {err}")
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
            Ok(false) => show_best(self.tracker.best()),
            Err(err) if err.is_recoverable() => println!("Could not read the high score: {err}"),
            Err(err) => return Err(err.into()),
        }
        println!("Type n for a new board or q to quit");
        Ok(())
    }

    /// Closed input counts as a no.
    async fn ask_save(&self) -> anyhow::Result<bool> {
        loop {
            print!("New high score! Save it? [Y/n]: ");
            let _ = std::io::stdout().flush();
            let Some(line) = self.input.line().await? else {
                return Ok(false);
            };
            match parse_yes_no(&line) {
                Some(save) => return Ok(save),
                None => println!("Please answer y or n"),
            }
        }
    }

    async fn ask_initials(&self) -> anyhow::Result<Initials> {
        loop {
            print!("Your initials (up to {}): ", Initials::MAX_LEN);
            let _ = std::io::stdout().flush();
            let Some(line) = self.input.line().await? else {
                return Ok(Initials::default());
            };
            match Initials::new(&line) {
                Ok(initials) => return Ok(initials),
                Err(err) => println!("{err}"),
            }
        }
    }
}

/// Empty answers take the default, yes.
fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn show_best(best: Option<&HighScoreRecord>) {
    match best {
        Some(record) => println!(
            "Best score: {} by {} on {}",
            record.score,
            record.initials,
            record.achieved_at.format("%Y-%m-%d")
        ),
        None => println!("No high score yet"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairmatch_protocol::StorageKey;
    use pairmatch_runtime::{MemoryGateway, NoFeedback, SessionSettings};
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("1 1"), Some(Command::Flip((0, 0))));
        assert_eq!(Command::parse(" 2,3 "), Some(Command::Flip((1, 2))));
        assert_eq!(Command::parse("N"), Some(Command::Restart));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("0 1"), None);
        assert_eq!(Command::parse("1 2 3"), None);
        assert_eq!(Command::parse("flip"), None);
    }

    #[test]
    fn yes_is_the_default_answer() {
        assert_eq!(parse_yes_no(""), Some(true));
        assert_eq!(parse_yes_no(" Y "), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    /// Clears a 2x2 board in order, then feeds `answers` to the prompts that follow.
    async fn play_scripted(gateway: Arc<MemoryGateway>, answers: &[&str]) -> anyhow::Result<()> {
        let config = BoardConfig::new_unchecked(2, 2);
        let faces: Vec<FaceToken> = vec!["A".into(), "B".into()];

        // find where the seeded shuffle puts the twins
        let mut seeds = SmallRng::seed_from_u64(5);
        let cards = ShuffledBoardGenerator::from_seed(seeds.random())
            .generate(&faces, config)
            .unwrap();
        let twin = (1..4)
            .find(|&i| cards[i].pair_token() == cards[0].pair_token())
            .unwrap();
        let rest: Vec<usize> = (1..4).filter(|&i| i != twin).collect();
        let cmd = |i: usize| format!("{} {}\n", i / 2 + 1, i % 2 + 1);
        let mut script = [cmd(0), cmd(twin), cmd(rest[0]), cmd(rest[1])].concat();
        for answer in answers {
            script.push_str(answer);
            script.push('\n');
        }
        script.push_str("q\n");

        let (driver, events) =
            SessionDriver::new(config, SessionSettings::default(), Arc::new(NoFeedback));
        let game = Game::new(
            driver,
            events,
            ScoreTracker::new(gateway.clone()),
            Input::from_reader(std::io::Cursor::new(script.into_bytes())),
            None,
            SmallRng::seed_from_u64(5),
        );
        game.run(faces).await
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_game_records_the_high_score() {
        let gateway = Arc::new(MemoryGateway::new());
        play_scripted(gateway.clone(), &["y", "ab"]).await.unwrap();

        let mut tracker = ScoreTracker::new(gateway);
        let best = tracker.refresh().await.unwrap().unwrap();
        assert_eq!(best.score, 2);
        assert_eq!(best.initials.as_str(), "AB");
    }

    #[tokio::test(start_paused = true)]
    async fn declined_high_score_is_not_saved() {
        let gateway = Arc::new(MemoryGateway::new());
        play_scripted(gateway.clone(), &["n"]).await.unwrap();

        let mut tracker = ScoreTracker::new(gateway);
        assert_eq!(tracker.refresh().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_store_does_not_end_the_game() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway.set_fail_reads(true);

        play_scripted(gateway.clone(), &["b"]).await.unwrap();

        assert!(gateway.entry(HighScoreRecord::KEY).is_none());
    }
}
