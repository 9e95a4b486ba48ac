use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pairmatch_core::*;
use pairmatch_protocol::*;
use pairmatch_runtime::*;
use std::sync::Arc;

struct Letters;

#[async_trait]
impl ImageSupplier for Letters {
    async fn acquire_faces(
        &self,
        count: usize,
    ) -> std::result::Result<Vec<FaceToken>, AcquireError> {
        Ok(('A'..='Z')
            .take(count)
            .map(|c| FaceToken::new(c.to_string()))
            .collect())
    }
}

fn t0() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(0).unwrap()
}

/// Plays the dealt board to the end, pairing each card with its twin.
fn play_to_completion(driver: &mut SessionDriver) -> Score {
    let session = driver.snapshot().unwrap();
    let cards = session.cards();
    for (i, card) in cards.iter().enumerate() {
        if driver.snapshot().unwrap().cards()[i].is_matched() {
            continue;
        }
        let twin = cards
            .iter()
            .enumerate()
            .position(|(j, other)| j != i && other.pair_token() == card.pair_token())
            .unwrap();
        driver.flip(i as CardIndex);
        driver.flip(twin as CardIndex);
    }
    assert_eq!(driver.state(), EngineState::Completed);
    driver.engine().score()
}

#[tokio::test(start_paused = true)]
async fn finished_session_beats_the_stored_high_score() {
    let previous = HighScoreRecord::new(Initials::new("OLD").unwrap(), 3, t0());
    let gateway = Arc::new(
        MemoryGateway::new().with_entry(HighScoreRecord::KEY, previous.to_json().unwrap()),
    );
    let settings = SessionSettings::default();
    let config = BoardConfig::new(2, 5).unwrap();

    let loader = FaceLoader::new(gateway.clone(), Arc::new(Letters), &settings);
    let loaded = loader.load(config).await.unwrap();
    assert_eq!(loaded.origin, FaceOrigin::Acquired);
    assert_eq!(loaded.faces.len(), 5);

    let (mut driver, mut events) = SessionDriver::new(config, settings, Arc::new(NoFeedback));
    driver
        .deal(loaded.faces, ShuffledBoardGenerator::from_seed(11))
        .unwrap();
    let score = play_to_completion(&mut driver);
    assert_eq!(score, 5);

    let mut completions = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let GameEvent::GameCompleted(score) = event {
            completions.push(score);
        }
    }
    assert_eq!(completions, [5]);

    let mut tracker = ScoreTracker::new(gateway.clone());
    assert!(tracker.on_game_completed(score).await.unwrap());
    let outcome = tracker
        .commit_at(score, Initials::new("ABC").unwrap(), t0())
        .await
        .unwrap();
    assert!(matches!(outcome, CommitOutcome::Saved(_)));

    let stored = HighScoreRecord::from_stored(gateway.entry(HighScoreRecord::KEY)).unwrap();
    assert_eq!(stored.score, 5);
    assert_eq!(stored.initials.as_str(), "ABC");
}

#[tokio::test(start_paused = true)]
async fn second_session_reuses_saved_faces() {
    let gateway = Arc::new(MemoryGateway::new());
    let settings = SessionSettings::default();
    let config = Difficulty::Medium.board_config();
    let loader = FaceLoader::new(gateway.clone(), Arc::new(Letters), &settings);

    let first = loader.load(config).await.unwrap();
    let second = loader.load(config).await.unwrap();

    assert_eq!(first.origin, FaceOrigin::Acquired);
    assert_eq!(second.origin, FaceOrigin::Stored);
    assert_eq!(first.faces, second.faces);
}

#[tokio::test(start_paused = true)]
async fn mismatches_never_score_and_restart_reshuffles() {
    let gateway = Arc::new(MemoryGateway::new());
    let settings = SessionSettings::default();
    let config = Difficulty::Medium.board_config();
    let faces = FaceLoader::new(gateway, Arc::new(Letters), &settings)
        .load(config)
        .await
        .unwrap()
        .faces;

    let (mut driver, _events) = SessionDriver::new(config, settings, Arc::new(NoFeedback));
    let first_generation = driver
        .deal(faces, ShuffledBoardGenerator::from_seed(3))
        .unwrap();

    let cards = driver.snapshot().unwrap().cards().to_vec();
    let (a, b) = (0..cards.len())
        .flat_map(|i| (i + 1..cards.len()).map(move |j| (i, j)))
        .find(|&(i, j)| cards[i].pair_token() != cards[j].pair_token())
        .unwrap();

    driver.flip(a as CardIndex);
    assert!(matches!(
        driver.flip(b as CardIndex),
        FlipOutcome::Mismatched(_)
    ));
    assert_eq!(driver.engine().score(), 0);
    assert_eq!(
        driver.settle().await,
        Some(ReversalOutcome::Reversed {
            first: a as CardIndex,
            second: b as CardIndex
        })
    );
    assert_eq!(driver.engine().score(), 0);

    let second_generation = driver
        .restart(ShuffledBoardGenerator::from_seed(4))
        .unwrap();
    assert!(second_generation > first_generation);
    assert_eq!(driver.state(), EngineState::AwaitingInput);
    assert_eq!(play_to_completion(&mut driver), 8);
}
