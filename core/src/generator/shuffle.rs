use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

/// Generation strategy that pairs every face and deals the deck in a uniformly random order.
///
/// The random source is injected so boards can be replayed from a seed.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledBoardGenerator<R> {
    rng: R,
}

impl<R: Rng> ShuffledBoardGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl ShuffledBoardGenerator<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> BoardGenerator for ShuffledBoardGenerator<R> {
    fn generate<T: Clone + PartialEq>(
        mut self,
        faces: &[T],
        config: BoardConfig,
    ) -> Result<Vec<Card<T>>> {
        validate_faces(faces, config)?;

        let mut deck = paired_deck(faces);
        fisher_yates(&mut deck, &mut self.rng);

        log::debug!(
            "Dealt {}x{} board with {} pairs",
            config.rows,
            config.cols,
            faces.len()
        );
        Ok(deck)
    }
}

/// In-place Fisher–Yates shuffle, every permutation of `items` is equally likely.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
