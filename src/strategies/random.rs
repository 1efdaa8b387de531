use log::*;
use rand::seq::IteratorRandom;
use rand_mt::Mt64;

use crate::engine::GameState;

use super::{
    Proposal,
    Strategy,
};

pub const RANDOM_SCORE: f64 = 10.0;

/// Plays any card. Its fixed score is the floor other strategies have to beat.
pub struct RandomStrategy {
    rng: Mt64,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        RandomStrategy {
            rng: Mt64::new(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn get_name(&self) -> &str {
        "random"
    }

    fn propose(&mut self, state: &GameState) -> Proposal {
        let card = state
            .get_hand()
            .iter()
            .copied()
            .choose(&mut self.rng)
            .unwrap_or_default();
        debug!("Random pick: {}", card);
        Proposal {
            score: RANDOM_SCORE,
            card,
            rationale: String::from("yolo"),
        }
    }
}
