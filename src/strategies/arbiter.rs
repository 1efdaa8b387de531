use log::*;

use crate::{
    engine::GameState,
    proto::{
        Error,
        ErrorCode,
    },
};

use super::{
    Proposal,
    Strategy,
    StrategyConfig,
    StrategyType,
};

pub struct StrategyDescriptor {
    pub strategy: Box<dyn Strategy>,
    pub weight: f64,
}

impl StrategyDescriptor {
    pub fn new(strategy: Box<dyn Strategy>, weight: f64) -> Self {
        Self { strategy, weight }
    }
}

/// The outcome of a card decision.
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub strategy: String,
    pub weighted_score: f64,
    pub proposal: Proposal,
}

/// Asks every registered strategy for a proposal and keeps the best weighted one.
pub struct Arbiter {
    strategies: Vec<StrategyDescriptor>,
}

impl Arbiter {
    pub fn new(strategies: Vec<StrategyDescriptor>) -> Self {
        Self { strategies }
    }

    /// Registers every built-in strategy with the configured weights.
    pub fn from_config(config: &StrategyConfig) -> Self {
        Self::new(
            StrategyType::VALUES
                .iter()
                .map(|t| StrategyDescriptor::new(t.create_strategy(config), config.get_weight(*t)))
                .collect(),
        )
    }

    pub fn get_strategies(&self) -> &[StrategyDescriptor] {
        &self.strategies
    }

    /// Picks the proposal with the strictly greatest weighted score. On ties
    /// the earliest registered strategy wins.
    pub fn choose_card(&mut self, state: &GameState) -> Result<Choice, Error> {
        if state.get_hand().is_empty() {
            return Err(Error::new(
                ErrorCode::PreconditionViolation,
                "Asked for a card but the hand is empty",
            ));
        }

        let mut best: Option<Choice> = None;
        for descriptor in self.strategies.iter_mut() {
            let proposal = descriptor.strategy.propose(state);
            let weighted_score = proposal.score * descriptor.weight;
            debug!(
                "{} (weight {}): {} -> {:.3}",
                descriptor.strategy.get_name(),
                descriptor.weight,
                proposal,
                weighted_score
            );
            // a NaN score never wins against a real one
            let better = match &best {
                Some(b) => {
                    weighted_score > b.weighted_score
                        || (b.weighted_score.is_nan() && !weighted_score.is_nan())
                }
                None => true,
            };
            if better {
                best = Some(Choice {
                    strategy: descriptor.strategy.get_name().to_string(),
                    weighted_score,
                    proposal,
                });
            }
        }

        best.ok_or_else(|| Error::new(ErrorCode::PreconditionViolation, "No strategy is registered"))
    }
}
