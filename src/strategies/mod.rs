pub mod arbiter;
pub mod highest;
pub mod lowest;
pub mod random;
pub mod stack;

use std::{
    collections::HashMap,
    fmt::Display,
};

use crate::engine::{
    Card,
    GameState,
};

pub use arbiter::{
    Arbiter,
    StrategyDescriptor,
};

/// A candidate play produced by a strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub score: f64,
    pub card: Card,
    pub rationale: String,
}

impl Display for Proposal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Proposal(card: {}, score: {:.3}, why: {})",
            self.card, self.score, self.rationale
        )
    }
}

/// The base trait for all card choosing heuristics.
pub trait Strategy {
    fn get_name(&self) -> &str;

    /// Scores the strategy's favourite card in the current state.
    /// Callers guarantee that our hand is not empty.
    fn propose(&mut self, state: &GameState) -> Proposal;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyType {
    Random,
    Lowest,
    Highest,
}

impl StrategyType {
    /// Every built-in strategy in registration order.
    pub const VALUES: [StrategyType; 3] = [
        StrategyType::Random,
        StrategyType::Lowest,
        StrategyType::Highest,
    ];

    pub fn get_name(&self) -> &'static str {
        match self {
            StrategyType::Random => "random",
            StrategyType::Lowest => "lowest",
            StrategyType::Highest => "highest",
        }
    }

    pub fn from_name(name: &str) -> Option<StrategyType> {
        Self::VALUES.into_iter().find(|t| t.get_name() == name)
    }

    pub fn create_strategy(&self, config: &StrategyConfig) -> Box<dyn Strategy> {
        match self {
            StrategyType::Random => Box::new(random::RandomStrategy::new(config.seed)),
            StrategyType::Lowest => Box::new(lowest::LowestStrategy::new()),
            StrategyType::Highest => Box::new(highest::HighestStrategy::new(
                config.highest_fallback_count,
            )),
        }
    }
}

impl Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Clone, Debug)]
pub struct StrategyConfig {
    /// Weight overrides keyed by strategy name. Missing strategies get `DEFAULT_WEIGHT`.
    pub weights: HashMap<String, f64>,

    pub seed: u64,

    /// Card count assumed for the landing stack when the highest card has no
    /// stack below it. See `highest::HighestStrategy`.
    pub highest_fallback_count: u32,
}

impl StrategyConfig {
    pub fn get_weight(&self, strategy_type: StrategyType) -> f64 {
        self.weights
            .get(strategy_type.get_name())
            .copied()
            .unwrap_or(DEFAULT_WEIGHT)
    }

    /// Names in `weights` that match no built-in strategy.
    pub fn unknown_weight_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .weights
            .keys()
            .map(|k| k.as_str())
            .filter(|k| StrategyType::from_name(k).is_none())
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            weights: HashMap::new(),
            seed: 0x42,
            highest_fallback_count: highest::DEFAULT_FALLBACK_COUNT,
        }
    }
}

/// Parses `name=weight[,name=weight...]`.
pub fn parse_weights(s: &str) -> Result<HashMap<String, f64>, String> {
    let mut weights = HashMap::new();
    for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, weight) = entry
            .split_once('=')
            .ok_or_else(|| format!("Expected <name>=<weight> but: {}", entry))?;
        let weight: f64 = weight
            .trim()
            .parse()
            .map_err(|e| format!("Invalid weight for {}: {}", name, e))?;
        if !weight.is_finite() {
            return Err(format!("Weight for {} must be a finite number but: {}", name, weight));
        }
        weights.insert(name.trim().to_string(), weight);
    }
    Ok(weights)
}
