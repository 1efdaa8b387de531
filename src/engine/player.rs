use std::{
    collections::BTreeSet,
    fmt::Display,
};

use super::game::{
    Card,
    GameConfig,
};

/// Everything we track about a single participant of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    name: String,
    id: String,
    points: i32,
    played: BTreeSet<Card>,
    cards_held: u32,
    hand_avg_est: f64,

    deck_mean: f64,
    hand_size: u32,
}

impl Player {
    /// `index` is the 0-based registration order, which becomes the short id `P<index + 1>`.
    pub fn new(name: &str, index: usize, config: &GameConfig) -> Self {
        let mut player = Self {
            name: name.to_string(),
            id: format!("P{}", index + 1),
            points: config.starting_points,
            played: BTreeSet::new(),
            cards_held: config.hand_size,
            hand_avg_est: 0.0,
            deck_mean: config.deck_mean(),
            hand_size: config.hand_size,
        };
        player.hand_avg_est = player.estimate_hand_avg();
        player
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_id(&self) -> &str {
        &self.id
    }

    pub fn get_points(&self) -> i32 {
        self.points
    }

    pub fn set_points(&mut self, points: i32) {
        self.points = points;
    }

    pub fn get_played(&self) -> &BTreeSet<Card> {
        &self.played
    }

    pub fn get_cards_held(&self) -> u32 {
        self.cards_held
    }

    pub fn get_hand_avg_est(&self) -> f64 {
        self.hand_avg_est
    }

    /// Starts a new hand. Points are kept until the server overwrites them.
    pub fn reset(&mut self) {
        self.played.clear();
        self.cards_held = self.hand_size;
        self.hand_avg_est = self.estimate_hand_avg();
    }

    pub fn play(&mut self, card: Card) {
        self.played.insert(card);
        self.cards_held = self.cards_held.saturating_sub(1);
        self.hand_avg_est = self.estimate_hand_avg();
    }

    /// Estimates the average value of the cards still in hand, assuming the
    /// hand was dealt evenly around the deck mean.
    ///
    /// A strongly skewed initial hand can push the estimate outside the deck
    /// bounds. That is expected and not clamped.
    fn estimate_hand_avg(&self) -> f64 {
        if self.cards_held == 0 {
            return self.deck_mean;
        }
        let played_sum: f64 = self.played.iter().map(|c| *c as f64).sum();
        let expected_sum = self.deck_mean * self.played.len() as f64;
        self.deck_mean + (expected_sum - played_sum) / self.cards_held as f64
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) points: {} held: {} avg: {:.2}",
            self.name, self.id, self.points, self.cards_held, self.hand_avg_est
        )
    }
}
