use std::fmt::Display;

/// A card is identified by its face value in `[1, deck_size]`.
pub type Card = u32;

pub const DECK_SIZE: u32 = 104;
pub const HAND_SIZE: u32 = 10;
pub const STARTING_POINTS: i32 = 66;

/// Parameters of a single game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub deck_size: u32,
    /// Number of cards dealt to every player at the start of each hand.
    pub hand_size: u32,
    /// Points a player holds until the server reports real scores.
    pub starting_points: i32,
}

impl GameConfig {
    pub fn deck_mean(&self) -> f64 {
        (self.deck_size as f64 + 1.0) / 2.0
    }

    pub fn contains(&self, card: Card) -> bool {
        (1..=self.deck_size).contains(&card)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            deck_size: DECK_SIZE,
            hand_size: HAND_SIZE,
            starting_points: STARTING_POINTS,
        }
    }
}

impl Display for GameConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GameConfig(deck: {}, hand: {}, points: {})",
            self.deck_size, self.hand_size, self.starting_points
        )
    }
}

pub fn format_cards<'a>(cards: impl IntoIterator<Item = &'a Card>) -> String {
    use itertools::Itertools;
    cards.into_iter().join(", ")
}
