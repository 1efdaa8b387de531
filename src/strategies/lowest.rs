use log::*;

use crate::engine::GameState;

use super::{
    Proposal,
    Strategy,
};

/// Score for a lowest card that would just land on a stack.
pub const NOT_SPECIAL_SCORE: f64 = -100.0;

// Used while the server hasn't told us about any stack yet.
const NO_STACK_PENALTY: u32 = 99;

/// Plays the lowest card hoping to pick up a cheap stack.
///
/// The score grows when the cheapest stack costs little and when few unseen
/// cards could undercut ours.
pub struct LowestStrategy {}

impl LowestStrategy {
    pub fn new() -> Self {
        LowestStrategy {}
    }
}

impl Default for LowestStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for LowestStrategy {
    fn get_name(&self) -> &str {
        "lowest"
    }

    fn propose(&mut self, state: &GameState) -> Proposal {
        let stacks = state.get_stacks();
        let deck_size = state.get_config().deck_size;

        let cheapest_penalty = stacks
            .iter()
            .map(|s| s.penalty)
            .min()
            .unwrap_or(NO_STACK_PENALTY)
            .max(1);
        // A full stack gets swept by the next card anyway, we don't want to be the one taking it.
        let lowest_eligible_top = stacks
            .iter()
            .filter(|s| !s.is_full())
            .map(|s| s.top_card)
            .min()
            .unwrap_or(deck_size * 2);

        let my_lowest = state.get_hand().iter().next().copied().unwrap_or_default();
        let count_below_mine = state
            .get_cards_at_large()
            .range(..my_lowest)
            .count();
        let opponents = state.get_players().len().saturating_sub(1).max(1);

        let cards_out = state.get_hand().len() as f64 * opponents as f64 / deck_size as f64;
        let score = (10.0 / cheapest_penalty as f64) / ((count_below_mine + 1) as f64 * cards_out);
        trace!(
            "lowest: card {} cheapest {} below {} out {:.3}",
            my_lowest,
            cheapest_penalty,
            count_below_mine,
            cards_out
        );

        if my_lowest > lowest_eligible_top {
            return Proposal {
                score: NOT_SPECIAL_SCORE,
                card: my_lowest,
                rationale: String::from(
                    "Playing lowest card might go on top of a stack. Lowest card is not special.",
                ),
            };
        }
        Proposal {
            score,
            card: my_lowest,
            rationale: String::from(
                "Playing lowest card expecting to take a stack. (High value if card will likely score points this way anyway.)",
            ),
        }
    }
}
