use log::*;

use crate::engine::{
    find_landing_stack,
    GameState,
};

use super::{
    Proposal,
    Strategy,
};

/// Card count assumed when no stack top is below our highest card. Such a
/// card can't land anywhere and forces us to take a stack, so the assumed
/// count is large enough to push the score well below the random floor.
pub const DEFAULT_FALLBACK_COUNT: u32 = 10;

/// Plays the highest card, which usually goes on top of a stack instead of
/// taking one. Gets less attractive the more cards the landing stack holds.
pub struct HighestStrategy {
    fallback_count: u32,
}

impl HighestStrategy {
    pub fn new(fallback_count: u32) -> Self {
        HighestStrategy { fallback_count }
    }
}

impl Default for HighestStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_FALLBACK_COUNT)
    }
}

impl Strategy for HighestStrategy {
    fn get_name(&self) -> &str {
        "highest"
    }

    fn propose(&mut self, state: &GameState) -> Proposal {
        let my_highest = state.get_hand().iter().next_back().copied().unwrap_or_default();

        let count = match find_landing_stack(state.get_stacks(), my_highest) {
            Some((index, stack)) => {
                debug!("highest: {} would land on stack {} {}", my_highest, index + 1, stack);
                stack.card_count
            }
            None => {
                debug!(
                    "highest: no stack below {}, assuming {} cards",
                    my_highest, self.fallback_count
                );
                self.fallback_count
            }
        };

        Proposal {
            score: 50.0 - 15.0 * (count as f64 - 1.0),
            card: my_highest,
            rationale: String::from("Playing highest, as it seems unlikely to take a stack."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        GameConfig,
        Stack,
    };

    fn new_test_state(hand: &[u32], stacks: Vec<Stack>) -> GameState {
        let mut state = GameState::new(GameConfig::default());
        state.new_hand(hand).unwrap();
        state.update_stacks(stacks);
        state
    }

    #[test]
    fn test_score_follows_landing_stack() {
        let stacks = vec![
            Stack::new(4, 9, 20),
            Stack::new(2, 3, 70),
            Stack::new(1, 1, 95),
        ];
        let state = new_test_state(&[5, 80], stacks.clone());
        let proposal = HighestStrategy::default().propose(&state);
        assert_eq!(80, proposal.card);
        // lands on the 70 stack holding 2 cards
        assert_eq!(35.0, proposal.score);

        let state = new_test_state(&[5, 60], stacks.clone());
        let proposal = HighestStrategy::default().propose(&state);
        assert_eq!(60, proposal.card);
        assert_eq!(5.0, proposal.score);

        let state = new_test_state(&[5, 99], stacks);
        assert_eq!(50.0, HighestStrategy::default().propose(&state).score);
    }

    #[test]
    fn test_fallback_without_landing_stack() {
        let stacks = vec![Stack::new(1, 1, 50), Stack::new(1, 1, 60)];
        let state = new_test_state(&[5, 10], stacks);

        let proposal = HighestStrategy::default().propose(&state);
        assert_eq!(10, proposal.card);
        assert_eq!(-85.0, proposal.score);

        let proposal = HighestStrategy::new(1).propose(&state);
        assert_eq!(50.0, proposal.score);
    }
}
