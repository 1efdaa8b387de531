use std::fmt::Display;

use itertools::Itertools;

use super::game::Card;

/// Cards a stack may hold before the next card landing on it sweeps it.
pub const STACK_CAPACITY: u32 = 5;

/// One row of the table as reported by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stack {
    pub card_count: u32,
    /// Points a player takes when they have to pick this stack up.
    pub penalty: u32,
    pub top_card: Card,
}

impl Stack {
    pub fn new(card_count: u32, penalty: u32, top_card: Card) -> Self {
        Self {
            card_count,
            penalty,
            top_card,
        }
    }

    /// A full stack is about to be swept by whoever lands the next card on it.
    pub fn is_full(&self) -> bool {
        self.card_count >= STACK_CAPACITY
    }
}

impl Display for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.card_count, self.penalty, self.top_card)
    }
}

pub fn format_stacks(stacks: &[Stack]) -> String {
    stacks.iter().join(" ")
}

/// The stack whose top card is the largest one still below `card`.
/// That is where `card` lands if nobody else plays in between.
pub fn find_landing_stack(stacks: &[Stack], card: Card) -> Option<(usize, &Stack)> {
    stacks
        .iter()
        .enumerate()
        .filter(|(_, s)| s.top_card < card)
        .max_by_key(|(_, s)| s.top_card)
}
