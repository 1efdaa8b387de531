use std::fmt::Display;

use rand::Rng;

use crate::{
    engine::Stack,
    proto::{
        Error,
        ErrorCode,
    },
};

/// How to pick the stack we take when our card is below every stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StackPolicy {
    /// The first stack with the smallest penalty.
    #[default]
    Lowest,
    Random,
}

impl Display for StackPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StackPolicy::Lowest => "lowest",
            StackPolicy::Random => "random",
        };
        write!(f, "{}", s)
    }
}

/// Returns the 1-based index of the stack to take.
pub fn choose_stack(stacks: &[Stack], policy: StackPolicy, rng: &mut impl Rng) -> Result<usize, Error> {
    if stacks.is_empty() {
        return Err(Error::new(
            ErrorCode::PreconditionViolation,
            "Asked for a stack before any stacks were reported",
        ));
    }
    let index = match policy {
        StackPolicy::Random => rng.gen_range(1..=stacks.len()),
        StackPolicy::Lowest => {
            let mut chosen = 0;
            for (i, stack) in stacks.iter().enumerate() {
                if stack.penalty < stacks[chosen].penalty {
                    chosen = i;
                }
            }
            chosen + 1
        }
    };
    Ok(index)
}
