mod game;
mod player;
mod stack;
mod state;

#[cfg(test)]
mod tests_props_state;

pub use game::*;
pub use player::*;
pub use stack::*;
pub use state::*;
