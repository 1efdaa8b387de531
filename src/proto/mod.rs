// Line protocol spoken with the game server.
//
// A message is a header line, zero or more body lines, and a blank line.

pub mod assembler;
pub mod connection;
pub mod messages;

mod data;

pub use data::*;
