pub mod client;
pub mod engine;
pub mod proto;
pub mod strategies;
