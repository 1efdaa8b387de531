use std::collections::HashMap;

use clap::Args;

use crate::{
    engine::GameConfig,
    strategies::{
        highest,
        parse_weights,
        stack::StackPolicy,
        StrategyConfig,
    },
};

/// Everything a session needs to know before the first line arrives.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub name: String,
    /// Prefix outbound lines with `OH: `/`OB: `.
    pub testing: bool,
    /// Mirror inbound lines into the log with `IH: `/`IB: `.
    pub echo_input: bool,
    pub game: GameConfig,
    pub strategies: StrategyConfig,
    pub stack_policy: StackPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: String::from(DEFAULT_NAME),
            testing: false,
            echo_input: false,
            game: GameConfig::default(),
            strategies: StrategyConfig::default(),
            stack_policy: StackPolicy::default(),
        }
    }
}

pub const DEFAULT_NAME: &str = "penbot";

#[derive(Args, Debug)]
pub struct ClientCommonArgs {
    /// change the bot's name
    #[clap(short, long, value_parser, default_value = DEFAULT_NAME)]
    pub name: String,

    /// read and respond to pseudo stdin from the test file
    #[clap(short, long, value_parser, default_value_t = false)]
    pub test: bool,

    /// echo received messages into the log
    #[clap(short, long, value_parser, default_value_t = false)]
    pub echo_input: bool,

    /// set weights for each strategy, comma-separated <name>=<weight>
    #[clap(short, long, value_parser = parse_weights)]
    pub weights: Option<HashMap<String, f64>>,

    /// how to choose the stack to take
    #[clap(long, value_enum, default_value_t = StackPolicy::Lowest)]
    pub stack_policy: StackPolicy,

    /// seed for every random choice the bot makes
    #[clap(long, value_parser, default_value_t = 0x42)]
    pub seed: u64,

    /// card count assumed when the highest card has no stack to land on
    #[clap(long, value_parser, default_value_t = highest::DEFAULT_FALLBACK_COUNT)]
    pub highest_fallback_count: u32,
}

impl ClientCommonArgs {
    pub fn to_config(&self) -> ClientConfig {
        ClientConfig {
            name: self.name.clone(),
            testing: self.test,
            echo_input: self.echo_input,
            game: GameConfig::default(),
            strategies: StrategyConfig {
                weights: self.weights.clone().unwrap_or_default(),
                seed: self.seed,
                highest_fallback_count: self.highest_fallback_count,
            },
            stack_policy: self.stack_policy,
        }
    }
}
