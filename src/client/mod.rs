pub mod common;
pub mod dispatcher;

use std::{
    fmt::{
        Display,
        Formatter,
    },
    io::{
        BufRead,
        Write,
    },
};

use itertools::Itertools;
use log::*;
use serde::Serialize;

use crate::{
    engine::GameState,
    proto::{
        connection::Connection,
        messages::ClientMessage,
        Error,
    },
    strategies::Arbiter,
};

use self::{
    common::ClientConfig,
    dispatcher::Dispatcher,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedScore {
    pub name: String,
    pub points: i32,
}

/// What is left of a session once the input ends or a fatal error stops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub status: String,
    pub scores: Vec<NamedScore>,
}

impl GameSummary {
    pub fn is_error(&self) -> bool {
        self.status.starts_with("ERROR")
    }
}

impl Display for GameSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            self.scores
                .iter()
                .map(|s| format!("{} {}", s.name, s.points))
                .join(", ")
        )
    }
}

pub struct Client {
    config: ClientConfig,
    dispatcher: Dispatcher,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let dispatcher = Dispatcher::new(&config);
        Self { config, dispatcher }
    }

    pub fn with_arbiter(config: ClientConfig, arbiter: Arbiter) -> Self {
        let dispatcher = Dispatcher::with_arbiter(&config, arbiter);
        Self { config, dispatcher }
    }

    pub fn get_state(&self) -> &GameState {
        self.dispatcher.get_state()
    }

    /// Introduces ourselves, then answers the server until the input ends.
    /// Stops reading at the first fatal error.
    pub fn start<R: BufRead, W: Write>(&mut self, reader: R, writer: W) -> Result<GameSummary, Error> {
        let mut connection = Connection::new(reader, writer, self.config.testing);
        let result = self.run(&mut connection);
        if let Err(e) = result {
            connection.cancel();
            if self.dispatcher.get_failure().is_none() {
                self.dispatcher.fail(e.clone());
            }
            return Err(e);
        }
        Ok(self.summary())
    }

    fn run<R: BufRead, W: Write>(&mut self, connection: &mut Connection<R, W>) -> Result<(), Error> {
        info!("Joining the game as {}", self.config.name);
        connection.send(&ClientMessage::Player(self.config.name.clone()))?;

        loop {
            let reply = match connection.recv_line()? {
                Some(line) => self.dispatcher.feed_line(line)?,
                None => break,
            };
            if let Some(reply) = reply {
                connection.send(&reply)?;
            }
        }

        if self.dispatcher.has_pending_input() {
            warn!("The input ended in the middle of a message");
        }
        Ok(())
    }

    pub fn summary(&self) -> GameSummary {
        let state = self.dispatcher.get_state();
        GameSummary {
            status: state.get_status().to_string(),
            scores: state
                .get_players()
                .iter()
                .map(|p| NamedScore {
                    name: p.get_name().to_string(),
                    points: p.get_points(),
                })
                .collect(),
        }
    }
}
