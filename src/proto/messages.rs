use std::{
    fmt::Display,
    str::FromStr,
};

use crate::engine::{
    Card,
    Stack,
};

use super::{
    assembler::AssembledMessage,
    Error,
    ErrorCode,
};

const TEST_HEADER_PREFIX: &str = "OH: ";
const TEST_BODY_PREFIX: &str = "OB: ";

/// Messages the server sends to us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// `players`: names of the players joining the game.
    Players(Vec<String>),

    /// `cards`: our hand for the new round.
    Cards(Vec<Card>),

    /// `card?`: we must answer with a `card` message.
    CardRequest,

    /// `played`: `<player> <card> <stack index>`.
    Played {
        player: String,
        card: Card,
        stack_index: usize,
    },

    /// `scores`: flattened `<name> <points>` pairs.
    Scores(Vec<(String, i32)>),

    /// `stacks`: one `<card count> <penalty> <top card>` row per stack.
    Stacks(Vec<Stack>),

    /// `stack?`: we must answer with a `stack` message.
    StackRequest,

    Info(Vec<String>),
}

impl TryFrom<&AssembledMessage> for ServerMessage {
    type Error = Error;

    fn try_from(message: &AssembledMessage) -> Result<Self, Self::Error> {
        let body = &message.body;
        let parsed = match message.header.as_str() {
            "players" => ServerMessage::Players(tokens(body).map(String::from).collect()),
            "cards" => {
                let line = body.first().ok_or_else(|| violation("cards without a hand"))?;
                ServerMessage::Cards(
                    line.split_whitespace()
                        .map(|t| parse_field(t, "card"))
                        .collect::<Result<_, _>>()?,
                )
            }
            "card?" => ServerMessage::CardRequest,
            "played" => {
                let fields: Vec<&str> = body
                    .first()
                    .map(|line| line.split_whitespace().collect())
                    .unwrap_or_default();
                match fields.as_slice() {
                    [player, card, stack_index] => ServerMessage::Played {
                        player: player.to_string(),
                        card: parse_field(card, "card")?,
                        stack_index: parse_field(stack_index, "stack index")?,
                    },
                    _ => return Err(violation(format!("played expects 3 fields but: {:?}", fields))),
                }
            }
            "scores" => {
                let fields: Vec<&str> = tokens(body).collect();
                if fields.len() % 2 != 0 {
                    return Err(violation(format!("scores must be name/score pairs but: {:?}", fields)));
                }
                ServerMessage::Scores(
                    fields
                        .chunks(2)
                        .map(|pair| -> Result<(String, i32), Error> {
                            Ok((pair[0].to_string(), parse_field(pair[1], "score")?))
                        })
                        .collect::<Result<_, _>>()?,
                )
            }
            "stacks" => ServerMessage::Stacks(
                body.iter()
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| parse_stack(line))
                    .collect::<Result<_, _>>()?,
            ),
            "stack?" => ServerMessage::StackRequest,
            "info" => ServerMessage::Info(body.clone()),
            header => return Err(violation(format!("What is this message??? {:?}", header))),
        };
        Ok(parsed)
    }
}

fn tokens(body: &[String]) -> impl Iterator<Item = &str> {
    body.iter().flat_map(|line| line.split_whitespace())
}

fn violation(message: impl Into<String>) -> Error {
    Error::new(ErrorCode::ProtocolViolation, message)
}

fn parse_field<T: FromStr>(token: &str, what: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    token
        .parse::<T>()
        .map_err(|e| violation(format!("Failed to parse {} {:?}: {}", what, token, e)))
}

fn parse_stack(line: &str) -> Result<Stack, Error> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [count, penalty, top] => Ok(Stack::new(
            parse_field(count, "card count")?,
            parse_field(penalty, "penalty")?,
            parse_field(top, "top card")?,
        )),
        _ => Err(violation(format!("A stack row needs 3 numbers but: {:?}", line))),
    }
}

/// Messages we send to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Introduces ourselves. Sent once at the start of a session.
    Player(String),

    Card(Card),

    /// 1-based stack index.
    Stack(usize),
}

impl ClientMessage {
    pub fn header(&self) -> &'static str {
        match self {
            ClientMessage::Player(_) => "player",
            ClientMessage::Card(_) => "card",
            ClientMessage::Stack(_) => "stack",
        }
    }

    pub fn body(&self) -> String {
        match self {
            ClientMessage::Player(name) => name.clone(),
            ClientMessage::Card(card) => card.to_string(),
            ClientMessage::Stack(index) => index.to_string(),
        }
    }

    /// Lines to put on the wire, including the blank terminator. In test
    /// mode every line is prefixed so the output can be told apart from logs.
    pub fn to_lines(&self, testing: bool) -> Vec<String> {
        let (header_prefix, body_prefix) = if testing {
            (TEST_HEADER_PREFIX, TEST_BODY_PREFIX)
        } else {
            ("", "")
        };
        let mut lines = vec![format!("{}{}", header_prefix, self.header())];
        for line in self.body().split('\n') {
            lines.push(format!("{}{}", body_prefix, line));
        }
        lines.push(body_prefix.to_string());
        lines
    }
}

impl Display for ClientMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.header(), self.body())
    }
}
