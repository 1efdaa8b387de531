use std::{
    collections::{
        BTreeSet,
        HashSet,
    },
    fmt::Display,
};

use itertools::Itertools;
use log::*;

use super::{
    game::{
        format_cards,
        Card,
        GameConfig,
    },
    player::Player,
    stack::{
        format_stacks,
        Stack,
    },
};
use crate::proto::{
    assembler::AssembledMessage,
    Error,
    ErrorCode,
};

const STARTING_LAYOUT: &str = "Starting layout, no cards played.";

/// The authoritative model of the table as seen from our seat.
///
/// `cards_at_large`, `cards_played` and `hand` always partition the deck.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    deck: BTreeSet<Card>,
    cards_played: BTreeSet<Card>,
    hand: BTreeSet<Card>,
    cards_at_large: BTreeSet<Card>,
    players: Vec<Player>,
    stacks: Vec<Stack>,
    status: String,
    history: Vec<AssembledMessage>,

    // who played what where since the last scores message
    played_log: Vec<String>,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let deck: BTreeSet<Card> = (1..=config.deck_size).collect();
        Self {
            cards_at_large: deck.clone(),
            deck,
            config,
            cards_played: BTreeSet::new(),
            hand: BTreeSet::new(),
            players: vec![],
            stacks: vec![],
            status: String::from("INITIALISED"),
            history: vec![],
            played_log: vec![String::from(STARTING_LAYOUT)],
        }
    }

    pub fn get_config(&self) -> &GameConfig {
        &self.config
    }

    pub fn get_deck(&self) -> &BTreeSet<Card> {
        &self.deck
    }

    pub fn get_hand(&self) -> &BTreeSet<Card> {
        &self.hand
    }

    pub fn get_cards_played(&self) -> &BTreeSet<Card> {
        &self.cards_played
    }

    pub fn get_cards_at_large(&self) -> &BTreeSet<Card> {
        &self.cards_at_large
    }

    pub fn get_players(&self) -> &[Player] {
        &self.players
    }

    pub fn get_player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.get_name() == name)
    }

    fn get_player_mut(&mut self, name: &str) -> Result<&mut Player, Error> {
        self.players
            .iter_mut()
            .find(|p| p.get_name() == name)
            .ok_or_else(|| Error::new(ErrorCode::ProtocolViolation, format!("Unknown player: {}", name)))
    }

    pub fn get_stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn get_status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn get_history(&self) -> &[AssembledMessage] {
        &self.history
    }

    pub fn archive(&mut self, message: AssembledMessage) {
        self.history.push(message);
    }

    /// Registers new players in the given order. The whole batch is rejected
    /// if any name repeats, either within the batch or against known players.
    pub fn add_players(&mut self, names: &[String]) -> Result<(), Error> {
        let mut seen: HashSet<&str> = HashSet::new();
        for name in names {
            if !seen.insert(name.as_str()) || self.get_player(name).is_some() {
                return Err(Error::new(
                    ErrorCode::RegistrationConflict,
                    format!("The list of player names has duplicates: {}", name),
                ));
            }
        }

        for name in names {
            let player = Player::new(name, self.players.len(), &self.config);
            debug!("Registered {}", player);
            self.players.push(player);
        }
        Ok(())
    }

    /// Starts a new hand with `cards` as our own hand.
    pub fn new_hand(&mut self, cards: &[Card]) -> Result<(), Error> {
        self.check_cards(cards)?;
        for player in self.players.iter_mut() {
            player.reset();
        }
        self.cards_played.clear();
        self.hand = cards.iter().copied().collect();
        self.update_cards_at_large();
        self.played_log = vec![String::from(STARTING_LAYOUT)];
        Ok(())
    }

    /// Moves our own card from the hand onto the table.
    pub fn play_from_hand(&mut self, card: Card) -> Result<(), Error> {
        if !self.hand.remove(&card) {
            return Err(Error::new(
                ErrorCode::PreconditionViolation,
                format!("Card {} is not in hand", card),
            ));
        }
        self.cards_played.insert(card);
        self.update_cards_at_large();
        Ok(())
    }

    /// Records a play reported by the server.
    pub fn update_played(&mut self, name: &str, card: Card, stack_index: usize) -> Result<(), Error> {
        self.check_cards(&[card])?;
        let player = self.get_player_mut(name)?;
        player.play(card);
        let entry = format!("{}:{:>3}->{}", player.get_id(), card, stack_index);

        // Our own card already left the hand when we chose it.
        self.hand.remove(&card);
        self.cards_played.insert(card);
        self.update_cards_at_large();
        self.played_log.push(entry);
        Ok(())
    }

    /// Overwrites the points of every listed player. Nothing is applied if a
    /// name is unknown.
    pub fn update_scores(&mut self, scores: &[(String, i32)]) -> Result<(), Error> {
        if let Some((name, _)) = scores.iter().find(|(name, _)| self.get_player(name).is_none()) {
            return Err(Error::new(
                ErrorCode::ProtocolViolation,
                format!("Unknown player in scores: {}", name),
            ));
        }
        for (name, points) in scores {
            self.get_player_mut(name)?.set_points(*points);
        }
        Ok(())
    }

    pub fn update_stacks(&mut self, stacks: Vec<Stack>) {
        self.stacks = stacks;
    }

    pub fn is_partitioned(&self) -> bool {
        self.cards_at_large.is_disjoint(&self.cards_played)
            && self.cards_at_large.is_disjoint(&self.hand)
            && self.cards_played.is_disjoint(&self.hand)
            && self.cards_at_large.len() + self.cards_played.len() + self.hand.len() == self.deck.len()
            && self
                .cards_at_large
                .iter()
                .chain(self.cards_played.iter())
                .chain(self.hand.iter())
                .all(|c| self.deck.contains(c))
    }

    /// `name: points` for every player in registration order.
    pub fn summarise_scores(&self) -> String {
        self.players
            .iter()
            .map(|p| format!("{}: {:>2}", p.get_name(), p.get_points()))
            .join(", ")
    }

    /// One line describing the round: scores, plays since the last call, and stacks.
    pub fn take_round_summary(&mut self) -> String {
        let summary = format!(
            "{} | {} | {}",
            self.summarise_scores(),
            self.played_log.iter().join(", "),
            format_stacks(&self.stacks)
        );
        self.played_log.clear();
        summary
    }

    fn check_cards(&self, cards: &[Card]) -> Result<(), Error> {
        match cards.iter().find(|c| !self.config.contains(**c)) {
            Some(card) => Err(Error::new(
                ErrorCode::ProtocolViolation,
                format!("Card {} is outside of the deck [1, {}]", card, self.config.deck_size),
            )),
            None => Ok(()),
        }
    }

    fn update_cards_at_large(&mut self) {
        self.cards_at_large = self
            .deck
            .difference(&self.cards_played)
            .copied()
            .filter(|c| !self.hand.contains(c))
            .collect();
        debug_assert!(self.is_partitioned());
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "status: {}", self.status)?;
        writeln!(f, "hand: [{}]", format_cards(&self.hand))?;
        writeln!(f, "stacks: {}", format_stacks(&self.stacks))?;
        writeln!(
            f,
            "cards: played {}, at large {}",
            self.cards_played.len(),
            self.cards_at_large.len()
        )?;
        writeln!(f, "players:")?;
        for player in self.players.iter() {
            f.write_str(&textwrap::indent(&format!("{}\n", player), "    "))?;
        }
        Ok(())
    }
}
