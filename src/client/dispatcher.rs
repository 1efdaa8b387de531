use itertools::Itertools;
use log::*;
use rand_mt::Mt64;

use crate::{
    engine::{
        format_cards,
        GameState,
    },
    proto::{
        assembler::{
            AssembledMessage,
            MessageAssembler,
        },
        messages::{
            ClientMessage,
            ServerMessage,
        },
        Error,
        ErrorCode,
    },
    strategies::{
        stack::{
            choose_stack,
            StackPolicy,
        },
        Arbiter,
    },
};

use super::common::ClientConfig;

const NOMINAL: &str = "NOMINAL - Nothing of note yet.";

/// Drives the game state from server messages and produces our replies.
///
/// Any error is fatal: the status turns into `ERROR: ...` and every later
/// call returns the same error without touching the state.
pub struct Dispatcher {
    state: GameState,
    arbiter: Arbiter,
    stack_policy: StackPolicy,
    rng: Mt64,
    assembler: MessageAssembler,
    echo_input: bool,
    failure: Option<Error>,
}

impl Dispatcher {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_arbiter(config, Arbiter::from_config(&config.strategies))
    }

    pub fn with_arbiter(config: &ClientConfig, arbiter: Arbiter) -> Self {
        Self {
            state: GameState::new(config.game.clone()),
            arbiter,
            stack_policy: config.stack_policy,
            // Keep the stack choices independent from the random strategy's draws.
            rng: Mt64::new(config.strategies.seed.wrapping_add(1)),
            assembler: MessageAssembler::new(),
            echo_input: config.echo_input,
            failure: None,
        }
    }

    pub fn get_state(&self) -> &GameState {
        &self.state
    }

    pub fn get_failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// True while a message is only partially received.
    pub fn has_pending_input(&self) -> bool {
        !self.assembler.is_empty()
    }

    pub fn feed_line(&mut self, raw: &str) -> Result<Option<ClientMessage>, Error> {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        match self.assembler.feed_line(raw) {
            Some(message) => self.dispatch(message),
            None => Ok(None),
        }
    }

    pub fn dispatch(&mut self, message: AssembledMessage) -> Result<Option<ClientMessage>, Error> {
        if let Some(e) = &self.failure {
            return Err(e.clone());
        }
        if self.echo_input {
            info!("IH: {}", message.header);
            for line in message.body.iter() {
                info!("IB: {}", line);
            }
            info!("IB: ");
        }

        self.state.set_status(NOMINAL);
        let result = ServerMessage::try_from(&message).and_then(|m| self.apply(m));
        self.state.archive(message);

        match result {
            Ok(reply) => {
                info!("{}", self.state.get_status());
                Ok(reply)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Marks the session as failed. Returns the error for convenience.
    pub fn fail(&mut self, e: Error) -> Error {
        self.state.set_status(format!("ERROR: {}", e));
        error!("{}", self.state.get_status());
        self.failure = Some(e.clone());
        e
    }

    fn apply(&mut self, message: ServerMessage) -> Result<Option<ClientMessage>, Error> {
        let reply = match message {
            ServerMessage::Players(names) => {
                self.state.add_players(&names)?;
                info!(
                    "Players: {}",
                    self.state
                        .get_players()
                        .iter()
                        .map(|p| format!("{} ({})", p.get_name(), p.get_id()))
                        .join(", ")
                );
                self.state.set_status("PLAYERS: Added one or more players.");
                None
            }
            ServerMessage::Cards(cards) => {
                self.state.new_hand(&cards)?;
                info!("Hand: {}", format_cards(self.state.get_hand()));
                self.state.set_status("CARDS: Dealt a new hand.");
                None
            }
            ServerMessage::CardRequest => {
                let choice = self.arbiter.choose_card(&self.state)?;
                let proposal = choice.proposal;
                debug!("Strategy {} won with {:.3}", choice.strategy, choice.weighted_score);
                self.state.play_from_hand(proposal.card)?;
                self.state.set_status(format!(
                    "CARD?: Selected {} with score {} because {}",
                    proposal.card, proposal.score, proposal.rationale
                ));
                Some(ClientMessage::Card(proposal.card))
            }
            ServerMessage::Played {
                player,
                card,
                stack_index,
            } => {
                self.state.update_played(&player, card, stack_index)?;
                self.state.set_status("PLAYED: Updated played cards.");
                None
            }
            ServerMessage::Scores(scores) => {
                self.state.update_scores(&scores)?;
                info!("{}", self.state.take_round_summary());
                self.state.set_status("SCORE: Updated scores.");
                None
            }
            ServerMessage::Stacks(stacks) => {
                if stacks.is_empty() {
                    return Err(Error::new(ErrorCode::ProtocolViolation, "stacks without any stack"));
                }
                self.state.update_stacks(stacks);
                self.state.set_status("STACKS: Updated the stacks.");
                None
            }
            ServerMessage::StackRequest => {
                let index = choose_stack(self.state.get_stacks(), self.stack_policy, &mut self.rng)?;
                self.state.set_status(format!("STACK?: Selected stack {}.", index));
                Some(ClientMessage::Stack(index))
            }
            ServerMessage::Info(lines) => {
                info!("info:\n{}", textwrap::indent(&lines.join("\n"), "> "));
                self.state.set_status("INFO: Received server info.");
                None
            }
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use more_asserts::*;

    use super::*;
    use crate::{
        engine::Stack,
        strategies::{
            StrategyConfig,
            StrategyDescriptor,
            StrategyType,
        },
    };

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn new_test_dispatcher() -> Dispatcher {
        Dispatcher::new(&ClientConfig::default())
    }

    fn random_only_dispatcher() -> Dispatcher {
        let config = ClientConfig::default();
        let arbiter = Arbiter::new(vec![StrategyDescriptor::new(
            StrategyType::Random.create_strategy(&StrategyConfig::default()),
            1.0,
        )]);
        Dispatcher::with_arbiter(&config, arbiter)
    }

    // Feeds every line of `input` and collects the replies.
    fn feed(dispatcher: &mut Dispatcher, input: &str) -> Result<Vec<ClientMessage>, Error> {
        let mut replies = vec![];
        for line in input.split_inclusive('\n') {
            if let Some(reply) = dispatcher.feed_line(line)? {
                replies.push(reply);
            }
        }
        Ok(replies)
    }

    #[test]
    fn test_random_card_request() {
        init();
        let mut dispatcher = random_only_dispatcher();
        let replies = feed(
            &mut dispatcher,
            "players\nAlice Bob\n\ncards\n1 2 3\n\ncard?\n\n",
        )
        .unwrap();

        assert_eq!(1, replies.len());
        let card = match replies[0] {
            ClientMessage::Card(card) => card,
            ref m => panic!("Unexpected reply: {}", m),
        };
        assert!([1, 2, 3].contains(&card));

        let state = dispatcher.get_state();
        assert_eq!(2, state.get_hand().len());
        assert!(!state.get_hand().contains(&card));
        assert!(state.get_cards_played().contains(&card));
        assert!(state.is_partitioned());
        assert!(state.get_status().starts_with("CARD?: Selected"));
        assert_eq!(3, state.get_history().len());
    }

    #[test]
    fn test_unknown_header_is_fatal() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let err = feed(&mut dispatcher, "bogus\n\n").unwrap_err();
        assert_eq!(ErrorCode::ProtocolViolation, err.code);
        assert!(dispatcher.get_state().get_status().starts_with("ERROR"));
        // The offending message is still archived.
        assert_eq!(1, dispatcher.get_state().get_history().len());

        // Nothing is processed after the failure.
        let err = feed(&mut dispatcher, "players\nAlice\n\n").unwrap_err();
        assert_eq!(ErrorCode::ProtocolViolation, err.code);
        assert!(dispatcher.get_state().get_players().is_empty());
        assert_eq!(1, dispatcher.get_state().get_history().len());
    }

    #[test]
    fn test_failure_keeps_earlier_messages_applied() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let err = feed(&mut dispatcher, "players\nAlice Bob\n\nwhat?\n\n").unwrap_err();
        assert_eq!(ErrorCode::ProtocolViolation, err.code);
        assert_eq!(2, dispatcher.get_state().get_players().len());
        assert!(dispatcher.get_failure().is_some());
    }

    #[test]
    fn test_duplicate_players_are_fatal() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let err = feed(&mut dispatcher, "players\nAlice Bob Alice\n\n").unwrap_err();
        assert_eq!(ErrorCode::RegistrationConflict, err.code);
        assert!(dispatcher.get_state().get_status().starts_with("ERROR"));
    }

    #[test]
    fn test_requests_without_state_are_fatal() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let err = feed(&mut dispatcher, "card?\n\n").unwrap_err();
        assert_eq!(ErrorCode::PreconditionViolation, err.code);

        let mut dispatcher = new_test_dispatcher();
        let err = feed(&mut dispatcher, "stack?\n\n").unwrap_err();
        assert_eq!(ErrorCode::PreconditionViolation, err.code);
        assert!(dispatcher.get_state().get_status().starts_with("ERROR"));
    }

    #[test]
    fn test_malformed_numbers_are_protocol_violations() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let err = feed(&mut dispatcher, "cards\n1 2 x\n\n").unwrap_err();
        assert_eq!(ErrorCode::ProtocolViolation, err.code);
    }

    #[test]
    fn test_scores_overwrite_points() {
        init();
        let mut dispatcher = new_test_dispatcher();
        feed(
            &mut dispatcher,
            "players\nAlice Bob\n\nscores\nAlice 12 Bob 3\n\nscores\nAlice 60 Bob 70\n\n",
        )
        .unwrap();
        let state = dispatcher.get_state();
        assert_eq!(60, state.get_player("Alice").unwrap().get_points());
        assert_eq!(70, state.get_player("Bob").unwrap().get_points());
        assert_eq!("SCORE: Updated scores.", state.get_status());
    }

    #[test]
    fn test_stack_request() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let replies = feed(
            &mut dispatcher,
            "stacks\n1 5 10\n2 3 20\n1 3 30\n3 7 40\n\nstack?\n\n",
        )
        .unwrap();
        assert_eq!(vec![ClientMessage::Stack(2)], replies);
        assert_eq!("STACK?: Selected stack 2.", dispatcher.get_state().get_status());
    }

    #[test]
    fn test_random_stack_policy() {
        init();
        let config = ClientConfig {
            stack_policy: StackPolicy::Random,
            ..ClientConfig::default()
        };
        let mut dispatcher = Dispatcher::new(&config);
        feed(&mut dispatcher, "stacks\n1 5 10\n2 3 20\n\n").unwrap();
        for _ in 0..10 {
            match feed(&mut dispatcher, "stack?\n\n").unwrap().as_slice() {
                [ClientMessage::Stack(index)] => {
                    assert_ge!(*index, 1);
                    assert_le!(*index, 2);
                }
                replies => panic!("Unexpected replies: {:?}", replies),
            }
        }
    }

    #[test]
    fn test_stacks_are_replaced() {
        init();
        let mut dispatcher = new_test_dispatcher();
        feed(&mut dispatcher, "stacks\n1 1 10\n1 1 20\n\nstacks\n2 3 30\n\n").unwrap();
        assert_eq!(&[Stack::new(2, 3, 30)], dispatcher.get_state().get_stacks());
    }

    #[test]
    fn test_info_changes_nothing() {
        init();
        let mut dispatcher = new_test_dispatcher();
        feed(&mut dispatcher, "players\nAlice\n\ncards\n4 5\n\n").unwrap();
        let hand = dispatcher.get_state().get_hand().clone();
        let replies = feed(&mut dispatcher, "info\nround 1\nstarting\n\n").unwrap();
        assert!(replies.is_empty());
        assert_eq!(&hand, dispatcher.get_state().get_hand());
        assert_eq!("INFO: Received server info.", dispatcher.get_state().get_status());
    }

    #[test]
    fn test_full_round_keeps_partition() {
        init();
        let mut dispatcher = new_test_dispatcher();
        let input = [
            "players\nAlice Bob penbot\n\n",
            "cards\n3 17 25 38 44 59 61 77 86 99\n\n",
            "stacks\n1 1 10\n1 1 33\n1 7 55\n1 1 80\n\n",
            "card?\n\n",
            "played\nAlice 12 1\n\n",
            "played\nBob 60 3\n\n",
            "played\npenbot 99 4\n\n",
            "scores\nAlice 66 Bob 66 penbot 66\n\n",
        ];
        let mut replies = vec![];
        for message in input {
            replies.extend(feed(&mut dispatcher, message).unwrap());
            assert!(dispatcher.get_state().is_partitioned());
        }

        // highest (50) beats lowest and random here
        assert_eq!(vec![ClientMessage::Card(99)], replies);
        let state = dispatcher.get_state();
        assert_eq!(&BTreeSet::from([12, 60, 99]), state.get_cards_played());
        assert_eq!(9, state.get_hand().len());
        assert_eq!(9, state.get_player("Alice").unwrap().get_cards_held());
        assert_eq!(9, state.get_player("penbot").unwrap().get_cards_held());

        // A new hand starts from scratch for everyone.
        feed(&mut dispatcher, "cards\n1 2 3 4 5 6 7 8 9 10\n\n").unwrap();
        let state = dispatcher.get_state();
        assert!(state.get_cards_played().is_empty());
        assert_eq!(10, state.get_player("Alice").unwrap().get_cards_held());
        assert_eq!(52.5, state.get_player("Alice").unwrap().get_hand_avg_est());
        assert!(state.is_partitioned());
    }
}
