//! Property tests for the card bookkeeping of `GameState`.
//! Whatever the server sends, valid or not, hand, played cards and cards at
//! large must split the deck between them.

use proptest::prelude::*;

use super::{
    Card,
    GameConfig,
    GameState,
    Stack,
};

const NAMES: [&str; 3] = ["Alice", "Bob", "penbot"];

#[derive(Clone, Debug)]
enum Event {
    Cards(Vec<Card>),
    PlayOwn(Card),
    Played(usize, Card),
    Scores(usize, i32),
    Stacks(Vec<(u32, u32, Card)>),
}

// Cards reach a little past the deck so out of range input is covered too.
fn card() -> impl Strategy<Value = Card> {
    0..=110u32
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        prop::collection::vec(card(), 0..12).prop_map(Event::Cards),
        card().prop_map(Event::PlayOwn),
        (0..4usize, card()).prop_map(|(p, c)| Event::Played(p, c)),
        (0..4usize, -20..80i32).prop_map(|(p, s)| Event::Scores(p, s)),
        prop::collection::vec((1..=5u32, 0..=30u32, card()), 0..5).prop_map(Event::Stacks),
    ]
}

fn player_name(index: usize) -> String {
    NAMES.get(index).copied().unwrap_or("Mallory").to_string()
}

fn apply(state: &mut GameState, event: &Event) -> bool {
    let result = match event {
        Event::Cards(cards) => state.new_hand(cards),
        Event::PlayOwn(card) => state.play_from_hand(*card),
        Event::Played(player, card) => state.update_played(&player_name(*player), *card, 1),
        Event::Scores(player, points) => state.update_scores(&[(player_name(*player), *points)]),
        Event::Stacks(rows) => {
            state.update_stacks(rows.iter().map(|(c, p, t)| Stack::new(*c, *p, *t)).collect());
            Ok(())
        }
    };
    result.is_ok()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The deck stays partitioned after every event, accepted or rejected.
    #[test]
    fn prop_deck_stays_partitioned(events in prop::collection::vec(event(), 0..40)) {
        let mut state = GameState::new(GameConfig::default());
        state.add_players(&NAMES.map(String::from)).unwrap();

        for event in &events {
            apply(&mut state, event);
            prop_assert!(state.is_partitioned(), "not partitioned after {:?}:\n{}", event, state);
        }
    }

    /// A rejected event leaves the cards and the scores untouched.
    #[test]
    fn prop_rejected_events_change_nothing(events in prop::collection::vec(event(), 0..40)) {
        let mut state = GameState::new(GameConfig::default());
        state.add_players(&NAMES.map(String::from)).unwrap();

        for event in &events {
            let hand = state.get_hand().clone();
            let played = state.get_cards_played().clone();
            let scores = state.summarise_scores();
            if !apply(&mut state, event) {
                prop_assert_eq!(&hand, state.get_hand());
                prop_assert_eq!(&played, state.get_cards_played());
                prop_assert_eq!(scores, state.summarise_scores());
            }
        }
    }

    /// Cards we are holding are never counted as still at large.
    #[test]
    fn prop_hand_is_not_at_large(cards in prop::collection::btree_set(1..=104u32, 0..=10)) {
        let mut state = GameState::new(GameConfig::default());
        let cards: Vec<Card> = cards.into_iter().collect();
        state.new_hand(&cards).unwrap();
        prop_assert_eq!(104 - cards.len(), state.get_cards_at_large().len());
        for card in &cards {
            prop_assert!(!state.get_cards_at_large().contains(card));
        }
    }
}
