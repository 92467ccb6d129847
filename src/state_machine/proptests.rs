//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use chrono::Local;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,29}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,5}"
}

fn arb_reply() -> impl Strategy<Value = Reply> {
    prop_oneof![
        arb_text().prop_map(Reply::Provided),
        Just(Reply::Fallback(
            "Maaf, terjadi kesalahan. Bisakah Anda mencoba lagi?".to_string()
        )),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => prop_oneof![arb_text(), arb_blank()]
            .prop_map(|name| Event::NameSubmitted { name, at: Local::now() }),
        4 => (prop_oneof![arb_text(), arb_blank()], arb_reply())
            .prop_map(|(text, reply)| Event::FeelingShared { text, reply, at: Local::now() }),
        6 => (prop_oneof![arb_text(), arb_blank()], arb_reply())
            .prop_map(|(text, reply)| Event::ChatSent { text, reply, at: Local::now() }),
        1 => Just(Event::Reset),
    ]
}

/// Drive a fresh conversation through a sequence of events, ignoring rejects
fn run(events: Vec<Event>) -> ConversationState {
    let mut state = ConversationState::new();
    for event in events {
        if let Ok(result) = transition(&state, event) {
            state = result.new_state;
        }
    }
    state
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Stage only moves forward, unless the event is a reset
    #[test]
    fn prop_stage_never_regresses(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = ConversationState::new();

        for event in events {
            let is_reset = matches!(event, Event::Reset);
            if let Ok(result) = transition(&state, event) {
                if !is_reset {
                    prop_assert!(
                        result.new_state.stage.rank() >= state.stage.rank(),
                        "Stage regressed from {} to {}",
                        state.stage,
                        result.new_state.stage
                    );
                }
                state = result.new_state;
            }
        }
    }

    // Any valid name moves AwaitingName -> AwaitingFeeling with exactly one bot message
    #[test]
    fn prop_valid_name_greets_once(name in arb_text()) {
        let result = transition(
            &ConversationState::new(),
            Event::NameSubmitted { name: name.clone(), at: Local::now() },
        ).unwrap();

        prop_assert_eq!(result.new_state.stage, Stage::AwaitingFeeling);
        prop_assert_eq!(result.new_state.message_log.len(), 1);
        let greeting = &result.new_state.message_log[0];
        prop_assert_eq!(greeting.role, Role::Bot);
        prop_assert!(greeting.text.contains(name.trim()));
    }

    // Rejected events leave the state untouched
    #[test]
    fn prop_rejected_event_is_noop(
        prefix in proptest::collection::vec(arb_event(), 0..10),
        event in arb_event(),
    ) {
        let state = run(prefix);
        let before = state.clone();
        if transition(&state, event).is_err() {
            prop_assert_eq!(state, before);
        }
    }

    // Reset from anywhere yields a pristine conversation
    #[test]
    fn prop_reset_always_pristine(prefix in proptest::collection::vec(arb_event(), 0..20)) {
        let state = run(prefix);
        let result = transition(&state, Event::Reset).unwrap();

        prop_assert_eq!(result.new_state.stage, Stage::AwaitingName);
        prop_assert_eq!(result.new_state.user_name, None);
        prop_assert!(result.new_state.message_log.is_empty());
        prop_assert!(result.effects.contains(&Effect::DeleteLog));
    }

    // Every accepted turn persists, and the log only ever grows between resets
    #[test]
    fn prop_log_is_append_only(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = ConversationState::new();

        for event in events {
            let is_reset = matches!(event, Event::Reset);
            if let Ok(result) = transition(&state, event) {
                if !is_reset {
                    prop_assert!(result.effects.contains(&Effect::PersistLog));
                    prop_assert!(result.new_state.message_log.starts_with(&state.message_log));
                }
                state = result.new_state;
            }
        }

        let ids: Vec<u64> = state.message_log.iter().map(|m| m.sequence_id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]), "Sequence ids not increasing: {:?}", ids);
    }

    // Export is a pure read
    #[test]
    fn prop_export_is_idempotent(events in proptest::collection::vec(arb_event(), 0..20)) {
        let state = run(events);
        prop_assert_eq!(state.export_log(), state.export_log());
        prop_assert_eq!(state.export_log().len(), state.message_log.len());
    }
}
