use std::sync::Once;

use levee_core::{
    update, Effect, JobEpoch, Msg, ProgressSnapshot, ReportedPhase, TrackerPhase, TrackerState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn start_job(urls: &str) -> (TrackerState, JobEpoch) {
    let (state, _) = update(
        TrackerState::new("kb_flood"),
        Msg::InputChanged(urls.to_string()),
    );
    let (state, _) = update(state, Msg::ExtractClicked);
    let epoch = state.epoch();
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            epoch,
            task_id: "task_c0ffee11".to_string(),
            created_at: "2025-06-01T08:30:00Z".to_string(),
        },
    );
    (state, epoch)
}

fn completed_snapshot() -> ProgressSnapshot {
    ProgressSnapshot {
        current: 1,
        total: 1,
        current_url: String::new(),
        phase: ReportedPhase::Completed,
        error: None,
    }
}

#[test]
fn cancel_makes_in_flight_messages_stale() {
    init_logging();
    let (state, epoch) = start_job("https://a.example.com\nhttps://b.example.com\n");

    let (mut state, effects) = update(state, Msg::CancelRequested);
    assert_eq!(effects, vec![Effect::CancelTimers]);
    assert_eq!(state.view().phase, TrackerPhase::Idle);
    assert!(state.consume_dirty());

    // Everything the old job scheduled must now be a no-op.
    let frozen = state.clone();
    let stale = vec![
        Msg::PollDue { epoch },
        Msg::ProgressFetched {
            epoch,
            snapshot: ProgressSnapshot {
                current: 1,
                total: 2,
                current_url: "https://a.example.com".to_string(),
                phase: ReportedPhase::Running,
                error: None,
            },
        },
        Msg::IndicatorTick { epoch },
        Msg::LogsFetched {
            epoch,
            lines: vec!["[INFO] late".to_string()],
        },
    ];
    let mut state = state;
    for msg in stale {
        let (next, effects) = update(state, msg);
        assert_eq!(next, frozen);
        assert!(effects.is_empty());
        state = next;
    }
}

#[test]
fn cancel_when_idle_is_a_noop() {
    init_logging();
    let mut state = TrackerState::new("kb_flood");
    state.consume_dirty();
    let before = state.clone();

    let (next, effects) = update(state, Msg::CancelRequested);

    assert_eq!(next, before);
    assert!(effects.is_empty());
}

#[test]
fn indicator_cycles_zero_through_three() {
    init_logging();
    let (mut state, epoch) = start_job("https://a.example.com\n");

    for expected in [1u8, 2, 3, 0, 1] {
        let (next, effects) = update(state, Msg::IndicatorTick { epoch });
        assert!(effects.is_empty());
        assert_eq!(next.view().dots, expected);
        state = next;
    }
}

#[test]
fn indicator_freezes_after_terminal_state() {
    init_logging();
    let (state, epoch) = start_job("https://a.example.com\n");
    let (state, _) = update(
        state,
        Msg::ProgressFetched {
            epoch,
            snapshot: completed_snapshot(),
        },
    );
    assert_eq!(state.view().dots, 0);

    let (state, effects) = update(state, Msg::IndicatorTick { epoch });
    assert!(effects.is_empty());
    assert_eq!(state.view().dots, 0);
}

#[test]
fn poll_due_after_terminal_state_is_ignored() {
    init_logging();
    let (state, epoch) = start_job("https://a.example.com\n");
    let (state, _) = update(
        state,
        Msg::ProgressFetched {
            epoch,
            snapshot: completed_snapshot(),
        },
    );

    let (state, effects) = update(state, Msg::PollDue { epoch });

    assert!(effects.is_empty());
    assert_eq!(state.view().phase, TrackerPhase::Completed);
}

#[test]
fn final_log_tail_still_lands_after_completion() {
    init_logging();
    let (state, epoch) = start_job("https://a.example.com\n");
    let (state, _) = update(
        state,
        Msg::ProgressFetched {
            epoch,
            snapshot: completed_snapshot(),
        },
    );

    let (state, _) = update(
        state,
        Msg::LogsFetched {
            epoch,
            lines: vec!["[INFO] extraction finished".to_string()],
        },
    );

    assert_eq!(
        state.view().server_logs,
        vec!["[INFO] extraction finished".to_string()]
    );
}
