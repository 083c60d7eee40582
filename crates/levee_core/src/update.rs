use url::Url;

use crate::{Effect, Msg, PollDelay, ReportedPhase, TrackerPhase, TrackerState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::ExtractClicked => {
            if state.phase().is_active() {
                state.set_error("an extraction job is already running");
                return (state, Vec::new());
            }
            let (urls, rejected) = parse_links(state.input());
            if urls.is_empty() {
                state.set_error("no valid links to extract");
                return (state, Vec::new());
            }
            let epoch = state.begin_submission(urls.clone(), rejected);
            vec![
                Effect::SubmitExtraction {
                    epoch,
                    kb_id: state.kb_id().to_owned(),
                    urls,
                },
                Effect::StartIndicator { epoch },
            ]
        }
        Msg::SubmitSucceeded {
            epoch,
            task_id,
            created_at,
        } => {
            if epoch != state.epoch() || state.phase() != TrackerPhase::Submitting {
                return (state, Vec::new());
            }
            state.start_polling(task_id.clone(), created_at);
            vec![
                Effect::FetchProgress {
                    epoch,
                    task_id: task_id.clone(),
                },
                Effect::FetchLogs { epoch, task_id },
            ]
        }
        Msg::SubmitCompletedInline { epoch, message } => {
            if epoch != state.epoch() || state.phase() != TrackerPhase::Submitting {
                return (state, Vec::new());
            }
            state.finish_inline(message);
            vec![
                Effect::CancelTimers,
                Effect::RefreshContents {
                    kb_id: state.kb_id().to_owned(),
                },
            ]
        }
        Msg::SubmitFailed { epoch, error } => {
            if epoch != state.epoch() || state.phase() != TrackerPhase::Submitting {
                return (state, Vec::new());
            }
            state.fail_submission(&error);
            vec![Effect::CancelTimers]
        }
        Msg::PollDue { epoch } => {
            if epoch != state.epoch() || state.phase() != TrackerPhase::Polling {
                return (state, Vec::new());
            }
            let task_id = match state.job() {
                Some(job) => job.task_id.clone(),
                None => return (state, Vec::new()),
            };
            if !state.begin_poll_cycle() {
                state.exhaust_poll_budget();
                return (state, vec![Effect::CancelTimers]);
            }
            vec![
                Effect::FetchProgress {
                    epoch,
                    task_id: task_id.clone(),
                },
                Effect::FetchLogs { epoch, task_id },
            ]
        }
        Msg::ProgressFetched { epoch, snapshot } => {
            if epoch != state.epoch() || state.phase() != TrackerPhase::Polling {
                return (state, Vec::new());
            }
            match snapshot.phase {
                ReportedPhase::Running => {
                    state.apply_running(&snapshot);
                    vec![Effect::SchedulePoll {
                        epoch,
                        delay: PollDelay::Normal,
                    }]
                }
                ReportedPhase::Completed => {
                    state.apply_terminal_success();
                    vec![
                        Effect::CancelTimers,
                        Effect::RefreshContents {
                            kb_id: state.kb_id().to_owned(),
                        },
                    ]
                }
                ReportedPhase::Failed => {
                    state.apply_terminal_failure(snapshot.current, snapshot.error.as_deref());
                    vec![Effect::CancelTimers]
                }
            }
        }
        Msg::ProgressFetchFailed { epoch, error: _ } => {
            if epoch != state.epoch() || state.phase() != TrackerPhase::Polling {
                return (state, Vec::new());
            }
            vec![Effect::SchedulePoll {
                epoch,
                delay: PollDelay::Backoff,
            }]
        }
        Msg::LogsFetched { epoch, lines } => {
            if epoch != state.epoch() {
                return (state, Vec::new());
            }
            state.replace_server_logs(lines);
            Vec::new()
        }
        Msg::IndicatorTick { epoch } => {
            if epoch != state.epoch() || !state.phase().is_active() {
                return (state, Vec::new());
            }
            state.tick_indicator();
            Vec::new()
        }
        Msg::CancelRequested => {
            if state.phase() == TrackerPhase::Idle {
                return (state, Vec::new());
            }
            state.reset_job();
            vec![Effect::CancelTimers]
        }
    };

    (state, effects)
}

/// Splits the input box into submittable links.
///
/// Lines are trimmed, blanks skipped, and a single leading `@` stripped
/// (pasted mentions keep showing up with one). Anything that does not parse
/// as an http(s) URL is dropped and counted so the view can report it.
fn parse_links(raw: &str) -> (Vec<String>, usize) {
    let mut accepted = Vec::new();
    let mut rejected = 0;
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let candidate = trimmed.strip_prefix('@').unwrap_or(trimmed);
        match Url::parse(candidate) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                accepted.push(candidate.to_owned());
            }
            _ => rejected += 1,
        }
    }
    (accepted, rejected)
}
