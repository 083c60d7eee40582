//! Bridges tracker effects to the worker runtime and pumps its events back
//! into tracker messages.

use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use console_logging::{console_debug, console_info, console_warn};
use levee_api::{format_log_line, JobPhase, SubmitOutcome, TaskProgress};
use levee_core::{Effect, Msg, PollDelay, ProgressSnapshot, ReportedPhase};

use crate::runtime::{ConsoleCommand, ConsoleEvent, ConsoleHandle, TimerSettings};

pub struct EffectRunner {
    cmd_tx: mpsc::Sender<ConsoleCommand>,
    timers: TimerSettings,
}

impl EffectRunner {
    pub fn new(handle: ConsoleHandle, timers: TimerSettings, msg_tx: mpsc::Sender<Msg>) -> Self {
        let (cmd_tx, event_rx) = handle.into_parts();
        spawn_event_pump(event_rx, msg_tx);
        Self { cmd_tx, timers }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitExtraction {
                    epoch,
                    kb_id,
                    urls,
                } => {
                    console_info!(
                        "SubmitExtraction epoch={} kb={} urls={}",
                        epoch,
                        kb_id,
                        urls.len()
                    );
                    self.send(ConsoleCommand::Submit {
                        epoch,
                        kb_id,
                        urls,
                    });
                }
                Effect::FetchProgress { epoch, task_id } => {
                    self.send(ConsoleCommand::FetchProgress { epoch, task_id });
                }
                Effect::FetchLogs { epoch, task_id } => {
                    self.send(ConsoleCommand::FetchLogs { epoch, task_id });
                }
                Effect::SchedulePoll { epoch, delay } => {
                    let delay = match delay {
                        PollDelay::Normal => self.timers.poll_delay,
                        PollDelay::Backoff => self.timers.backoff_delay,
                    };
                    self.send(ConsoleCommand::SchedulePoll { epoch, delay });
                }
                Effect::StartIndicator { epoch } => {
                    self.send(ConsoleCommand::StartIndicator { epoch });
                }
                Effect::CancelTimers => self.send(ConsoleCommand::CancelTimers),
                Effect::RefreshContents { kb_id } => {
                    self.send(ConsoleCommand::RefreshContents { kb_id });
                }
            }
        }
    }

    fn send(&self, command: ConsoleCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

fn spawn_event_pump(event_rx: mpsc::Receiver<ConsoleEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                ConsoleEvent::SubmitFinished { epoch, result } => match result {
                    Ok(SubmitOutcome::Started { task_id, message }) => {
                        if let Some(message) = message {
                            console_info!("Server accepted submission: {}", message);
                        }
                        Msg::SubmitSucceeded {
                            epoch,
                            task_id,
                            created_at: Utc::now().to_rfc3339(),
                        }
                    }
                    Ok(SubmitOutcome::CompletedInline { message }) => {
                        Msg::SubmitCompletedInline { epoch, message }
                    }
                    Err(err) => {
                        console_warn!("Submission failed: {}", err);
                        Msg::SubmitFailed {
                            epoch,
                            error: err.to_string(),
                        }
                    }
                },
                ConsoleEvent::ProgressFetched { epoch, result } => match result {
                    Ok(progress) => Msg::ProgressFetched {
                        epoch,
                        snapshot: map_progress(progress),
                    },
                    Err(err) => {
                        console_warn!("Progress fetch failed: {}", err);
                        Msg::ProgressFetchFailed {
                            epoch,
                            error: err.to_string(),
                        }
                    }
                },
                ConsoleEvent::LogsFetched { epoch, result } => match result {
                    Ok(lines) => Msg::LogsFetched {
                        epoch,
                        lines: lines.iter().map(|line| format_log_line(line)).collect(),
                    },
                    Err(err) => {
                        // Logs are advisory; the next cycle fetches them again.
                        console_debug!("Log fetch failed: {}", err);
                        continue;
                    }
                },
                ConsoleEvent::PollDue { epoch } => Msg::PollDue { epoch },
                ConsoleEvent::IndicatorTick { epoch } => Msg::IndicatorTick { epoch },
                ConsoleEvent::ContentsRefreshed { result } => {
                    match result {
                        Ok(count) => console_info!("Knowledge base now lists {} documents", count),
                        Err(err) => console_warn!("Contents refresh failed: {}", err),
                    }
                    continue;
                }
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn map_progress(progress: TaskProgress) -> ProgressSnapshot {
    ProgressSnapshot {
        current: progress.current,
        total: progress.total,
        current_url: progress.current_url,
        phase: map_phase(JobPhase::from_raw(&progress.status)),
        error: progress.error,
    }
}

fn map_phase(phase: JobPhase) -> ReportedPhase {
    match phase {
        JobPhase::Running => ReportedPhase::Running,
        JobPhase::Completed => ReportedPhase::Completed,
        JobPhase::Failed => ReportedPhase::Failed,
    }
}
