//! Worker-thread runtime for the console.
//!
//! The dispatch loop stays synchronous; all HTTP calls and timers run on a
//! tokio runtime owned by a dedicated thread. Commands go in over a channel,
//! results and timer fires come back as [`ConsoleEvent`]s. A cancellation
//! token generation is swapped on `CancelTimers`, so sleeps scheduled for a
//! finished job die instead of firing.

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use levee_api::{ApiClient, ApiError, ExtractApi, RequestContext, SubmitOutcome, TaskProgress};
use levee_core::JobEpoch;
use tokio_util::sync::CancellationToken;

/// Timing knobs for the scheduled callbacks.
#[derive(Debug, Clone)]
pub struct TimerSettings {
    /// Delay before the next poll after a successful cycle.
    pub poll_delay: Duration,
    /// Delay before the next poll after a failed cycle.
    pub backoff_delay: Duration,
    /// Interval of the cosmetic thinking indicator.
    pub indicator_interval: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            poll_delay: Duration::from_millis(1000),
            backoff_delay: Duration::from_millis(2000),
            indicator_interval: Duration::from_millis(600),
        }
    }
}

pub enum ConsoleCommand {
    Submit {
        epoch: JobEpoch,
        kb_id: String,
        urls: Vec<String>,
    },
    FetchProgress {
        epoch: JobEpoch,
        task_id: String,
    },
    FetchLogs {
        epoch: JobEpoch,
        task_id: String,
    },
    SchedulePoll {
        epoch: JobEpoch,
        delay: Duration,
    },
    StartIndicator {
        epoch: JobEpoch,
    },
    CancelTimers,
    RefreshContents {
        kb_id: String,
    },
}

pub enum ConsoleEvent {
    SubmitFinished {
        epoch: JobEpoch,
        result: Result<SubmitOutcome, ApiError>,
    },
    ProgressFetched {
        epoch: JobEpoch,
        result: Result<TaskProgress, ApiError>,
    },
    LogsFetched {
        epoch: JobEpoch,
        result: Result<Vec<String>, ApiError>,
    },
    PollDue {
        epoch: JobEpoch,
    },
    IndicatorTick {
        epoch: JobEpoch,
    },
    ContentsRefreshed {
        result: Result<usize, ApiError>,
    },
}

pub struct ConsoleHandle {
    cmd_tx: mpsc::Sender<ConsoleCommand>,
    event_rx: mpsc::Receiver<ConsoleEvent>,
}

impl ConsoleHandle {
    pub fn new(client: Arc<ApiClient>, ctx: RequestContext, settings: TimerSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel::<ConsoleEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut timers = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                if matches!(command, ConsoleCommand::CancelTimers) {
                    timers.cancel();
                    timers = CancellationToken::new();
                    continue;
                }
                let client = client.clone();
                let ctx = ctx.clone();
                let settings = settings.clone();
                let token = timers.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), &ctx, &settings, command, token, event_tx)
                        .await;
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn send(&self, command: ConsoleCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<ConsoleEvent> {
        self.event_rx.try_recv().ok()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (mpsc::Sender<ConsoleCommand>, mpsc::Receiver<ConsoleEvent>) {
        (self.cmd_tx, self.event_rx)
    }
}

async fn handle_command(
    client: &ApiClient,
    ctx: &RequestContext,
    settings: &TimerSettings,
    command: ConsoleCommand,
    token: CancellationToken,
    event_tx: mpsc::Sender<ConsoleEvent>,
) {
    match command {
        ConsoleCommand::Submit {
            epoch,
            kb_id,
            urls,
        } => {
            let result = client.submit(ctx, &kb_id, urls).await;
            let _ = event_tx.send(ConsoleEvent::SubmitFinished { epoch, result });
        }
        ConsoleCommand::FetchProgress { epoch, task_id } => {
            let result = client.progress(ctx, &task_id).await;
            let _ = event_tx.send(ConsoleEvent::ProgressFetched { epoch, result });
        }
        ConsoleCommand::FetchLogs { epoch, task_id } => {
            let result = client.logs(ctx, &task_id).await;
            let _ = event_tx.send(ConsoleEvent::LogsFetched { epoch, result });
        }
        ConsoleCommand::SchedulePoll { epoch, delay } => {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(ConsoleEvent::PollDue { epoch });
                }
            }
        }
        ConsoleCommand::StartIndicator { epoch } => loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(settings.indicator_interval) => {
                    if event_tx.send(ConsoleEvent::IndicatorTick { epoch }).is_err() {
                        break;
                    }
                }
            }
        },
        ConsoleCommand::RefreshContents { kb_id } => {
            let result = client
                .knowledge_base_contents(ctx, &kb_id)
                .await
                .map(|items| items.len());
            let _ = event_tx.send(ConsoleEvent::ContentsRefreshed { result });
        }
        // Swallowed by the command loop before dispatch.
        ConsoleCommand::CancelTimers => {}
    }
}
