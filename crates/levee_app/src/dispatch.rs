//! Synchronous message dispatch: take the state, run the update function,
//! hand the produced effects to the runner.

use std::sync::mpsc;
use std::time::Duration;

use levee_core::{update, Msg, TrackerPhase, TrackerState, TrackerView};

use crate::effects::EffectRunner;

pub struct Dispatcher {
    state: TrackerState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Dispatcher {
    pub fn new(state: TrackerState, runner: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state,
            runner,
            msg_rx,
        }
    }

    /// Runs one message through the update function. Returns true when the
    /// state changed in a way the screen should reflect.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        console_logging::set_poll_cycle(state.poll_cycles());
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.runner.run(effects);
        was_dirty
    }

    /// Waits up to `wait` for the next message, then drains whatever else is
    /// queued. Returns true when any dispatched message dirtied the state.
    pub fn pump(&mut self, wait: Duration) -> bool {
        let mut dirty = false;
        if let Ok(msg) = self.msg_rx.recv_timeout(wait) {
            dirty |= self.dispatch(msg);
            while let Ok(msg) = self.msg_rx.try_recv() {
                dirty |= self.dispatch(msg);
            }
        }
        dirty
    }

    pub fn view(&self) -> TrackerView {
        self.state.view()
    }

    pub fn phase(&self) -> TrackerPhase {
        self.state.phase()
    }
}
