//! Levee app shell: wires the tracker core to the HTTP client, the timers
//! and the terminal.

pub mod config;
pub mod dispatch;
pub mod effects;
pub mod logging;
pub mod render;
pub mod report_export;
pub mod runtime;
pub mod session;
pub mod storage;
