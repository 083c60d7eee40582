//! Login session persisted between runs as `.levee_session.ron`.

use std::fs;
use std::path::Path;

use console_logging::{console_error, console_info, console_warn};
use serde::{Deserialize, Serialize};

use crate::storage::AtomicFileWriter;

const SESSION_FILENAME: &str = ".levee_session.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoredSession {
    pub bearer_token: String,
    pub username: String,
}

/// Loads a previously saved session. Missing, unreadable or empty sessions
/// all come back as `None`; the console then runs anonymously.
pub fn load_session(dir: &Path) -> Option<StoredSession> {
    let path = dir.join(SESSION_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            console_warn!("Failed to read session from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<StoredSession>(&content) {
        Ok(session) if !session.bearer_token.is_empty() => {
            console_info!("Resuming session for {} from {:?}", session.username, path);
            Some(session)
        }
        Ok(_) => None,
        Err(err) => {
            console_warn!("Failed to parse session from {:?}: {}", path, err);
            None
        }
    }
}

/// Saves the session atomically next to where it is loaded from.
pub fn save_session(dir: &Path, session: &StoredSession) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(session, pretty) {
        Ok(text) => text,
        Err(err) => {
            console_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(dir.to_path_buf());
    if let Err(err) = writer.write(SESSION_FILENAME, &content) {
        console_error!("Failed to write session to {:?}: {}", dir, err);
    }
}
