use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use console_logging::{console_info, console_warn};
use serde::{Deserialize, Serialize};

/// Console configuration. Read from a RON file (`levee.ron` by default),
/// then overridden by the `LEVEE_*` environment variables. Missing file or
/// fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the console service.
    pub base_url: String,
    /// Knowledge base the tracker binds to.
    pub kb_id: String,
    /// Login name; the console stays anonymous when unset.
    pub username: Option<String>,
    pub password: Option<String>,
    /// Poll delay after a successful cycle, in milliseconds.
    pub poll_interval_ms: u64,
    /// Poll delay after a failed cycle, in milliseconds.
    pub poll_backoff_ms: u64,
    /// Thinking-indicator interval, in milliseconds.
    pub indicator_interval_ms: u64,
    /// Upper bound on poll cycles per job; exhausting it fails the job.
    pub max_poll_cycles: u64,
    /// Directory exported reports are written to.
    pub output_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            kb_id: "kb_default".to_string(),
            username: None,
            password: None,
            poll_interval_ms: 1000,
            poll_backoff_ms: 2000,
            indicator_interval_ms: 600,
            max_poll_cycles: 600,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ConsoleConfig {
    /// Loads the config file and applies environment overrides on top.
    pub fn load(path: &Path) -> Self {
        let mut config = Self::read_file(path).unwrap_or_default();
        config.apply_env_overrides();
        config
    }

    fn read_file(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                console_warn!("Failed to read config from {:?}: {}", path, err);
                return None;
            }
        };
        match ron::from_str(&content) {
            Ok(config) => {
                console_info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(err) => {
                console_warn!("Failed to parse config from {:?}: {}", path, err);
                None
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("LEVEE_BASE_URL") {
            self.base_url = value;
        }
        if let Ok(value) = std::env::var("LEVEE_KB") {
            self.kb_id = value;
        }
        if let Ok(value) = std::env::var("LEVEE_USERNAME") {
            self.username = Some(value);
        }
        if let Ok(value) = std::env::var("LEVEE_PASSWORD") {
            self.password = Some(value);
        }
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn backoff_delay(&self) -> Duration {
        Duration::from_millis(self.poll_backoff_ms)
    }

    pub fn indicator_interval(&self) -> Duration {
        Duration::from_millis(self.indicator_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig::read_file(&dir.path().join("levee.ron"));
        assert_eq!(config, None);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levee.ron");
        fs::write(
            &path,
            r#"(base_url: "http://levee.example:9000/", kb_id: "kb_rain")"#,
        )
        .unwrap();

        let config = ConsoleConfig::read_file(&path).unwrap();
        assert_eq!(config.base_url, "http://levee.example:9000/");
        assert_eq!(config.kb_id, "kb_rain");
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.max_poll_cycles, 600);
    }

    #[test]
    fn unparseable_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levee.ron");
        fs::write(&path, "not ron at all {{{").unwrap();
        assert_eq!(ConsoleConfig::read_file(&path), None);
    }

    #[test]
    fn delays_come_from_the_millisecond_fields() {
        let config = ConsoleConfig {
            poll_interval_ms: 250,
            poll_backoff_ms: 400,
            indicator_interval_ms: 90,
            ..ConsoleConfig::default()
        };
        assert_eq!(config.poll_delay(), Duration::from_millis(250));
        assert_eq!(config.backoff_delay(), Duration::from_millis(400));
        assert_eq!(config.indicator_interval(), Duration::from_millis(90));
    }
}
