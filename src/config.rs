//! Process configuration from the environment

use crate::responder::ResponderConfig;
use crate::runtime::SessionLimits;
use std::path::{Path, PathBuf};

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Root for chat logs and the results collection
    pub data_dir: PathBuf,
    pub port: u16,
    pub responder: ResponderConfig,
    pub sessions: SessionLimits,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("SEDULUR_DATA_DIR").map_or_else(
            |_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".sedulur-rasa")
            },
            PathBuf::from,
        );

        let port = std::env::var("SEDULUR_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            data_dir,
            port,
            responder: ResponderConfig::from_env(),
            sessions: SessionLimits::from_env(),
        }
    }

    /// Directory holding one `<session>.csv` per chat session
    pub fn chat_dir(&self) -> PathBuf {
        self.data_dir.join("chat_history")
    }

    pub fn results_path(&self) -> PathBuf {
        self.data_dir.join("test_results.json")
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_paths() {
        let config = AppConfig {
            data_dir: PathBuf::from("/srv/sedulur"),
            port: DEFAULT_PORT,
            responder: ResponderConfig::default(),
            sessions: SessionLimits::default(),
        };
        assert_eq!(config.chat_dir(), PathBuf::from("/srv/sedulur/chat_history"));
        assert_eq!(
            config.results_path(),
            PathBuf::from("/srv/sedulur/test_results.json")
        );
    }
}
