use serde::Deserialize;

use crate::infra::config::{ActionConfig, CoreConfig, HistoryConfig, LogConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub actions: Option<FileActionConfig>,
    pub history: Option<FileHistoryConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut CoreConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(actions) = self.actions {
            actions.merge_into(&mut config.actions);
        }

        if let Some(history) = self.history {
            history.merge_into(&mut config.history);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileActionConfig {
    pub undo_window_ms: Option<u64>,
}

impl FileActionConfig {
    fn merge_into(self, config: &mut ActionConfig) {
        if let Some(undo_window_ms) = self.undo_window_ms {
            config.undo_window_ms = undo_window_ms;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileHistoryConfig {
    pub page_size: Option<usize>,
}

impl FileHistoryConfig {
    fn merge_into(self, config: &mut HistoryConfig) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }
}
