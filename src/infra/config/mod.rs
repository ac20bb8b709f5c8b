mod core_config;
mod file_config;
mod loader;

pub use core_config::{ActionConfig, CoreConfig, HistoryConfig, LogConfig};
pub use loader::load;
