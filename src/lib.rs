pub mod config;
pub mod content;
pub mod icons;
pub mod loading_messages;
pub mod quiz;
pub mod services;
pub mod state;
pub mod table_display;
pub mod ui;
pub mod utils;
pub mod widgets;

// Keep the flat paths the logging macros expand to
pub use utils::dual_logging;
pub use utils::logging;
