//! Terminal front end: key mapping, the event loop and view plumbing

pub mod actions;
pub mod app;
pub mod key_mapper;
pub mod view_inbox;

pub use app::{run_tui, TuiApp};
