//! UI widgets for the TUI application
//!
//! Each widget keeps its own view state (scroll, selection, highlight) and
//! renders from the orchestrator's state handed to it at draw time.

pub mod debug_widget;
pub mod help_widget;
pub mod insights_widget;
pub mod news_widget;
pub mod quiz_widget;
pub mod region_picker_widget;
pub mod search_widget;
pub mod tab_bar_widget;
