// Actions the key mapper can produce

use crate::state::Tab;

/// Which top-level screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Industry field and region, no query yet
    Entry,
    /// Tabs for a submitted query
    Results,
}

/// App-level actions. Keys without one go to the focused widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ShowHelp,
    ShowDebugInfo,
    Quit,
    /// Submit the industry field
    Submit,
    OpenRegionPicker,
    NextTab,
    PreviousTab,
    SelectTab(Tab),
    /// Drop the current query and go back to the entry screen
    NewSearch,
}
