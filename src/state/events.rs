//! State events and the slices they touch

use super::search_state::Tab;
use crate::content::{Category, Query};

/// Independently observable parts of the search state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateSlice {
    Query,
    Insights,
    News,
    Quiz,
    ActiveTab,
}

impl From<Category> for StateSlice {
    fn from(category: Category) -> Self {
        match category {
            Category::Insights => StateSlice::Insights,
            Category::News => StateSlice::News,
            Category::Quiz => StateSlice::Quiz,
        }
    }
}

/// Events emitted by the orchestrator after it mutated state
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    /// A new query replaced the previous one
    QuerySubmitted { query: Query, generation: u64 },

    /// The query was cleared (back to the entry screen)
    QueryCleared { generation: u64 },

    /// A category was reset to loading for the current generation
    FetchStarted { category: Category, generation: u64 },

    /// A category settled; `items` is what will be displayed
    FetchSettled {
        category: Category,
        generation: u64,
        items: usize,
    },

    /// A category was emptied without loading
    FetchCleared { category: Category },

    /// The active tab changed
    TabChanged { from: Tab, to: Tab },
}

impl StateEvent {
    /// The slice this event reports on
    pub fn slice(&self) -> StateSlice {
        match self {
            StateEvent::QuerySubmitted { .. } | StateEvent::QueryCleared { .. } => {
                StateSlice::Query
            }
            StateEvent::FetchStarted { category, .. }
            | StateEvent::FetchSettled { category, .. }
            | StateEvent::FetchCleared { category } => (*category).into(),
            StateEvent::TabChanged { .. } => StateSlice::ActiveTab,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_slices() {
        assert_eq!(
            StateEvent::FetchSettled {
                category: Category::News,
                generation: 1,
                items: 0
            }
            .slice(),
            StateSlice::News
        );
        assert_eq!(
            StateEvent::TabChanged {
                from: Tab::Insights,
                to: Tab::Quiz
            }
            .slice(),
            StateSlice::ActiveTab
        );
        assert_eq!(
            StateEvent::QueryCleared { generation: 2 }.slice(),
            StateSlice::Query
        );
    }
}
