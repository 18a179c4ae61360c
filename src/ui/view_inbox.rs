use crate::state::{SearchState, StateEvent, StateSlice, StateSubscriber};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Events waiting for the UI to route them to its widgets
pub type ViewEvents = Rc<RefCell<VecDeque<StateEvent>>>;

/// Collects events for the slices the widgets render. The app drains the
/// queue after every orchestrator call, so widget state (scroll, selection,
/// the loading ticker) follows the data without the dispatcher owning them.
pub struct ViewInbox {
    events: ViewEvents,
}

impl ViewInbox {
    pub fn new(events: ViewEvents) -> Self {
        Self { events }
    }
}

impl StateSubscriber for ViewInbox {
    fn name(&self) -> &str {
        "ViewInbox"
    }

    fn slices(&self) -> &[StateSlice] {
        &[
            StateSlice::Query,
            StateSlice::Insights,
            StateSlice::News,
            StateSlice::Quiz,
        ]
    }

    fn on_state_event(&mut self, event: &StateEvent, _state: &SearchState) {
        self.events.borrow_mut().push_back(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use crate::state::{StateDispatcher, Tab};

    #[test]
    fn test_inbox_skips_tab_changes() {
        let events = ViewEvents::default();
        let mut dispatcher = StateDispatcher::new();
        dispatcher.subscribe(Box::new(ViewInbox::new(Rc::clone(&events))));

        let state = SearchState::default();
        dispatcher.dispatch(
            StateEvent::TabChanged {
                from: Tab::Insights,
                to: Tab::News,
            },
            &state,
        );
        dispatcher.dispatch(StateEvent::FetchCleared { category: Category::News }, &state);

        let queued: Vec<_> = events.borrow_mut().drain(..).collect();
        assert_eq!(queued, vec![StateEvent::FetchCleared { category: Category::News }]);
    }
}
