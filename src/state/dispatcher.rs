//! State dispatcher for pub-sub pattern

use super::events::{StateEvent, StateSlice};
use super::search_state::SearchState;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Trait for components that observe parts of the search state
pub trait StateSubscriber {
    /// Get subscriber name for debugging
    fn name(&self) -> &str;

    /// Slices this subscriber wants to hear about
    fn slices(&self) -> &[StateSlice];

    /// Handle a state event. `state` already reflects the change.
    fn on_state_event(&mut self, event: &StateEvent, state: &SearchState);
}

/// Routes state events to the subscribers observing the affected slice
pub struct StateDispatcher {
    /// List of subscribers
    subscribers: Vec<Box<dyn StateSubscriber>>,

    /// Event history for debugging
    event_history: VecDeque<StateEvent>,

    /// Maximum event history size
    max_history: usize,
}

impl StateDispatcher {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            event_history: VecDeque::new(),
            max_history: 100,
        }
    }

    /// Add a subscriber
    pub fn subscribe(&mut self, subscriber: Box<dyn StateSubscriber>) {
        info!(target: "state", "Adding subscriber: {} {:?}", subscriber.name(), subscriber.slices());
        self.subscribers.push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Dispatch a state event
    pub fn dispatch(&mut self, event: StateEvent, state: &SearchState) {
        debug!(target: "state", "Dispatching event: {:?}", event);

        self.event_history.push_back(event.clone());
        if self.event_history.len() > self.max_history {
            self.event_history.pop_front();
        }

        let slice = event.slice();
        for subscriber in self
            .subscribers
            .iter_mut()
            .filter(|s| s.slices().contains(&slice))
        {
            debug!(target: "state", "Notifying subscriber: {}", subscriber.name());
            subscriber.on_state_event(&event, state);
        }
    }

    /// Get event history for debugging
    pub fn event_history(&self) -> impl Iterator<Item = &StateEvent> {
        self.event_history.iter()
    }
}

impl Default for StateDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
