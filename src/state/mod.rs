//! State management components
//!
//! The search state is owned by the orchestrator and mutated only
//! through it. Every mutation is announced as a `StateEvent` so views
//! observing that slice can react.

pub mod dispatcher;
pub mod events;
pub mod fetch_state;
pub mod search_state;

pub use dispatcher::{StateDispatcher, StateSubscriber};
pub use events::{StateEvent, StateSlice};
pub use fetch_state::FetchState;
pub use search_state::{SearchState, Tab};
