use std::fmt;
use std::sync::Arc;

/// Items and loading flag for one content category.
///
/// Items live behind an `Arc`; every `begin`/`settle` installs a fresh
/// list, so pointer identity tells consumers whether the list changed.
pub struct FetchState<T> {
    items: Arc<Vec<T>>,
    is_loading: bool,
}

impl<T> FetchState<T> {
    /// Pre-search state: nothing loaded, nothing loading
    pub fn idle() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            is_loading: false,
        }
    }

    /// Start of a fetch cycle
    pub fn begin(&mut self) {
        self.items = Arc::new(Vec::new());
        self.is_loading = true;
    }

    /// The provider call settled, possibly with nothing
    pub fn settle(&mut self, items: Vec<T>) {
        self.items = Arc::new(items);
        self.is_loading = false;
    }

    pub fn clear(&mut self) {
        *self = Self::idle();
    }

    pub fn items(&self) -> &Arc<Vec<T>> {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T> Clone for FetchState<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            is_loading: self.is_loading,
        }
    }
}

impl<T> fmt::Debug for FetchState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchState")
            .field("items", &self.items.len())
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state: FetchState<u32> = FetchState::idle();
        assert!(!state.is_loading());
        assert!(state.is_empty());

        state.begin();
        assert!(state.is_loading());
        assert!(state.is_empty());

        state.settle(vec![1, 2, 3]);
        assert!(!state.is_loading());
        assert_eq!(state.len(), 3);

        state.clear();
        assert!(!state.is_loading());
        assert!(state.is_empty());
    }

    #[test]
    fn test_each_settle_changes_identity() {
        let mut state: FetchState<u32> = FetchState::idle();
        state.settle(Vec::new());
        let first = Arc::clone(state.items());
        state.settle(Vec::new());
        assert!(!Arc::ptr_eq(&first, state.items()));
    }
}
