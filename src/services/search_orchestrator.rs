use crate::content::{Category, ContentProvider, Insight, NewsItem, Query, QuizItem, Region};
use crate::state::{SearchState, StateDispatcher, StateEvent, StateSubscriber, Tab};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Result of one provider call, tagged with the query generation that issued it
#[derive(Debug)]
struct FetchOutcome {
    generation: u64,
    payload: FetchPayload,
}

#[derive(Debug)]
enum FetchPayload {
    Insights(Vec<Insight>),
    News(Vec<NewsItem>),
    Quiz(Vec<QuizItem>),
}

impl FetchPayload {
    fn empty(category: Category) -> Self {
        match category {
            Category::Insights => FetchPayload::Insights(Vec::new()),
            Category::News => FetchPayload::News(Vec::new()),
            Category::Quiz => FetchPayload::Quiz(Vec::new()),
        }
    }

    fn category(&self) -> Category {
        match self {
            FetchPayload::Insights(_) => Category::Insights,
            FetchPayload::News(_) => Category::News,
            FetchPayload::Quiz(_) => Category::Quiz,
        }
    }
}

/// Sends an empty outcome if a fetch task ends without reporting,
/// so a panicking provider cannot leave a category loading forever.
struct OutcomeGuard {
    sender: UnboundedSender<FetchOutcome>,
    generation: u64,
    category: Category,
    sent: bool,
}

impl OutcomeGuard {
    fn send(mut self, payload: FetchPayload) {
        self.sent = true;
        // Receiver gone means the orchestrator was dropped
        let _ = self.sender.send(FetchOutcome {
            generation: self.generation,
            payload,
        });
    }
}

impl Drop for OutcomeGuard {
    fn drop(&mut self) {
        if !self.sent {
            debug!(target: "search", "{} task for generation {} ended without a result", self.category, self.generation);
            let _ = self.sender.send(FetchOutcome {
                generation: self.generation,
                payload: FetchPayload::empty(self.category),
            });
        }
    }
}

/// Owns the current query and the three fetch states.
///
/// Each submit spawns one task per category on the runtime. Outcomes come
/// back over a channel and are applied on the caller's thread, either by
/// `poll_completions` (UI loop) or by `wait_for`/`settle` (async callers).
/// A new submit or reset aborts the previous tasks and bumps the query
/// generation, so anything still in the channel from an older query is
/// discarded.
pub struct SearchOrchestrator {
    provider: Arc<dyn ContentProvider>,
    runtime: Handle,
    state: SearchState,
    dispatcher: StateDispatcher,
    in_flight: HashMap<Category, JoinHandle<()>>,
    sender: UnboundedSender<FetchOutcome>,
    receiver: UnboundedReceiver<FetchOutcome>,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn ContentProvider>, runtime: Handle) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        info!(target: "search", "Search orchestrator using provider '{}'", provider.name());
        Self {
            provider,
            runtime,
            state: SearchState::default(),
            dispatcher: StateDispatcher::new(),
            in_flight: HashMap::new(),
            sender,
            receiver,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn dispatcher(&self) -> &StateDispatcher {
        &self.dispatcher
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn StateSubscriber>) {
        self.dispatcher.subscribe(subscriber);
    }

    /// True while the insights call of the current query is pending.
    /// News and quiz have their own flags on `state()`.
    pub fn is_query_in_flight(&self) -> bool {
        self.state.insights.is_loading()
    }

    /// Number of provider tasks not yet settled
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Start a fetch cycle. Returns false, changing nothing, for a blank industry.
    pub fn submit_query(&mut self, industry: &str, region: Region) -> bool {
        let Some(query) = Query::new(industry, region) else {
            debug!(target: "search", "Ignoring blank industry");
            return false;
        };

        self.cancel_in_flight();
        self.state.generation += 1;
        let generation = self.state.generation;

        info!(target: "search", "Submitting {} as generation {}", query, generation);

        self.state.query = Some(query.clone());
        self.state.insights.begin();
        self.state.news.begin();
        self.state.quiz.begin();

        self.dispatch(StateEvent::QuerySubmitted {
            query: query.clone(),
            generation,
        });
        for category in Category::ALL {
            self.dispatch(StateEvent::FetchStarted {
                category,
                generation,
            });
        }
        self.set_active_tab(Tab::Insights);

        for category in Category::ALL {
            self.spawn_fetch(category, query.clone(), generation);
        }

        true
    }

    /// Back to the entry screen: no query, nothing loaded, nothing pending
    pub fn reset_search(&mut self) {
        self.cancel_in_flight();
        self.state.generation += 1;
        let generation = self.state.generation;

        info!(target: "search", "Resetting search (generation {})", generation);

        self.state.query = None;
        self.state.insights.clear();
        self.state.news.clear();
        self.state.quiz.clear();

        self.dispatch(StateEvent::QueryCleared { generation });
        for category in Category::ALL {
            self.dispatch(StateEvent::FetchCleared { category });
        }
        self.set_active_tab(Tab::Insights);
    }

    /// Change the displayed tab. Never touches fetch state.
    pub fn set_active_tab(&mut self, tab: Tab) -> bool {
        let from = self.state.active_tab;
        if from == tab {
            return false;
        }
        self.state.active_tab = tab;
        debug!(target: "search", "Tab {} -> {}", from.title(), tab.title());
        self.dispatch(StateEvent::TabChanged { from, to: tab });
        true
    }

    /// Apply every outcome that has already arrived. Never blocks.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.receiver.try_recv() {
            if self.apply(outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until `category` has settled for the current query
    pub async fn wait_for(&mut self, category: Category) {
        while self.state.is_loading(category) {
            match self.receiver.recv().await {
                Some(outcome) => {
                    self.apply(outcome);
                }
                None => break,
            }
        }
    }

    /// Wait until all three categories have settled
    pub async fn settle(&mut self) {
        for category in Category::ALL {
            self.wait_for(category).await;
        }
    }

    fn spawn_fetch(&mut self, category: Category, query: Query, generation: u64) {
        let provider = Arc::clone(&self.provider);
        let guard = OutcomeGuard {
            sender: self.sender.clone(),
            generation,
            category,
            sent: false,
        };

        let handle = self.runtime.spawn(async move {
            let payload = fetch_category(provider.as_ref(), category, &query).await;
            guard.send(payload);
        });

        self.in_flight.insert(category, handle);
    }

    fn cancel_in_flight(&mut self) {
        for (category, handle) in self.in_flight.drain() {
            if !handle.is_finished() {
                debug!(target: "search", "Cancelling in-flight {} fetch", category);
                handle.abort();
            }
        }
    }

    /// Returns false when the outcome belongs to a superseded query
    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let category = outcome.payload.category();
        if outcome.generation != self.state.generation {
            debug!(target: "search", "Discarding stale {} result from generation {} (current {})",
                   category, outcome.generation, self.state.generation);
            return false;
        }

        self.in_flight.remove(&category);
        match outcome.payload {
            FetchPayload::Insights(items) => self.state.insights.settle(items),
            FetchPayload::News(items) => self.state.news.settle(items),
            FetchPayload::Quiz(items) => self.state.quiz.settle(items),
        }

        let items = self.state.item_count(category);
        info!(target: "search", "{} settled with {} items", category, items);
        self.dispatch(StateEvent::FetchSettled {
            category,
            generation: outcome.generation,
            items,
        });
        true
    }

    fn dispatch(&mut self, event: StateEvent) {
        self.dispatcher.dispatch(event, &self.state);
    }
}

impl Drop for SearchOrchestrator {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

async fn fetch_category(
    provider: &dyn ContentProvider,
    category: Category,
    query: &Query,
) -> FetchPayload {
    match category {
        Category::Insights => {
            FetchPayload::Insights(recover(category, provider.fetch_insights(query).await))
        }
        Category::News => FetchPayload::News(recover(category, provider.fetch_news(query).await)),
        Category::Quiz => FetchPayload::Quiz(recover(category, provider.fetch_quiz(query).await)),
    }
}

/// A failed category is shown as empty; the error only goes to the log
fn recover<T>(category: Category, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            error!(target: "search", "{} fetch failed: {:#}", category, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedProvider;

    #[async_trait]
    impl ContentProvider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_insights(&self, query: &Query) -> Result<Vec<Insight>> {
            Ok(vec![Insight {
                title: query.industry().to_string(),
                body: String::new(),
                icon_key: String::new(),
            }])
        }

        async fn fetch_news(&self, _query: &Query) -> Result<Vec<NewsItem>> {
            Err(anyhow::anyhow!("offline"))
        }

        async fn fetch_quiz(&self, _query: &Query) -> Result<Vec<QuizItem>> {
            Ok(Vec::new())
        }
    }

    fn orchestrator() -> SearchOrchestrator {
        SearchOrchestrator::new(Arc::new(FixedProvider), Handle::current())
    }

    #[tokio::test]
    async fn test_blank_submit_is_ignored() {
        let mut orch = orchestrator();
        assert!(!orch.submit_query("   ", Region::World));
        assert!(orch.state().query().is_none());
        assert_eq!(orch.state().generation(), 0);
        assert!(!orch.is_query_in_flight());
        assert_eq!(orch.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_resets_to_loading() {
        let mut orch = orchestrator();
        orch.set_active_tab(Tab::Quiz);
        assert!(orch.submit_query(" Retail ", Region::Germany));

        let state = orch.state();
        assert_eq!(state.query().unwrap().industry(), "Retail");
        assert_eq!(state.active_tab(), Tab::Insights);
        assert!(Category::ALL.iter().all(|c| state.is_loading(*c)));
        assert!(orch.is_query_in_flight());
        assert_eq!(orch.in_flight_count(), 3);

        orch.settle().await;
        assert!(orch.state().is_settled());
        assert_eq!(orch.state().insights().len(), 1);
        assert!(orch.state().news().is_empty());
        assert_eq!(orch.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded() {
        let mut orch = orchestrator();
        orch.submit_query("Energy", Region::World);
        let stale = orch.state().generation();
        orch.submit_query("Mining", Region::World);

        let applied = orch.apply(FetchOutcome {
            generation: stale,
            payload: FetchPayload::News(vec![NewsItem {
                title: "old".to_string(),
                url: None,
                source: None,
                snippet: String::new(),
                published_label: None,
            }]),
        });
        assert!(!applied);
        assert!(orch.state().news().is_loading());
        assert!(orch.state().news().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let mut orch = orchestrator();
        orch.submit_query("Energy", Region::Japan);
        orch.reset_search();

        assert!(orch.state().query().is_none());
        assert!(orch.state().is_settled());
        assert_eq!(orch.in_flight_count(), 0);

        // Outcomes of the aborted tasks arrive late and must not apply
        tokio::task::yield_now().await;
        assert_eq!(orch.poll_completions(), 0);
        assert!(orch.state().insights().is_empty());
    }

    #[test]
    fn test_recover_maps_errors_to_empty() {
        let ok: Vec<u8> = recover(Category::News, Ok(vec![1]));
        assert_eq!(ok, vec![1]);
        let failed: Vec<u8> = recover(Category::News, Err(anyhow::anyhow!("boom")));
        assert!(failed.is_empty());
    }
}
