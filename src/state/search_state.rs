use super::fetch_state::FetchState;
use crate::content::{Category, Insight, NewsItem, Query, QuizItem};

/// The three result tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Insights,
    News,
    Quiz,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Insights, Tab::News, Tab::Quiz];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Insights => "Insights",
            Tab::News => "News",
            Tab::Quiz => "Quiz",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Insights => 0,
            Tab::News => 1,
            Tab::Quiz => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Self::ALL.get(index).copied()
    }

    pub fn next(&self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Content category rendered by this tab
    pub fn category(&self) -> Category {
        match self {
            Tab::Insights => Category::Insights,
            Tab::News => Category::News,
            Tab::Quiz => Category::Quiz,
        }
    }
}

/// Everything a search session displays.
///
/// Owned by `SearchOrchestrator`; read-only for everyone else.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub(crate) query: Option<Query>,
    pub(crate) generation: u64,
    pub(crate) insights: FetchState<Insight>,
    pub(crate) news: FetchState<NewsItem>,
    pub(crate) quiz: FetchState<QuizItem>,
    pub(crate) active_tab: Tab,
}

impl SearchState {
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Incremented on every submit and reset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn insights(&self) -> &FetchState<Insight> {
        &self.insights
    }

    pub fn news(&self) -> &FetchState<NewsItem> {
        &self.news
    }

    pub fn quiz(&self) -> &FetchState<QuizItem> {
        &self.quiz
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn is_loading(&self, category: Category) -> bool {
        match category {
            Category::Insights => self.insights.is_loading(),
            Category::News => self.news.is_loading(),
            Category::Quiz => self.quiz.is_loading(),
        }
    }

    pub fn item_count(&self, category: Category) -> usize {
        match category {
            Category::Insights => self.insights.len(),
            Category::News => self.news.len(),
            Category::Quiz => self.quiz.len(),
        }
    }

    /// True once all three categories have settled
    pub fn is_settled(&self) -> bool {
        Category::ALL.iter().all(|c| !self.is_loading(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycling() {
        assert_eq!(Tab::default(), Tab::Insights);
        assert_eq!(Tab::Insights.next(), Tab::News);
        assert_eq!(Tab::Quiz.next(), Tab::Insights);
        assert_eq!(Tab::Insights.previous(), Tab::Quiz);
        assert_eq!(Tab::from_index(2), Some(Tab::Quiz));
        assert_eq!(Tab::from_index(3), None);
    }

    #[test]
    fn test_initial_state_is_settled() {
        let state = SearchState::default();
        assert!(state.query().is_none());
        assert!(state.is_settled());
        assert_eq!(state.active_tab(), Tab::Insights);
    }
}
