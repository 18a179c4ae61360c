use super::{Insight, NewsItem, Query, QuizItem};
use anyhow::Result;
use async_trait::async_trait;

/// Source of generated industry content.
///
/// The three operations are independent; an implementation must not
/// assume they are called together or in any order.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Name used in log lines
    fn name(&self) -> &str;

    async fn fetch_insights(&self, query: &Query) -> Result<Vec<Insight>>;

    async fn fetch_news(&self, query: &Query) -> Result<Vec<NewsItem>>;

    async fn fetch_quiz(&self, query: &Query) -> Result<Vec<QuizItem>>;
}
