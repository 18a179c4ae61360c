// Scripted in-memory provider shared by the integration tests
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use industry_lens::content::{Category, ContentProvider, Insight, NewsItem, Query, QuizItem};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// What one category call returns
#[derive(Clone)]
pub enum Reply<T> {
    Items(Vec<T>),
    Fail(String),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<Vec<T>> {
        match self {
            Reply::Items(items) => Ok(items),
            Reply::Fail(message) => Err(anyhow!(message)),
        }
    }
}

/// Replies for one industry. A gate holds every call for that industry
/// until it is notified; a per-category gate holds only that category.
#[derive(Clone)]
pub struct Script {
    pub insights: Reply<Insight>,
    pub news: Reply<NewsItem>,
    pub quiz: Reply<QuizItem>,
    pub gate: Option<Arc<Notify>>,
    pub category_gates: HashMap<Category, Arc<Notify>>,
}

impl Script {
    pub fn new(insights: usize, news: usize, quiz: usize) -> Self {
        Self {
            insights: Reply::Items(insights_fixture(insights)),
            news: Reply::Items(news_fixture(news)),
            quiz: Reply::Items(quiz_fixture(quiz)),
            gate: None,
            category_gates: HashMap::new(),
        }
    }

    pub fn with_news(mut self, news: Reply<NewsItem>) -> Self {
        self.news = news;
        self
    }

    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn gate_category(mut self, category: Category, gate: Arc<Notify>) -> Self {
        self.category_gates.insert(category, gate);
        self
    }
}

#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<HashMap<Category, Arc<AtomicUsize>>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, industry: &str, script: Script) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(industry.to_string(), script);
        self
    }

    pub fn calls(&self, category: Category) -> usize {
        self.counter(category).load(Ordering::SeqCst)
    }

    fn counter(&self, category: Category) -> Arc<AtomicUsize> {
        Arc::clone(self.calls.lock().unwrap().entry(category).or_default())
    }

    async fn begin(&self, category: Category, query: &Query) -> Script {
        self.counter(category).fetch_add(1, Ordering::SeqCst);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .get(query.industry())
            .cloned()
            .unwrap_or_else(|| Script::new(0, 0, 0));

        if let Some(gate) = &script.gate {
            gate.notified().await;
        }
        if let Some(gate) = script.category_gates.get(&category) {
            gate.notified().await;
        }
        script
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_insights(&self, query: &Query) -> Result<Vec<Insight>> {
        self.begin(Category::Insights, query)
            .await
            .insights
            .into_result()
    }

    async fn fetch_news(&self, query: &Query) -> Result<Vec<NewsItem>> {
        self.begin(Category::News, query).await.news.into_result()
    }

    async fn fetch_quiz(&self, query: &Query) -> Result<Vec<QuizItem>> {
        self.begin(Category::Quiz, query).await.quiz.into_result()
    }
}

pub fn insights_fixture(count: usize) -> Vec<Insight> {
    (1..=count)
        .map(|n| Insight {
            title: format!("Insight {}", n),
            body: format!("Body {}", n),
            icon_key: "TrendingUp".to_string(),
        })
        .collect()
}

pub fn news_fixture(count: usize) -> Vec<NewsItem> {
    (1..=count)
        .map(|n| NewsItem {
            title: format!("Headline {}", n),
            url: Some(format!("https://news.example/{}", n)),
            source: Some("Wire".to_string()),
            snippet: String::new(),
            published_label: Some(format!("{} hours ago", n)),
        })
        .collect()
}

/// Question n has its correct answer at n % 4
pub fn quiz_fixture(count: usize) -> Vec<QuizItem> {
    (0..count)
        .map(|n| QuizItem {
            prompt: format!("Question {}", n + 1),
            choices: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index: n % 4,
            explanation: format!("Explanation {}", n + 1),
        })
        .collect()
}

/// Let spawned tasks on the test runtime make progress
pub async fn let_tasks_run() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
