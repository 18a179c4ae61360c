use super::provider::ContentProvider;
use super::sanitize::{self, RawInsight, RawNewsItem, RawQuizItem};
use super::{Category, Insight, NewsItem, Query, QuizItem};
use crate::config::config::ProviderConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Content provider backed by the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .ok_or_else(|| anyhow!("No Gemini API key. Set GEMINI_API_KEY or provider.api_key in the config file"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate<T: DeserializeOwned>(
        &self,
        category: Category,
        prompt: String,
        schema: Value,
        grounded: bool,
    ) -> Result<Vec<T>> {
        let body = build_request_body(&prompt, schema, grounded);
        let started = Instant::now();
        debug!(
            target: "provider",
            "Requesting {} from {}",
            category,
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("{} request failed", category))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("API Error ({}): {}", status, error_text));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .with_context(|| format!("Malformed {} response envelope", category))?;

        let items = match extract_text(&payload) {
            Some(text) => parse_array(&text)
                .with_context(|| format!("{} response is not a JSON array", category))?,
            None => Vec::new(),
        };

        info!(
            target: "provider",
            "Received {} {} records in {}ms",
            items.len(),
            category,
            started.elapsed().as_millis()
        );
        Ok(items)
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn fetch_insights(&self, query: &Query) -> Result<Vec<Insight>> {
        let raw: Vec<RawInsight> = self
            .generate(
                Category::Insights,
                insights_prompt(query),
                insights_schema(),
                false,
            )
            .await?;
        Ok(sanitize::insights(raw))
    }

    async fn fetch_news(&self, query: &Query) -> Result<Vec<NewsItem>> {
        let raw: Vec<RawNewsItem> = self
            .generate(Category::News, news_prompt(query), news_schema(), true)
            .await?;
        Ok(sanitize::news(raw))
    }

    async fn fetch_quiz(&self, query: &Query) -> Result<Vec<QuizItem>> {
        let raw: Vec<RawQuizItem> = self
            .generate(Category::Quiz, quiz_prompt(query), quiz_schema(), false)
            .await?;
        Ok(sanitize::quiz(raw))
    }
}

fn build_request_body(prompt: &str, schema: Value, grounded: bool) -> Value {
    let mut body = json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt }],
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": schema,
        },
    });

    if grounded {
        body["tools"] = json!([{ "googleSearch": {} }]);
    }

    body
}

/// Concatenated text of the first candidate, if any
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .first()?
        .content
        .as_ref()?
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("valid code fence pattern")
    })
}

/// Parse a JSON array, tolerating a surrounding Markdown code fence.
///
/// Elements are decoded one at a time; an element that does not fit `T`
/// is dropped with a warning and the rest are kept.
fn parse_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>> {
    let json_text = match code_fence().captures(text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => text.trim(),
    };
    let elements: Vec<Value> = serde_json::from_str(json_text)?;
    let total = elements.len();

    let items: Vec<T> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, element)| match serde_json::from_value(element) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(target: "provider", "Skipping record {}: {}", i + 1, e);
                None
            }
        })
        .collect();

    if items.len() < total {
        warn!(
            target: "provider",
            "Decoded {} of {} records",
            items.len(),
            total
        );
    }
    Ok(items)
}

fn array_of(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        },
    })
}

fn insights_schema() -> Value {
    array_of(
        json!({
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "icon": { "type": "STRING" },
        }),
        &["title", "content", "icon"],
    )
}

fn news_schema() -> Value {
    array_of(
        json!({
            "title": { "type": "STRING" },
            "source": { "type": "STRING" },
            "date": { "type": "STRING" },
            "snippet": { "type": "STRING" },
            "url": { "type": "STRING" },
        }),
        &["title", "source", "snippet"],
    )
}

fn quiz_schema() -> Value {
    array_of(
        json!({
            "question": { "type": "STRING" },
            "options": { "type": "ARRAY", "items": { "type": "STRING" } },
            "correctAnswer": { "type": "INTEGER" },
            "explanation": { "type": "STRING" },
        }),
        &["question", "options", "correctAnswer", "explanation"],
    )
}

fn insights_prompt(query: &Query) -> String {
    format!(
        "You are an industry analyst. Describe 4 strategic insights or trends shaping the \"{}\" industry in {} right now.\n\
         For each one give a short title, a 2-3 sentence explanation and an icon name such as \
         TrendingUp, Zap, Globe, Users, Shield or Target.\n\
         Answer with a JSON array of objects with the keys title, content and icon.",
        query.industry(),
        query.region()
    )
}

fn news_prompt(query: &Query) -> String {
    format!(
        "Find the latest news about the \"{}\" industry in {} published in the last 72 hours. \
         Ignore anything older.\n\
         Answer with a JSON array of 5 articles. Each article has:\n\
         - title: the headline\n\
         - source: the publisher\n\
         - date: a relative date such as \"3 hours ago\"\n\
         - snippet: a one-sentence summary\n\
         - url: the article URL from the search results, or an empty string if unknown",
        query.industry(),
        query.region()
    )
}

fn quiz_prompt(query: &Query) -> String {
    format!(
        "Write a 5-question multiple choice quiz about the \"{}\" industry in {}. \
         Cover current trends, major players and core concepts for that region.\n\
         Answer with a JSON array of objects with:\n\
         - question: string\n\
         - options: exactly 4 strings\n\
         - correctAnswer: integer index (0-3) of the correct option\n\
         - explanation: one or two sentences on why that option is correct",
        query.industry(),
        query.region()
    )
}
