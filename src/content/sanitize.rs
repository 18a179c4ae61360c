//! Decoding and validation of provider records.
//!
//! Generated content is not trusted. Records are decoded leniently
//! (missing or null fields become empty) and then checked per category;
//! anything that cannot be displayed correctly is dropped with a warning
//! instead of reaching the views.

use super::{Insight, NewsItem, QuizItem};
use serde::{Deserialize, Deserializer};
use tracing::warn;

/// Number of options every quiz question must carry
pub const QUIZ_CHOICE_COUNT: usize = 4;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawInsight {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawNewsItem {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub url: Option<String>,
    pub source: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub snippet: String,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawQuizItem {
    #[serde(deserialize_with = "null_as_default")]
    pub question: String,
    #[serde(deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub explanation: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn insights(raw: Vec<RawInsight>) -> Vec<Insight> {
    let total = raw.len();
    let kept: Vec<Insight> = raw
        .into_iter()
        .filter_map(|r| {
            let title = r.title.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(Insight {
                title,
                body: r.content.trim().to_string(),
                icon_key: r.icon.trim().to_string(),
            })
        })
        .collect();

    if kept.len() < total {
        warn!(target: "provider", "Dropped {} of {} insights without a title", total - kept.len(), total);
    }
    kept
}

pub fn news(raw: Vec<RawNewsItem>) -> Vec<NewsItem> {
    let total = raw.len();
    let kept: Vec<NewsItem> = raw
        .into_iter()
        .filter_map(|r| {
            let title = r.title.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(NewsItem {
                title,
                url: non_empty(r.url),
                source: non_empty(r.source),
                snippet: r.snippet.trim().to_string(),
                published_label: non_empty(r.date),
            })
        })
        .collect();

    if kept.len() < total {
        warn!(target: "provider", "Dropped {} of {} news items without a title", total - kept.len(), total);
    }
    kept
}

/// Validate a single quiz record, explaining why it was rejected
fn quiz_item(raw: RawQuizItem) -> Result<QuizItem, String> {
    let prompt = raw.question.trim().to_string();
    if prompt.is_empty() {
        return Err("empty question".to_string());
    }
    if raw.options.len() != QUIZ_CHOICE_COUNT {
        return Err(format!(
            "expected {} options, got {}",
            QUIZ_CHOICE_COUNT,
            raw.options.len()
        ));
    }
    let correct_index = match raw.correct_answer {
        Some(i) if i >= 0 && (i as usize) < raw.options.len() => i as usize,
        Some(i) => return Err(format!("correctAnswer {} out of range", i)),
        None => return Err("missing correctAnswer".to_string()),
    };

    Ok(QuizItem {
        prompt,
        choices: raw.options.into_iter().map(|o| o.trim().to_string()).collect(),
        correct_index,
        explanation: raw.explanation.trim().to_string(),
    })
}

pub fn quiz(raw: Vec<RawQuizItem>) -> Vec<QuizItem> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, r)| match quiz_item(r) {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(target: "provider", "Dropped quiz question {}: {}", i + 1, reason);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_quiz(options: usize, correct: Option<i64>) -> RawQuizItem {
        RawQuizItem {
            question: "Which?".to_string(),
            options: (0..options).map(|i| format!("opt {}", i)).collect(),
            correct_answer: correct,
            explanation: "because".to_string(),
        }
    }

    #[test]
    fn test_quiz_keeps_well_formed_items() {
        let items = quiz(vec![raw_quiz(4, Some(2))]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].correct_index, 2);
        assert_eq!(items[0].choices.len(), 4);
    }

    #[test]
    fn test_quiz_drops_malformed_items() {
        let items = quiz(vec![
            raw_quiz(3, Some(0)),
            raw_quiz(4, Some(4)),
            raw_quiz(4, Some(-1)),
            raw_quiz(4, None),
            RawQuizItem {
                question: "  ".to_string(),
                ..raw_quiz(4, Some(1))
            },
            raw_quiz(4, Some(3)),
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].correct_index, 3);
    }

    #[test]
    fn test_news_optional_fields_normalised() {
        let items = news(vec![
            RawNewsItem {
                title: " Headline ".to_string(),
                url: Some("".to_string()),
                source: Some("  ".to_string()),
                snippet: "One line.".to_string(),
                date: Some("2 hours ago".to_string()),
            },
            RawNewsItem::default(),
        ]);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Headline");
        assert_eq!(items[0].url, None);
        assert_eq!(items[0].source, None);
        assert_eq!(items[0].published_label.as_deref(), Some("2 hours ago"));
    }

    #[test]
    fn test_insights_decode_from_wire_keys() {
        let raw: Vec<RawInsight> = serde_json::from_str(
            r#"[{"title":"Open banking","content":"APIs everywhere.","icon":"Zap"},{"content":"no title"}]"#,
        )
        .unwrap();
        let items = insights(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].body, "APIs everywhere.");
        assert_eq!(items[0].icon_key, "Zap");
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let raw: Vec<RawNewsItem> = serde_json::from_str(
            r#"[{"title":"A","source":"S","snippet":null,"date":"1h"},
                {"title":"B","url":null,"source":"S","snippet":"ok","date":"2h"}]"#,
        )
        .unwrap();
        let items = news(raw);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].snippet, "");
        assert_eq!(items[1].url, None);

        let raw: Vec<RawQuizItem> = serde_json::from_str(
            r#"[{"question":null,"options":null,"correctAnswer":0,"explanation":null},
                {"question":"Which?","options":["a","b","c","d"],"correctAnswer":1,"explanation":null}]"#,
        )
        .unwrap();
        let items = quiz(raw);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].prompt, "Which?");
        assert_eq!(items[0].explanation, "");
    }
}
