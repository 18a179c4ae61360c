//! Content model and providers
//!
//! This module contains the domain types produced by a content
//! provider (insights, news, quiz items), the query that drives a
//! fetch cycle, and the provider implementations.

pub mod gemini;
pub mod provider;
pub mod sanitize;

pub use gemini::GeminiProvider;
pub use provider::ContentProvider;

use anyhow::{anyhow, Result};
use std::fmt;

/// The three independently fetched content categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Insights,
    News,
    Quiz,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Insights, Category::News, Category::Quiz];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Insights => "insights",
            Category::News => "news",
            Category::Quiz => "quiz",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed set of regions a query can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    World,
    UnitedStates,
    UnitedKingdom,
    Canada,
    Australia,
    India,
    Germany,
    France,
    Japan,
    China,
    Brazil,
    Singapore,
    Uae,
}

impl Region {
    /// All regions in display order
    pub const ALL: [Region; 13] = [
        Region::World,
        Region::UnitedStates,
        Region::UnitedKingdom,
        Region::Canada,
        Region::Australia,
        Region::India,
        Region::Germany,
        Region::France,
        Region::Japan,
        Region::China,
        Region::Brazil,
        Region::Singapore,
        Region::Uae,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Region::World => "World",
            Region::UnitedStates => "United States",
            Region::UnitedKingdom => "United Kingdom",
            Region::Canada => "Canada",
            Region::Australia => "Australia",
            Region::India => "India",
            Region::Germany => "Germany",
            Region::France => "France",
            Region::Japan => "Japan",
            Region::China => "China",
            Region::Brazil => "Brazil",
            Region::Singapore => "Singapore",
            Region::Uae => "UAE",
        }
    }

    /// Parse a human-readable label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Result<Self> {
        let wanted = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                anyhow!(
                    "Unknown region '{}'. Expected one of: {}",
                    label,
                    Self::ALL
                        .iter()
                        .map(|r| r.label())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }

    /// Position of this region in `Region::ALL`
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|r| r == self).unwrap_or(0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The (industry, region) pair driving a fetch cycle.
///
/// Only constructible with a non-blank industry; the industry is stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    industry: String,
    region: Region,
}

impl Query {
    /// Returns `None` when the industry is blank
    pub fn new(industry: &str, region: Region) -> Option<Self> {
        let industry = industry.trim();
        if industry.is_empty() {
            return None;
        }
        Some(Self {
            industry: industry.to_string(),
            region,
        })
    }

    pub fn industry(&self) -> &str {
        &self.industry
    }

    pub fn region(&self) -> Region {
        self.region
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.industry, self.region)
    }
}

/// A strategic insight card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub title: String,
    pub body: String,
    pub icon_key: String,
}

/// A recent news item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsItem {
    pub title: String,
    pub url: Option<String>,
    pub source: Option<String>,
    pub snippet: String,
    /// Free-text recency label such as "2 hours ago"
    pub published_label: Option<String>,
}

impl NewsItem {
    pub fn source_or_default(&self) -> &str {
        self.source.as_deref().unwrap_or("News")
    }
}

/// One multiple-choice quiz question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub prompt: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizItem {
    /// Whether `index` is the correct choice. Never true when
    /// `correct_index` does not point at an existing choice.
    pub fn is_correct(&self, index: usize) -> bool {
        index < self.choices.len() && index == self.correct_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_industry_has_no_query() {
        assert!(Query::new("", Region::World).is_none());
        assert!(Query::new("   \t", Region::India).is_none());
    }

    #[test]
    fn test_query_trims_industry() {
        let query = Query::new("  Fintech ", Region::India).unwrap();
        assert_eq!(query.industry(), "Fintech");
        assert_eq!(query.region(), Region::India);
        assert_eq!(query.to_string(), "Fintech (India)");
    }

    #[test]
    fn test_region_labels() {
        assert_eq!(Region::default(), Region::World);
        assert_eq!(Region::from_label("uae").unwrap(), Region::Uae);
        assert_eq!(
            Region::from_label(" united kingdom ").unwrap(),
            Region::UnitedKingdom
        );
        assert!(Region::from_label("Atlantis").is_err());
        assert_eq!(Region::Singapore.index(), 11);
    }

    #[test]
    fn test_out_of_range_correct_index_never_matches() {
        let item = QuizItem {
            prompt: "Q".to_string(),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 7,
            explanation: String::new(),
        };
        assert!((0..4).all(|i| !item.is_correct(i)));
        assert!(!item.is_correct(7));
    }

    #[test]
    fn test_news_source_fallback() {
        let item = NewsItem {
            title: "t".into(),
            url: None,
            source: None,
            snippet: "s".into(),
            published_label: None,
        };
        assert_eq!(item.source_or_default(), "News");
    }
}
