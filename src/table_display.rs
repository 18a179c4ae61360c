use crate::content::{Insight, NewsItem, QuizItem};
use crate::icons::IconSet;
use crate::state::SearchState;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

pub fn insights_table(insights: &[Insight], icons: &IconSet) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("").add_attribute(Attribute::Bold),
        Cell::new("Insight").add_attribute(Attribute::Bold),
        Cell::new("Details").add_attribute(Attribute::Bold),
    ]);

    for (index, insight) in insights.iter().enumerate() {
        table.add_row(vec![
            format!("{:02}", index + 1),
            icons.for_key(&insight.icon_key).to_string(),
            insight.title.clone(),
            insight.body.clone(),
        ]);
    }
    table
}

pub fn news_table(news: &[NewsItem]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Source").add_attribute(Attribute::Bold),
        Cell::new("When").add_attribute(Attribute::Bold),
        Cell::new("Headline").add_attribute(Attribute::Bold),
        Cell::new("URL").add_attribute(Attribute::Bold),
    ]);

    for item in news {
        let headline = if item.snippet.is_empty() {
            item.title.clone()
        } else {
            format!("{}\n{}", item.title, item.snippet)
        };
        table.add_row(vec![
            item.source_or_default().to_string(),
            item.published_label.clone().unwrap_or_default(),
            headline,
            item.url.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// Plain-text quiz with the correct option marked
pub fn quiz_text(quiz: &[QuizItem]) -> String {
    let mut out = String::new();
    for (n, item) in quiz.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", n + 1, item.prompt));
        for (i, choice) in item.choices.iter().enumerate() {
            let marker = if item.is_correct(i) { "*" } else { " " };
            let letter = (b'a' + i as u8) as char;
            out.push_str(&format!("   {} {}) {}\n", marker, letter, choice));
        }
        if !item.explanation.is_empty() {
            out.push_str(&format!("   -> {}\n", item.explanation));
        }
        out.push('\n');
    }
    out
}

/// Print a settled search to stdout
pub fn display_search(state: &SearchState, icons: &IconSet) {
    if let Some(query) = state.query() {
        println!("{}", format!("{} in {}", query.industry(), query.region()).bold());
        println!();
    }

    println!("{}", "Strategic Insights".cyan().bold());
    if state.insights().is_empty() {
        println!("{}", "No insights found.".yellow());
    } else {
        println!("{}", insights_table(state.insights().items(), icons));
    }
    println!();

    println!("{}", "Latest News".cyan().bold());
    if state.news().is_empty() {
        println!("{}", "No news found.".yellow());
    } else {
        println!("{}", news_table(state.news().items()));
    }
    println!();

    println!("{}", "Quiz".cyan().bold());
    if state.quiz().is_empty() {
        println!("{}", "No quiz available.".yellow());
    } else {
        print!("{}", quiz_text(state.quiz().items()));
        println!("{}", "* marks the correct answer".dark_grey());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_text_marks_correct_choice() {
        let text = quiz_text(&[QuizItem {
            prompt: "Largest UPI app?".to_string(),
            choices: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_index: 1,
            explanation: "Market share.".to_string(),
        }]);
        assert!(text.contains("1. Largest UPI app?"));
        assert!(text.contains("   * b) B"));
        assert!(text.contains("     a) A"));
        assert!(text.contains("-> Market share."));
    }

    #[test]
    fn test_news_table_defaults_source() {
        let table = news_table(&[NewsItem {
            title: "Rates cut".to_string(),
            url: None,
            source: None,
            snippet: String::new(),
            published_label: None,
        }]);
        let rendered = table.to_string();
        assert!(rendered.contains("News"));
        assert!(rendered.contains("Rates cut"));
    }
}
