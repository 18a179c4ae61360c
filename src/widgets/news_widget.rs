use crate::content::NewsItem;
use crate::state::FetchState;
use anyhow::{anyhow, Result};
use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Actions the news list hands back to the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsAction {
    None,
    Moved,
    /// Copy this article's URL
    Yank(String),
    /// Selected article has no link
    NoLink,
}

/// Selectable list of news articles
pub struct NewsWidget {
    list_state: ListState,
}

impl NewsWidget {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }

    /// Forget the selection, used when a new list arrives
    pub fn reset(&mut self) {
        self.list_state = ListState::default();
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn handle_key(&mut self, key: KeyEvent, items: &[NewsItem]) -> NewsAction {
        if items.is_empty() {
            return NewsAction::None;
        }
        let last = items.len() - 1;
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let next = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(next));
                NewsAction::Moved
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.list_state.select(Some(prev));
                NewsAction::Moved
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.list_state.select(Some(0));
                NewsAction::Moved
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.list_state.select(Some(last));
                NewsAction::Moved
            }
            KeyCode::Char('y') | KeyCode::Enter => {
                let index = self.list_state.selected().unwrap_or(0).min(last);
                match &items[index].url {
                    Some(url) => NewsAction::Yank(url.clone()),
                    None => NewsAction::NoLink,
                }
            }
            _ => NewsAction::None,
        }
    }

    fn list_item(item: &NewsItem) -> ListItem<'static> {
        let mut meta = vec![Span::styled(
            item.source_or_default().to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(label) = &item.published_label {
            meta.push(Span::styled(
                format!("  {}", label),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let mut lines = vec![
            Line::from(meta),
            Line::from(Span::styled(
                item.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if !item.snippet.is_empty() {
            lines.push(Line::from(Span::styled(
                item.snippet.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        if let Some(url) = &item.url {
            lines.push(Line::from(Span::styled(
                url.clone(),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            )));
        }
        lines.push(Line::from(""));
        ListItem::new(lines)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, news: &FetchState<NewsItem>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Latest News ");

        if news.is_loading() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Searching recent headlines...",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )))
            .block(block)
            .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
            return;
        }

        if news.is_empty() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "No news found",
                Style::default().fg(Color::Yellow),
            )))
            .block(block)
            .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
            return;
        }

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        let items: Vec<ListItem> = news.items().iter().map(Self::list_item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▌ ");
        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}

impl Default for NewsWidget {
    fn default() -> Self {
        Self::new()
    }
}

/// Put `text` on the system clipboard
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| anyhow!("Clipboard unavailable: {}", e))?;
    clipboard
        .set_text(text)
        .map_err(|e| anyhow!("Failed to copy to clipboard: {}", e))?;
    Ok(())
}
