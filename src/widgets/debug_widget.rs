use crate::logging::get_log_buffer;
use crate::state::{SearchState, StateEvent};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::fmt::Write;

/// How many log lines the F5 view pulls from the ring buffer
const LOG_LINES: usize = 200;

/// Search state dump plus recent log lines, shown on F5
pub struct DebugWidget {
    content: String,
    scroll_offset: u16,
    max_scroll: u16,
}

impl DebugWidget {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            scroll_offset: 0,
            max_scroll: 0,
        }
    }

    /// Snapshot state, recent events and logs into the view
    pub fn generate_debug<'a>(
        &mut self,
        state: &SearchState,
        in_flight: usize,
        recent_events: impl Iterator<Item = &'a StateEvent>,
    ) {
        let mut out = String::new();
        let _ = writeln!(out, "========== SEARCH STATE ==========");
        match state.query() {
            Some(query) => {
                let _ = writeln!(out, "Query: {}", query);
            }
            None => {
                let _ = writeln!(out, "Query: <none>");
            }
        }
        let _ = writeln!(out, "Generation: {}", state.generation());
        let _ = writeln!(out, "Active tab: {}", state.active_tab().title());
        let _ = writeln!(out, "Tasks in flight: {}", in_flight);
        for tab in crate::state::Tab::ALL {
            let category = tab.category();
            let _ = writeln!(
                out,
                "  {:<9} loading={:<5} items={}",
                category.label(),
                state.is_loading(category),
                state.item_count(category)
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "========== RECENT EVENTS ==========");
        for event in recent_events {
            let _ = writeln!(out, "{:?}", event);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "========== LOGS ==========");
        match get_log_buffer() {
            Some(buffer) => {
                for entry in buffer.get_recent(LOG_LINES) {
                    let _ = writeln!(out, "{}", entry.format_for_display());
                }
            }
            None => {
                let _ = writeln!(out, "Logging not initialized");
            }
        }

        self.set_content(out);
    }

    /// Handle key events. Returns true when the view should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_up(1);
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_down(1);
                false
            }
            KeyCode::PageUp => {
                self.scroll_up(10);
                false
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
                false
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_to_top();
                false
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.scroll_to_bottom();
                false
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(5) => true,
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible_height = area.height.saturating_sub(2) as usize;
        let total_lines = self.content.lines().count();
        let start = self.scroll_offset as usize;
        let end = (start + visible_height).min(total_lines);

        let title = format!(
            "Debug - Lines {}-{} of {} (↑↓/jk: scroll, PgUp/PgDn: page, g/G: top/bottom, q/Esc: exit)",
            start.min(total_lines) + usize::from(total_lines > 0),
            end,
            total_lines
        );

        let paragraph = Paragraph::new(Text::from(self.get_visible_lines(visible_height)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(paragraph, area);
    }

    pub fn get_visible_lines(&self, height: usize) -> Vec<Line<'static>> {
        let lines: Vec<&str> = self.content.lines().collect();
        let start = (self.scroll_offset as usize).min(lines.len());
        let end = (start + height).min(lines.len());

        lines[start..end]
            .iter()
            .map(|line| Line::from(line.to_string()))
            .collect()
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(self.max_scroll);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll;
    }

    fn update_max_scroll(&mut self) {
        let line_count = self.content.lines().count() as u16;
        self.max_scroll = line_count.saturating_sub(10); // Leave some visible lines
    }

    pub fn get_content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.scroll_offset = 0;
        self.update_max_scroll();
    }
}

impl Default for DebugWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;

    #[test]
    fn test_debug_lists_state_and_events() {
        let mut state = SearchState::default();
        state.generation = 3;
        state.quiz.begin();
        let events = [StateEvent::FetchStarted {
            category: Category::Quiz,
            generation: 3,
        }];

        let mut widget = DebugWidget::new();
        widget.generate_debug(&state, 1, events.iter());
        let content = widget.get_content();
        assert!(content.contains("Query: <none>"));
        assert!(content.contains("Generation: 3"));
        assert!(content.contains("Tasks in flight: 1"));
        assert!(content.contains("FetchStarted"));
    }

    #[test]
    fn test_scroll_is_bounded() {
        let mut widget = DebugWidget::new();
        widget.set_content((0..30).map(|i| format!("line {}\n", i)).collect());
        widget.scroll_down(100);
        assert_eq!(widget.get_visible_lines(1)[0].to_string(), "line 20");
        widget.scroll_up(100);
        assert_eq!(widget.get_visible_lines(1)[0].to_string(), "line 0");
    }
}
