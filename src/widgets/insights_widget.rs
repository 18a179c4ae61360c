use crate::content::Insight;
use crate::icons::IconSet;
use crate::loading_messages::LoadingTicker;
use crate::state::FetchState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::time::Instant;

/// Numbered insight cards with a scroll offset
pub struct InsightsWidget {
    scroll_offset: u16,
}

impl InsightsWidget {
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    /// Back to the top, used when a new list arrives
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_offset(&self) -> u16 {
        self.scroll_offset
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                true
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                true
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                true
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll_offset = 0;
                true
            }
            _ => false,
        }
    }

    /// One card per insight: header line, title, body, blank spacer
    pub fn card_lines(insights: &[Insight], icons: &IconSet) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(insights.len() * 4);
        for (index, insight) in insights.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", icons.for_key(&insight.icon_key)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("Insight {:02}", index + 1),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                insight.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(insight.body.clone()));
            lines.push(Line::from(""));
        }
        lines
    }

    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        insights: &FetchState<Insight>,
        ticker: &LoadingTicker,
        icons: &IconSet,
        use_glyphs: bool,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Strategic Insights ");

        if insights.is_loading() {
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    ticker.spinner(Instant::now(), use_glyphs).to_string(),
                    Style::default().fg(Color::Cyan),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    ticker.message(),
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                )),
            ];
            let paragraph = Paragraph::new(text)
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
            return;
        }

        if insights.is_empty() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "No insights found for this query.",
                Style::default().fg(Color::Yellow),
            )))
            .block(block)
            .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
            return;
        }

        let paragraph = Paragraph::new(Self::card_lines(insights.items(), icons))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0));
        f.render_widget(paragraph, area);
    }
}

impl Default for InsightsWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_cards_are_numbered() {
        let insights = vec![
            Insight {
                title: "UPI dominance".to_string(),
                body: "Payments run on UPI.".to_string(),
                icon_key: "Zap".to_string(),
            },
            Insight {
                title: "Lending".to_string(),
                body: "Credit is growing.".to_string(),
                icon_key: "unknown".to_string(),
            },
        ];
        let lines = InsightsWidget::card_lines(&insights, &IconSet::new(false));
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0].to_string(), "[!] Insight 01");
        assert_eq!(lines[1].to_string(), "UPI dominance");
        assert_eq!(lines[4].to_string(), "[*] Insight 02");
    }

    #[test]
    fn test_scroll_never_underflows() {
        let mut widget = InsightsWidget::new();
        widget.handle_key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert_eq!(widget.scroll_offset(), 0);
        widget.handle_key(KeyEvent::new(KeyCode::PageDown, KeyModifiers::NONE));
        assert_eq!(widget.scroll_offset(), 10);
        widget.reset();
        assert_eq!(widget.scroll_offset(), 0);
    }
}
