use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Actions that can be returned from the help widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    None,
    Exit,
}

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Search",
        &[
            ("Enter", "Analyze the industry"),
            ("F2 / Ctrl+R", "Choose a region"),
        ],
    ),
    (
        "Results",
        &[
            ("Tab / Shift+Tab", "Next / previous tab"),
            ("1 2 3", "Insights / News / Quiz"),
            ("↑↓ / j k", "Scroll or move selection"),
            ("y", "Copy the selected article's link"),
            ("n / Esc", "New search"),
        ],
    ),
    (
        "Quiz",
        &[
            ("a-d", "Answer"),
            ("↑↓ + Enter", "Pick and answer"),
            ("Enter", "Next question / see results"),
            ("r", "Retry after finishing"),
        ],
    ),
    (
        "General",
        &[
            ("F1 / ?", "Toggle this help"),
            ("F5", "Debug view with recent logs"),
            ("Ctrl+C / Ctrl+Q", "Quit"),
        ],
    ),
];

/// Key reference overlay
pub struct HelpWidget {
    scroll_offset: u16,
}

impl HelpWidget {
    pub fn new() -> Self {
        Self { scroll_offset: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HelpAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) | KeyCode::Char('?') => {
                self.scroll_offset = 0;
                HelpAction::Exit
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                HelpAction::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                HelpAction::None
            }
            _ => HelpAction::None,
        }
    }

    pub fn lines() -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (title, keys) in SECTIONS {
            lines.push(Line::from(Span::styled(
                *title,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
            for (key, what) in keys.iter() {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<18}", key), Style::default().fg(Color::Yellow)),
                    Span::raw(*what),
                ]));
            }
            lines.push(Line::from(""));
        }
        lines
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = crate::widgets::search_widget::centered_rect(60, 26, area);
        f.render_widget(Clear, popup);
        let help = Paragraph::new(Self::lines())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Help - Esc/q to close ")
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll_offset, 0));
        f.render_widget(help, popup);
    }
}

impl Default for HelpWidget {
    fn default() -> Self {
        Self::new()
    }
}
