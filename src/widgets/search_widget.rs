use crate::content::Region;
use crossterm::event::{Event, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// Entry screen: industry field plus the chosen region
pub struct SearchWidget {
    input: Input,
    region: Region,
}

impl SearchWidget {
    pub fn new(region: Region) -> Self {
        Self {
            input: Input::default(),
            region,
        }
    }

    pub fn industry(&self) -> &str {
        self.input.value()
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn set_region(&mut self, region: Region) {
        self.region = region;
    }

    pub fn set_industry(&mut self, industry: &str) {
        self.input = Input::new(industry.to_string());
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    /// Submitting is only offered for a non-blank industry
    pub fn can_submit(&self) -> bool {
        !self.input.value().trim().is_empty()
    }

    /// Feed an editing key to the text field
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.input.handle_event(&Event::Key(key)).is_some()
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 14, area);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // title
                Constraint::Length(2), // subtitle
                Constraint::Length(3), // input
                Constraint::Length(2), // region
                Constraint::Length(1), // hints
            ])
            .split(popup);

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "Master Any ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Industry",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        let subtitle = Paragraph::new(Span::styled(
            "Strategic insights, recent news and a quick quiz for any sector",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center);
        f.render_widget(subtitle, chunks[1]);

        let input_area = chunks[2];
        let width = input_area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);
        let field: Paragraph = if self.input.value().is_empty() {
            Paragraph::new(Span::styled(
                "e.g. Fintech, Renewable Energy, Logistics",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Paragraph::new(self.input.value()).scroll((0, scroll as u16))
        };
        f.render_widget(
            field.block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Industry "),
            ),
            input_area,
        );
        f.set_cursor_position((
            input_area.x + 1 + (self.input.visual_cursor().max(scroll) - scroll) as u16,
            input_area.y + 1,
        ));

        let region = Paragraph::new(Line::from(vec![
            Span::styled("Region: ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.region.label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (F2 to change)", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(region, chunks[3]);

        let submit_style = if self.can_submit() {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        };
        let hints = Paragraph::new(Line::from(vec![
            Span::styled("Enter: Analyze", submit_style),
            Span::styled(
                "   F1: help   F5: logs   Ctrl+C: quit",
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(hints, chunks[4]);
    }
}

/// A `width`% wide, `height` rows tall rect in the middle of `area`
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
