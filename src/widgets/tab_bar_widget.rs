use crate::state::{SearchState, Tab};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Renders the Insights / News / Quiz tab strip
pub struct TabBarWidget {
    active: Tab,
    /// Loading flag per tab, in `Tab::ALL` order
    loading: [bool; 3],
    /// Whether to show the 1-3 shortcuts
    show_shortcuts: bool,
    loading_marker: &'static str,
}

impl TabBarWidget {
    pub fn new(state: &SearchState) -> Self {
        let mut loading = [false; 3];
        for tab in Tab::ALL {
            loading[tab.index()] = state.is_loading(tab.category());
        }
        Self {
            active: state.active_tab(),
            loading,
            show_shortcuts: true,
            loading_marker: "…",
        }
    }

    /// Set whether to show 1-3 shortcuts
    pub fn with_shortcuts(mut self, show: bool) -> Self {
        self.show_shortcuts = show;
        self
    }

    pub fn with_loading_marker(mut self, marker: &'static str) -> Self {
        self.loading_marker = marker;
        self
    }

    /// Titles as plain strings, mostly for tests
    pub fn titles(&self) -> Vec<String> {
        Tab::ALL
            .iter()
            .map(|tab| {
                if self.loading[tab.index()] {
                    format!("{} {}", tab.title(), self.loading_marker)
                } else {
                    tab.title().to_string()
                }
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<Line> = self
            .titles()
            .into_iter()
            .enumerate()
            .map(|(i, title)| {
                let mut spans = vec![];
                if self.show_shortcuts {
                    spans.push(Span::styled(
                        format!("{}:", i + 1),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::DIM),
                    ));
                }
                spans.push(Span::raw(title));
                Line::from(spans)
            })
            .collect();

        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .select(self.active.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
                    .bg(Color::DarkGray),
            )
            .divider(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));

        f.render_widget(tabs, area);
    }

    /// Tab bar with its bottom border
    pub fn height(&self) -> u16 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_tabs_are_marked() {
        let mut state = SearchState::default();
        state.news.begin();
        let titles = TabBarWidget::new(&state).titles();
        assert_eq!(titles, vec!["Insights", "News …", "Quiz"]);
    }
}
