use crate::content::Region;
use crate::widgets::search_widget::centered_rect;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Actions returned from the region picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionPickerAction {
    None,
    Selected(Region),
    Cancel,
}

/// Popup list of regions with type-to-filter
pub struct RegionPickerWidget {
    filter: String,
    matches: Vec<Region>,
    list_state: ListState,
}

impl RegionPickerWidget {
    pub fn new() -> Self {
        Self {
            filter: String::new(),
            matches: Region::ALL.to_vec(),
            list_state: ListState::default(),
        }
    }

    /// Reopen with an empty filter and `current` selected
    pub fn open(&mut self, current: Region) {
        self.filter.clear();
        self.refresh_matches();
        let index = self.matches.iter().position(|r| *r == current);
        self.list_state.select(index.or(Some(0)));
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn matches(&self) -> &[Region] {
        &self.matches
    }

    pub fn selected(&self) -> Option<Region> {
        self.list_state
            .selected()
            .and_then(|i| self.matches.get(i))
            .copied()
    }

    fn refresh_matches(&mut self) {
        if self.filter.is_empty() {
            self.matches = Region::ALL.to_vec();
        } else {
            let matcher = SkimMatcherV2::default().ignore_case();
            let mut scored: Vec<(i64, Region)> = Region::ALL
                .iter()
                .filter_map(|region| {
                    matcher
                        .fuzzy_match(region.label(), &self.filter)
                        .map(|score| (score, *region))
                })
                .collect();
            // Stable sort keeps list order among equal scores
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            self.matches = scored.into_iter().map(|(_, region)| region).collect();
        }
        self.list_state
            .select(if self.matches.is_empty() { None } else { Some(0) });
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> RegionPickerAction {
        match key.code {
            KeyCode::Esc => RegionPickerAction::Cancel,
            KeyCode::Enter => match self.selected() {
                Some(region) => RegionPickerAction::Selected(region),
                None => RegionPickerAction::None,
            },
            KeyCode::Down => {
                if let Some(i) = self.list_state.selected() {
                    if i + 1 < self.matches.len() {
                        self.list_state.select(Some(i + 1));
                    }
                }
                RegionPickerAction::None
            }
            KeyCode::Up => {
                if let Some(i) = self.list_state.selected() {
                    self.list_state.select(Some(i.saturating_sub(1)));
                }
                RegionPickerAction::None
            }
            KeyCode::Backspace => {
                self.filter.pop();
                self.refresh_matches();
                RegionPickerAction::None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.filter.push(c);
                self.refresh_matches();
                RegionPickerAction::None
            }
            _ => RegionPickerAction::None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(40, 19, area);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Select Region ");
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let filter = Paragraph::new(Line::from(vec![
            Span::styled("Filter: ", Style::default().fg(Color::Gray)),
            Span::raw(self.filter.clone()),
        ]));
        f.render_widget(filter, chunks[0]);

        let items: Vec<ListItem> = self
            .matches
            .iter()
            .map(|region| ListItem::new(region.label()))
            .collect();
        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}

impl Default for RegionPickerWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_open_selects_current_region() {
        let mut picker = RegionPickerWidget::new();
        picker.open(Region::India);
        assert_eq!(picker.selected(), Some(Region::India));
        assert_eq!(picker.matches().len(), Region::ALL.len());
    }

    #[test]
    fn test_filter_narrows_and_selects_first_match() {
        let mut picker = RegionPickerWidget::new();
        picker.open(Region::World);
        for c in "ind".chars() {
            picker.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(picker.matches().first(), Some(&Region::India));
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter)),
            RegionPickerAction::Selected(Region::India)
        );
    }

    #[test]
    fn test_no_match_cannot_select() {
        let mut picker = RegionPickerWidget::new();
        picker.open(Region::World);
        for c in "zzzz".chars() {
            picker.handle_key(key(KeyCode::Char(c)));
        }
        assert!(picker.matches().is_empty());
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), RegionPickerAction::None);

        picker.handle_key(key(KeyCode::Backspace));
        assert_eq!(picker.filter(), "zzz");
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), RegionPickerAction::Cancel);
    }
}
