// Maps keyboard input to app actions per screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::state::Tab;
use crate::ui::actions::{Action, Screen};

/// Maps keyboard input to actions based on the current screen
pub struct KeyMapper {
    /// Mappings that work on every screen
    global_mappings: HashMap<(KeyCode, KeyModifiers), Action>,

    /// Screen-specific mappings
    screen_mappings: HashMap<Screen, HashMap<(KeyCode, KeyModifiers), Action>>,
}

impl KeyMapper {
    pub fn new() -> Self {
        let mut mapper = Self {
            global_mappings: HashMap::new(),
            screen_mappings: HashMap::new(),
        };

        mapper.init_global_mappings();
        mapper.init_entry_mappings();
        mapper.init_results_mappings();
        mapper
    }

    fn init_global_mappings(&mut self) {
        use KeyCode::*;
        use KeyModifiers as Mod;

        self.global_mappings
            .insert((F(1), Mod::NONE), Action::ShowHelp);
        self.global_mappings
            .insert((F(5), Mod::NONE), Action::ShowDebugInfo);

        self.global_mappings
            .insert((Char('c'), Mod::CONTROL), Action::Quit);
        self.global_mappings
            .insert((Char('q'), Mod::CONTROL), Action::Quit);
    }

    fn init_entry_mappings(&mut self) {
        use KeyCode::*;
        use KeyModifiers as Mod;

        let mut mappings = HashMap::new();
        mappings.insert((Enter, Mod::NONE), Action::Submit);
        mappings.insert((F(2), Mod::NONE), Action::OpenRegionPicker);
        mappings.insert((Char('r'), Mod::CONTROL), Action::OpenRegionPicker);

        self.screen_mappings.insert(Screen::Entry, mappings);
    }

    fn init_results_mappings(&mut self) {
        use KeyModifiers as Mod;

        let mut mappings = HashMap::new();

        mappings.insert((KeyCode::Tab, Mod::NONE), Action::NextTab);
        mappings.insert((KeyCode::BackTab, Mod::NONE), Action::PreviousTab);
        mappings.insert((KeyCode::BackTab, Mod::SHIFT), Action::PreviousTab);
        mappings.insert((KeyCode::Right, Mod::NONE), Action::NextTab);
        mappings.insert((KeyCode::Left, Mod::NONE), Action::PreviousTab);

        mappings.insert((KeyCode::Char('1'), Mod::NONE), Action::SelectTab(Tab::Insights));
        mappings.insert((KeyCode::Char('2'), Mod::NONE), Action::SelectTab(Tab::News));
        mappings.insert((KeyCode::Char('3'), Mod::NONE), Action::SelectTab(Tab::Quiz));

        mappings.insert((KeyCode::Char('n'), Mod::NONE), Action::NewSearch);
        mappings.insert((KeyCode::Esc, Mod::NONE), Action::NewSearch);

        // '?' is plain text on the entry screen
        mappings.insert((KeyCode::Char('?'), Mod::NONE), Action::ShowHelp);
        mappings.insert((KeyCode::Char('?'), Mod::SHIFT), Action::ShowHelp);

        self.screen_mappings.insert(Screen::Results, mappings);
    }

    /// Map a key event to an action for `screen`
    pub fn map_key(&self, key: KeyEvent, screen: Screen) -> Option<Action> {
        let key_combo = (key.code, key.modifiers);

        if let Some(action) = self.global_mappings.get(&key_combo) {
            return Some(*action);
        }

        self.screen_mappings
            .get(&screen)
            .and_then(|mappings| mappings.get(&key_combo))
            .copied()
    }
}

impl Default for KeyMapper {
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
    fn test_global_mappings() {
        let mapper = KeyMapper::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(mapper.map_key(ctrl_c, Screen::Entry), Some(Action::Quit));
        assert_eq!(mapper.map_key(ctrl_c, Screen::Results), Some(Action::Quit));
        assert_eq!(
            mapper.map_key(key(KeyCode::F(5)), Screen::Entry),
            Some(Action::ShowDebugInfo)
        );
    }

    #[test]
    fn test_entry_leaves_text_to_the_input() {
        let mapper = KeyMapper::new();
        assert_eq!(mapper.map_key(key(KeyCode::Enter), Screen::Entry), Some(Action::Submit));
        assert_eq!(mapper.map_key(key(KeyCode::Char('n')), Screen::Entry), None);
        assert_eq!(mapper.map_key(key(KeyCode::Char('1')), Screen::Entry), None);
        assert_eq!(mapper.map_key(key(KeyCode::Char('?')), Screen::Entry), None);
    }

    #[test]
    fn test_results_mappings() {
        let mapper = KeyMapper::new();
        assert_eq!(
            mapper.map_key(key(KeyCode::Char('2')), Screen::Results),
            Some(Action::SelectTab(Tab::News))
        );
        assert_eq!(
            mapper.map_key(
                KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT),
                Screen::Results
            ),
            Some(Action::PreviousTab)
        );
        assert_eq!(
            mapper.map_key(key(KeyCode::Esc), Screen::Results),
            Some(Action::NewSearch)
        );
        // Quiz answers pass through
        assert_eq!(mapper.map_key(key(KeyCode::Char('a')), Screen::Results), None);
        assert_eq!(mapper.map_key(key(KeyCode::Enter), Screen::Results), None);
    }
}
