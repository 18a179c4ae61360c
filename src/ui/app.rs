use crate::config::config::Config;
use crate::content::{Category, ContentProvider};
use crate::icons::IconSet;
use crate::loading_messages::LoadingTicker;
use crate::quiz::{QuizSession, QuizSubscriber};
use crate::services::SearchOrchestrator;
use crate::state::{StateEvent, StateSlice, Tab};
use crate::ui::actions::{Action, Screen};
use crate::ui::key_mapper::KeyMapper;
use crate::ui::view_inbox::{ViewEvents, ViewInbox};
use crate::widgets::debug_widget::DebugWidget;
use crate::widgets::help_widget::{HelpAction, HelpWidget};
use crate::widgets::insights_widget::InsightsWidget;
use crate::widgets::news_widget::{copy_to_clipboard, NewsAction, NewsWidget};
use crate::widgets::quiz_widget::{QuizAction, QuizWidget};
use crate::widgets::region_picker_widget::{RegionPickerAction, RegionPickerWidget};
use crate::widgets::search_widget::SearchWidget;
use crate::widgets::tab_bar_widget::TabBarWidget;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// How long the loop waits for a key before polling for results
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a status line message stays up
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Popups drawn over the current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    None,
    Help,
    Debug,
    RegionPicker,
}

/// The interactive terminal application
pub struct TuiApp {
    orchestrator: SearchOrchestrator,
    quiz: Rc<RefCell<QuizSession>>,
    view_events: ViewEvents,
    key_mapper: KeyMapper,

    search: SearchWidget,
    region_picker: RegionPickerWidget,
    insights: InsightsWidget,
    news: NewsWidget,
    quiz_view: QuizWidget,
    help: HelpWidget,
    debug: DebugWidget,

    overlay: Overlay,
    ticker: LoadingTicker,
    icons: IconSet,
    use_glyphs: bool,
    status: Option<(String, Instant)>,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(config: &Config, provider: Arc<dyn ContentProvider>, runtime: Handle) -> Self {
        let mut orchestrator = SearchOrchestrator::new(provider, runtime);

        let quiz = Rc::new(RefCell::new(QuizSession::empty()));
        orchestrator.subscribe(Box::new(QuizSubscriber::new(Rc::clone(&quiz))));

        let view_events = ViewEvents::default();
        orchestrator.subscribe(Box::new(ViewInbox::new(Rc::clone(&view_events))));

        let use_glyphs = config.display.use_glyphs;
        Self {
            orchestrator,
            quiz,
            view_events,
            key_mapper: KeyMapper::new(),
            search: SearchWidget::new(config.behavior.default_region()),
            region_picker: RegionPickerWidget::new(),
            insights: InsightsWidget::new(),
            news: NewsWidget::new(),
            quiz_view: QuizWidget::new(),
            help: HelpWidget::new(),
            debug: DebugWidget::new(),
            overlay: Overlay::None,
            ticker: LoadingTicker::new(config.display.loading_message_interval_secs),
            icons: IconSet::new(use_glyphs),
            use_glyphs,
            status: None,
            should_quit: false,
        }
    }

    /// Start on the results screen for `industry`
    pub fn with_initial_query(mut self, industry: &str) -> Self {
        self.search.set_industry(industry);
        self.submit();
        self
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    pub fn screen(&self) -> Screen {
        if self.orchestrator.state().query().is_some() {
            Screen::Results
        } else {
            Screen::Entry
        }
    }

    /// Run the TUI event loop until the user quits
    pub fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key);
                        needs_redraw = true;
                    }
                    Event::Resize(_, _) => needs_redraw = true,
                    _ => {}
                }
            }

            if self.should_quit {
                info!(target: "ui", "Quit requested");
                return Ok(());
            }

            needs_redraw |= self.tick(Instant::now());
        }
    }

    /// Pull in finished fetches and advance timers. True when the
    /// screen needs repainting.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = self.orchestrator.poll_completions() > 0;
        changed |= self.route_view_events();

        if self.ticker.is_running() {
            self.ticker.tick(now);
            // Spinner animates every frame
            changed = true;
        }

        if let Some((_, shown)) = &self.status {
            if now.duration_since(*shown) >= STATUS_TTL {
                self.status = None;
                changed = true;
            }
        }
        changed
    }

    /// Hand queued state events to the widgets showing those slices
    fn route_view_events(&mut self) -> bool {
        let events: Vec<StateEvent> = self.view_events.borrow_mut().drain(..).collect();
        for event in &events {
            match event {
                StateEvent::FetchStarted {
                    category: Category::Insights,
                    ..
                } => self.ticker.start(Instant::now()),
                StateEvent::FetchSettled {
                    category: Category::Insights,
                    ..
                }
                | StateEvent::FetchCleared {
                    category: Category::Insights,
                } => self.ticker.stop(),
                _ => {}
            }

            match event.slice() {
                StateSlice::Insights => self.insights.reset(),
                StateSlice::News => self.news.reset(),
                StateSlice::Quiz => self.quiz_view.reset(),
                _ => {}
            }
        }
        !events.is_empty()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        debug!(target: "ui", "Key {:?} on {:?} (overlay {:?})", key.code, self.screen(), self.overlay);

        let action = self.key_mapper.map_key(key, self.screen());

        if action == Some(Action::Quit) {
            self.should_quit = true;
            return;
        }

        match self.overlay {
            Overlay::Help => {
                if self.help.handle_key(key) == HelpAction::Exit {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::Debug => {
                if self.debug.handle_key(key) {
                    self.overlay = Overlay::None;
                }
                return;
            }
            Overlay::RegionPicker => {
                match self.region_picker.handle_key(key) {
                    RegionPickerAction::Selected(region) => {
                        debug!(target: "ui", "Region set to {}", region);
                        self.search.set_region(region);
                        self.overlay = Overlay::None;
                    }
                    RegionPickerAction::Cancel => self.overlay = Overlay::None,
                    RegionPickerAction::None => {}
                }
                return;
            }
            Overlay::None => {}
        }

        match action {
            Some(action) => self.apply_action(action),
            None => self.forward_key(key),
        }
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ShowHelp => self.overlay = Overlay::Help,
            Action::ShowDebugInfo => {
                let state = self.orchestrator.state();
                let events: Vec<StateEvent> =
                    self.orchestrator.dispatcher().event_history().cloned().collect();
                let skip = events.len().saturating_sub(20);
                self.debug.generate_debug(
                    state,
                    self.orchestrator.in_flight_count(),
                    events[skip..].iter(),
                );
                self.overlay = Overlay::Debug;
            }
            Action::Submit => self.submit(),
            Action::OpenRegionPicker => {
                self.region_picker.open(self.search.region());
                self.overlay = Overlay::RegionPicker;
            }
            Action::NextTab => {
                let next = self.orchestrator.state().active_tab().next();
                self.orchestrator.set_active_tab(next);
            }
            Action::PreviousTab => {
                let previous = self.orchestrator.state().active_tab().previous();
                self.orchestrator.set_active_tab(previous);
            }
            Action::SelectTab(tab) => {
                self.orchestrator.set_active_tab(tab);
            }
            Action::NewSearch => {
                self.orchestrator.reset_search();
                self.search.clear();
                self.route_view_events();
            }
        }
    }

    fn submit(&mut self) {
        if !self.search.can_submit() {
            return;
        }
        let industry = self.search.industry().to_string();
        if self.orchestrator.submit_query(&industry, self.search.region()) {
            self.route_view_events();
        }
    }

    /// Keys with no app action go to whatever has focus
    fn forward_key(&mut self, key: KeyEvent) {
        if self.screen() == Screen::Entry {
            self.search.handle_key(key);
            return;
        }

        match self.orchestrator.state().active_tab() {
            Tab::Insights => {
                self.insights.handle_key(key);
            }
            Tab::News => {
                let items = Arc::clone(self.orchestrator.state().news().items());
                match self.news.handle_key(key, &items) {
                    NewsAction::Yank(url) => match copy_to_clipboard(&url) {
                        Ok(()) => self.set_status(format!("Copied {}", url)),
                        Err(e) => {
                            warn!(target: "ui", "Yank failed: {}", e);
                            self.set_status(e.to_string());
                        }
                    },
                    NewsAction::NoLink => self.set_status("This article has no link"),
                    NewsAction::Moved | NewsAction::None => {}
                }
            }
            Tab::Quiz => {
                let action = self.quiz_view.handle_key(key, &mut self.quiz.borrow_mut());
                if let QuizAction::Answered(feedback) = action {
                    self.set_status(if feedback.correct {
                        "Correct!"
                    } else {
                        "Not quite"
                    });
                }
            }
        }
    }

    fn draw(&mut self, f: &mut Frame) {
        let area = f.area();

        if self.overlay == Overlay::Debug {
            self.debug.render(f, area);
            return;
        }

        match self.screen() {
            Screen::Entry => self.search.render(f, area),
            Screen::Results => self.draw_results(f, area),
        }

        match self.overlay {
            Overlay::Help => self.help.render(f, area),
            Overlay::RegionPicker => self.region_picker.render(f, area),
            Overlay::None | Overlay::Debug => {}
        }
    }

    fn draw_results(&mut self, f: &mut Frame, area: Rect) {
        let state = self.orchestrator.state();
        let tab_bar = TabBarWidget::new(state)
            .with_loading_marker(if self.use_glyphs { "…" } else { "..." });

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),                // header
                Constraint::Length(tab_bar.height()), // tabs
                Constraint::Min(3),                   // body
                Constraint::Length(1),                // status
            ])
            .split(area);

        let (industry, region) = state
            .query()
            .map(|q| (q.industry().to_string(), q.region().label()))
            .unwrap_or_default();
        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                "Industry Intelligence  ",
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                industry,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ·  {}", region), Style::default().fg(Color::Yellow)),
        ]));
        f.render_widget(header, chunks[0]);

        tab_bar.render(f, chunks[1]);

        match state.active_tab() {
            Tab::Insights => self.insights.render(
                f,
                chunks[2],
                state.insights(),
                &self.ticker,
                &self.icons,
                self.use_glyphs,
            ),
            Tab::News => self.news.render(f, chunks[2], state.news()),
            Tab::Quiz => {
                let session = self.quiz.borrow();
                self.quiz_view
                    .render(f, chunks[2], state.quiz(), &session, &self.icons)
            }
        }

        let status = match &self.status {
            Some((message, _)) => Span::styled(message.clone(), Style::default().fg(Color::Green)),
            None => Span::styled(
                "Tab/1-3: switch  n: new search  F1: help  F5: debug  Ctrl+C: quit",
                Style::default().fg(Color::DarkGray),
            ),
        };
        f.render_widget(Paragraph::new(status), chunks[3]);
    }
}

/// Build the app and run it on the current terminal
pub fn run_tui(
    config: &Config,
    provider: Arc<dyn ContentProvider>,
    runtime: Handle,
    initial_industry: Option<&str>,
) -> Result<()> {
    let mut app = TuiApp::new(config, provider, runtime);
    if let Some(industry) = initial_industry {
        app = app.with_initial_query(industry);
    }
    info!(target: "ui", "Starting TUI");
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Insight, NewsItem, Query, QuizItem};
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyModifiers};

    struct StaticProvider;

    #[async_trait]
    impl ContentProvider for StaticProvider {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_insights(&self, _query: &Query) -> Result<Vec<Insight>> {
            Ok(vec![Insight {
                title: "Scale".to_string(),
                body: "Big".to_string(),
                icon_key: "Zap".to_string(),
            }])
        }

        async fn fetch_news(&self, _query: &Query) -> Result<Vec<NewsItem>> {
            Ok(Vec::new())
        }

        async fn fetch_quiz(&self, _query: &Query) -> Result<Vec<QuizItem>> {
            Ok(vec![QuizItem {
                prompt: "?".to_string(),
                choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_index: 3,
                explanation: String::new(),
            }])
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut TuiApp, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app() -> TuiApp {
        TuiApp::new(
            &Config::default(),
            Arc::new(StaticProvider),
            Handle::current(),
        )
    }

    async fn settle(app: &mut TuiApp) {
        app.orchestrator.settle().await;
        app.tick(Instant::now());
    }

    #[tokio::test]
    async fn test_blank_enter_stays_on_entry() {
        let mut app = app();
        type_text(&mut app, "   ");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Entry);
        assert_eq!(app.orchestrator().state().generation(), 0);
    }

    #[tokio::test]
    async fn test_submit_then_new_search() {
        let mut app = app();
        type_text(&mut app, "Fintech");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.screen(), Screen::Results);
        assert!(app.ticker.is_running());

        settle(&mut app).await;
        assert!(!app.ticker.is_running());
        assert_eq!(app.orchestrator().state().insights().len(), 1);

        // 'n' is a shortcut here, not text
        app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(app.screen(), Screen::Entry);
        assert_eq!(app.search.industry(), "");
    }

    #[tokio::test]
    async fn test_quiz_keys_reach_session() {
        let mut app = app();
        type_text(&mut app, "Fintech");
        app.handle_key(key(KeyCode::Enter));
        settle(&mut app).await;

        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.orchestrator().state().active_tab(), Tab::Quiz);
        assert_eq!(app.quiz.borrow().total(), 1);

        app.handle_key(key(KeyCode::Char('d')));
        assert_eq!(app.quiz.borrow().score(), 1);
        app.handle_key(key(KeyCode::Enter));
        assert!(matches!(
            app.quiz.borrow().phase(),
            crate::quiz::QuizPhase::Completed { score: 1, total: 1 }
        ));
    }

    #[tokio::test]
    async fn test_region_picker_sets_region() {
        let mut app = app();
        app.handle_key(key(KeyCode::F(2)));
        assert_eq!(app.overlay, Overlay::RegionPicker);
        type_text(&mut app, "japan");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.search.region(), crate::content::Region::Japan);
        // Typed filter text did not leak into the industry field
        assert_eq!(app.search.industry(), "");
    }
}
