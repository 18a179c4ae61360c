use crate::content::QuizItem;
use crate::icons::IconSet;
use crate::quiz::{AnswerFeedback, ChoiceMark, QuizPhase, QuizSession};
use crate::state::FetchState;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Actions returned from the quiz widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizAction {
    None,
    Highlighted,
    Answered(AnswerFeedback),
    Advanced,
    Restarted,
}

/// Letter shown next to a choice
pub fn choice_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

/// Keyboard driven view over a `QuizSession`
pub struct QuizWidget {
    /// Choice the cursor is on before answering
    highlight: usize,
}

impl QuizWidget {
    pub fn new() -> Self {
        Self { highlight: 0 }
    }

    pub fn reset(&mut self) {
        self.highlight = 0;
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn handle_key(&mut self, key: KeyEvent, session: &mut QuizSession) -> QuizAction {
        match session.phase() {
            QuizPhase::Unavailable => QuizAction::None,
            QuizPhase::Completed { .. } => match key.code {
                KeyCode::Char('r') | KeyCode::Enter => {
                    if session.restart() {
                        self.highlight = 0;
                        QuizAction::Restarted
                    } else {
                        QuizAction::None
                    }
                }
                _ => QuizAction::None,
            },
            QuizPhase::InProgress { answered, .. } => {
                let choice_count = session.current_item().map_or(0, |q| q.choices.len());
                match key.code {
                    KeyCode::Char(c @ 'a'..='d') if !answered => {
                        self.answer(session, (c as u8 - b'a') as usize)
                    }
                    KeyCode::Up | KeyCode::Char('k') if !answered => {
                        self.highlight = self.highlight.saturating_sub(1);
                        QuizAction::Highlighted
                    }
                    KeyCode::Down | KeyCode::Char('j') if !answered => {
                        if self.highlight + 1 < choice_count {
                            self.highlight += 1;
                        }
                        QuizAction::Highlighted
                    }
                    KeyCode::Enter if !answered => self.answer(session, self.highlight),
                    KeyCode::Enter | KeyCode::Char(' ') if answered => {
                        if session.advance() {
                            self.highlight = 0;
                            QuizAction::Advanced
                        } else {
                            QuizAction::None
                        }
                    }
                    _ => QuizAction::None,
                }
            }
        }
    }

    fn answer(&mut self, session: &mut QuizSession, index: usize) -> QuizAction {
        match session.select_choice(index) {
            Some(feedback) => {
                self.highlight = index;
                QuizAction::Answered(feedback)
            }
            None => QuizAction::None,
        }
    }

    /// Choice lines for the current question
    pub fn choice_lines(
        &self,
        item: &QuizItem,
        session: &QuizSession,
        icons: &IconSet,
    ) -> Vec<Line<'static>> {
        item.choices
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let (marker, style) = match session.choice_mark(i) {
                    ChoiceMark::Neutral if i == self.highlight => (
                        "›",
                        Style::default()
                            .fg(Color::White)
                            .bg(Color::DarkGray)
                            .add_modifier(Modifier::BOLD),
                    ),
                    ChoiceMark::Neutral => (" ", Style::default()),
                    ChoiceMark::Correct => (
                        icons.check(),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    ChoiceMark::Wrong => (icons.cross(), Style::default().fg(Color::Red)),
                    ChoiceMark::Dimmed => (
                        " ",
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::DIM),
                    ),
                };
                Line::from(Span::styled(
                    format!("{} {}) {}", marker, choice_letter(i), choice),
                    style,
                ))
            })
            .collect()
    }

    pub fn render(
        &self,
        f: &mut Frame,
        area: Rect,
        quiz: &FetchState<QuizItem>,
        session: &QuizSession,
        icons: &IconSet,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Knowledge Check ");

        if quiz.is_loading() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Preparing your quiz...",
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            )))
            .block(block)
            .alignment(Alignment::Center);
            f.render_widget(paragraph, area);
            return;
        }

        let inner = block.inner(area);
        f.render_widget(block, area);

        match session.phase() {
            QuizPhase::Unavailable => {
                let paragraph = Paragraph::new(Line::from(Span::styled(
                    "No quiz available",
                    Style::default().fg(Color::Yellow),
                )))
                .alignment(Alignment::Center);
                f.render_widget(paragraph, inner);
            }
            QuizPhase::Completed { score, total } => {
                self.render_results(f, inner, session, score, total, icons)
            }
            QuizPhase::InProgress { .. } => self.render_question(f, inner, session, icons),
        }
    }

    fn render_question(&self, f: &mut Frame, area: Rect, session: &QuizSession, icons: &IconSet) {
        let Some(item) = session.current_item() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // progress
                Constraint::Length(1),
                Constraint::Min(3),    // question, choices, explanation
                Constraint::Length(1), // hint
            ])
            .split(area);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(session.progress_ratio().clamp(0.0, 1.0))
            .label(format!(
                "Question {} of {}",
                session.current_index() + 1,
                session.total()
            ));
        f.render_widget(gauge, chunks[0]);

        let mut lines = vec![
            Line::from(Span::styled(
                item.prompt.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(self.choice_lines(item, session, icons));

        if session.is_answered() {
            let correct = session
                .selected_choice()
                .is_some_and(|choice| item.is_correct(choice));
            lines.push(Line::from(""));
            lines.push(if correct {
                Line::from(Span::styled(
                    format!("{} Correct!", icons.check()),
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("{} Not quite.", icons.cross()),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))
            });
            if !item.explanation.is_empty() {
                lines.push(Line::from(Span::styled(
                    item.explanation.clone(),
                    Style::default().fg(Color::Gray),
                )));
            }
        }

        let body = Paragraph::new(lines).wrap(Wrap { trim: false });
        f.render_widget(body, chunks[2]);

        let hint = if session.is_answered() {
            format!("Enter: {}", session.advance_label())
        } else {
            "a-d: answer  ↑/↓ + Enter: choose".to_string()
        };
        f.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
            chunks[3],
        );
    }

    fn render_results(
        &self,
        f: &mut Frame,
        area: Rect,
        session: &QuizSession,
        score: usize,
        total: usize,
        icons: &IconSet,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Quiz Complete!", icons.trophy()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("You scored {} out of {}", score, total)),
        ];
        f.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            chunks[0],
        );

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .ratio(session.score_ratio().clamp(0.0, 1.0))
            .label(format!("{:.0}%", session.score_ratio() * 100.0));
        f.render_widget(gauge, chunks[1]);

        f.render_widget(
            Paragraph::new(Span::styled(
                "r: Retry Quiz",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
            chunks[2],
        );
    }
}

impl Default for QuizWidget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn session(count: usize) -> QuizSession {
        let items = (0..count)
            .map(|n| QuizItem {
                prompt: format!("Q{}", n),
                choices: vec!["w".into(), "x".into(), "y".into(), "z".into()],
                correct_index: 2,
                explanation: String::new(),
            })
            .collect();
        QuizSession::new(Arc::new(items))
    }

    #[test]
    fn test_letter_keys_answer() {
        let mut quiz = session(2);
        let mut widget = QuizWidget::new();
        assert_eq!(
            widget.handle_key(key(KeyCode::Char('c')), &mut quiz),
            QuizAction::Answered(AnswerFeedback {
                choice: 2,
                correct: true
            })
        );
        // Answer is final
        assert_eq!(
            widget.handle_key(key(KeyCode::Char('a')), &mut quiz),
            QuizAction::None
        );
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn test_highlight_then_enter_answers_and_advances() {
        let mut quiz = session(1);
        let mut widget = QuizWidget::new();
        widget.handle_key(key(KeyCode::Down), &mut quiz);
        assert_eq!(widget.highlight(), 1);
        assert!(matches!(
            widget.handle_key(key(KeyCode::Enter), &mut quiz),
            QuizAction::Answered(AnswerFeedback { choice: 1, correct: false })
        ));
        assert_eq!(widget.handle_key(key(KeyCode::Enter), &mut quiz), QuizAction::Advanced);
        assert_eq!(quiz.phase(), QuizPhase::Completed { score: 0, total: 1 });

        assert_eq!(widget.handle_key(key(KeyCode::Char('r')), &mut quiz), QuizAction::Restarted);
        assert_eq!(quiz.current_index(), 0);
        assert_eq!(widget.highlight(), 0);
    }

    #[test]
    fn test_highlight_stays_on_choices() {
        let mut quiz = session(1);
        let mut widget = QuizWidget::new();
        for _ in 0..10 {
            widget.handle_key(key(KeyCode::Down), &mut quiz);
        }
        assert_eq!(widget.highlight(), 3);
    }

    #[test]
    fn test_choice_lines_mark_after_answer() {
        let mut quiz = session(1);
        let widget = QuizWidget::new();
        quiz.select_choice(0);
        let item = quiz.current_item().cloned().unwrap();
        let lines = widget.choice_lines(&item, &quiz, &IconSet::new(false));
        assert_eq!(lines[0].to_string(), "x A) w");
        assert_eq!(lines[2].to_string(), "+ C) y");
        assert_eq!(lines[1].to_string(), "  B) x");
    }
}
