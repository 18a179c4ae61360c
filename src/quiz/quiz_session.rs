use crate::content::QuizItem;
use crate::state::{SearchState, StateEvent, StateSlice, StateSubscriber};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info};

/// Where the walkthrough currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No questions to play
    Unavailable,
    InProgress {
        current_index: usize,
        selected_choice: Option<usize>,
        answered: bool,
    },
    Completed {
        score: usize,
        total: usize,
    },
}

/// What the user learns right after answering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub choice: usize,
    pub correct: bool,
}

/// How a choice should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceMark {
    /// Not answered yet
    Neutral,
    /// The right answer, revealed after answering
    Correct,
    /// The user's pick, which was wrong
    Wrong,
    /// Neither picked nor correct
    Dimmed,
}

/// Ordered walk through a fixed list of quiz items with scoring
#[derive(Debug, Clone)]
pub struct QuizSession {
    items: Arc<Vec<QuizItem>>,
    current_index: usize,
    selected_choice: Option<usize>,
    answered: bool,
    score: usize,
    completed: bool,
}

impl QuizSession {
    pub fn new(items: Arc<Vec<QuizItem>>) -> Self {
        Self {
            items,
            current_index: 0,
            selected_choice: None,
            answered: false,
            score: 0,
            completed: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(Arc::new(Vec::new()))
    }

    /// Replace the question list. Does nothing if `items` is the list
    /// already being played; otherwise starts over at question one.
    pub fn reload(&mut self, items: Arc<Vec<QuizItem>>) -> bool {
        if Arc::ptr_eq(&self.items, &items) {
            return false;
        }
        debug!(target: "quiz", "Reloading quiz with {} questions", items.len());
        *self = Self::new(items);
        true
    }

    pub fn items(&self) -> &Arc<Vec<QuizItem>> {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_choice(&self) -> Option<usize> {
        self.selected_choice
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn phase(&self) -> QuizPhase {
        if self.items.is_empty() {
            QuizPhase::Unavailable
        } else if self.completed {
            QuizPhase::Completed {
                score: self.score,
                total: self.items.len(),
            }
        } else {
            QuizPhase::InProgress {
                current_index: self.current_index,
                selected_choice: self.selected_choice,
                answered: self.answered,
            }
        }
    }

    /// The question being asked, if the quiz is in progress
    pub fn current_item(&self) -> Option<&QuizItem> {
        if self.completed {
            return None;
        }
        self.items.get(self.current_index)
    }

    fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.items.len()
    }

    /// Answer the current question. The first answer is final; later
    /// calls, and indexes that are not a choice, return `None`.
    pub fn select_choice(&mut self, index: usize) -> Option<AnswerFeedback> {
        if self.answered || self.completed {
            return None;
        }
        let item = self.items.get(self.current_index)?;
        if index >= item.choices.len() {
            return None;
        }

        let correct = item.is_correct(index);
        self.selected_choice = Some(index);
        self.answered = true;
        if correct {
            self.score += 1;
        }

        debug!(target: "quiz", "Question {} answered with {} ({})",
               self.current_index + 1, index, if correct { "correct" } else { "wrong" });
        Some(AnswerFeedback {
            choice: index,
            correct,
        })
    }

    /// Move on after answering; completes the quiz after the last question
    pub fn advance(&mut self) -> bool {
        if !self.answered || self.completed {
            return false;
        }

        if self.is_last_question() {
            self.completed = true;
            info!(target: "quiz", "Quiz completed: {}/{}", self.score, self.items.len());
        } else {
            self.current_index += 1;
            self.selected_choice = None;
            self.answered = false;
        }
        true
    }

    /// Play again from the first question. Only after completion.
    pub fn restart(&mut self) -> bool {
        if !self.completed {
            return false;
        }
        self.current_index = 0;
        self.selected_choice = None;
        self.answered = false;
        self.score = 0;
        self.completed = false;
        debug!(target: "quiz", "Quiz restarted");
        true
    }

    pub fn choice_mark(&self, index: usize) -> ChoiceMark {
        let Some(item) = self.current_item() else {
            return ChoiceMark::Neutral;
        };
        if !self.answered {
            return ChoiceMark::Neutral;
        }
        if item.is_correct(index) {
            ChoiceMark::Correct
        } else if self.selected_choice == Some(index) {
            ChoiceMark::Wrong
        } else {
            ChoiceMark::Dimmed
        }
    }

    /// Fraction of the quiz reached, counting the current question
    pub fn progress_ratio(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        if self.completed {
            return 1.0;
        }
        (self.current_index + 1) as f64 / self.items.len() as f64
    }

    pub fn score_ratio(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.score as f64 / self.items.len() as f64
    }

    /// Label for the advance action once a question is answered
    pub fn advance_label(&self) -> &'static str {
        if self.is_last_question() {
            "See Results"
        } else {
            "Next Question"
        }
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::empty()
    }
}

/// Keeps a shared quiz session on the list the quiz fetch state holds
pub struct QuizSubscriber {
    session: Rc<RefCell<QuizSession>>,
}

impl QuizSubscriber {
    pub fn new(session: Rc<RefCell<QuizSession>>) -> Self {
        Self { session }
    }
}

impl StateSubscriber for QuizSubscriber {
    fn name(&self) -> &str {
        "QuizSubscriber"
    }

    fn slices(&self) -> &[StateSlice] {
        &[StateSlice::Quiz]
    }

    fn on_state_event(&mut self, _event: &StateEvent, state: &SearchState) {
        self.session
            .borrow_mut()
            .reload(Arc::clone(state.quiz().items()));
    }
}
