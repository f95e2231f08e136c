use std::collections::BTreeMap;

use crate::error::{LearnError, Result};
use crate::types::QuizQuestion;

/// The two supported quiz interaction models.
///
/// `Gated` is the default: one question at a time, the answer locks and
/// reveals correctness before advancing. `FreeNavigation` allows moving
/// back and forth freely, with a single session-wide reveal at the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizMode {
    #[default]
    Gated,
    FreeNavigation,
}

/// State machine over one loaded question set.
///
/// Answers are only added or overwritten, never removed. Correctness is an
/// exact match between the recorded option index and `correct_index`;
/// unanswered questions count as wrong.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    mode: QuizMode,
    current: usize,
    answers: BTreeMap<usize, usize>,
    submitted: bool,
    reached_last: bool,
    revealed: bool,
}

impl QuizSession {
    /// Validates and loads a question set. An empty list or any invalid
    /// question rejects the whole load; the caller keeps its prior state.
    pub fn load(questions: Vec<QuizQuestion>, mode: QuizMode) -> Result<Self> {
        if questions.is_empty() {
            return Err(LearnError::MalformedResponse(
                "quiz contains no questions".to_string(),
            ));
        }
        for question in &questions {
            question.validate()?;
        }
        let reached_last = questions.len() == 1;
        Ok(Self {
            questions,
            mode,
            current: 0,
            answers: BTreeMap::new(),
            submitted: false,
            reached_last,
            revealed: false,
        })
    }

    /// Records an answer for the current question. In gated mode this is a
    /// no-op once the question has been submitted.
    pub fn select_option(&mut self, option: usize) {
        if option >= self.questions[self.current].options.len() {
            return;
        }
        if self.mode == QuizMode::Gated && self.submitted {
            return;
        }
        self.answers.insert(self.current, option);
    }

    /// Gated mode: locks the current selection and reveals correctness.
    /// No-op without a recorded answer, or when already submitted.
    pub fn submit(&mut self) {
        if self.mode != QuizMode::Gated || self.submitted {
            return;
        }
        if self.answers.contains_key(&self.current) {
            self.submitted = true;
        }
    }

    pub fn next(&mut self) {
        match self.mode {
            QuizMode::Gated => {
                // Forward-only: advancing requires the reveal first.
                if self.submitted && self.current + 1 < self.questions.len() {
                    self.current += 1;
                    self.submitted = false;
                }
            }
            QuizMode::FreeNavigation => {
                if self.current + 1 < self.questions.len() {
                    self.current += 1;
                }
                if self.current + 1 == self.questions.len() {
                    self.reached_last = true;
                }
            }
        }
    }

    /// Free navigation only; gated mode has no way back.
    pub fn prev(&mut self) {
        if self.mode == QuizMode::FreeNavigation {
            self.current = self.current.saturating_sub(1);
        }
    }

    /// Free navigation: flips the session-wide reveal. Available once the
    /// last question has been reached, and sticky afterwards.
    pub fn reveal(&mut self) {
        if self.mode == QuizMode::FreeNavigation && self.reached_last {
            self.revealed = true;
        }
    }

    pub fn can_reveal(&self) -> bool {
        self.mode == QuizMode::FreeNavigation && self.reached_last && !self.revealed
    }

    /// Whether correctness for the current question should be shown.
    pub fn reveals_current(&self) -> bool {
        match self.mode {
            QuizMode::Gated => self.submitted,
            QuizMode::FreeNavigation => self.revealed,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self.mode {
            QuizMode::Gated => self.submitted && self.current + 1 == self.questions.len(),
            QuizMode::FreeNavigation => self.revealed,
        }
    }

    /// `(correct, total)` over every question; unanswered counts as wrong.
    pub fn score(&self) -> (usize, usize) {
        let correct = self
            .questions
            .iter()
            .enumerate()
            .filter(|&(i, q)| self.answers.get(&i) == Some(&q.correct_index))
            .count();
        (correct, self.questions.len())
    }

    pub fn is_correct(&self, index: usize) -> bool {
        match (self.answers.get(&index), self.questions.get(index)) {
            (Some(answer), Some(question)) => *answer == question.correct_index,
            _ => false,
        }
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn answer_for(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
