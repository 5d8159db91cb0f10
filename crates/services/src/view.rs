use chrono::{DateTime, Duration, Utc};

use quiz_core::model::{Direction, Phase, QuestionStatus, QuizSummary, SessionState};

/// Presentation-agnostic snapshot of the current question.
///
/// Borrowed from the session; no pre-formatted strings. Correctness fields are
/// `None` until the question is answered so a view cannot leak the key early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub index: usize,
    pub total: usize,
    pub text: &'a str,
    pub code: Option<&'a str>,
    pub options: Vec<OptionView<'a>>,
    pub multi_select: bool,
    pub answered: bool,
    pub is_correct: Option<bool>,
    pub explanation: Option<&'a str>,
    pub time_remaining: u32,
    pub overdue: bool,
    pub can_submit: bool,
    pub can_go_next: bool,
    pub can_go_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView<'a> {
    /// 1-based position in the option list.
    pub position: usize,
    pub text: &'a str,
    pub selected: bool,
    pub correct: Option<bool>,
}

impl<'a> QuestionView<'a> {
    /// Snapshot of the current question, or `None` outside `Phase::InProgress`.
    #[must_use]
    pub fn from_session(state: &'a SessionState) -> Option<Self> {
        if state.phase() != Phase::InProgress {
            return None;
        }
        let question = state.current_question()?;
        let record = state.current_record();
        let answered = record.is_some_and(|r| r.answered());

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(idx, option)| OptionView {
                position: idx + 1,
                text: option,
                selected: record.is_some_and(|r| r.is_selected(option)),
                correct: answered.then(|| question.is_correct_option(option)),
            })
            .collect();

        Some(Self {
            index: state.current_index(),
            total: state.questions().len(),
            text: question.text(),
            code: question.code(),
            options,
            multi_select: question.is_multi_select(),
            answered,
            is_correct: record.filter(|r| r.answered()).map(|r| r.is_correct()),
            explanation: answered.then(|| question.explanation()),
            time_remaining: state.time_remaining(),
            overdue: state.is_overdue(),
            can_submit: state.can_submit(),
            can_go_next: state.can_advance(Direction::Next),
            can_go_back: state.can_advance(Direction::Prev),
        })
    }

    /// 1-based question number.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// One cell of the summary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryItem {
    pub index: usize,
    pub status: QuestionStatus,
    pub is_current: bool,
}

#[must_use]
pub fn summary_items(state: &SessionState) -> Vec<SummaryItem> {
    state
        .summary()
        .statuses()
        .iter()
        .enumerate()
        .map(|(index, status)| SummaryItem {
            index,
            status: *status,
            is_current: index == state.current_index(),
        })
        .collect()
}

/// Final score of a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub summary: QuizSummary,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl QuizResults {
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.finished_at.signed_duration_since(self.started_at)
    }
}
