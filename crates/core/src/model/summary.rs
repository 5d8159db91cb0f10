use std::collections::BTreeMap;

use crate::model::AnswerRecord;

/// Display state of one question in the summary grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    /// Never touched, or every selection was cleared again.
    Unanswered,
    /// Has a selection that was not submitted yet.
    Pending,
    Correct,
    Incorrect,
}

impl QuestionStatus {
    #[must_use]
    pub fn of(record: Option<&AnswerRecord>) -> Self {
        match record {
            Some(record) if record.answered() && record.is_correct() => Self::Correct,
            Some(record) if record.answered() => Self::Incorrect,
            Some(record) if !record.selected_options().is_empty() => Self::Pending,
            _ => Self::Unanswered,
        }
    }
}

/// Aggregate score for a session, derived from its answer records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSummary {
    answered: usize,
    correct: usize,
    statuses: Vec<QuestionStatus>,
}

impl QuizSummary {
    #[must_use]
    pub fn from_records(total: usize, records: &BTreeMap<usize, AnswerRecord>) -> Self {
        let statuses: Vec<_> = (0..total)
            .map(|idx| QuestionStatus::of(records.get(&idx)))
            .collect();
        let answered = records.values().filter(|r| r.answered()).count();
        let correct = records
            .values()
            .filter(|r| r.answered() && r.is_correct())
            .count();

        Self {
            answered,
            correct,
            statuses,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.statuses.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn incorrect_count(&self) -> usize {
        self.answered - self.correct
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total().saturating_sub(self.answered)
    }

    /// Share of answered questions that were correct, rounded half up.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        percentage(self.correct, self.answered)
    }

    #[must_use]
    pub fn statuses(&self) -> &[QuestionStatus] {
        &self.statuses
    }
}

/// `round(100 * correct / answered)`, or 0 when nothing was answered.
#[must_use]
pub fn percentage(correct: usize, answered: usize) -> u32 {
    if answered == 0 {
        return 0;
    }
    let rounded = (200 * correct + answered) / (2 * answered);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
