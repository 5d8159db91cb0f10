use std::collections::BTreeSet;

use crate::grading::grade;

/// What the user did with one question.
///
/// Selections stay mutable until the record is locked; locking grades the
/// selection once and freezes both the selection and the verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    answered: bool,
    selected_options: BTreeSet<String>,
    is_correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn selected_options(&self) -> &BTreeSet<String> {
        &self.selected_options
    }

    #[must_use]
    pub fn is_selected(&self, option: &str) -> bool {
        self.selected_options.contains(option)
    }

    /// Only meaningful once `answered` is true.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Flip `option` in the selection. Returns false once the record is locked.
    pub(crate) fn toggle(&mut self, option: &str) -> bool {
        if self.answered {
            return false;
        }
        if !self.selected_options.remove(option) {
            self.selected_options.insert(option.to_string());
        }
        true
    }

    /// Grade the current selection and freeze the record.
    pub(crate) fn lock(&mut self, correct_answers: &BTreeSet<String>) -> bool {
        if self.answered {
            return false;
        }
        self.is_correct = grade(correct_answers, &self.selected_options);
        self.answered = true;
        true
    }
}
