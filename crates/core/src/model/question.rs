use std::collections::{BTreeSet, HashSet};

use serde::Deserialize;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question must have at least one option")]
    NoOptions,

    #[error("option {0:?} appears more than once")]
    DuplicateOption(String),

    #[error("question must have at least one correct answer")]
    NoAnswers,

    #[error("answer {0:?} is not one of the options")]
    UnknownAnswer(String),
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// A question record as it appears in a quiz file, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub text: String,
    #[serde(default)]
    pub code: Option<String>,
    pub options: Vec<String>,
    pub answers: Vec<String>,
    pub explanation: String,
}

impl QuestionDraft {
    /// Check the draft against the question invariants.
    ///
    /// Repeated entries in `answers` collapse into one; repeated entries in
    /// `options` are rejected since options are addressed by value.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the options are empty or repeated, or if the
    /// answers are empty or reference something that is not an option.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        if self.answers.is_empty() {
            return Err(QuestionError::NoAnswers);
        }

        let mut correct_answers = BTreeSet::new();
        for answer in self.answers {
            if !seen.contains(answer.as_str()) {
                return Err(QuestionError::UnknownAnswer(answer));
            }
            correct_answers.insert(answer);
        }

        Ok(Question {
            text: self.text,
            code: self.code,
            options: self.options,
            correct_answers,
            explanation: self.explanation,
        })
    }
}

/// A validated multiple-choice question.
///
/// `correct_answers` is never empty and is always a subset of `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    code: Option<String>,
    options: Vec<String>,
    correct_answers: BTreeSet<String>,
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Code snippet shown verbatim under the prompt, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answers(&self) -> &BTreeSet<String> {
        &self.correct_answers
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }

    #[must_use]
    pub fn is_correct_option(&self, option: &str) -> bool {
        self.correct_answers.contains(option)
    }

    /// True when more than one option must be selected.
    #[must_use]
    pub fn is_multi_select(&self) -> bool {
        self.correct_answers.len() > 1
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
