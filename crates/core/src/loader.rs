//! Quiz file parsing.
//!
//! A quiz file is a UTF-8 JSON document whose top-level value is a non-empty
//! array of question records.

use serde_json::Value;
use thiserror::Error;

use crate::model::{Question, QuestionDraft, QuestionError};

/// Why a quiz file could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedQuizFile {
    #[error("quiz file is not valid UTF-8")]
    InvalidUtf8,

    #[error("quiz file is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("quiz file must contain a JSON array of questions")]
    NotAnArray,

    #[error("quiz file contains no questions")]
    Empty,

    #[error("question {number} is missing a field or has the wrong shape: {message}")]
    InvalidRecord { number: usize, message: String },

    #[error("question {number} is invalid: {source}")]
    InvalidQuestion {
        number: usize,
        #[source]
        source: QuestionError,
    },
}

/// Parse raw quiz file bytes into validated questions, in file order.
///
/// Question numbers in errors are 1-based.
///
/// # Errors
///
/// Returns `MalformedQuizFile` on the first problem found.
pub fn parse_quiz(bytes: &[u8]) -> Result<Vec<Question>, MalformedQuizFile> {
    let text = std::str::from_utf8(bytes).map_err(|_| MalformedQuizFile::InvalidUtf8)?;
    let document: Value =
        serde_json::from_str(text).map_err(|err| MalformedQuizFile::InvalidJson {
            message: err.to_string(),
        })?;

    let Value::Array(records) = document else {
        return Err(MalformedQuizFile::NotAnArray);
    };
    if records.is_empty() {
        return Err(MalformedQuizFile::Empty);
    }

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let number = idx + 1;
            let draft: QuestionDraft =
                serde_json::from_value(record).map_err(|err| MalformedQuizFile::InvalidRecord {
                    number,
                    message: err.to_string(),
                })?;
            draft
                .validate()
                .map_err(|source| MalformedQuizFile::InvalidQuestion { number, source })
        })
        .collect()
}
