#![forbid(unsafe_code)]

pub mod clock;
pub mod countdown;
pub mod error;
pub mod quiz_service;
pub mod view;

pub use clock::Clock;
pub use countdown::Countdown;
pub use error::QuizServiceError;
pub use quiz_service::QuizService;
pub use view::{OptionView, QuestionView, QuizResults, SummaryItem};
