//! Quiz domain: question records, the quiz file loader, grading and the
//! session state machine. No I/O and no timers live here; hosts drive the
//! countdown by feeding `Event::TimerTicked`.

#![forbid(unsafe_code)]

pub mod grading;
pub mod loader;
pub mod model;

pub use grading::grade;
pub use loader::{MalformedQuizFile, parse_quiz};
