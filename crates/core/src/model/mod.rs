mod answer;
mod question;
mod session;
mod settings;
mod summary;

pub use answer::AnswerRecord;
pub use question::{Question, QuestionDraft, QuestionError};
pub use session::{Direction, Event, Phase, SessionState, TimerKey};
pub use settings::{NavigationMode, QuizSettings, SettingsError, TimerPolicy};
pub use summary::{QuestionStatus, QuizSummary, percentage};
