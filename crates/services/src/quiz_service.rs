use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use quiz_core::model::{Direction, Event, Phase, QuizSettings, SessionState, TimerKey};
use quiz_core::parse_quiz;

use crate::Clock;
use crate::error::QuizServiceError;
use crate::view::{QuestionView, QuizResults, SummaryItem, summary_items};

/// Host-side owner of a quiz session.
///
/// Every user action funnels through here so it can be logged and stamped;
/// the state changes themselves are `SessionState` transitions.
pub struct QuizService {
    clock: Clock,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl QuizService {
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self {
            clock: Clock::default(),
            state: SessionState::new(settings),
            started_at: None,
            finished_at: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        self.state.settings()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Parse `bytes` and start a new attempt with them.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Malformed` if the file is rejected; the
    /// current session is left exactly as it was.
    pub fn load_file(&mut self, bytes: &[u8]) -> Result<&SessionState, QuizServiceError> {
        self.load_file_with_rng(bytes, &mut rand::rng())
    }

    /// Like [`QuizService::load_file`], shuffling with `rng` when the settings ask for it.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Malformed` if the file is rejected.
    pub fn load_file_with_rng<R: Rng + ?Sized>(
        &mut self,
        bytes: &[u8],
        rng: &mut R,
    ) -> Result<&SessionState, QuizServiceError> {
        let mut questions = parse_quiz(bytes).inspect_err(|err| {
            warn!(error = %err, "rejected quiz file");
        })?;

        if self.settings().shuffle_questions() {
            questions.shuffle(rng);
        }

        let count = questions.len();
        self.dispatch(Event::FileLoaded(questions));
        info!(questions = count, "quiz loaded");
        Ok(&self.state)
    }

    /// Read a quiz file from disk and load it.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Read` if the file cannot be read, or
    /// `QuizServiceError::Malformed` if its contents are rejected.
    pub async fn load_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&SessionState, QuizServiceError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| QuizServiceError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read quiz file");
        self.load_file(&bytes)
    }

    pub fn toggle_option(&mut self, option: &str) -> &SessionState {
        self.dispatch(Event::OptionToggled(option.to_string()))
    }

    /// Toggle the option at 1-based `position` of the current question.
    pub fn toggle_option_at(&mut self, position: usize) -> &SessionState {
        let option = position
            .checked_sub(1)
            .and_then(|idx| self.state.current_question()?.options().get(idx).cloned());
        match option {
            Some(option) => self.dispatch(Event::OptionToggled(option)),
            None => {
                debug!(position, "no option at position");
                &self.state
            }
        }
    }

    pub fn submit(&mut self) -> &SessionState {
        self.dispatch(Event::Submitted)
    }

    pub fn advance(&mut self, direction: Direction) -> &SessionState {
        self.dispatch(Event::Navigated(direction))
    }

    pub fn jump_to(&mut self, index: usize) -> &SessionState {
        self.dispatch(Event::JumpedTo(index))
    }

    pub fn open_summary(&mut self) -> &SessionState {
        self.dispatch(Event::SummaryOpened)
    }

    pub fn finish(&mut self) -> &SessionState {
        self.dispatch(Event::Finished)
    }

    pub fn reset(&mut self) -> &SessionState {
        self.dispatch(Event::Reset)
    }

    pub fn tick(&mut self, key: TimerKey) -> &SessionState {
        self.dispatch(Event::TimerTicked(key))
    }

    #[must_use]
    pub fn question_view(&self) -> Option<QuestionView<'_>> {
        QuestionView::from_session(&self.state)
    }

    #[must_use]
    pub fn summary_items(&self) -> Vec<SummaryItem> {
        summary_items(&self.state)
    }

    /// Final score, available once the attempt reached `Phase::Results`.
    #[must_use]
    pub fn results(&self) -> Option<QuizResults> {
        if self.state.phase() != Phase::Results {
            return None;
        }
        Some(QuizResults {
            summary: self.state.summary(),
            started_at: self.started_at?,
            finished_at: self.finished_at?,
        })
    }

    fn dispatch(&mut self, event: Event) -> &SessionState {
        let kind = EventKind::of(&event);
        let before = self.state.phase();

        if !self.state.update(event) {
            debug!(event = %kind, phase = ?before, "ignored");
            return &self.state;
        }

        let after = self.state.phase();
        debug!(
            event = %kind,
            index = self.state.current_index(),
            time_remaining = self.state.time_remaining(),
            phase = ?after,
            "applied"
        );

        if matches!(kind, EventKind::FileLoaded | EventKind::Reset) {
            self.started_at = Some(self.clock.now());
            self.finished_at = None;
        }
        if kind == EventKind::Reset {
            info!("quiz reset");
        }
        if kind == EventKind::TimerTicked && self.state.is_current_answered() {
            info!(index = self.state.current_index(), "time expired, answer locked");
        }
        if before != Phase::Results && after == Phase::Results {
            self.finished_at = Some(self.clock.now());
            let summary = self.state.summary();
            info!(
                correct = summary.correct_count(),
                answered = summary.answered_count(),
                percentage = summary.percentage(),
                "quiz finished"
            );
        }

        &self.state
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("questions_len", &self.state.questions().len())
            .field("current", &self.state.current_index())
            .field("phase", &self.state.phase())
            .field("started_at", &self.started_at)
            .field("finished_at", &self.finished_at)
            .finish_non_exhaustive()
    }
}

/// Payload-free event name for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EventKind {
    FileLoaded,
    OptionToggled,
    Submitted,
    Navigated,
    JumpedTo,
    SummaryOpened,
    Finished,
    Reset,
    TimerTicked,
}

impl EventKind {
    fn of(event: &Event) -> Self {
        match event {
            Event::FileLoaded(_) => Self::FileLoaded,
            Event::OptionToggled(_) => Self::OptionToggled,
            Event::Submitted => Self::Submitted,
            Event::Navigated(_) => Self::Navigated,
            Event::JumpedTo(_) => Self::JumpedTo,
            Event::SummaryOpened => Self::SummaryOpened,
            Event::Finished => Self::Finished,
            Event::Reset => Self::Reset,
            Event::TimerTicked(_) => Self::TimerTicked,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
