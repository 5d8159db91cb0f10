use std::collections::BTreeMap;

use crate::model::{
    AnswerRecord, NavigationMode, Question, QuestionStatus, QuizSettings, QuizSummary, TimerPolicy,
};

//
// ─── EVENTS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No quiz file has been loaded yet.
    Loading,
    InProgress,
    /// Overview of every question; reachable in free navigation only.
    Summary,
    /// Terminal. Only a reset or a new file leaves it.
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// Identifies one run of the countdown.
///
/// A tick is applied only if its key still matches `SessionState::timer_key`,
/// so ticks queued before a navigation, reset or reload are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerKey {
    epoch: u64,
    index: usize,
}

impl TimerKey {
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Every way a session can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FileLoaded(Vec<Question>),
    OptionToggled(String),
    Submitted,
    Navigated(Direction),
    JumpedTo(usize),
    SummaryOpened,
    Finished,
    Reset,
    TimerTicked(TimerKey),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State of one quiz attempt.
///
/// All changes go through [`SessionState::update`] (or the consuming
/// [`SessionState::apply`]). Requests that make no sense in the current
/// state are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    settings: QuizSettings,
    questions: Vec<Question>,
    current_index: usize,
    answer_records: BTreeMap<usize, AnswerRecord>,
    time_remaining: u32,
    phase: Phase,
    epoch: u64,
}

impl SessionState {
    /// An empty session waiting for a quiz file.
    #[must_use]
    pub fn new(settings: QuizSettings) -> Self {
        Self {
            settings,
            questions: Vec::new(),
            current_index: 0,
            answer_records: BTreeMap::new(),
            time_remaining: settings.time_limit_secs(),
            phase: Phase::Loading,
            epoch: 0,
        }
    }

    /// A session that starts at the first of `questions`.
    #[must_use]
    pub fn with_questions(settings: QuizSettings, questions: Vec<Question>) -> Self {
        Self::new(settings).apply(Event::FileLoaded(questions))
    }

    /// Pure transition: `(state, event) -> state`.
    #[must_use]
    pub fn apply(mut self, event: Event) -> Self {
        self.update(event);
        self
    }

    /// Apply `event` in place. Returns false when the event was ignored.
    pub fn update(&mut self, event: Event) -> bool {
        match event {
            Event::FileLoaded(questions) => self.load(questions),
            Event::OptionToggled(option) => self.toggle_option(&option),
            Event::Submitted => self.submit(),
            Event::Navigated(direction) => self.advance(direction),
            Event::JumpedTo(index) => self.jump_to(index),
            Event::SummaryOpened => self.open_summary(),
            Event::Finished => self.finish(),
            Event::Reset => self.reset(),
            Event::TimerTicked(key) => self.tick(key),
        }
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn answer_records(&self) -> &BTreeMap<usize, AnswerRecord> {
        &self.answer_records
    }

    #[must_use]
    pub fn record(&self, index: usize) -> Option<&AnswerRecord> {
        self.answer_records.get(&index)
    }

    #[must_use]
    pub fn current_record(&self) -> Option<&AnswerRecord> {
        self.record(self.current_index)
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.current_record().is_some_and(AnswerRecord::answered)
    }

    /// Countdown ran out on a question that is still open (visual-only policy).
    #[must_use]
    pub fn is_overdue(&self) -> bool {
        self.phase == Phase::InProgress && self.time_remaining == 0 && !self.is_current_answered()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::InProgress
            && self
                .current_record()
                .is_some_and(|r| !r.answered() && !r.selected_options().is_empty())
    }

    /// Whether `advance(direction)` would change anything right now.
    #[must_use]
    pub fn can_advance(&self, direction: Direction) -> bool {
        self.clone().advance(direction)
    }

    /// The countdown that should be running, if any.
    #[must_use]
    pub fn timer_key(&self) -> Option<TimerKey> {
        let running = self.phase == Phase::InProgress
            && self.time_remaining > 0
            && !self.is_current_answered();
        running.then_some(TimerKey {
            epoch: self.epoch,
            index: self.current_index,
        })
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary::from_records(self.questions.len(), &self.answer_records)
    }

    #[must_use]
    pub fn question_status(&self, index: usize) -> QuestionStatus {
        QuestionStatus::of(self.record(index))
    }

    // ─── Transitions ───────────────────────────────────────────────────────────

    fn load(&mut self, questions: Vec<Question>) -> bool {
        if questions.is_empty() {
            return false;
        }
        self.questions = questions;
        self.restart();
        true
    }

    fn reset(&mut self) -> bool {
        if self.phase == Phase::Loading {
            return false;
        }
        self.restart();
        true
    }

    fn restart(&mut self) {
        self.answer_records.clear();
        self.phase = Phase::InProgress;
        self.move_to(0);
    }

    fn move_to(&mut self, index: usize) {
        self.current_index = index;
        self.time_remaining = self.settings.time_limit_secs();
        self.epoch += 1;
    }

    fn toggle_option(&mut self, option: &str) -> bool {
        if self.phase != Phase::InProgress || self.is_current_answered() {
            return false;
        }
        let Some(question) = self.current_question() else {
            return false;
        };
        if !question.has_option(option) {
            return false;
        }
        self.answer_records
            .entry(self.current_index)
            .or_default()
            .toggle(option)
    }

    fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.lock_current()
    }

    fn lock_current(&mut self) -> bool {
        let Some(question) = self.questions.get(self.current_index) else {
            return false;
        };
        let locked = self
            .answer_records
            .entry(self.current_index)
            .or_default()
            .lock(question.correct_answers());
        if locked {
            self.time_remaining = self.settings.time_limit_secs();
        }
        locked
    }

    fn advance(&mut self, direction: Direction) -> bool {
        let last = self.questions.len().saturating_sub(1);
        match (self.settings.navigation(), self.phase, direction) {
            (NavigationMode::Free, Phase::InProgress, Direction::Next) => {
                if self.current_index < last {
                    self.move_to(self.current_index + 1);
                } else {
                    self.phase = Phase::Summary;
                }
                true
            }
            (NavigationMode::Free, Phase::InProgress, Direction::Prev) => {
                if self.current_index == 0 {
                    return false;
                }
                self.move_to(self.current_index - 1);
                true
            }
            (NavigationMode::Free, Phase::Summary, Direction::Prev) => {
                self.phase = Phase::InProgress;
                self.move_to(last);
                true
            }
            (NavigationMode::ForwardOnly, Phase::InProgress, Direction::Next) => {
                if !self.is_current_answered() {
                    return false;
                }
                if self.current_index < last {
                    self.move_to(self.current_index + 1);
                } else {
                    self.phase = Phase::Results;
                }
                true
            }
            _ => false,
        }
    }

    fn jump_to(&mut self, index: usize) -> bool {
        if self.settings.navigation() != NavigationMode::Free || index >= self.questions.len() {
            return false;
        }
        match self.phase {
            Phase::InProgress if index == self.current_index => false,
            Phase::InProgress | Phase::Summary => {
                self.phase = Phase::InProgress;
                self.move_to(index);
                true
            }
            Phase::Loading | Phase::Results => false,
        }
    }

    fn open_summary(&mut self) -> bool {
        if self.settings.navigation() != NavigationMode::Free || self.phase != Phase::InProgress {
            return false;
        }
        self.phase = Phase::Summary;
        true
    }

    fn finish(&mut self) -> bool {
        if !matches!(self.phase, Phase::InProgress | Phase::Summary) {
            return false;
        }
        self.phase = Phase::Results;
        true
    }

    fn tick(&mut self, key: TimerKey) -> bool {
        if self.timer_key() != Some(key) {
            return false;
        }
        self.time_remaining -= 1;
        if self.time_remaining == 0 && self.settings.timer_policy() == TimerPolicy::AutoLock {
            self.lock_current();
        }
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_quiz;
    use crate::model::QuestionDraft;

    fn question(text: &str, options: &[&str], answers: &[&str]) -> Question {
        QuestionDraft {
            text: text.into(),
            code: None,
            options: options.iter().map(|s| (*s).to_string()).collect(),
            answers: answers.iter().map(|s| (*s).to_string()).collect(),
            explanation: String::new(),
        }
        .validate()
        .unwrap()
    }

    fn three_questions() -> Vec<Question> {
        vec![
            question("Q1", &["A", "B"], &["A"]),
            question("Q2", &["X", "Y", "Z"], &["X", "Y"]),
            question("Q3", &["T", "F"], &["F"]),
        ]
    }

    fn free_session() -> SessionState {
        SessionState::with_questions(QuizSettings::free_navigation(), three_questions())
    }

    fn auto_session() -> SessionState {
        SessionState::with_questions(QuizSettings::auto_advance(), three_questions())
    }

    fn expire(session: &mut SessionState) {
        while let Some(key) = session.timer_key() {
            session.update(Event::TimerTicked(key));
        }
    }

    #[test]
    fn new_session_waits_for_file() {
        let session = SessionState::new(QuizSettings::default());
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.timer_key().is_none());
        assert_eq!(session.clone().apply(Event::Reset), session);
    }

    #[test]
    fn loaded_file_starts_first_question() {
        let raw = br#"[{"question":"Q1","options":["A","B"],"answers":["A"],"explanation":"e"}]"#;
        let questions = parse_quiz(raw).unwrap();
        let session = SessionState::new(QuizSettings::auto_advance())
            .apply(Event::FileLoaded(questions))
            .apply(Event::OptionToggled("A".into()))
            .apply(Event::Submitted);

        let record = session.current_record().unwrap();
        assert!(record.answered());
        assert!(record.is_correct());
    }

    #[test]
    fn load_initializes_fresh_state() {
        let session = free_session();
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_index(), 0);
        assert!(session.answer_records().is_empty());
        assert_eq!(session.time_remaining(), 60);
    }

    #[test]
    fn empty_load_is_ignored() {
        let mut session = free_session();
        let before = session.clone();
        assert!(!session.update(Event::FileLoaded(Vec::new())));
        assert_eq!(session, before);
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let mut session = free_session();
        session.update(Event::OptionToggled("A".into()));
        let before = session.current_record().cloned();

        session.update(Event::OptionToggled("B".into()));
        session.update(Event::OptionToggled("B".into()));

        assert_eq!(session.current_record().cloned(), before);
    }

    #[test]
    fn toggle_unknown_option_is_ignored() {
        let mut session = free_session();
        assert!(!session.update(Event::OptionToggled("nope".into())));
        assert!(session.current_record().is_none());
    }

    #[test]
    fn submit_requires_selection() {
        let mut session = free_session();
        assert!(!session.can_submit());
        assert!(!session.update(Event::Submitted));
        assert!(!session.is_current_answered());
    }

    #[test]
    fn selection_is_frozen_after_submit() {
        let mut session = free_session();
        session.update(Event::OptionToggled("B".into()));
        session.update(Event::Submitted);

        assert!(!session.update(Event::OptionToggled("A".into())));
        assert!(!session.update(Event::OptionToggled("B".into())));
        assert!(!session.update(Event::Submitted));

        let record = session.current_record().unwrap();
        assert!(record.is_selected("B"));
        assert!(!record.is_selected("A"));
        assert!(!record.is_correct());
    }

    #[test]
    fn partial_multi_select_is_incorrect() {
        let mut session = free_session();
        session.update(Event::JumpedTo(1));
        session.update(Event::OptionToggled("X".into()));
        session.update(Event::Submitted);
        assert!(!session.current_record().unwrap().is_correct());
    }

    #[test]
    fn multi_select_in_any_order_is_correct() {
        let mut session = free_session();
        session.update(Event::JumpedTo(1));
        session.update(Event::OptionToggled("Y".into()));
        session.update(Event::OptionToggled("X".into()));
        session.update(Event::Submitted);
        assert!(session.current_record().unwrap().is_correct());
    }

    #[test]
    fn revisiting_answered_question_keeps_record() {
        let mut session = free_session();
        session.update(Event::OptionToggled("A".into()));
        session.update(Event::Submitted);
        let answered = session.current_record().cloned();

        session.update(Event::Navigated(Direction::Next));
        session.update(Event::OptionToggled("X".into()));
        session.update(Event::Navigated(Direction::Prev));

        assert_eq!(session.current_index(), 0);
        assert_eq!(session.current_record().cloned(), answered);
        assert!(session.timer_key().is_none());
    }

    #[test]
    fn navigation_resets_countdown() {
        let mut session = free_session();
        let key = session.timer_key().unwrap();
        session.update(Event::TimerTicked(key));
        session.update(Event::TimerTicked(key));
        assert_eq!(session.time_remaining(), 58);

        session.update(Event::Navigated(Direction::Next));
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn stale_tick_is_ignored() {
        let mut session = free_session();
        let old = session.timer_key().unwrap();
        session.update(Event::Navigated(Direction::Next));
        session.update(Event::Navigated(Direction::Prev));

        assert!(!session.update(Event::TimerTicked(old)));
        assert_eq!(session.time_remaining(), 60);
        assert_ne!(session.timer_key(), Some(old));
    }

    #[test]
    fn auto_lock_expiry_with_no_selection_is_incorrect() {
        let mut session = auto_session();
        expire(&mut session);

        assert_eq!(session.time_remaining(), 30);
        let record = session.current_record().unwrap();
        assert!(record.answered());
        assert!(!record.is_correct());
        assert!(record.selected_options().is_empty());
        assert!(session.timer_key().is_none());
    }

    #[test]
    fn auto_lock_expiry_grades_current_selection() {
        let mut session = auto_session();
        session.update(Event::OptionToggled("A".into()));
        expire(&mut session);
        assert!(session.current_record().unwrap().is_correct());
    }

    #[test]
    fn visual_only_expiry_holds_at_zero() {
        let mut session = free_session();
        session.update(Event::OptionToggled("A".into()));
        expire(&mut session);

        assert_eq!(session.time_remaining(), 0);
        assert!(session.is_overdue());
        assert!(!session.is_current_answered());

        assert!(session.update(Event::Submitted));
        assert!(!session.is_overdue());
        assert!(session.current_record().unwrap().is_correct());
    }

    #[test]
    fn countdown_stops_once_answered() {
        let mut session = free_session();
        let key = session.timer_key().unwrap();
        session.update(Event::OptionToggled("A".into()));
        session.update(Event::Submitted);

        assert!(!session.update(Event::TimerTicked(key)));
        assert_eq!(session.time_remaining(), 60);
    }

    #[test]
    fn submit_restores_full_duration() {
        let mut session = free_session();
        let key = session.timer_key().unwrap();
        for _ in 0..5 {
            session.update(Event::TimerTicked(key));
        }
        assert_eq!(session.time_remaining(), 55);

        session.update(Event::OptionToggled("A".into()));
        session.update(Event::Submitted);

        assert!(session.is_current_answered());
        assert_eq!(session.time_remaining(), 60);
        assert!(session.timer_key().is_none());
    }

    #[test]
    fn free_navigation_reaches_summary_and_jumps_back() {
        let mut session = free_session();
        assert!(!session.update(Event::Navigated(Direction::Prev)));
        session.update(Event::Navigated(Direction::Next));
        session.update(Event::Navigated(Direction::Next));
        session.update(Event::Navigated(Direction::Next));
        assert_eq!(session.phase(), Phase::Summary);
        assert!(session.timer_key().is_none());

        assert!(session.update(Event::JumpedTo(1)));
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_index(), 1);

        session.update(Event::SummaryOpened);
        session.update(Event::Navigated(Direction::Prev));
        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_index(), 2);
    }

    #[test]
    fn jump_out_of_range_is_ignored() {
        let mut session = free_session();
        assert!(!session.update(Event::JumpedTo(3)));
        assert!(!session.update(Event::JumpedTo(0)));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn forward_only_requires_answer_and_ends_in_results() {
        let mut session = auto_session();
        assert!(!session.can_advance(Direction::Next));
        assert!(!session.update(Event::JumpedTo(2)));
        assert!(!session.update(Event::SummaryOpened));

        for option in ["A", "X", "T"] {
            session.update(Event::OptionToggled(option.into()));
            session.update(Event::Submitted);
            assert!(!session.update(Event::Navigated(Direction::Prev)));
            assert!(session.update(Event::Navigated(Direction::Next)));
        }

        assert_eq!(session.phase(), Phase::Results);
        let summary = session.summary();
        assert_eq!(summary.answered_count(), 3);
        assert_eq!(summary.correct_count(), 1);
        assert_eq!(summary.percentage(), 33);
    }

    #[test]
    fn finish_is_terminal_until_reset() {
        let mut session = free_session();
        session.update(Event::OptionToggled("A".into()));
        assert!(session.update(Event::Finished));
        assert_eq!(session.phase(), Phase::Results);

        assert!(!session.update(Event::OptionToggled("B".into())));
        assert!(!session.update(Event::Navigated(Direction::Next)));
        assert!(!session.update(Event::JumpedTo(1)));
        assert!(!session.update(Event::Finished));
        assert!(session.timer_key().is_none());
    }

    #[test]
    fn reset_after_answering_everything_restores_start() {
        let mut session = free_session();
        for (idx, option) in ["A", "X", "F"].into_iter().enumerate() {
            session.update(Event::JumpedTo(idx));
            session.update(Event::OptionToggled(option.into()));
            session.update(Event::Submitted);
        }
        session.update(Event::Finished);
        let old_key = TimerKey {
            epoch: session.epoch,
            index: 0,
        };

        assert!(session.update(Event::Reset));

        assert_eq!(session.phase(), Phase::InProgress);
        assert_eq!(session.current_index(), 0);
        assert!(session.answer_records().is_empty());
        assert_eq!(session.time_remaining(), 60);
        assert_eq!(session.questions().len(), 3);
        assert!(!session.update(Event::TimerTicked(old_key)));
    }

    #[test]
    fn summary_statuses_follow_records() {
        let mut session = free_session();
        session.update(Event::OptionToggled("A".into()));
        session.update(Event::Submitted);
        session.update(Event::JumpedTo(1));
        session.update(Event::OptionToggled("X".into()));

        assert_eq!(session.question_status(0), QuestionStatus::Correct);
        assert_eq!(session.question_status(1), QuestionStatus::Pending);
        assert_eq!(session.question_status(2), QuestionStatus::Unanswered);
        assert_eq!(session.summary().percentage(), 100);
    }
}
