use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be between 5 and 600 seconds")]
    InvalidTimeLimit,

    #[error("unknown timer policy: {0}")]
    UnknownTimerPolicy(String),

    #[error("unknown navigation mode: {0}")]
    UnknownNavigationMode(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

//
// ─── POLICIES ──────────────────────────────────────────────────────────────────
//

/// What happens when the countdown for a question reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPolicy {
    /// Expiry submits whatever is selected, even nothing.
    AutoLock,
    /// Expiry is only shown; the countdown holds at zero until the user submits.
    VisualOnly,
}

/// How the user may move between questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Back, forward and jumps at any time; a summary view follows the last question.
    Free,
    /// Forward only, once the current question is answered; the last question
    /// leads straight to results.
    ForwardOnly,
}

impl FromStr for TimerPolicy {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto-lock" | "autolock" => Ok(Self::AutoLock),
            "visual-only" | "visual" => Ok(Self::VisualOnly),
            other => Err(SettingsError::UnknownTimerPolicy(other.to_string())),
        }
    }
}

impl FromStr for NavigationMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "forward-only" | "forward" => Ok(Self::ForwardOnly),
            other => Err(SettingsError::UnknownNavigationMode(other.to_string())),
        }
    }
}

impl fmt::Display for TimerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerPolicy::AutoLock => f.write_str("auto-lock"),
            TimerPolicy::VisualOnly => f.write_str("visual-only"),
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationMode::Free => f.write_str("free"),
            NavigationMode::ForwardOnly => f.write_str("forward-only"),
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Per-deployment quiz configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    time_limit_secs: u32,
    timer_policy: TimerPolicy,
    navigation: NavigationMode,
    shuffle_questions: bool,
}

impl QuizSettings {
    pub const MIN_TIME_LIMIT_SECS: u32 = 5;
    pub const MAX_TIME_LIMIT_SECS: u32 = 600;

    /// Free navigation with a summary grid and a 60 second visual-only countdown.
    #[must_use]
    pub fn free_navigation() -> Self {
        Self {
            time_limit_secs: 60,
            timer_policy: TimerPolicy::VisualOnly,
            navigation: NavigationMode::Free,
            shuffle_questions: false,
        }
    }

    /// Forward-only flow with a 30 second countdown that locks the answer on expiry.
    #[must_use]
    pub fn auto_advance() -> Self {
        Self {
            time_limit_secs: 30,
            timer_policy: TimerPolicy::AutoLock,
            navigation: NavigationMode::ForwardOnly,
            shuffle_questions: false,
        }
    }

    /// Look up a preset by name (`free` or `auto-advance`).
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnknownPreset` for any other name.
    pub fn preset(name: &str) -> Result<Self, SettingsError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "free" | "free-navigation" => Ok(Self::free_navigation()),
            "auto-advance" | "auto" => Ok(Self::auto_advance()),
            other => Err(SettingsError::UnknownPreset(other.to_string())),
        }
    }

    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` if the limit is outside 5..=600 seconds.
    pub fn new(
        time_limit_secs: u32,
        timer_policy: TimerPolicy,
        navigation: NavigationMode,
        shuffle_questions: bool,
    ) -> Result<Self, SettingsError> {
        if !(Self::MIN_TIME_LIMIT_SECS..=Self::MAX_TIME_LIMIT_SECS).contains(&time_limit_secs) {
            return Err(SettingsError::InvalidTimeLimit);
        }

        Ok(Self {
            time_limit_secs,
            timer_policy,
            navigation,
            shuffle_questions,
        })
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` if the limit is outside 5..=600 seconds.
    pub fn with_time_limit(self, time_limit_secs: u32) -> Result<Self, SettingsError> {
        Self::new(
            time_limit_secs,
            self.timer_policy,
            self.navigation,
            self.shuffle_questions,
        )
    }

    #[must_use]
    pub fn with_timer_policy(mut self, timer_policy: TimerPolicy) -> Self {
        self.timer_policy = timer_policy;
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: NavigationMode) -> Self {
        self.navigation = navigation;
        self
    }

    #[must_use]
    pub fn with_shuffle_questions(mut self, shuffle_questions: bool) -> Self {
        self.shuffle_questions = shuffle_questions;
        self
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn timer_policy(&self) -> TimerPolicy {
        self.timer_policy
    }

    #[must_use]
    pub fn navigation(&self) -> NavigationMode {
        self.navigation
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self::free_navigation()
    }
}
