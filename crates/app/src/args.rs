use std::fmt;
use std::path::PathBuf;

use quiz_core::model::{NavigationMode, QuizSettings, SettingsError, TimerPolicy};

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingQuizPath,
    InvalidTimeLimit { raw: String },
    Settings(SettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingQuizPath => write!(f, "missing quiz file path"),
            ArgsError::InvalidTimeLimit { raw } => write!(f, "invalid time limit: {raw}"),
            ArgsError::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<SettingsError> for ArgsError {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz <quiz.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --preset <free|auto-advance>        base settings (default: free)");
    eprintln!("  --time-limit <secs>                 seconds per question, 5..=600");
    eprintln!("  --policy <auto-lock|visual-only>    what happens when time runs out");
    eprintln!("  --navigation <free|forward-only>    how questions can be visited");
    eprintln!("  --shuffle                           shuffle question order on load");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_PRESET, QUIZ_TIME_LIMIT, QUIZ_TIMER_POLICY, QUIZ_NAVIGATION, QUIZ_SHUFFLE");
    eprintln!("  RUST_LOG (default: warn)");
}

#[derive(Debug, PartialEq, Eq)]
pub enum Parsed {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub quiz_path: PathBuf,
    pub settings: QuizSettings,
}

/// Raw knobs before they are resolved against the preset.
#[derive(Debug, Default)]
struct Knobs {
    preset: Option<String>,
    time_limit: Option<String>,
    policy: Option<String>,
    navigation: Option<String>,
    shuffle: Option<bool>,
}

impl Knobs {
    fn from_env(env: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            preset: env("QUIZ_PRESET"),
            time_limit: env("QUIZ_TIME_LIMIT"),
            policy: env("QUIZ_TIMER_POLICY"),
            navigation: env("QUIZ_NAVIGATION"),
            shuffle: env("QUIZ_SHUFFLE").map(|value| is_truthy(&value)),
        }
    }

    fn resolve(self) -> Result<QuizSettings, ArgsError> {
        let mut settings = match self.preset {
            Some(name) => QuizSettings::preset(&name)?,
            None => QuizSettings::default(),
        };
        if let Some(raw) = self.time_limit {
            let secs: u32 = raw
                .trim()
                .parse()
                .map_err(|_| ArgsError::InvalidTimeLimit { raw: raw.clone() })?;
            settings = settings.with_time_limit(secs)?;
        }
        if let Some(raw) = self.policy {
            settings = settings.with_timer_policy(raw.parse::<TimerPolicy>()?);
        }
        if let Some(raw) = self.navigation {
            settings = settings.with_navigation(raw.parse::<NavigationMode>()?);
        }
        if let Some(shuffle) = self.shuffle {
            settings = settings.with_shuffle_questions(shuffle);
        }
        Ok(settings)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

/// Parse command-line arguments. Flags win over the environment, which wins
/// over the preset.
///
/// # Errors
///
/// Returns `ArgsError` for unknown flags, missing values or invalid settings.
pub fn parse(
    mut args: impl Iterator<Item = String>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Parsed, ArgsError> {
    let mut knobs = Knobs::from_env(&env);
    let mut quiz_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preset" => knobs.preset = Some(require_value(&mut args, "--preset")?),
            "--time-limit" => knobs.time_limit = Some(require_value(&mut args, "--time-limit")?),
            "--policy" => knobs.policy = Some(require_value(&mut args, "--policy")?),
            "--navigation" => knobs.navigation = Some(require_value(&mut args, "--navigation")?),
            "--shuffle" => knobs.shuffle = Some(true),
            "--help" | "-h" => return Ok(Parsed::Help),
            _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
            _ if quiz_path.is_none() => quiz_path = Some(PathBuf::from(arg)),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    let quiz_path = quiz_path.ok_or(ArgsError::MissingQuizPath)?;
    let settings = knobs.resolve()?;
    Ok(Parsed::Run(Args {
        quiz_path,
        settings,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> impl Iterator<Item = String> {
        items
            .iter()
            .map(|s| (*s).to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(parsed: Parsed) -> Args {
        match parsed {
            Parsed::Run(args) => args,
            Parsed::Help => panic!("expected run"),
        }
    }

    #[test]
    fn defaults_to_free_preset() {
        let args = run(parse(argv(&["quiz.json"]), no_env).unwrap());
        assert_eq!(args.quiz_path, PathBuf::from("quiz.json"));
        assert_eq!(args.settings, QuizSettings::free_navigation());
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            "QUIZ_PRESET" => Some("auto-advance".to_string()),
            "QUIZ_TIME_LIMIT" => Some("45".to_string()),
            "QUIZ_SHUFFLE" => Some("yes".to_string()),
            _ => None,
        };
        let args = run(parse(argv(&["q.json", "--time-limit", "90"]), env).unwrap());

        assert_eq!(args.settings.time_limit_secs(), 90);
        assert_eq!(args.settings.timer_policy(), TimerPolicy::AutoLock);
        assert_eq!(args.settings.navigation(), NavigationMode::ForwardOnly);
        assert!(args.settings.shuffle_questions());
    }

    #[test]
    fn policy_and_navigation_flags_apply() {
        let args = run(
            parse(
                argv(&["--policy", "auto-lock", "--navigation", "free", "q.json"]),
                no_env,
            )
            .unwrap(),
        );
        assert_eq!(args.settings.timer_policy(), TimerPolicy::AutoLock);
        assert_eq!(args.settings.navigation(), NavigationMode::Free);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            parse(argv(&[]), no_env),
            Err(ArgsError::MissingQuizPath)
        ));
        assert!(matches!(
            parse(argv(&["q.json", "--time-limit"]), no_env),
            Err(ArgsError::MissingValue { flag: "--time-limit" })
        ));
        assert!(matches!(
            parse(argv(&["q.json", "--time-limit", "soon"]), no_env),
            Err(ArgsError::InvalidTimeLimit { .. })
        ));
        assert!(matches!(
            parse(argv(&["q.json", "--time-limit", "1"]), no_env),
            Err(ArgsError::Settings(SettingsError::InvalidTimeLimit))
        ));
        assert!(matches!(
            parse(argv(&["q.json", "--bogus"]), no_env),
            Err(ArgsError::UnknownArg(_))
        ));
        assert!(matches!(
            parse(argv(&["a.json", "b.json"]), no_env),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn help_short_circuits() {
        assert_eq!(parse(argv(&["--help"]), no_env).unwrap(), Parsed::Help);
    }
}
