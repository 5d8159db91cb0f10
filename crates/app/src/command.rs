use std::fmt;
use std::path::PathBuf;

use quiz_core::model::Direction;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the option at a 1-based position (`a` is 1).
    Toggle(usize),
    Submit,
    Advance(Direction),
    /// Jump to a 1-based question number.
    Jump(usize),
    Summary,
    Finish,
    Reset,
    Load(PathBuf),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument(&'static str),
    InvalidNumber(String),
    InvalidOption(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw} (h for help)"),
            CommandError::MissingArgument(cmd) => write!(f, "{cmd} needs an argument"),
            CommandError::InvalidNumber(raw) => write!(f, "not a number: {raw}"),
            CommandError::InvalidOption(raw) => {
                write!(f, "not an option: {raw} (use a number or a letter)")
            }
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
  <n>        toggle option n
  t <a>      toggle option by letter (or number)
  s          submit
  n / p      next / previous question
  j <n>      jump to question n
  m          summary
  f          finish
  r          reset
  l <path>   load another quiz file
  q          quit";

impl Command {
    /// # Errors
    ///
    /// Returns `CommandError` when the line is not a known command.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(head, rest)| (head, rest.trim()));

        if let Ok(position) = head.parse::<usize>() {
            return Ok(Self::Toggle(position));
        }

        match head.to_ascii_lowercase().as_str() {
            "" => Ok(Self::Show),
            "t" | "toggle" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("toggle"));
                }
                option_position(rest)
                    .map(Self::Toggle)
                    .ok_or_else(|| CommandError::InvalidOption(rest.to_string()))
            }
            "s" | "submit" => Ok(Self::Submit),
            "n" | "next" => Ok(Self::Advance(Direction::Next)),
            "p" | "prev" => Ok(Self::Advance(Direction::Prev)),
            "j" | "jump" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("jump"));
                }
                rest.parse()
                    .map(Self::Jump)
                    .map_err(|_| CommandError::InvalidNumber(rest.to_string()))
            }
            "m" | "summary" => Ok(Self::Summary),
            "f" | "finish" => Ok(Self::Finish),
            "r" | "reset" => Ok(Self::Reset),
            "l" | "load" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("load"));
                }
                Ok(Self::Load(PathBuf::from(rest)))
            }
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(line.to_string())),
        }
    }
}

/// `"2"` is 2, `"b"` is 2.
fn option_position(raw: &str) -> Option<usize> {
    if let Ok(position) = raw.parse::<usize>() {
        return Some(position);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => {
            Some(usize::from(letter.to_ascii_lowercase() as u8 - b'a') + 1)
        }
        _ => None,
    }
}

/// Letter shown next to the option at a 1-based position.
#[must_use]
pub fn option_letter(position: usize) -> Option<char> {
    let offset = u8::try_from(position.checked_sub(1)?).ok()?;
    (offset < 26).then(|| char::from(b'a' + offset))
}
