use std::str::FromStr;

use layers::Theme;
use runtime::Step;

pub const HELP: &str = "\
commands:
  forward | f              next year (wraps to the first)
  reverse | r              previous year (wraps to the last)
  slide <n>                jump to year index n
  hover <country>          open that country's popups
  leave <country>          close them again
  base <name>              switch base layer
  overlay <name> on|off    show or hide renewable / fossil
  legend                   print both legends
  help                     this text
  quit | q                 leave";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Step(Step),
    Hover(String),
    Leave(String),
    Base(String),
    Overlay { theme: Theme, visible: bool },
    Legend,
    Help,
    Quit,
}

impl Command {
    /// Whether the rendered map must be rewritten afterwards.
    pub fn changes_view(&self) -> bool {
        !matches!(self, Command::Legend | Command::Help | Command::Quit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    InvalidIndex(String),
    UnknownOverlay(String),
    InvalidToggle(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(cmd) => write!(f, "unknown command {cmd:?}; try help"),
            CommandError::MissingArgument(what) => write!(f, "missing {what}"),
            CommandError::InvalidIndex(raw) => write!(f, "not a year index: {raw:?}"),
            CommandError::UnknownOverlay(raw) => {
                write!(f, "unknown overlay {raw:?}; use renewable or fossil")
            }
            CommandError::InvalidToggle(raw) => write!(f, "expected on or off, got {raw:?}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "forward" | "f" => Ok(Command::Step(Step::Forward)),
            "reverse" | "r" => Ok(Command::Step(Step::Reverse)),
            "slide" | "set" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("year index"));
                }
                rest.parse::<usize>()
                    .map(|n| Command::Step(Step::Set(n)))
                    .map_err(|_| CommandError::InvalidIndex(rest.to_string()))
            }
            "hover" => non_empty(rest, "country name").map(Command::Hover),
            "leave" => non_empty(rest, "country name").map(Command::Leave),
            "base" => non_empty(rest, "base layer name").map(Command::Base),
            "overlay" => {
                let (name, toggle) = match rest.split_once(char::is_whitespace) {
                    Some((name, toggle)) => (name, toggle.trim()),
                    None => (rest, ""),
                };
                if name.is_empty() {
                    return Err(CommandError::MissingArgument("overlay name"));
                }
                let theme = match name.to_ascii_lowercase().as_str() {
                    "renewable" | "ren" => Theme::Renewable,
                    "fossil" | "ff" => Theme::Fossil,
                    _ => return Err(CommandError::UnknownOverlay(name.to_string())),
                };
                let visible = match toggle.to_ascii_lowercase().as_str() {
                    "on" => true,
                    "off" => false,
                    "" => return Err(CommandError::MissingArgument("on or off")),
                    _ => return Err(CommandError::InvalidToggle(toggle.to_string())),
                };
                Ok(Command::Overlay { theme, visible })
            }
            "legend" => Ok(Command::Legend),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}

fn non_empty(rest: &str, what: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument(what))
    } else {
        Ok(rest.to_string())
    }
}
