//! Commands understood by the interactive shell.

use std::str::FromStr;

use crate::features::{FeatureField, FieldParseError};

pub const HELP: &str = "\
Commands:
  set <field> <value>   Set a measurement (an empty value clears it)
  <field>=<value>       Same as set
  clear <field>         Clear a measurement
  inc <field> [n]       Increase a measurement by n x 0.1 (default 1)
  dec <field> [n]       Decrease a measurement by n x 0.1 (default 1)
  predict               Submit the measurements for prediction
  show                  Redraw the form and the last result
  help                  Show this help
  quit                  Exit
Fields: sepal_length, sepal_width, petal_length, petal_width";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Raw text for a field, exactly as typed
    Set { field: FeatureField, raw: String },
    Step { field: FeatureField, steps: i32 },
    Predict,
    Show,
    Help,
    Quit,
    /// Blank line
    Nothing,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}', type `help` for a list of commands")]
    Unknown(String),
    #[error("`{0}` needs a field name")]
    MissingField(&'static str),
    #[error("{0}")]
    Field(#[from] FieldParseError),
    #[error("Invalid step count '{0}'")]
    InvalidCount(String),
}

fn field_arg(name: &'static str, arg: Option<&str>) -> Result<FeatureField, CommandError> {
    Ok(arg.ok_or(CommandError::MissingField(name))?.parse()?)
}

fn step_arg(field: FeatureField, count: Option<&str>, sign: i32) -> Result<Command, CommandError> {
    let steps = match count {
        Some(n) => n
            .parse::<u32>()
            .ok()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| CommandError::InvalidCount(n.to_string()))?,
        None => 1,
    };
    Ok(Command::Step { field, steps: steps * sign })
}

/// `<field>=<value>`, with optional spaces around `=`
fn assignment(text: &str) -> Result<Command, CommandError> {
    let (field, raw) = text.split_once('=').unwrap_or((text, ""));
    Ok(Command::Set {
        field: field.trim().parse()?,
        raw: raw.trim().to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Command::Nothing);
        }

        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let verb = head.to_ascii_lowercase();
        let mut words = rest.split_whitespace();
        match verb.as_str() {
            "set" if rest.contains('=') => assignment(rest),
            "set" => {
                let field = field_arg("set", words.next())?;
                let raw = words.collect::<Vec<_>>().join(" ");
                Ok(Command::Set { field, raw })
            }
            "clear" => Ok(Command::Set {
                field: field_arg("clear", words.next())?,
                raw: String::new(),
            }),
            "inc" => step_arg(field_arg("inc", words.next())?, words.next(), 1),
            "dec" => step_arg(field_arg("dec", words.next())?, words.next(), -1),
            "predict" | "submit" | "p" => Ok(Command::Predict),
            "show" | "s" => Ok(Command::Show),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ if line.contains('=') => assignment(line),
            _ => Err(CommandError::Unknown(verb)),
        }
    }
}
