//! Command parsing
//!
//! Turns the positional arguments left over after flag parsing into a
//! structured `Command`. Anything unrecognised becomes `Command::Help`.

use crate::error::{ArgumentError, ArgumentResult};

/// Commands the tool can run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Make sure a database exists
    EnsureDatabase(String),

    /// Make sure a table exists; holds the raw `<db>.<table>[.<pk>]` argument
    EnsureTable(String),

    /// Show the command list
    Help,
}

/// Parse positional arguments into a Command
pub fn parse_command<S: AsRef<str>>(args: &[S]) -> ArgumentResult<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    let name = name.as_ref();
    match name {
        "ensure_database" => single_argument(name, rest).map(Command::EnsureDatabase),
        "ensure_table" => single_argument(name, rest).map(Command::EnsureTable),
        _ => Ok(Command::Help),
    }
}

fn single_argument<S: AsRef<str>>(command: &str, rest: &[S]) -> ArgumentResult<String> {
    match rest {
        [arg] => Ok(arg.as_ref().to_string()),
        [] => Err(ArgumentError::MissingArgument(command.to_string())),
        [_, extra @ ..] => Err(ArgumentError::UnexpectedArguments(
            extra
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(" "),
        )),
    }
}
