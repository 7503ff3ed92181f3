use crate::{AppError, AppResult};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;

/// Commands sent from the console reader to the main application.
///
/// List positions are 1-based, as printed by `list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Begin a new capture.
    Record,
    /// Pause the running capture.
    Pause,
    /// Finish the capture and save it.
    Stop,
    /// Name the just-saved capture.
    Name {
        /// Requested name, sanitized by the library.
        name: String,
    },
    /// Keep the generated name for the just-saved capture.
    Skip,
    /// Re-scan and print the library.
    List,
    /// Play, pause, or resume a listed recording.
    Play {
        /// 1-based list position.
        index: usize,
    },
    /// Pause or resume the loaded recording.
    Toggle,
    /// Move the play head of the loaded recording.
    Seek {
        /// Target position.
        position: Duration,
    },
    /// Stop playback and unload.
    Halt,
    /// Flip selection of a listed recording.
    Select {
        /// 1-based list position.
        index: usize,
    },
    /// Leave selection mode.
    Clear,
    /// Delete the selected recordings.
    Delete,
    /// Open the rename dialog for the single selected recording.
    Rename,
    /// Confirm the rename dialog.
    RenameTo {
        /// Requested name, sanitized by the library.
        name: String,
    },
    /// Close the rename dialog.
    Cancel,
    /// Stop playback and clear selection and dialogs.
    Reset,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Quit,
}

impl AppCommand {
    /// Parse one console line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidCommand`] for unknown verbs and missing or
    /// malformed arguments.
    #[track_caller]
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "record" => AppCommand::Record,
            "pause" => AppCommand::Pause,
            "stop" => AppCommand::Stop,
            "name" => AppCommand::Name {
                name: required_text(line, rest)?,
            },
            "skip" => AppCommand::Skip,
            "list" | "ls" => AppCommand::List,
            "play" => AppCommand::Play {
                index: list_index(line, rest)?,
            },
            "toggle" => AppCommand::Toggle,
            "seek" => AppCommand::Seek {
                position: seconds(line, rest)?,
            },
            "halt" => AppCommand::Halt,
            "select" => AppCommand::Select {
                index: list_index(line, rest)?,
            },
            "clear" => AppCommand::Clear,
            "delete" => AppCommand::Delete,
            "rename" => AppCommand::Rename,
            "rename-to" => AppCommand::RenameTo {
                name: required_text(line, rest)?,
            },
            "cancel" => AppCommand::Cancel,
            "reset" => AppCommand::Reset,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" => AppCommand::Quit,
            _ => return Err(invalid(line, "unknown command")),
        };

        Ok(Some(command))
    }
}

/// Console help text.
pub(crate) const USAGE: &str = "\
Recording:  record | pause | stop | name <text> | skip
Playback:   list | play <n> | toggle | seek <seconds> | halt
Selection:  select <n> | clear | delete | rename | rename-to <text> | cancel
Other:      reset | help | quit";

#[track_caller]
fn required_text(line: &str, rest: &str) -> AppResult<String> {
    if rest.is_empty() {
        return Err(invalid(line, "expected a name"));
    }
    Ok(rest.to_string())
}

#[track_caller]
fn list_index(line: &str, rest: &str) -> AppResult<usize> {
    match rest.parse::<usize>() {
        Ok(index) if index > 0 => Ok(index),
        _ => Err(invalid(line, "expected a list number starting at 1")),
    }
}

#[track_caller]
fn seconds(line: &str, rest: &str) -> AppResult<Duration> {
    rest.parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| invalid(line, "expected a non-negative number of seconds"))
}

#[track_caller]
fn invalid(line: &str, reason: &str) -> AppError {
    AppError::InvalidCommand {
        input: line.to_string(),
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
