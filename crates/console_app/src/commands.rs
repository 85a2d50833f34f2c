use console_core::{DeletionTarget, Msg, Tab, UnknownTab};
use thiserror::Error;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(Msg),
    Quit,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("`{command}` needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{command}` expects {expected}, got `{got}`")]
    InvalidArgument {
        command: &'static str,
        expected: &'static str,
        got: String,
    },
    #[error(transparent)]
    UnknownTab(#[from] UnknownTab),
    #[error("the {0} tab has nothing to delete")]
    NothingToDelete(Tab),
}

pub const HELP: &str = "\
commands:
  tab <overview|users|jobs|stats>   switch view
  next | prev                       page through the list
  per-page <n>                      change page size
  filter [text]                     filter the list (empty clears)
  sort <key>                        change sort key
  refresh                           re-fetch the current view
  auto <on|off>                     toggle stats auto-refresh
  interval <ms>                     stats refresh interval
  delete <id>                       start removing a user or job
  reason <text>                     reason sent with the removal
  confirm | cancel | ack            drive the removal dialog
  logout | quit";

/// Parses a command line. `tab` decides whether `delete` targets a user or a job.
pub fn parse_command(line: &str, tab: Tab) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let msg = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "exit" => return Ok(Some(Command::Quit)),
        "tab" => Msg::TabSelected(required("tab", "a tab name", rest)?.parse()?),
        "next" => Msg::NextPage,
        "prev" => Msg::PrevPage,
        "per-page" => Msg::PerPageChanged(number("per-page", rest)?),
        "filter" => Msg::FilterChanged(rest.to_string()),
        "sort" => Msg::SortChanged(required("sort", "a sort key", rest)?.to_string()),
        "refresh" => Msg::RefreshRequested,
        "auto" => Msg::AutoRefreshToggled(switch(rest)?),
        "interval" => Msg::PollIntervalChanged(number("interval", rest)?),
        "delete" => {
            let id = required("delete", "a record id", rest)?;
            let kind = tab.list_kind().ok_or(CommandError::NothingToDelete(tab))?;
            Msg::DeleteRequested(DeletionTarget::new(kind, id))
        }
        "reason" => Msg::DeleteReasonChanged(rest.to_string()),
        "confirm" => Msg::DeleteConfirmed,
        "cancel" => Msg::DeleteCancelled,
        "ack" => Msg::DeleteFailureAcknowledged,
        "logout" => Msg::LogoutRequested,
        _ => return Err(CommandError::Unknown(word.to_string())),
    };
    Ok(Some(Command::Send(msg)))
}

fn required<'a>(
    command: &'static str,
    expected: &'static str,
    rest: &'a str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        Err(CommandError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(command: &'static str, rest: &str) -> Result<T, CommandError> {
    let text = required(command, "a number", rest)?;
    text.parse().map_err(|_| CommandError::InvalidArgument {
        command,
        expected: "a number",
        got: text.to_string(),
    })
}

fn switch(rest: &str) -> Result<bool, CommandError> {
    match required("auto", "on or off", rest)?.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArgument {
            command: "auto",
            expected: "on or off",
            got: other.to_string(),
        }),
    }
}
