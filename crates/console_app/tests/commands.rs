use chrono::{TimeZone, Utc};
use console_app::{event_to_msg, parse_command, Command, CommandError};
use console_core::{ConsoleError, DeletionTarget, Msg, Tab, TargetKind};
use console_engine::EngineEvent;
use pretty_assertions::assert_eq;

fn send(line: &str, tab: Tab) -> Msg {
    match parse_command(line, tab) {
        Ok(Some(Command::Send(msg))) => msg,
        other => panic!("`{line}` parsed to {other:?}"),
    }
}

#[test]
fn navigation_commands_map_to_messages() {
    assert_eq!(send("tab Jobs", Tab::Overview), Msg::TabSelected(Tab::Jobs));
    assert_eq!(send("next", Tab::Users), Msg::NextPage);
    assert_eq!(send("  prev  ", Tab::Users), Msg::PrevPage);
    assert_eq!(send("per-page 25", Tab::Users), Msg::PerPageChanged(25));
    assert_eq!(send("sort oldest", Tab::Users), Msg::SortChanged("oldest".into()));
    assert_eq!(send("refresh", Tab::Stats), Msg::RefreshRequested);
    assert_eq!(send("auto off", Tab::Stats), Msg::AutoRefreshToggled(false));
    assert_eq!(send("interval 1000", Tab::Stats), Msg::PollIntervalChanged(1000));
}

#[test]
fn filter_keeps_inner_text_and_empty_clears() {
    assert_eq!(
        send("filter ann smith", Tab::Users),
        Msg::FilterChanged("ann smith".into())
    );
    assert_eq!(send("filter", Tab::Users), Msg::FilterChanged(String::new()));
}

#[test]
fn delete_target_kind_follows_the_active_tab() {
    assert_eq!(
        send("delete u-1", Tab::Users),
        Msg::DeleteRequested(DeletionTarget::new(TargetKind::User, "u-1"))
    );
    assert_eq!(
        send("delete j-9", Tab::Jobs),
        Msg::DeleteRequested(DeletionTarget::new(TargetKind::Job, "j-9"))
    );
    assert_eq!(
        parse_command("delete x", Tab::Stats),
        Err(CommandError::NothingToDelete(Tab::Stats))
    );
}

#[test]
fn deletion_dialog_commands() {
    assert_eq!(
        send("reason duplicate account", Tab::Users),
        Msg::DeleteReasonChanged("duplicate account".into())
    );
    assert_eq!(send("confirm", Tab::Users), Msg::DeleteConfirmed);
    assert_eq!(send("cancel", Tab::Users), Msg::DeleteCancelled);
    assert_eq!(send("ack", Tab::Users), Msg::DeleteFailureAcknowledged);
    assert_eq!(send("logout", Tab::Users), Msg::LogoutRequested);
}

#[test]
fn control_and_blank_lines() {
    assert_eq!(parse_command("quit", Tab::Users), Ok(Some(Command::Quit)));
    assert_eq!(parse_command("help", Tab::Users), Ok(Some(Command::Help)));
    assert_eq!(parse_command("   ", Tab::Users), Ok(None));
}

#[test]
fn bad_input_is_reported() {
    assert!(matches!(
        parse_command("tab settings", Tab::Users),
        Err(CommandError::UnknownTab(_))
    ));
    assert!(matches!(
        parse_command("per-page many", Tab::Users),
        Err(CommandError::InvalidArgument { command: "per-page", .. })
    ));
    assert!(matches!(
        parse_command("auto maybe", Tab::Stats),
        Err(CommandError::InvalidArgument { command: "auto", .. })
    ));
    assert!(matches!(
        parse_command("sort", Tab::Users),
        Err(CommandError::MissingArgument { command: "sort", .. })
    ));
    assert_eq!(
        parse_command("frobnicate", Tab::Users),
        Err(CommandError::Unknown("frobnicate".into()))
    );
}

#[test]
fn engine_events_become_messages() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    assert_eq!(
        event_to_msg(EngineEvent::PollTick { poll_id: 3, at }),
        Msg::PollTick { poll_id: 3, at }
    );
    assert_eq!(
        event_to_msg(EngineEvent::DebounceElapsed { generation: 2 }),
        Msg::FilterDebounceElapsed { generation: 2 }
    );
    assert_eq!(
        event_to_msg(EngineEvent::DeleteCompleted {
            request_id: 8,
            result: Err(ConsoleError::network("down")),
        }),
        Msg::DeleteCompleted {
            request_id: 8,
            result: Err(ConsoleError::network("down")),
        }
    );
}
