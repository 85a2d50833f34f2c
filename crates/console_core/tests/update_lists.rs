use std::sync::Once;

use console_core::{
    update, ConsoleError, ConsoleSettings, ConsoleState, DashboardSnapshot, Effect, ListResult,
    Msg, PageRequest, Record, RequestId, ResourcePayload, ResourceRequest, Tab,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn fetches(effects: &[Effect]) -> Vec<(RequestId, ResourceRequest)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Fetch {
                request_id,
                resource,
            } => Some((*request_id, resource.clone())),
            _ => None,
        })
        .collect()
}

fn single_fetch(effects: &[Effect]) -> (RequestId, ResourceRequest) {
    let fetches = fetches(effects);
    assert_eq!(fetches.len(), 1, "expected exactly one fetch in {effects:?}");
    fetches[0].clone()
}

fn page(ids: &[&str], total: Option<u64>) -> Result<ResourcePayload, ConsoleError> {
    let items = ids.iter().map(|id| Record::new(*id, format!("name {id}"))).collect();
    Ok(ResourcePayload::List(ListResult::new(items, total)))
}

fn row_ids(state: &ConsoleState) -> Vec<String> {
    state
        .view()
        .rows
        .iter()
        .map(|row| row.id.to_string())
        .collect()
}

#[test]
fn slow_older_response_does_not_overwrite_newer_page() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (first, _) = single_fetch(&effects);
    let (state, effects) = update(state, Msg::NextPage);
    let (second, resource) = single_fetch(&effects);
    assert_eq!(resource.page_request().map(|request| request.page), Some(2));

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: second,
            result: page(&["b1", "b2"], None),
        },
    );
    let (mut state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: first,
            result: page(&["a1", "a2", "a3"], None),
        },
    );

    assert_eq!(row_ids(&state), vec!["b1", "b2"]);
    assert_eq!(state.view().page, 2);
    assert!(state.consume_dirty());
}

#[test]
fn stale_result_is_not_applied_and_does_not_dirty_state() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (request_id, _) = single_fetch(&effects);
    let (mut state, _) = update(state, Msg::TabSelected(Tab::Jobs));
    assert!(state.consume_dirty());

    let (mut state, effects) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: page(&["u1"], None),
        },
    );

    assert!(effects.is_empty());
    assert!(row_ids(&state).is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn missing_total_falls_back_to_current_page_count() {
    init_logging();
    let (state, _) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (state, _) = update(state, Msg::NextPage);
    let (state, effects) = update(state, Msg::NextPage);
    let (request_id, resource) = single_fetch(&effects);
    assert_eq!(resource.page_request().map(|request| request.page), Some(3));

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: page(&["u21", "u22", "u23", "u24"], None),
        },
    );
    let view = state.view();

    assert_eq!(view.page, 3);
    assert_eq!(view.per_page, 10);
    assert_eq!(view.reported_total, None);
    assert_eq!(view.total_pages, 1);
}

#[test]
fn reported_total_drives_pages_and_bounds_next() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::TabSelected(Tab::Jobs));
    let (request_id, _) = single_fetch(&effects);
    let ids: Vec<String> = (1..=10).map(|n| format!("j{n}")).collect();
    let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: page(&ids, Some(25)),
        },
    );
    assert_eq!(state.view().total_pages, 3);

    let (state, effects) = update(state, Msg::NextPage);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: page(&ids, Some(25)),
        },
    );
    let (state, effects) = update(state, Msg::NextPage);
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: page(&["j21", "j22", "j23", "j24", "j25"], Some(25)),
        },
    );
    assert_eq!(state.view().page, 3);

    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    assert_eq!(state.view().page, 3);

    let (state, effects) = update(state, Msg::PrevPage);
    assert_eq!(single_fetch(&effects).1.page_request().map(|r| r.page), Some(2));
    assert_eq!(state.view().page, 2);
}

#[test]
fn prev_page_on_first_page_does_nothing() {
    init_logging();
    let (state, _) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (state, effects) = update(state, Msg::PrevPage);

    assert!(effects.is_empty());
    assert_eq!(state.view().page, 1);
}

#[test]
fn failed_list_fetch_falls_back_to_empty_list() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (request_id, _) = single_fetch(&effects);
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: page(&["u1", "u2"], None),
        },
    );
    let (state, effects) = update(state, Msg::RefreshRequested);
    let (request_id, _) = single_fetch(&effects);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: Err(ConsoleError::server(500, "boom")),
        },
    );
    let view = state.view();

    assert!(view.rows.is_empty());
    assert_eq!(view.total_pages, 0);
    assert_eq!(view.last_error.as_deref(), Some("server failure (500): boom"));
    assert!(!view.loading);
}

#[test]
fn failed_dashboard_fetch_shows_placeholder_figures() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::Started);
    let (request_id, _) = single_fetch(&effects);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: Err(ConsoleError::network("connection refused")),
        },
    );
    let dashboard = state.view().dashboard.expect("placeholder dashboard");

    assert!(dashboard.placeholder);
    assert_eq!(dashboard.snapshot, DashboardSnapshot::placeholder());
}

#[test]
fn dashboard_result_replaces_placeholder() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::Started);
    let (request_id, _) = single_fetch(&effects);
    let snapshot = DashboardSnapshot {
        total_users: 12,
        total_jobs: 30,
        ..DashboardSnapshot::default()
    };

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: Ok(ResourcePayload::Dashboard(snapshot)),
        },
    );
    let dashboard = state.view().dashboard.expect("dashboard");

    assert!(!dashboard.placeholder);
    assert_eq!(dashboard.snapshot.total_users, 12);
    assert_eq!(state.view().last_error, None);
}

#[test]
fn filter_edits_are_debounced_to_the_latest_generation() {
    init_logging();
    let (state, _) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (state, effects) = update(state, Msg::FilterChanged("a".to_string()));
    assert_eq!(
        effects,
        vec![Effect::ScheduleDebounce {
            generation: 1,
            delay_ms: 300,
        }]
    );
    let (state, effects) = update(state, Msg::FilterChanged("ab ".to_string()));
    assert_eq!(
        effects,
        vec![Effect::ScheduleDebounce {
            generation: 2,
            delay_ms: 300,
        }]
    );

    let (state, effects) = update(state, Msg::FilterDebounceElapsed { generation: 1 });
    assert!(effects.is_empty());

    let (state, effects) = update(state, Msg::FilterDebounceElapsed { generation: 2 });
    assert_eq!(
        single_fetch(&effects).1,
        ResourceRequest::Users(PageRequest {
            page: 1,
            per_page: 10,
            sort_key: "newest".to_string(),
            filter: "ab".to_string(),
        })
    );
    assert_eq!(state.view().filter, "ab ");
}

fn users_page(page: u32, filter: &str) -> ResourceRequest {
    ResourceRequest::Users(PageRequest {
        page,
        per_page: 10,
        sort_key: "newest".to_string(),
        filter: filter.to_string(),
    })
}

#[test]
fn page_discarded_during_debounce_is_refetched_when_filter_is_erased() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (first, _) = single_fetch(&effects);
    let (state, _) = update(state, Msg::FilterChanged("a".to_string()));
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: first,
            result: page(&["u1"], None),
        },
    );
    assert!(row_ids(&state).is_empty());

    let (state, effects) = update(state, Msg::FilterChanged(String::new()));
    assert!(fetches(&effects).is_empty());
    let (state, effects) = update(state, Msg::FilterDebounceElapsed { generation: 2 });
    let (refetch, resource) = single_fetch(&effects);
    assert_eq!(resource, users_page(1, ""));
    assert!(state.view().loading);

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: refetch,
            result: page(&["u1", "u2"], None),
        },
    );
    assert_eq!(row_ids(&state), vec!["u1", "u2"]);
    assert!(!state.view().loading);
}

#[test]
fn filter_returning_to_previous_text_keeps_the_read_in_flight() {
    init_logging();
    let (state, effects) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (first, _) = single_fetch(&effects);
    let (state, _) = update(state, Msg::FilterChanged("a".to_string()));
    let (state, _) = update(state, Msg::FilterChanged(String::new()));

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: first,
            result: page(&["u1"], None),
        },
    );
    assert_eq!(row_ids(&state), vec!["u1"]);

    let (state, effects) = update(state, Msg::FilterDebounceElapsed { generation: 2 });
    assert!(effects.is_empty());
    assert_eq!(row_ids(&state), vec!["u1"]);
}

#[test]
fn returning_to_an_earlier_page_fetches_it_again() {
    init_logging();
    let (state, _) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (state, effects) = update(state, Msg::NextPage);
    let (second, _) = single_fetch(&effects);
    let (state, effects) = update(state, Msg::PrevPage);
    assert_eq!(
        effects,
        vec![
            Effect::AbortFetch { request_id: second },
            Effect::Fetch {
                request_id: 3,
                resource: users_page(1, ""),
            },
        ]
    );

    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: second,
            result: page(&["p2"], None),
        },
    );
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id: 3,
            result: page(&["p1"], None),
        },
    );
    assert_eq!(row_ids(&state), vec!["p1"]);
    assert_eq!(state.view().page, 1);
}

#[test]
fn zero_debounce_fetches_on_every_edit() {
    init_logging();
    let settings = ConsoleSettings {
        filter_debounce_ms: 0,
        ..ConsoleSettings::default()
    };
    let (state, _) = update(
        ConsoleState::with_settings(settings),
        Msg::TabSelected(Tab::Jobs),
    );
    let (_state, effects) = update(state, Msg::FilterChanged("plumb".to_string()));

    assert_eq!(
        fetches(&effects),
        vec![(
            2,
            ResourceRequest::Jobs(PageRequest {
                page: 1,
                per_page: 10,
                sort_key: "newest".to_string(),
                filter: "plumb".to_string(),
            })
        )]
    );
}

#[test]
fn sort_change_flushes_pending_filter() {
    init_logging();
    let (state, _) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (state, _) = update(state, Msg::FilterChanged("ann".to_string()));
    let (state, effects) = update(state, Msg::SortChanged("name".to_string()));

    assert_eq!(
        single_fetch(&effects).1,
        ResourceRequest::Users(PageRequest {
            page: 1,
            per_page: 10,
            sort_key: "name".to_string(),
            filter: "ann".to_string(),
        })
    );
    let (_state, effects) = update(state, Msg::FilterDebounceElapsed { generation: 1 });
    assert!(effects.is_empty());
}

#[test]
fn per_page_change_resets_to_first_page() {
    init_logging();
    let (state, _) = update(ConsoleState::new(), Msg::TabSelected(Tab::Users));
    let (state, _) = update(state, Msg::NextPage);
    let (state, effects) = update(state, Msg::PerPageChanged(25));

    let request = single_fetch(&effects).1;
    let request = request.page_request().expect("list request");
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 25);
    assert_eq!(state.view().per_page, 25);

    let (_state, effects) = update(state, Msg::PerPageChanged(0));
    assert!(effects.is_empty());
}
