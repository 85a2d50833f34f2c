use crate::{ConsoleState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ConsoleState, msg: Msg) -> (ConsoleState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => state.start(),
        Msg::TabSelected(tab) => state.select_tab(tab),
        Msg::NextPage => state.next_page(),
        Msg::PrevPage => state.prev_page(),
        Msg::PerPageChanged(per_page) => state.set_per_page(per_page),
        Msg::FilterChanged(text) => state.set_filter(text),
        Msg::FilterDebounceElapsed { generation } => state.filter_debounce_elapsed(generation),
        Msg::SortChanged(key) => state.set_sort(key),
        Msg::RefreshRequested => state.refresh(),
        Msg::AutoRefreshToggled(enabled) => state.set_auto_refresh(enabled),
        Msg::PollIntervalChanged(interval_ms) => state.set_poll_interval(interval_ms),
        Msg::PollTick { poll_id, at } => state.poll_tick(poll_id, at),
        Msg::FetchCompleted { request_id, result } => {
            state.apply_fetch(request_id, result);
            Vec::new()
        }
        Msg::DeleteRequested(target) => {
            state.request_deletion(target);
            Vec::new()
        }
        Msg::DeleteReasonChanged(text) => {
            state.set_deletion_reason(text);
            Vec::new()
        }
        Msg::DeleteConfirmed => state.confirm_deletion(),
        Msg::DeleteCancelled => {
            state.cancel_deletion();
            Vec::new()
        }
        Msg::DeleteCompleted { request_id, result } => {
            state.apply_deletion(request_id, result);
            Vec::new()
        }
        Msg::DeleteFailureAcknowledged => {
            state.acknowledge_deletion_failure();
            Vec::new()
        }
        Msg::LogoutRequested => {
            let mut effects = state.teardown();
            effects.push(Effect::Logout);
            effects
        }
        Msg::Teardown => state.teardown(),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
