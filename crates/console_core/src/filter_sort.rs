/// Free-text filter and sort key shared by the list tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FilterSort {
    filter: String,
    sort_key: String,
    debounce_generation: u64,
    debounce_pending: bool,
}

impl FilterSort {
    pub(crate) fn new(sort_key: impl Into<String>) -> Self {
        Self {
            filter: String::new(),
            sort_key: sort_key.into(),
            debounce_generation: 0,
            debounce_pending: false,
        }
    }

    pub(crate) fn filter(&self) -> &str {
        &self.filter
    }

    /// Filter as it goes on the wire; whitespace-only means no filter.
    pub(crate) fn query_filter(&self) -> String {
        self.filter.trim().to_string()
    }

    pub(crate) fn sort_key(&self) -> &str {
        &self.sort_key
    }

    pub(crate) fn debounce_pending(&self) -> bool {
        self.debounce_pending
    }

    /// Stores the text and opens a new debounce window, returning its generation.
    pub(crate) fn set_filter(&mut self, text: impl Into<String>) -> u64 {
        self.filter = text.into();
        self.debounce_generation += 1;
        self.debounce_pending = true;
        self.debounce_generation
    }

    /// True when `generation` is the latest window and it was still open.
    pub(crate) fn debounce_elapsed(&mut self, generation: u64) -> bool {
        if !self.debounce_pending || generation != self.debounce_generation {
            return false;
        }
        self.debounce_pending = false;
        true
    }

    /// Closes any open window so the current text is used right away.
    pub(crate) fn flush(&mut self) {
        self.debounce_pending = false;
    }

    pub(crate) fn clear_filter(&mut self) {
        self.filter.clear();
        self.flush();
    }

    pub(crate) fn set_sort(&mut self, key: impl Into<String>) {
        self.sort_key = key.into();
        self.flush();
    }
}
