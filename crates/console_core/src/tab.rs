use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{ResourceSlot, TargetKind};

/// The four views of the admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Tab {
    #[default]
    Overview,
    Users,
    Jobs,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Users, Tab::Jobs, Tab::Stats];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Users => "users",
            Tab::Jobs => "jobs",
            Tab::Stats => "stats",
        }
    }

    /// Kind of record listed by this tab, for the paged tabs.
    pub fn list_kind(self) -> Option<TargetKind> {
        match self {
            Tab::Users => Some(TargetKind::User),
            Tab::Jobs => Some(TargetKind::Job),
            Tab::Overview | Tab::Stats => None,
        }
    }

    /// Resource slots whose results this tab displays.
    pub fn slots(self) -> &'static [ResourceSlot] {
        match self {
            Tab::Overview => &[ResourceSlot::Dashboard],
            Tab::Users => &[ResourceSlot::Users],
            Tab::Jobs => &[ResourceSlot::Jobs],
            Tab::Stats => &[ResourceSlot::Dashboard, ResourceSlot::Leaderboards],
        }
    }

    pub fn shows(self, slot: ResourceSlot) -> bool {
        self.slots().contains(&slot)
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tab `{0}`")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownTab(value.to_string()))
    }
}
