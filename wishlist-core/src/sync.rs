/// Sync-health types shared between the orchestrator and whatever UI drives it.
use serde::{Deserialize, Serialize};

use crate::types::AppData;

/// What the UI shows in its status corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncHealth {
    /// A remote call is in flight.
    Syncing,
    /// The last remote call succeeded.
    Synced,
    /// The remote store was unreachable or refused the write; data lives on this device only.
    Local,
}

/// Result of a `load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOutcome {
    pub data: AppData,
    pub health: SyncHealth,
}

/// Where the resolved snapshot came from, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Merged,
    RemoteOnly,
    CacheOnly,
    Seeded,
}
