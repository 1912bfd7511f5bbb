//! Shared view state for the poller and dashboard

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::demo::{demo_buoys, FALLBACK_MESSAGE};
use crate::reading::BuoyView;
use crate::render::Summary;

/// Everything the dashboard renders.
///
/// `loading`, `error` and `buoys` are independent; the poller writes all of
/// them together at the end of an attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub buoys: Vec<BuoyView>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_refreshed: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a poll as in flight
    pub fn begin_poll(&mut self) {
        self.loading = true;
    }

    /// Record a successful poll, clearing any previous error
    pub fn apply_success(&mut self, buoys: Vec<BuoyView>, now: DateTime<Utc>) {
        self.buoys = buoys;
        self.error = None;
        self.last_refreshed = Some(now);
        self.loading = false;
    }

    /// Record a failed poll: demo data plus the fixed banner
    pub fn apply_fallback(&mut self, now: DateTime<Utc>) {
        self.buoys = demo_buoys(now);
        self.error = Some(FALLBACK_MESSAGE.to_string());
        self.last_refreshed = Some(now);
        self.loading = false;
    }

    pub fn summary(&self) -> Summary {
        Summary::from_buoys(&self.buoys)
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new()))
}
