//! Poller: fetches the latest reading, normalizes it, and publishes the view
//! state, falling back to demo data on any failure

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::io::HttpClient;
use crate::reading::{normalize_response, BuoyView};
use crate::state::StateHandle;

/// Result of one poll attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    /// Live data was published
    Updated { count: usize },
    /// The fetch failed and demo data was published
    FellBack,
    /// Another poll was already in flight
    Skipped,
}

/// Polls the latest-readings endpoint and owns the view list
pub struct Poller {
    url: String,
    http: Arc<dyn HttpClient>,
    state: StateHandle,
    in_flight: Mutex<()>,
}

impl std::fmt::Debug for Poller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Poller").field("url", &self.url).finish()
    }
}

impl Poller {
    pub fn new(url: impl Into<String>, http: Arc<dyn HttpClient>, state: StateHandle) -> Self {
        let url = url.into();
        tracing::debug!("Created poller for {}", url);
        Self {
            url,
            http,
            state,
            in_flight: Mutex::new(()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Fetch and normalize without touching shared state
    pub async fn fetch(&self) -> crate::Result<Vec<BuoyView>> {
        let response = self.http.get(&self.url).await?;
        if !response.is_success() {
            return Err(crate::OilwatchError::Status {
                url: self.url.clone(),
                status: response.status,
            });
        }
        let body: serde_json::Value = serde_json::from_str(&response.body)?;
        if body.is_null() {
            return Err(crate::OilwatchError::MalformedResponse(self.url.clone()));
        }
        Ok(normalize_response(&body))
    }

    /// Run one poll attempt. Timer and manual refresh both come through here.
    ///
    /// A call made while another attempt is in flight returns
    /// [`PollOutcome::Skipped`] without issuing a request.
    pub async fn poll_once(&self) -> PollOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::debug!("Poll of {} already in flight, skipping", self.url);
            return PollOutcome::Skipped;
        };

        self.state.write().await.begin_poll();

        let result = self.fetch().await;
        let now = Utc::now();

        let mut state = self.state.write().await;
        match result {
            Ok(buoys) => {
                let count = buoys.len();
                state.apply_success(buoys, now);
                tracing::debug!("Poll of {} returned {} buoy(s)", self.url, count);
                PollOutcome::Updated { count }
            }
            Err(e) => {
                tracing::warn!("Poll of {} failed, showing demo data: {}", self.url, e);
                state.apply_fallback(now);
                PollOutcome::FellBack
            }
        }
    }

    /// Run one poll on its own task and wait for it.
    ///
    /// Dropping the returned future does not cancel the poll, so shared state
    /// is always completed even if the caller goes away mid-request.
    pub async fn refresh(self: &Arc<Self>) -> crate::Result<PollOutcome> {
        let poller = Arc::clone(self);
        tokio::spawn(async move { poller.poll_once().await })
            .await
            .map_err(|e| crate::OilwatchError::PollTask(e.to_string()))
    }

    /// Start the poll timer: one poll right away, then one per `interval`.
    ///
    /// The returned guard owns the timer; stopping or dropping it ends the
    /// schedule. A poll already in flight is allowed to finish.
    pub fn spawn(self: &Arc<Self>, interval: Duration, parent: &CancellationToken) -> PollTimer {
        let cancel = parent.child_token();
        let poller = Arc::clone(self);
        let timer_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            poll_loop(poller, interval, timer_cancel).await;
        });

        PollTimer {
            cancel,
            handle: Some(handle),
        }
    }
}

async fn poll_loop(poller: Arc<Poller>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Poll timer for {} cancelled", poller.url());
                break;
            }
            _ = ticker.tick() => {}
        }

        // Detached so cancelling the timer never aborts a request mid-flight
        let p = Arc::clone(&poller);
        tokio::spawn(async move {
            let outcome = p.poll_once().await;
            tracing::debug!("Scheduled poll of {}: {:?}", p.url(), outcome);
        });
    }
}

/// Scoped handle to a running poll timer
#[derive(Debug)]
pub struct PollTimer {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollTimer {
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Cancel the timer and wait for its task to exit
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
