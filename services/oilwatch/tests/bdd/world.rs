//! BDD test world for oilwatch service

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cucumber::World;
use oilwatch::io::{HttpClient, HttpResponse};
use oilwatch::poller::{PollOutcome, PollTimer, Poller};
use oilwatch::reading::BuoyView;
use oilwatch::state::new_state_handle;
use oilwatch::OilwatchError;

pub const TEST_URL: &str = "http://backend.test/readings-latest?limit=1";

/// A backend stand-in that replays one canned reply and counts requests
#[derive(Debug)]
pub struct ScriptedBackend {
    reply: Mutex<Result<HttpResponse, String>>,
    delay: Option<Duration>,
    requests: AtomicUsize,
}

impl ScriptedBackend {
    pub fn returning(status: u16, body: &str) -> Self {
        Self {
            reply: Mutex::new(Ok(HttpResponse {
                status,
                body: body.to_string(),
            })),
            delay: None,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reply: Mutex::new(Err("connection refused".to_string())),
            delay: None,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_reply(&self, status: u16, body: &str) {
        *self.reply.lock().unwrap() = Ok(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedBackend {
    async fn get(&self, _url: &str) -> oilwatch::Result<HttpResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.reply.lock().unwrap().clone();
        reply.map_err(OilwatchError::Http)
    }
}

#[derive(Debug, Default, World)]
pub struct OilwatchWorld {
    // Normalization testing
    pub response_body: Option<String>,

    // Polling testing
    pub backend: Option<Arc<ScriptedBackend>>,
    pub poller: Option<Arc<Poller>>,
    pub outcomes: Vec<PollOutcome>,
    pub view_snapshots: Vec<Vec<BuoyView>>,

    // Timer testing
    pub timer: Option<PollTimer>,
    pub requests_at_stop: Option<usize>,

    // Dashboard testing
    pub dashboard_response_status: Option<u16>,
    pub dashboard_response_body: Option<String>,

    // The view list under test
    pub views: Vec<BuoyView>,
}

impl OilwatchWorld {
    /// The poller wired to the scripted backend, created on first use
    pub fn poller(&mut self) -> Arc<Poller> {
        if let Some(poller) = &self.poller {
            return Arc::clone(poller);
        }
        let backend = self.backend.as_ref().expect("backend not set").clone();
        let poller = Arc::new(Poller::new(TEST_URL, backend, new_state_handle()));
        self.poller = Some(Arc::clone(&poller));
        poller
    }

    pub fn backend(&self) -> &ScriptedBackend {
        self.backend.as_ref().expect("backend not set")
    }

    /// Copy the poller's current view list into `views`
    pub async fn capture_views(&mut self) {
        let poller = self.poller();
        let buoys = poller.state().read().await.buoys.clone();
        self.view_snapshots.push(buoys.clone());
        self.views = buoys;
    }
}
