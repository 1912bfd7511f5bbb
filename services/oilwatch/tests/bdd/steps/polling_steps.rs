//! BDD step definitions for polling feature

use std::sync::Arc;
use std::time::Duration;

use cucumber::gherkin::Step;
use cucumber::{given, then, when};

use oilwatch::demo::{demo_buoys, FALLBACK_MESSAGE};
use oilwatch::poller::PollOutcome;

use crate::world::{OilwatchWorld, ScriptedBackend};

fn docstring(step: &Step) -> String {
    step.docstring
        .as_ref()
        .expect("step needs a docstring")
        .trim()
        .to_string()
}

fn outcome_name(outcome: PollOutcome) -> &'static str {
    match outcome {
        PollOutcome::Updated { .. } => "updated",
        PollOutcome::FellBack => "fell_back",
        PollOutcome::Skipped => "skipped",
    }
}

async fn poll(world: &mut OilwatchWorld) {
    let outcome = world.poller().poll_once().await;
    world.outcomes.push(outcome);
    world.capture_views().await;
}

#[given("a backend that returns:")]
fn backend_returns(world: &mut OilwatchWorld, step: &Step) {
    world.backend = Some(Arc::new(ScriptedBackend::returning(200, &docstring(step))));
}

#[given("a slow backend that returns:")]
fn slow_backend_returns(world: &mut OilwatchWorld, step: &Step) {
    let backend =
        ScriptedBackend::returning(200, &docstring(step)).with_delay(Duration::from_millis(200));
    world.backend = Some(Arc::new(backend));
}

#[given("a backend that is unreachable")]
fn backend_unreachable(world: &mut OilwatchWorld) {
    world.backend = Some(Arc::new(ScriptedBackend::unreachable()));
}

#[given(expr = "a backend that responds with status {int}")]
fn backend_status(world: &mut OilwatchWorld, status: u16) {
    world.backend = Some(Arc::new(ScriptedBackend::returning(
        status,
        r#"{"detail": "server error"}"#,
    )));
}

#[when("the backend recovers with:")]
fn backend_recovers(world: &mut OilwatchWorld, step: &Step) {
    world.backend().set_reply(200, &docstring(step));
}

#[when("the dashboard polls once")]
async fn polls_once(world: &mut OilwatchWorld) {
    poll(world).await;
}

#[when("the dashboard polls twice")]
async fn polls_twice(world: &mut OilwatchWorld) {
    poll(world).await;
    poll(world).await;
}

#[when("two polls are triggered at once")]
async fn two_polls_at_once(world: &mut OilwatchWorld) {
    let poller = world.poller();
    let (first, second) = tokio::join!(poller.poll_once(), poller.poll_once());
    world.outcomes.push(first);
    world.outcomes.push(second);
    world.capture_views().await;
}

#[then(expr = "the poll outcome should be {string}")]
fn poll_outcome(world: &mut OilwatchWorld, expected: String) {
    let last = *world.outcomes.last().expect("no poll has run");
    assert_eq!(outcome_name(last), expected);
}

#[then("no error should be shown")]
async fn no_error(world: &mut OilwatchWorld) {
    let poller = world.poller();
    let state = poller.state().read().await;
    assert!(state.error.is_none(), "unexpected error: {:?}", state.error);
}

#[then(expr = "the error banner should read {string}")]
async fn error_banner(world: &mut OilwatchWorld, expected: String) {
    assert_eq!(expected, FALLBACK_MESSAGE);
    let poller = world.poller();
    let state = poller.state().read().await;
    assert_eq!(state.error.as_deref(), Some(expected.as_str()));
}

#[then("the view list should be the demo fleet")]
async fn view_list_is_demo(world: &mut OilwatchWorld) {
    let poller = world.poller();
    let state = poller.state().read().await;
    let stamped_at = state.last_refreshed.expect("poll did not record a time");
    assert_eq!(world.views, demo_buoys(stamped_at));
}

#[then("both polls should produce the same view list")]
fn same_view_list(world: &mut OilwatchWorld) {
    assert_eq!(world.view_snapshots.len(), 2);
    assert_eq!(world.view_snapshots[0], world.view_snapshots[1]);
}

#[then("one poll should have been skipped")]
fn one_skipped(world: &mut OilwatchWorld) {
    let skipped = world
        .outcomes
        .iter()
        .filter(|o| **o == PollOutcome::Skipped)
        .count();
    assert_eq!(skipped, 1, "outcomes: {:?}", world.outcomes);
}

#[then(expr = "the backend should have received {int} request(s)")]
fn backend_request_count(world: &mut OilwatchWorld, expected: usize) {
    assert_eq!(world.backend().request_count(), expected);
}
