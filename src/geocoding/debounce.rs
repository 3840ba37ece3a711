//! Debounced city search with stale-result suppression.
//!
//! A [`DebouncedSearch`] collapses bursts of keystroke-style inputs into at
//! most one lookup per quiet period. Every input bumps a monotonically
//! increasing request counter; a lookup's result is applied only when its
//! captured counter value is still the latest, so a slow earlier lookup can
//! never overwrite the results of a later one.

use crate::geocoding::city_lookup::{CityCandidate, CitySearch};
use crate::geocoding::error::GeocodingError;
use log::{debug, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(400);
pub const DEFAULT_SEARCH_QUERY: &str = "Riyadh";
pub const DEFAULT_RESULT_COUNT: u32 = 5;

#[derive(Default)]
struct SearchState {
    candidates: Vec<CityCandidate>,
    fetching: bool,
}

/// Handle to a background task that debounces city searches.
///
/// Feed it text with [`input`](Self::input) and observe the visible candidate
/// list with [`candidates`](Self::candidates) / [`is_fetching`](Self::is_fetching).
/// On construction the task seeds itself once with [`DEFAULT_SEARCH_QUERY`] so
/// the list is pre-populated. Dropping the handle cancels the task and any
/// in-flight lookup bookkeeping.
pub struct DebouncedSearch {
    tx: mpsc::UnboundedSender<String>,
    state: Arc<Mutex<SearchState>>,
    shutdown: CancellationToken,
}

impl DebouncedSearch {
    pub fn new<S>(search: S) -> Self
    where
        S: CitySearch + 'static,
    {
        Self::with_window(search, DEFAULT_DEBOUNCE_WINDOW)
    }

    pub fn with_window<S>(search: S, window: Duration) -> Self
    where
        S: CitySearch + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SearchState::default()));
        let shutdown = CancellationToken::new();

        tokio::spawn(drive(
            Arc::new(search),
            rx,
            Arc::clone(&state),
            window,
            shutdown.clone(),
        ));

        // Seed once so the dropdown is populated before the first keystroke.
        let handle = Self {
            tx,
            state,
            shutdown,
        };
        handle.input(DEFAULT_SEARCH_QUERY);
        handle
    }

    /// Registers one keystroke-equivalent input event.
    pub fn input(&self, text: impl Into<String>) {
        // The driver task only exits once the handle is dropped, so a send
        // failure here just means we are mid-teardown.
        let _ = self.tx.send(text.into());
    }

    /// Snapshot of the currently visible candidate list.
    pub fn candidates(&self) -> Vec<CityCandidate> {
        self.state.lock().unwrap().candidates.clone()
    }

    /// Whether a lookup for the latest input is still outstanding.
    pub fn is_fetching(&self) -> bool {
        self.state.lock().unwrap().fetching
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn drive<S>(
    search: Arc<S>,
    mut rx: mpsc::UnboundedReceiver<String>,
    state: Arc<Mutex<SearchState>>,
    window: Duration,
    shutdown: CancellationToken,
) where
    S: CitySearch + 'static,
{
    let latest = Arc::new(AtomicU64::new(0));
    let mut pending: Option<(u64, String)> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        // The timer branch is disabled while nothing is pending; the fallback
        // instant is never actually polled.
        let timer_at = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400));
        tokio::select! {
            _ = shutdown.cancelled() => break,
            received = rx.recv() => {
                let Some(text) = received else { break };
                // Bumping the counter and clearing the list happen under the
                // same lock that guards result application, so an in-flight
                // lookup can never slip a superseded result in between.
                let request_id = {
                    let mut visible = state.lock().unwrap();
                    visible.candidates.clear();
                    visible.fetching = true;
                    latest.fetch_add(1, Ordering::SeqCst) + 1
                };
                pending = Some((request_id, text));
                deadline = Some(Instant::now() + window);
            }
            _ = sleep_until(timer_at), if deadline.is_some() => {
                deadline = None;
                if let Some((request_id, text)) = pending.take() {
                    dispatch(
                        Arc::clone(&search),
                        Arc::clone(&state),
                        Arc::clone(&latest),
                        request_id,
                        text,
                    );
                }
            }
        }
    }
}

/// Runs one lookup in its own task so a slow response never delays the input
/// loop, then applies the outcome only if the request is still the latest.
fn dispatch<S>(
    search: Arc<S>,
    state: Arc<Mutex<SearchState>>,
    latest: Arc<AtomicU64>,
    request_id: u64,
    text: String,
) where
    S: CitySearch + 'static,
{
    tokio::spawn(async move {
        let result = search.search(&text, DEFAULT_RESULT_COUNT).await;
        apply_outcome(&state, &latest, request_id, &text, result);
    });
}

/// Applies a finished lookup's outcome to the visible state.
///
/// The staleness check runs while holding the state lock. The input path
/// bumps the counter under that same lock, so the two cannot interleave: a
/// superseded outcome either lands before the newer input (and is wiped by
/// its clear) or observes the bumped counter and is discarded.
fn apply_outcome(
    state: &Mutex<SearchState>,
    latest: &AtomicU64,
    request_id: u64,
    text: &str,
    result: Result<Vec<CityCandidate>, GeocodingError>,
) {
    let mut visible = state.lock().unwrap();
    if latest.load(Ordering::SeqCst) != request_id {
        debug!("Discarding stale city search result for '{}'", text);
        return;
    }
    match result {
        Ok(candidates) => {
            visible.candidates = candidates;
            visible.fetching = false;
        }
        Err(e) => {
            warn!("City search for '{}' failed: {}", text, e);
            visible.candidates.clear();
            visible.fetching = false;
        }
    }
}
