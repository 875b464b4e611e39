//! Debounced search session for a search-as-you-type input.
//!
//! A session moves through `Idle -> Pending -> Searching -> Settled`. Every
//! keystroke restarts the debounce timer; when the timer fires, the previous
//! request is cancelled before the new one starts. Responses are applied only if
//! their request is still the current one, so a stale response can never
//! overwrite newer state.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::aggregator::panic_message;
use crate::error::SearchError;
use crate::sanitize::{is_valid_query, sanitize};
use crate::traits::Searcher;
use crate::types::{SearchOptions, SearchResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Nothing typed, or the search was cleared
    #[default]
    Idle,
    /// Something typed, but shorter than the minimum query length
    TooShort,
    /// Waiting for typing to pause
    Pending,
    /// Request in flight
    Searching,
    /// Results or an error are available
    Settled,
}

/// Observable state of a [`SearchSession`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    /// Input as typed
    pub query: String,
    pub status: SessionStatus,
    /// True from the first keystroke of a valid query until its response is applied
    pub is_searching: bool,
    pub results: Option<SearchResponse>,
    pub error: Option<SearchError>,
}

impl SessionSnapshot {
    pub fn has_results(&self) -> bool {
        self.total_results() > 0
    }

    pub fn total_results(&self) -> usize {
        self.results.as_ref().map_or(0, |r| r.total_results)
    }
}

/// Debounce and cancellation controller in front of a [`Searcher`].
///
/// Must be used from within a Tokio runtime; timers and requests run as spawned
/// tasks. Dropping the session cancels both.
///
/// # Examples
///
/// ```ignore
/// let session = SearchSession::new(Arc::new(service), SearchOptions::for_caller("42", "admin"));
/// let mut updates = session.subscribe();
///
/// session.set_query("m");
/// session.set_query("ma");
/// session.set_query("mar");
///
/// let settled = updates.wait_for(|s| s.status == SessionStatus::Settled).await?;
/// println!("{} results", settled.total_results());
/// ```
pub struct SearchSession<S>
where
    S: Searcher + 'static,
{
    searcher: Arc<S>,
    options: SearchOptions,
    shared: Arc<Shared>,
}

struct Shared {
    control: Mutex<Control>,
    state: watch::Sender<SessionSnapshot>,
}

#[derive(Default)]
struct Control {
    /// Bumped on every input change; a response is current only if its generation matches
    generation: u64,
    timer: Option<JoinHandle<()>>,
    in_flight: Option<InFlight>,
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Control {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn cancel_in_flight(&mut self) {
        if let Some(request) = self.in_flight.take() {
            request.token.cancel();
            request.handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel_timer();
        self.cancel_in_flight();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a finished request, unless it was cancelled or superseded.
    fn apply(
        &self,
        generation: u64,
        token: &CancellationToken,
        outcome: Result<SearchResponse, SearchError>,
    ) {
        let mut control = self.lock();
        if token.is_cancelled() || control.generation != generation {
            debug!(generation, "Discarding stale search response");
            return;
        }
        control.in_flight = None;

        match outcome {
            Ok(response) => self.state.send_modify(|s| {
                s.status = SessionStatus::Settled;
                s.is_searching = false;
                s.results = Some(response);
                s.error = None;
            }),
            Err(err) => {
                warn!(error = %err, code = %err.code(), "Search failed");
                self.state.send_modify(|s| {
                    s.status = SessionStatus::Settled;
                    s.is_searching = false;
                    s.results = None;
                    s.error = Some(err);
                });
            }
        }
    }
}

/// Debounce timer fired: cancel the previous request and issue the new one.
fn commit<S>(
    shared: &Arc<Shared>,
    searcher: Arc<S>,
    options: SearchOptions,
    query: String,
    generation: u64,
) where
    S: Searcher + 'static,
{
    let mut control = shared.lock();
    if control.generation != generation {
        return;
    }
    // this task is the timer; let it finish on its own
    control.timer = None;
    control.cancel_in_flight();

    let token = CancellationToken::new();
    let task_token = token.clone();
    let task_shared = Arc::clone(shared);
    let handle = tokio::spawn(async move {
        let search = AssertUnwindSafe(searcher.search(&query, &options)).catch_unwind();
        let outcome = tokio::select! {
            _ = task_token.cancelled() => return,
            outcome = search => outcome,
        };

        let outcome = outcome.unwrap_or_else(|panic| {
            Err(match panic_message(panic.as_ref()) {
                Some(message) => SearchError::Exception(message),
                None => SearchError::Unknown,
            })
        });
        task_shared.apply(generation, &task_token, outcome);
    });

    control.in_flight = Some(InFlight { token, handle });
    shared.state.send_modify(|s| {
        s.status = SessionStatus::Searching;
        s.is_searching = true;
    });
}

impl<S> SearchSession<S>
where
    S: Searcher + 'static,
{
    pub fn new(searcher: Arc<S>, options: SearchOptions) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());

        Self {
            searcher,
            options,
            shared: Arc::new(Shared {
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Feed the current input text.
    ///
    /// Restarts the debounce timer. Empty input goes straight to idle and
    /// too-short input never reaches the searcher.
    pub fn set_query(&self, raw: &str) {
        let query = sanitize(raw);

        let mut control = self.shared.lock();
        control.cancel_timer();
        control.generation += 1;
        let generation = control.generation;

        if query.is_empty() || !is_valid_query(&query, self.options.min_query_length) {
            control.cancel_in_flight();
            let status = if query.is_empty() {
                SessionStatus::Idle
            } else {
                SessionStatus::TooShort
            };
            self.shared.state.send_replace(SessionSnapshot {
                query: raw.to_string(),
                status,
                ..Default::default()
            });
            return;
        }

        // loading shows right away, not after the debounce
        self.shared.state.send_modify(|s| {
            s.query = raw.to_string();
            s.status = SessionStatus::Pending;
            s.is_searching = true;
            s.error = None;
        });

        let shared = Arc::clone(&self.shared);
        let searcher = Arc::clone(&self.searcher);
        let options = self.options.clone();
        let delay = options.debounce;
        control.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            commit(&shared, searcher, options, query, generation);
        }));
    }

    /// Cancel any pending timer and in-flight request and reset to idle.
    pub fn clear_search(&self) {
        let mut control = self.shared.lock();
        control.cancel_all();
        control.generation += 1;
        self.shared.state.send_replace(SessionSnapshot::default());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.state.subscribe()
    }
}

impl<S> Drop for SearchSession<S>
where
    S: Searcher + 'static,
{
    fn drop(&mut self) {
        self.shared.lock().cancel_all();
    }
}
