//! Bridge - adapts the store, renderer and analytics sink to a host.
//!
//! # Flow
//! 1. `ResultStore::initialize()` runs before any request is read; requests
//!    sent earlier wait in the channel
//! 2. `StoreResult` is spawned as its own task, the loop never waits on it
//! 3. `RequestInitialResults` runs one `load_all` and sends exactly one
//!    `ResultsLoaded`; repeats are ignored
//! 4. `LogEvent` goes straight to the analytics sink, failures are ignored
//!
//! `ResultsLoaded` is sent even when storage is unavailable (with an empty
//! list), so the host can always tell "loading" from "loaded".

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};

use crate::domain::{Document, HostNotification, HostRequest, Markup, QuizResult};
use crate::ports::AnalyticsSink;
use crate::render::Renderer;
use crate::store::ResultStore;

pub struct Bridge {
    store: Arc<ResultStore>,
    analytics: Arc<dyn AnalyticsSink>,
    renderer: Renderer,
    load_on_start: bool,
}

impl Bridge {
    pub(crate) fn new(
        store: Arc<ResultStore>,
        analytics: Arc<dyn AnalyticsSink>,
        renderer: Renderer,
        load_on_start: bool,
    ) -> Self {
        Self {
            store,
            analytics,
            renderer,
            load_on_start,
        }
    }

    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Spawn the bridge task. Must be called inside a tokio runtime.
    pub fn start(self) -> RunningBridge {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = BridgeHandle {
            requests: request_tx,
            renderer: self.renderer.clone(),
        };
        if self.load_on_start {
            handle.request_initial_results();
        }

        let worker = BridgeWorker {
            store: Arc::clone(&self.store),
            analytics: self.analytics,
            notifications: notify_tx,
            initial_results_sent: false,
            in_flight: JoinSet::new(),
        };
        let task = tokio::spawn(worker.run(request_rx, shutdown_rx));

        RunningBridge {
            handle,
            notifications: notify_rx,
            store: self.store,
            shutdown_tx,
            task: Some(task),
        }
    }
}

/// Cloneable host-side handle.
///
/// Sends never fail from the host's point of view: if the bridge has shut
/// down the request is dropped.
#[derive(Clone)]
pub struct BridgeHandle {
    requests: mpsc::UnboundedSender<HostRequest>,
    renderer: Renderer,
}

impl BridgeHandle {
    /// Synchronous render, no round trip through the bridge task.
    pub fn render_blocks(&self, document: &Document) -> Markup {
        self.renderer.render(document)
    }

    pub fn send(&self, request: HostRequest) {
        if self.requests.send(request).is_err() {
            debug!("bridge stopped, request dropped");
        }
    }

    pub fn request_store_result(&self, result: QuizResult) {
        self.send(HostRequest::StoreResult(result));
    }

    pub fn request_initial_results(&self) {
        self.send(HostRequest::RequestInitialResults);
    }

    pub fn log_event(&self, name: impl Into<String>) {
        self.send(HostRequest::LogEvent(name.into()));
    }
}

/// A started bridge.
pub struct RunningBridge {
    pub handle: BridgeHandle,
    pub notifications: mpsc::UnboundedReceiver<HostNotification>,
    store: Arc<ResultStore>,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RunningBridge {
    pub fn store(&self) -> &Arc<ResultStore> {
        &self.store
    }

    /// Stop taking requests. Requests already queued are still handled.
    pub fn request_shutdown(&self) {
        // ignore send error: the worker may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Shut down and wait until queued requests and in-flight submissions
    /// are done. Notifications sent before that stay readable.
    pub async fn shutdown_and_join(&mut self) {
        self.request_shutdown();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

struct BridgeWorker {
    store: Arc<ResultStore>,
    analytics: Arc<dyn AnalyticsSink>,
    notifications: mpsc::UnboundedSender<HostNotification>,
    initial_results_sent: bool,
    in_flight: JoinSet<()>,
}

impl BridgeWorker {
    async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<HostRequest>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let state = self.store.initialize().await;
        info!(?state, "bridge started");

        let mut closing = *shutdown_rx.borrow();
        if closing {
            requests.close();
        }
        loop {
            let request = tokio::select! {
                changed = shutdown_rx.changed(), if !closing => {
                    // a dropped sender counts as shutdown too
                    if changed.is_err() || *shutdown_rx.borrow() {
                        closing = true;
                        requests.close();
                    }
                    continue;
                }
                request = requests.recv() => request,
            };
            let Some(request) = request else {
                break;
            };
            self.handle(request);
            while self.in_flight.try_join_next().is_some() {}
        }

        while self.in_flight.join_next().await.is_some() {}
        info!("bridge stopped");
    }

    fn handle(&mut self, request: HostRequest) {
        match request {
            HostRequest::StoreResult(result) => {
                let store = Arc::clone(&self.store);
                self.in_flight.spawn(async move {
                    store.submit(result).await;
                });
            }
            HostRequest::RequestInitialResults => {
                if self.initial_results_sent {
                    debug!("initial results already delivered, request ignored");
                    return;
                }
                self.initial_results_sent = true;
                let store = Arc::clone(&self.store);
                let notifications = self.notifications.clone();
                self.in_flight.spawn(async move {
                    let results = store.load_all().await;
                    debug!(count = results.len(), "delivering initial results");
                    // host may have dropped its receiver
                    let _ = notifications.send(HostNotification::ResultsLoaded(results));
                });
            }
            HostRequest::LogEvent(name) => {
                if let Err(err) = self.analytics.log_event(&name) {
                    debug!(event = %name, error = %err, "analytics event dropped");
                }
            }
        }
    }
}
