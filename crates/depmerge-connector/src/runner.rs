use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info_span, warn};

use depmerge_descriptor::DescriptorPatcher;
use depmerge_types::{ContextId, ProcessId, ProjectDirectory};

use crate::config::MergeConfig;
use crate::event::{EventSink, MergeFailEvent, MergeSuccessEvent};

/// One queued merge: patch the configured property of the descriptor in
/// `directory` to `new_value`.
///
/// Immutable once enqueued; consumed exactly once by the worker.
#[derive(Clone, Debug)]
pub struct MergeRequest {
    /// Directory containing the build descriptor.
    pub directory: ProjectDirectory,
    /// Replacement text for the property value.
    pub new_value: String,
    /// Caller identifier echoed on the completion event.
    pub process_id: ProcessId,
    /// Ambient context the task runs under.
    pub context: ContextId,
}

impl MergeRequest {
    /// Build a request under the default context.
    pub fn new(
        directory: ProjectDirectory,
        new_value: impl Into<String>,
        process_id: impl Into<ProcessId>,
    ) -> Self {
        Self {
            directory,
            new_value: new_value.into(),
            process_id: process_id.into(),
            context: ContextId::default(),
        }
    }

    /// Attach an explicit ambient context.
    pub fn in_context(mut self, context: ContextId) -> Self {
        self.context = context;
        self
    }
}

/// Serialized execution boundary for merge requests.
///
/// All requests flow through one bounded FIFO queue into a single worker
/// task, so at most one descriptor patch is in flight at any time and
/// requests complete in submission order. Submission never blocks; every
/// outcome is observable only through the injected [`EventSink`].
pub struct MergeRunner {
    queue: mpsc::Sender<MergeRequest>,
    sink: Arc<dyn EventSink>,
    worker: JoinHandle<()>,
}

impl MergeRunner {
    /// Start the worker and return the running runner.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: MergeConfig, sink: Arc<dyn EventSink>) -> Self {
        let (queue, requests) = mpsc::channel(config.queue_capacity.max(1));
        let worker_sink = Arc::clone(&sink);
        let worker = tokio::spawn(run_worker(requests, config, worker_sink));
        Self {
            queue,
            sink,
            worker,
        }
    }

    /// Enqueue a merge request, fire-and-forget.
    ///
    /// Returns immediately and never blocks or suspends the submitter. A
    /// request that cannot be queued (queue full, or worker stopped)
    /// fails right here with its own `MergeFail` event, so every
    /// submission still produces exactly one completion event.
    pub fn submit(&self, request: MergeRequest) {
        if let Err(rejected) = self.queue.try_send(request) {
            let (request, reason) = match rejected {
                mpsc::error::TrySendError::Full(r) => (r, "merge queue is full"),
                mpsc::error::TrySendError::Closed(r) => (r, "merge worker is stopped"),
            };
            warn!(process_id = %request.process_id, reason, "merge request rejected");
            self.sink.merge_failed(MergeFailEvent {
                process_id: request.process_id,
                reason: reason.to_string(),
            });
        }
    }

    /// Whether the worker task is still running.
    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Stop intake, drain already-queued requests, and join the worker.
    pub async fn shutdown(self) {
        drop(self.queue);
        if let Err(err) = self.worker.await {
            warn!(error = %err, "merge worker terminated abnormally");
        }
    }
}

/// Worker loop: one request at a time, FIFO, no timeout, no retry.
async fn run_worker(
    mut requests: mpsc::Receiver<MergeRequest>,
    config: MergeConfig,
    sink: Arc<dyn EventSink>,
) {
    // Built once; an invalid property name fails every request with the
    // same reason instead of tearing the worker down.
    let patcher = DescriptorPatcher::new(config.descriptor_file.clone(), &config.property);

    while let Some(request) = requests.recv().await {
        let outcome = match &patcher {
            Ok(patcher) => execute(patcher, &request).await,
            Err(err) => Err(err.to_string()),
        };
        match outcome {
            Ok(()) => sink.merge_succeeded(MergeSuccessEvent {
                process_id: request.process_id,
                directory: request.directory,
                detail: String::new(),
            }),
            Err(reason) => sink.merge_failed(MergeFailEvent {
                process_id: request.process_id,
                reason,
            }),
        }
    }
    debug!("merge queue closed, worker stopping");
}

/// Run one patch on the blocking pool under the request's context scope.
async fn execute(patcher: &DescriptorPatcher, request: &MergeRequest) -> Result<(), String> {
    let span = info_span!(
        "merge",
        context = %request.context,
        process_id = %request.process_id,
        directory = %request.directory,
    );
    let patcher = patcher.clone();
    let directory = request.directory.clone();
    let new_value = request.new_value.clone();

    let joined = task::spawn_blocking(move || {
        let _scope = span.entered();
        patcher.patch(directory.path(), &new_value)
    })
    .await;

    match joined {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(err.to_string()),
        // The patch panicked; the request still completes with a failure.
        Err(err) => Err(format!("merge task aborted: {err}")),
    }
}
