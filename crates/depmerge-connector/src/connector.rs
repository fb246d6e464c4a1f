use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use depmerge_types::{ContextId, ProcessId, ProjectDirectory};

use crate::config::MergeConfig;
use crate::event::{EventSink, MergeFailEvent};
use crate::runner::{MergeRequest, MergeRunner};

/// Reported liveness of the connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AliveState {
    /// The merge worker is accepting and executing requests.
    Online,
    /// The merge worker has stopped.
    Offline,
}

/// The dependency-merge connector.
///
/// Thin surface over the [`MergeRunner`]: callers hand it a project
/// directory, a replacement value, and a process identifier; the outcome
/// arrives later through the injected [`EventSink`].
pub struct DependencyConnector {
    runner: Option<MergeRunner>,
    sink: Arc<dyn EventSink>,
}

impl DependencyConnector {
    /// Wire a connector from its configuration and event sink.
    ///
    /// Must be called from within a tokio runtime; the merge worker
    /// starts immediately.
    pub fn new(config: MergeConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            runner: Some(MergeRunner::spawn(config, Arc::clone(&sink))),
            sink,
        }
    }

    /// Submit a merge under the default context. Returns immediately.
    pub fn merge(
        &self,
        directory: ProjectDirectory,
        new_value: impl Into<String>,
        process_id: impl Into<ProcessId>,
    ) {
        self.merge_in_context(directory, new_value, process_id, ContextId::default());
    }

    /// Submit a merge under an explicit ambient context.
    ///
    /// The context travels with the request and scopes the worker's
    /// execution of it; nothing process-wide is mutated or restored.
    pub fn merge_in_context(
        &self,
        directory: ProjectDirectory,
        new_value: impl Into<String>,
        process_id: impl Into<ProcessId>,
        context: ContextId,
    ) {
        let request = MergeRequest::new(directory, new_value, process_id).in_context(context);
        debug!(process_id = %request.process_id, context = %request.context, "merge submitted");
        match &self.runner {
            Some(runner) => runner.submit(request),
            None => self.sink.merge_failed(MergeFailEvent {
                process_id: request.process_id,
                reason: "connector is shut down".to_string(),
            }),
        }
    }

    /// Liveness of the underlying merge worker.
    pub fn alive_state(&self) -> AliveState {
        match &self.runner {
            Some(runner) if runner.is_running() => AliveState::Online,
            _ => AliveState::Offline,
        }
    }

    /// Drain queued requests and stop the worker. Idempotent.
    pub async fn shutdown(&mut self) {
        if let Some(runner) = self.runner.take() {
            runner.shutdown().await;
        }
    }
}
