//! Dependency-merge connector: serialized asynchronous patching of build
//! descriptor properties.
//!
//! Callers submit merge requests through [`DependencyConnector::merge`]; a
//! single worker executes them in FIFO order via the descriptor patcher
//! and reports each outcome as exactly one completion event on the
//! injected [`EventSink`]. Submission never blocks, failures never
//! propagate back to the submitter, and no two patches ever run
//! concurrently.

pub mod config;
pub mod connector;
pub mod event;
pub mod runner;

pub use config::MergeConfig;
pub use connector::{AliveState, DependencyConnector};
pub use event::{ChannelSink, CompletionEvent, EventSink, MergeFailEvent, MergeSuccessEvent};
pub use runner::{MergeRequest, MergeRunner};
