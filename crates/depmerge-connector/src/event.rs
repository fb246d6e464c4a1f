use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use depmerge_types::{ProcessId, ProjectDirectory};

/// Raised when a merge request patched and persisted the descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSuccessEvent {
    /// Identifier of the originating request.
    pub process_id: ProcessId,
    /// Directory whose descriptor now carries the new value.
    pub directory: ProjectDirectory,
    /// Reserved detail text (empty today).
    pub detail: String,
}

/// Raised when a merge request failed at any stage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeFailEvent {
    /// Identifier of the originating request.
    pub process_id: ProcessId,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Completion notification for one merge request.
///
/// Exactly one of these is emitted per submitted request, in submission
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionEvent {
    /// The merge succeeded.
    Success(MergeSuccessEvent),
    /// The merge failed.
    Fail(MergeFailEvent),
}

impl CompletionEvent {
    /// The process identifier the event is tagged with.
    pub fn process_id(&self) -> ProcessId {
        match self {
            Self::Success(e) => e.process_id,
            Self::Fail(e) => e.process_id,
        }
    }

    /// Returns `true` for a success event.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure reason, if this is a failure event.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Fail(e) => Some(&e.reason),
            Self::Success(_) => None,
        }
    }
}

/// Delivery capability for completion events.
///
/// The connector has no compile-time coupling to any delivery mechanism;
/// embedders inject whatever transport they need. Implementations must be
/// cheap and non-blocking: delivery happens on the merge worker, and a
/// slow sink delays every queued request behind it.
pub trait EventSink: Send + Sync {
    /// Deliver a success notification.
    fn merge_succeeded(&self, event: MergeSuccessEvent);

    /// Deliver a failure notification.
    fn merge_failed(&self, event: MergeFailEvent);
}

/// Broadcast-backed [`EventSink`] for embedders and tests.
///
/// Fans completion events out to any number of subscribers; each
/// subscriber observes events in emission order. Events emitted while no
/// subscriber exists are dropped.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: broadcast::Sender<CompletionEvent>,
}

impl ChannelSink {
    /// Create a sink with the given per-subscriber buffer capacity.
    /// Capacity must be at least 1.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new subscription to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<CompletionEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for ChannelSink {
    fn merge_succeeded(&self, event: MergeSuccessEvent) {
        // Send only fails when nobody is subscribed; the event is dropped.
        let _ = self.sender.send(CompletionEvent::Success(event));
    }

    fn merge_failed(&self, event: MergeFailEvent) {
        let _ = self.sender.send(CompletionEvent::Fail(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(id: u64) -> MergeSuccessEvent {
        MergeSuccessEvent {
            process_id: ProcessId::new(id),
            directory: ProjectDirectory::new("/tmp/project"),
            detail: String::new(),
        }
    }

    #[test]
    fn accessors_reach_through_the_variants() {
        let ok = CompletionEvent::Success(success(1));
        assert_eq!(ok.process_id(), ProcessId::new(1));
        assert!(ok.is_success());
        assert_eq!(ok.reason(), None);

        let fail = CompletionEvent::Fail(MergeFailEvent {
            process_id: ProcessId::new(2),
            reason: "boom".to_string(),
        });
        assert_eq!(fail.process_id(), ProcessId::new(2));
        assert!(!fail.is_success());
        assert_eq!(fail.reason(), Some("boom"));
    }

    #[test]
    fn channel_sink_fans_out_in_emission_order() {
        let sink = ChannelSink::new(8);
        let mut first = sink.subscribe();
        let mut second = sink.subscribe();

        sink.merge_succeeded(success(1));
        sink.merge_failed(MergeFailEvent {
            process_id: ProcessId::new(2),
            reason: "nope".to_string(),
        });

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.try_recv().unwrap().process_id(), ProcessId::new(1));
            assert_eq!(rx.try_recv().unwrap().process_id(), ProcessId::new(2));
        }
    }

    #[test]
    fn events_without_subscribers_are_dropped_silently() {
        let sink = ChannelSink::new(8);
        sink.merge_succeeded(success(1));
    }

    #[test]
    fn serde_roundtrip() {
        let event = CompletionEvent::Fail(MergeFailEvent {
            process_id: ProcessId::new(9),
            reason: "unexpected number of matching nodes: 0".to_string(),
        });
        let json = serde_json::to_string(&event).unwrap();
        let parsed: CompletionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }
}
