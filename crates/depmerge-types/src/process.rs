use std::fmt;

use serde::{Deserialize, Serialize};

/// Caller-assigned identifier for one merge request.
///
/// The connector never interprets the value; it is carried through the
/// merge queue and tagged onto the completion event so the caller can
/// correlate outcomes with submissions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(u64);

impl ProcessId {
    /// Wrap a raw process identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProcessId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
