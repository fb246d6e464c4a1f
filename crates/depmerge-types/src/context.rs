use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable ambient-context token for one merge request.
///
/// Collaborators that behave differently per tenant or locale read this
/// token from the task scope instead of a process-wide current-context
/// slot. The token travels with the request, so nothing has to be saved
/// and restored around task execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextId(String);

impl ContextId {
    /// Wrap a context identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the default (unnamed) context.
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "<default>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_the_unnamed_context() {
        let ctx = ContextId::default();
        assert!(ctx.is_default());
        assert_eq!(format!("{ctx}"), "<default>");
    }

    #[test]
    fn named_context_displays_its_name() {
        let ctx = ContextId::new("tenant-a");
        assert!(!ctx.is_default());
        assert_eq!(ctx.as_str(), "tenant-a");
        assert_eq!(format!("{ctx}"), "tenant-a");
    }

    #[test]
    fn serde_is_transparent() {
        let ctx = ContextId::new("foo");
        let json = serde_json::to_string(&ctx).unwrap();
        assert_eq!(json, "\"foo\"");
        let parsed: ContextId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ctx);
    }
}
