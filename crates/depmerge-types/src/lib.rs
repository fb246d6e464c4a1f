//! Foundation types for the depmerge connector.
//!
//! Small value types shared by the descriptor patcher and the merge runner:
//! process identifiers, ambient context tokens, and the project directory
//! handle that stands in for an externally resolved file model.

pub mod context;
pub mod model;
pub mod process;

pub use context::ContextId;
pub use model::ProjectDirectory;
pub use process::ProcessId;
