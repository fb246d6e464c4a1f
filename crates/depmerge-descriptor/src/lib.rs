//! Build-descriptor patching for the depmerge connector.
//!
//! A descriptor is an XML project file (e.g. a Maven `pom.xml`) with a
//! single `<properties>` section under the document root. The patcher
//! locates exactly one named property element there, replaces its text
//! content, and writes the document back atomically. Everything else in
//! the document round-trips byte-identically.

pub mod error;
pub mod locator;
pub mod patch;

pub use error::{PatchError, Result};
pub use locator::PropertyLocator;
pub use patch::DescriptorPatcher;
