use std::fmt;

use crate::error::{PatchError, Result};

/// Fixed ancestor chain for descriptor properties.
const PROPERTY_PARENTS: [&str; 2] = ["project", "properties"];

/// Structural locator for one property element under `/project/properties`.
///
/// The locator matches on the full ancestor chain, so an element with the
/// same name anywhere else in the document is never a candidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyLocator {
    segments: Vec<String>,
}

impl PropertyLocator {
    /// Build the locator for a named property.
    ///
    /// The property name must be a well-formed XML element name; anything
    /// else would silently match nothing, so it is rejected up front.
    pub fn for_property(name: &str) -> Result<Self> {
        if !is_valid_element_name(name) {
            return Err(PatchError::Locator {
                name: name.to_string(),
            });
        }
        let mut segments: Vec<String> = PROPERTY_PARENTS.iter().map(|s| s.to_string()).collect();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// The name of the targeted property (final path segment).
    pub fn property(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Test whether a stack of open element names matches this locator
    /// exactly, root first.
    pub fn matches(&self, ancestors: &[Vec<u8>]) -> bool {
        ancestors.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(ancestors)
                .all(|(segment, name)| segment.as_bytes() == name.as_slice())
    }
}

impl fmt::Display for PropertyLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// XML element name check: a name start character followed by name
/// characters. Namespace prefixes are not supported; property names are a
/// single path segment.
fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(names: &[&str]) -> Vec<Vec<u8>> {
        names.iter().map(|n| n.as_bytes().to_vec()).collect()
    }

    #[test]
    fn accepts_dotted_and_dashed_names() {
        assert!(PropertyLocator::for_property("junit.version").is_ok());
        assert!(PropertyLocator::for_property("spring-boot.version").is_ok());
        assert!(PropertyLocator::for_property("_internal").is_ok());
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "1abc", "a b", "a/b", "<prop>", ".version"] {
            let err = PropertyLocator::for_property(name).unwrap_err();
            assert!(matches!(err, PatchError::Locator { .. }), "{name:?}");
        }
    }

    #[test]
    fn matches_only_the_full_ancestor_chain() {
        let locator = PropertyLocator::for_property("junit.version").unwrap();
        assert!(locator.matches(&stack(&["project", "properties", "junit.version"])));
        assert!(!locator.matches(&stack(&["project", "junit.version"])));
        assert!(!locator.matches(&stack(&["project", "build", "junit.version"])));
        assert!(!locator.matches(&stack(&[
            "project",
            "properties",
            "junit.version",
            "junit.version"
        ])));
        assert!(!locator.matches(&stack(&["project", "properties", "other.version"])));
    }

    #[test]
    fn display_renders_the_path_form() {
        let locator = PropertyLocator::for_property("junit.version").unwrap();
        assert_eq!(locator.to_string(), "/project/properties/junit.version");
        assert_eq!(locator.property(), "junit.version");
    }
}
