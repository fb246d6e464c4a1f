use serde::{Deserialize, Serialize};

/// Configuration for the dependency-merge connector.
///
/// Set before use; values are not validated here. An unusable descriptor
/// file name or property name surfaces per request as a failure event,
/// never as a construction error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Descriptor file name, resolved relative to the project directory.
    pub descriptor_file: String,
    /// Property name under the descriptor's `<properties>` section.
    pub property: String,
    /// Capacity of the merge queue. A submission that finds the queue
    /// full fails immediately instead of blocking the submitter.
    pub queue_capacity: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            descriptor_file: "pom.xml".to_string(),
            property: String::new(),
            queue_capacity: 64,
        }
    }
}

impl MergeConfig {
    /// Configuration targeting the given property in the default
    /// `pom.xml`.
    pub fn for_property(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_pom_xml() {
        let config = MergeConfig::default();
        assert_eq!(config.descriptor_file, "pom.xml");
        assert!(config.property.is_empty());
        assert!(config.queue_capacity > 0);
    }

    #[test]
    fn for_property_keeps_the_other_defaults() {
        let config = MergeConfig::for_property("junit.version");
        assert_eq!(config.property, "junit.version");
        assert_eq!(config.descriptor_file, "pom.xml");
    }

    #[test]
    fn serde_roundtrip() {
        let config = MergeConfig::for_property("junit.version");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MergeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
