use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Handle to the project directory holding the build descriptor.
///
/// Directories are resolved by an external file-model layer; the connector
/// only ever joins the configured descriptor file name onto the handle. The
/// directory is not required to exist at construction time — a dangling
/// handle surfaces later as a per-request failure event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectDirectory(PathBuf);

impl ProjectDirectory {
    /// Wrap a resolved directory path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The directory path.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Resolve a file name inside the directory.
    pub fn join(&self, file_name: &str) -> PathBuf {
        self.0.join(file_name)
    }

    /// Consume the handle, yielding the owned path.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl From<PathBuf> for ProjectDirectory {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl fmt::Display for ProjectDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_resolves_inside_the_directory() {
        let dir = ProjectDirectory::new("/tmp/project");
        assert_eq!(dir.join("pom.xml"), PathBuf::from("/tmp/project/pom.xml"));
    }

    #[test]
    fn path_accessors_agree() {
        let dir = ProjectDirectory::new("/srv/build");
        assert_eq!(dir.path(), Path::new("/srv/build"));
        assert_eq!(dir.clone().into_path_buf(), PathBuf::from("/srv/build"));
    }

    #[test]
    fn serde_roundtrip() {
        let dir = ProjectDirectory::new("/tmp/project");
        let json = serde_json::to_string(&dir).unwrap();
        let parsed: ProjectDirectory = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dir);
    }
}
