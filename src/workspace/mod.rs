//! Project-local workspaces: a root directory holding a marker directory
//! (`.gogo` by default) that doubles as the `GOPATH` of the project.

pub mod bootstrap;
pub mod locator;
pub mod metadata;

use std::path::{Path, PathBuf};

use crate::error::LauncherError;
use locator::SearchResult;
use metadata::WorkspaceMetadata;

/// Name of the metadata file inside the marker directory.
pub const METADATA_FILE: &str = "gogo.json";

/// A workspace rooted at the directory that contains the marker directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    marker: String,
}

impl Workspace {
    pub fn new(root: PathBuf, marker: &str) -> Self {
        Self {
            root,
            marker: marker.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The marker directory itself; exported to the toolchain as its search path.
    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(&self.marker)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.marker_dir().join(METADATA_FILE)
    }

    pub fn src_dir(&self) -> PathBuf {
        self.marker_dir().join("src")
    }

    /// Location of the project inside the workspace `src/` tree.
    pub fn project_dir(&self, metadata: &WorkspaceMetadata) -> PathBuf {
        self.src_dir().join(metadata.relative_project_dir())
    }
}

/// Find the nearest workspace enclosing `start`.
pub fn locate(start: &Path, marker: &str) -> Result<Workspace, LauncherError> {
    match locator::search(start, marker)? {
        SearchResult::Found(root) => Ok(Workspace::new(root, marker)),
        SearchResult::NotFound => Err(LauncherError::WorkspaceNotFound {
            marker: marker.to_string(),
            start: start.to_path_buf(),
        }),
    }
}
