use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::LauncherError;

/// Contents of `<marker>/gogo.json`, written once by `gogo bootstrap`.
///
/// For `github.com/klingtnet/gogo` the namespace is `github.com/klingtnet`
/// and the project is `gogo`; a single-segment import path has an empty
/// namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMetadata {
    #[serde(rename = "projectName")]
    pub project: String,
    pub namespace: String,
    #[serde(rename = "importPath")]
    pub import_path: String,
}

impl WorkspaceMetadata {
    pub fn from_import_path(import_path: &str) -> Result<Self, LauncherError> {
        let segments = split_import_path(import_path)?;
        let (project, namespace) = segments
            .split_last()
            .map(|(project, namespace)| (project.to_string(), namespace.join("/")))
            .ok_or_else(|| invalid(import_path, "import path is empty"))?;

        Ok(Self {
            project,
            namespace,
            import_path: import_path.to_string(),
        })
    }

    /// `<namespace>/<project>` as a relative path.
    pub fn relative_project_dir(&self) -> PathBuf {
        let mut dir = self.namespace_dir();
        dir.push(&self.project);
        dir
    }

    pub fn namespace_dir(&self) -> PathBuf {
        self.namespace
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// Metadata read back from disk must describe the same layout that
    /// bootstrap would have produced for its import path.
    fn check_consistent(&self, path: &Path) -> Result<(), LauncherError> {
        let expected = Self::from_import_path(&self.import_path).ok();
        if expected.as_ref() != Some(self) {
            return Err(LauncherError::MetadataMismatch {
                path: path.to_path_buf(),
                import_path: self.import_path.clone(),
            });
        }
        Ok(())
    }
}

fn split_import_path(import_path: &str) -> Result<Vec<&str>, LauncherError> {
    if import_path.trim().is_empty() {
        return Err(invalid(import_path, "import path is empty"));
    }
    let segments: Vec<&str> = import_path.split('/').collect();
    for segment in &segments {
        match *segment {
            "" => return Err(invalid(import_path, "empty path segment")),
            "." | ".." => return Err(invalid(import_path, "relative path segment")),
            s if s.contains('\\') => return Err(invalid(import_path, "backslash in path segment")),
            _ => {}
        }
    }
    Ok(segments)
}

fn invalid(import_path: &str, reason: &str) -> LauncherError {
    LauncherError::InvalidImportPath {
        import_path: import_path.to_string(),
        reason: reason.to_string(),
    }
}

/// Read the metadata file. A missing file is `Ok(None)`.
pub fn read_metadata(path: &Path) -> Result<Option<WorkspaceMetadata>, LauncherError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(LauncherError::workspace_io(
                format!("could not read metadata file {}", path.display()),
                source,
            ));
        }
    };
    let metadata: WorkspaceMetadata =
        serde_json::from_str(&content).map_err(|source| LauncherError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
    metadata.check_consistent(path)?;
    Ok(Some(metadata))
}

pub fn write_metadata(path: &Path, metadata: &WorkspaceMetadata) -> Result<(), LauncherError> {
    let mut json = serde_json::to_string_pretty(metadata).map_err(|source| {
        LauncherError::Metadata {
            path: path.to_path_buf(),
            source,
        }
    })?;
    json.push('\n');
    fs::write(path, json).map_err(|source| {
        LauncherError::workspace_io(
            format!("could not write metadata into {}", path.display()),
            source,
        )
    })
}
