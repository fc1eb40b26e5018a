use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use super::locator::{self, SearchResult};
use super::metadata::{self, WorkspaceMetadata};
use super::Workspace;
use crate::error::LauncherError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created(Workspace),
    AlreadyBootstrapped(Workspace),
}

/// Create a workspace in `project_root`:
///
/// ```text
/// <project_root>/<marker>/gogo.json
/// <project_root>/<marker>/src/<namespace>/<project> -> <project_root>
/// ```
///
/// Nothing is written when `project_root` already sits inside a workspace.
pub fn bootstrap(
    project_root: &Path,
    marker: &str,
    import_path: &str,
) -> Result<BootstrapOutcome, LauncherError> {
    let meta = WorkspaceMetadata::from_import_path(import_path)?;

    if let SearchResult::Found(root) = locator::search(project_root, marker)? {
        return Ok(BootstrapOutcome::AlreadyBootstrapped(Workspace::new(
            root, marker,
        )));
    }

    let workspace = Workspace::new(project_root.to_path_buf(), marker);
    let link_parent = workspace.src_dir().join(meta.namespace_dir());
    fs::create_dir_all(&link_parent).map_err(|source| {
        LauncherError::workspace_io(
            format!("could not create workspace directory {}", link_parent.display()),
            source,
        )
    })?;
    debug!(dir = %link_parent.display(), "created workspace src tree");

    let link = workspace.project_dir(&meta);
    symlink_dir(project_root, &link).map_err(|source| {
        LauncherError::workspace_io(
            format!(
                "could not create symbolic link from {} to {}",
                project_root.display(),
                link.display()
            ),
            source,
        )
    })?;

    metadata::write_metadata(&workspace.metadata_path(), &meta)?;
    info!(root = %project_root.display(), import_path, "bootstrapped workspace");
    Ok(BootstrapOutcome::Created(workspace))
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MARKER: &str = ".gogo-bootstrap-test-marker";

    #[test]
    fn creates_layout_link_and_metadata() {
        let tmp = tempdir().expect("temp dir");
        let outcome = bootstrap(tmp.path(), MARKER, "github.com/user/app").expect("bootstrap");

        let BootstrapOutcome::Created(ws) = outcome else {
            panic!("expected a fresh workspace");
        };
        assert_eq!(ws.root(), tmp.path());

        let link = tmp.path().join(MARKER).join("src/github.com/user/app");
        let target = fs::read_link(&link).expect("project link");
        assert_eq!(target, tmp.path());

        let meta = metadata::read_metadata(&ws.metadata_path())
            .expect("read metadata")
            .expect("metadata present");
        assert_eq!(meta.project, "app");
        assert_eq!(meta.namespace, "github.com/user");
    }

    #[test]
    fn single_segment_import_path_links_directly_under_src() {
        let tmp = tempdir().expect("temp dir");
        bootstrap(tmp.path(), MARKER, "app").expect("bootstrap");

        assert!(fs::read_link(tmp.path().join(MARKER).join("src/app")).is_ok());
    }

    #[test]
    fn second_run_reports_existing_workspace() {
        let tmp = tempdir().expect("temp dir");
        bootstrap(tmp.path(), MARKER, "app").expect("first bootstrap");

        let nested = tmp.path().join("cmd/tool");
        fs::create_dir_all(&nested).expect("nested");
        let outcome = bootstrap(&nested, MARKER, "other").expect("second bootstrap");

        assert_eq!(
            outcome,
            BootstrapOutcome::AlreadyBootstrapped(Workspace::new(tmp.path().to_path_buf(), MARKER))
        );
        assert!(!nested.join(MARKER).exists());
    }

    #[test]
    fn invalid_import_path_writes_nothing() {
        let tmp = tempdir().expect("temp dir");
        let err = bootstrap(tmp.path(), MARKER, "a//b").expect_err("must fail");

        assert!(matches!(err, LauncherError::InvalidImportPath { .. }));
        assert!(!tmp.path().join(MARKER).exists());
    }
}
