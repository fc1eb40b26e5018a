use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};

use crate::error::LauncherError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    Found(PathBuf),
    NotFound,
}

/// Walk from `start` towards the filesystem root and return the first
/// directory (deepest first, `start` included) that contains `marker` as a
/// directory.
///
/// A missing `marker` or one that is a regular file means "keep going". Any
/// other metadata error aborts the search so permission problems are never
/// reported as "not found".
pub fn search(start: &Path, marker: &str) -> Result<SearchResult, LauncherError> {
    let components: Vec<Component<'_>> = start.components().collect();

    for depth in (1..=components.len()).rev() {
        let candidate: PathBuf = components[..depth].iter().collect();
        let probe = candidate.join(marker);
        trace!(path = %probe.display(), "probing for workspace marker");

        match fs::metadata(&probe) {
            Ok(meta) if meta.is_dir() => {
                debug!(root = %candidate.display(), "found workspace");
                return Ok(SearchResult::Found(candidate));
            }
            Ok(_) => {
                debug!(path = %probe.display(), "marker exists but is not a directory; skipping");
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(LauncherError::workspace_io(
                    format!("could not inspect {}", probe.display()),
                    source,
                ));
            }
        }
    }

    Ok(SearchResult::NotFound)
}
