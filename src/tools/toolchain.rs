use std::path::PathBuf;

use tracing::debug;

use crate::error::LauncherError;
use crate::utils::host::HostContext;

/// Resolve the toolchain executable against the host's `PATH`, first match
/// wins. Names containing a separator are resolved relative to `host.cwd`.
pub fn resolve_toolchain(name: &str, host: &HostContext) -> Result<PathBuf, LauncherError> {
    let resolved = which::which_in(name, host.search_path(), &host.cwd).map_err(|source| {
        LauncherError::ToolchainMissing {
            name: name.to_string(),
            source,
        }
    })?;
    debug!(toolchain = %resolved.display(), "resolved toolchain");
    Ok(resolved)
}
