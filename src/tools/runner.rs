use std::ffi::OsString;

use tracing::debug;

use crate::config::{LauncherConfig, WorkspacePolicy};
use crate::error::LauncherError;
use crate::tools::delegate::{self, Delegator, Invocation};
use crate::tools::toolchain;
use crate::utils::host::HostContext;
use crate::workspace::{self, metadata};

/// Forward `args` to the configured toolchain inside the enclosing workspace.
///
/// The toolchain is resolved before anything else, so a missing executable
/// fails without touching the workspace or spawning a child.
pub fn run_toolchain(
    host: &HostContext,
    config: &LauncherConfig,
    args: &[OsString],
    delegator: &mut dyn Delegator,
) -> Result<i32, LauncherError> {
    let program = toolchain::resolve_toolchain(&config.toolchain, host)?;
    let invocation = prepare_invocation(host, config, Invocation::new(program, args.to_vec()))?;
    delegate::run(delegator, &invocation)
}

fn prepare_invocation(
    host: &HostContext,
    config: &LauncherConfig,
    invocation: Invocation,
) -> Result<Invocation, LauncherError> {
    let ws = match workspace::locate(&host.cwd, &config.marker) {
        Ok(ws) => ws,
        Err(LauncherError::WorkspaceNotFound { .. })
            if config.workspace == WorkspacePolicy::Optional =>
        {
            debug!("no workspace found; running toolchain with inherited environment");
            return Ok(invocation);
        }
        Err(err) => return Err(err),
    };

    let invocation = invocation.with_env(config.path_var.as_str(), ws.marker_dir());
    match metadata::read_metadata(&ws.metadata_path())? {
        Some(meta) => Ok(invocation.with_cwd(ws.project_dir(&meta))),
        None => Ok(invocation),
    }
}
