use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Too few or malformed arguments for the selected mode.
pub const EXIT_MISSING_ARGUMENTS: i32 = 2;
/// Workspace not found, or a filesystem/config/metadata failure around it.
pub const EXIT_WORKSPACE_PROBLEM: i32 = 3;
/// The toolchain was found but could not be spawned or waited on.
pub const EXIT_DELEGATE_LAUNCH_FAILED: i32 = 126;
/// The toolchain executable is not on the search path.
pub const EXIT_TOOLCHAIN_MISSING: i32 = 127;

/// Failure categories surfaced to the caller as exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ToolchainMissing,
    MissingArguments,
    WorkspaceProblem,
    DelegateLaunchFailed,
}

impl ErrorCategory {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCategory::ToolchainMissing => EXIT_TOOLCHAIN_MISSING,
            ErrorCategory::MissingArguments => EXIT_MISSING_ARGUMENTS,
            ErrorCategory::WorkspaceProblem => EXIT_WORKSPACE_PROBLEM,
            ErrorCategory::DelegateLaunchFailed => EXIT_DELEGATE_LAUNCH_FAILED,
        }
    }
}

/// Every launcher-level failure. A delegated command exiting non-zero is not
/// one of these; its status is passed through as-is.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("`{name}` is not installed or not on PATH")]
    ToolchainMissing {
        name: String,
        #[source]
        source: which::Error,
    },

    #[error("{0}")]
    MissingArguments(String),

    #[error("invalid import path `{import_path}`: {reason}")]
    InvalidImportPath { import_path: String, reason: String },

    #[error("no `{marker}` workspace found in {} or any parent directory; did you forget to run `gogo bootstrap`?", start.display())]
    WorkspaceNotFound { marker: String, start: PathBuf },

    #[error("{context}")]
    WorkspaceIo {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("decoding {} failed", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("metadata in {} does not match its import path `{import_path}`", path.display())]
    MetadataMismatch { path: PathBuf, import_path: String },

    #[error(transparent)]
    Config(#[from] anyhow::Error),

    #[error("failed to launch {}", program.display())]
    DelegateLaunchFailed {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LauncherError {
    pub(crate) fn workspace_io<S: Into<String>>(context: S, source: io::Error) -> Self {
        LauncherError::WorkspaceIo {
            context: context.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            LauncherError::ToolchainMissing { .. } => ErrorCategory::ToolchainMissing,
            LauncherError::MissingArguments(_) | LauncherError::InvalidImportPath { .. } => {
                ErrorCategory::MissingArguments
            }
            LauncherError::WorkspaceNotFound { .. }
            | LauncherError::WorkspaceIo { .. }
            | LauncherError::Metadata { .. }
            | LauncherError::MetadataMismatch { .. }
            | LauncherError::Config(_) => ErrorCategory::WorkspaceProblem,
            LauncherError::DelegateLaunchFailed { .. } => ErrorCategory::DelegateLaunchFailed,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }
}
