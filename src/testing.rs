//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::io;

use crate::tools::delegate::{ChildProcessOutcome, Delegator, Invocation};

/// Records every invocation and replays scripted outcomes in order. Once the
/// script is exhausted it keeps answering with the fallback exit code.
pub struct RecordingDelegator {
    pub calls: Vec<Invocation>,
    script: VecDeque<ChildProcessOutcome>,
    fallback: i32,
}

impl RecordingDelegator {
    pub fn exiting(code: i32) -> Self {
        Self {
            calls: Vec::new(),
            script: VecDeque::new(),
            fallback: code,
        }
    }

    pub fn failing(kind: io::ErrorKind) -> Self {
        let mut delegator = Self::exiting(0);
        delegator
            .script
            .push_back(ChildProcessOutcome::LaunchFailed(io::Error::from(kind)));
        delegator
    }
}

impl Delegator for RecordingDelegator {
    fn delegate(&mut self, invocation: &Invocation) -> ChildProcessOutcome {
        self.calls.push(invocation.clone());
        self.script
            .pop_front()
            .unwrap_or(ChildProcessOutcome::Exited(self.fallback))
    }
}

/// Write an executable `#!/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_toolchain(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fake toolchain");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake toolchain");
    path
}
