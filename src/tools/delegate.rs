use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::error::LauncherError;
use crate::utils::display::quote_for_display;

/// A single toolchain run: program, arguments and the environment tweaks
/// layered over the inherited process state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[cfg(test)]
    pub fn env_var(&self, key: &str) -> Option<&std::ffi::OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_os_str())
    }

    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(quote_for_display(self.program.as_os_str()));
        for arg in &self.args {
            parts.push(quote_for_display(arg));
        }
        parts.join(" ")
    }
}

#[derive(Debug)]
pub enum ChildProcessOutcome {
    Exited(i32),
    LaunchFailed(io::Error),
}

/// Capability to run an external command with pass-through stdio.
pub trait Delegator {
    fn delegate(&mut self, invocation: &Invocation) -> ChildProcessOutcome;
}

/// Spawns a real child process and blocks until it exits.
#[derive(Debug, Default)]
pub struct ProcessDelegator;

impl Delegator for ProcessDelegator {
    fn delegate(&mut self, invocation: &Invocation) -> ChildProcessOutcome {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }
        cmd.envs(invocation.env.iter().map(|(key, value)| (key, value)));

        match cmd.status() {
            Ok(status) => ChildProcessOutcome::Exited(exit_code(status)),
            Err(err) => ChildProcessOutcome::LaunchFailed(err),
        }
    }
}

/// Exit status as the shell would report it: the exit code, or `128 + n`
/// for a child killed by signal `n`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Run `invocation` exactly once and return the code the launcher should
/// exit with.
pub fn run(delegator: &mut dyn Delegator, invocation: &Invocation) -> Result<i32, LauncherError> {
    debug!(command = %invocation.render(), cwd = ?invocation.cwd, "delegating");
    match delegator.delegate(invocation) {
        ChildProcessOutcome::Exited(code) => {
            debug!(code, "toolchain exited");
            Ok(code)
        }
        ChildProcessOutcome::LaunchFailed(source) => Err(LauncherError::DelegateLaunchFailed {
            program: invocation.program.clone(),
            source,
        }),
    }
}
