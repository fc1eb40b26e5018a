use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;

/// Snapshot of the ambient process state the launcher depends on.
///
/// Components receive this explicitly instead of reading `std::env`, so the
/// locator, the config layer and toolchain resolution can be tested against
/// arbitrary directories and variables.
#[derive(Debug, Clone)]
pub struct HostContext {
    pub cwd: PathBuf,
    vars: HashMap<OsString, OsString>,
}

impl HostContext {
    pub fn capture() -> io::Result<Self> {
        Ok(Self {
            cwd: env::current_dir()?,
            vars: env::vars_os().collect(),
        })
    }

    #[cfg(test)]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            vars: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_var(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn var(&self, key: &str) -> Option<&OsStr> {
        if let Some(value) = self.vars.get(OsStr::new(key)) {
            return Some(value.as_os_str());
        }
        // Windows variable names are case-insensitive (`Path` vs `PATH`).
        if cfg!(windows) {
            return self
                .vars
                .iter()
                .find(|(name, _)| name.to_string_lossy().eq_ignore_ascii_case(key))
                .map(|(_, value)| value.as_os_str());
        }
        None
    }

    /// The command search path (`PATH`).
    pub fn search_path(&self) -> Option<&OsStr> {
        self.var("PATH")
    }
}
