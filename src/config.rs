use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::utils::host::HostContext;

const CONFIG_CANDIDATES: &[(&str, ConfigFormat)] = &[
    ("gogo.yml", ConfigFormat::Yaml),
    ("gogo.yaml", ConfigFormat::Yaml),
    ("gogo.toml", ConfigFormat::Toml),
];

pub const DEFAULT_TOOLCHAIN: &str = "go";
pub const DEFAULT_MARKER: &str = ".gogo";
pub const DEFAULT_PATH_VAR: &str = "GOPATH";

#[derive(Debug, Clone)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

/// Whether delegation may proceed without an enclosing workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspacePolicy {
    #[default]
    Required,
    Optional,
}

impl FromStr for WorkspacePolicy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "required" => Ok(WorkspacePolicy::Required),
            "optional" => Ok(WorkspacePolicy::Optional),
            other => bail!("unknown workspace policy `{other}` (expected `required` or `optional`)"),
        }
    }
}

/// Fields accepted in `gogo.yml` / `gogo.toml`. All optional.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub toolchain: Option<String>,
    #[serde(default)]
    pub marker: Option<String>,
    #[serde(default)]
    pub path_var: Option<String>,
    #[serde(default)]
    pub workspace: Option<WorkspacePolicy>,
}

#[derive(Debug, Clone)]
pub struct LoadedProjectConfig {
    pub path: PathBuf,
    pub data: ProjectConfig,
}

/// Effective launcher settings after defaults, project file and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub toolchain: String,
    pub marker: String,
    pub path_var: String,
    pub workspace: WorkspacePolicy,
    pub source: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            toolchain: DEFAULT_TOOLCHAIN.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            path_var: DEFAULT_PATH_VAR.to_string(),
            workspace: WorkspacePolicy::Required,
            source: None,
        }
    }
}

impl LauncherConfig {
    fn apply_project(&mut self, loaded: LoadedProjectConfig) {
        let LoadedProjectConfig { path, data } = loaded;
        if let Some(toolchain) = data.toolchain {
            self.toolchain = toolchain;
        }
        if let Some(marker) = data.marker {
            self.marker = marker;
        }
        if let Some(path_var) = data.path_var {
            self.path_var = path_var;
        }
        if let Some(workspace) = data.workspace {
            self.workspace = workspace;
        }
        self.source = Some(path);
    }

    fn apply_env(&mut self, host: &HostContext) -> Result<()> {
        if let Some(toolchain) = env_override(host, "GOGO_TOOLCHAIN")? {
            self.toolchain = toolchain;
        }
        if let Some(marker) = env_override(host, "GOGO_MARKER")? {
            self.marker = marker;
        }
        if let Some(path_var) = env_override(host, "GOGO_PATH_VAR")? {
            self.path_var = path_var;
        }
        if let Some(policy) = env_override(host, "GOGO_WORKSPACE")? {
            self.workspace = policy
                .parse::<WorkspacePolicy>()
                .context("reading GOGO_WORKSPACE")?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.toolchain.trim().is_empty() {
            bail!("toolchain name must not be empty");
        }
        if self.path_var.trim().is_empty() || self.path_var.contains('=') {
            bail!("`{}` is not a valid environment variable name", self.path_var);
        }
        let mut components = Path::new(&self.marker).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => bail!(
                "workspace marker `{}` must be a single directory name",
                self.marker
            ),
        }
    }
}

/// Resolve the effective configuration for an invocation.
pub fn load_launcher_config(host: &HostContext) -> Result<LauncherConfig> {
    let mut config = LauncherConfig::default();
    if let Some(loaded) = load_project_config_from_dir(&host.cwd)? {
        debug!(path = %loaded.path.display(), "loaded project config");
        config.apply_project(loaded);
    }
    config.apply_env(host)?;
    config.validate()?;
    Ok(config)
}

/// The toolchain name that applies without a readable project file: the
/// `GOGO_TOOLCHAIN` override if usable, else the default.
pub fn fallback_toolchain(host: &HostContext) -> String {
    match env_override(host, "GOGO_TOOLCHAIN") {
        Ok(Some(toolchain)) => toolchain,
        _ => DEFAULT_TOOLCHAIN.to_string(),
    }
}

pub fn load_project_config_from_dir(base_dir: &Path) -> Result<Option<LoadedProjectConfig>> {
    for (file, format) in CONFIG_CANDIDATES {
        let path = base_dir.join(file);
        if !path.exists() {
            continue;
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading project config at {}", path.display()))?;
        let data = match format {
            ConfigFormat::Yaml => parse_yaml_str(&content)
                .with_context(|| format!("parsing YAML config at {}", path.display()))?,
            ConfigFormat::Toml => parse_toml_str(&content)
                .with_context(|| format!("parsing TOML config at {}", path.display()))?,
        };
        return Ok(Some(LoadedProjectConfig { path, data }));
    }
    Ok(None)
}

fn env_override(host: &HostContext, key: &str) -> Result<Option<String>> {
    let Some(raw) = host.var(key) else {
        return Ok(None);
    };
    let Some(value) = raw.to_str() else {
        bail!("{key} is not valid UTF-8");
    };
    let value = value.trim();
    if value.is_empty() {
        bail!("{key} is set but empty. Set it to a value or unset it.");
    }
    Ok(Some(value.to_string()))
}

pub(crate) fn parse_yaml_str(content: &str) -> Result<ProjectConfig> {
    Ok(serde_yaml::from_str(content)?)
}

pub(crate) fn parse_toml_str(content: &str) -> Result<ProjectConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_apply_without_file_or_env() {
        let tmp = tempdir().expect("temp dir");
        let config = load_launcher_config(&HostContext::new(tmp.path())).expect("config");
        assert_eq!(config, LauncherConfig::default());
        assert_eq!(config.toolchain, "go");
        assert_eq!(config.marker, ".gogo");
        assert_eq!(config.path_var, "GOPATH");
    }

    #[test]
    fn parses_yaml_project_file() {
        let tmp = tempdir().expect("temp dir");
        let yaml = r#"toolchain: go1.22
marker: .ws
workspace: optional
"#;
        fs::write(tmp.path().join("gogo.yml"), yaml).expect("write yaml");

        let config = load_launcher_config(&HostContext::new(tmp.path())).expect("config");
        assert_eq!(config.toolchain, "go1.22");
        assert_eq!(config.marker, ".ws");
        assert_eq!(config.path_var, "GOPATH");
        assert_eq!(config.workspace, WorkspacePolicy::Optional);
        assert_eq!(config.source, Some(tmp.path().join("gogo.yml")));
    }

    #[test]
    fn parses_toml_project_file() {
        let tmp = tempdir().expect("temp dir");
        let toml = r#"toolchain = "tinygo"
path_var = "TINYGOPATH"
"#;
        fs::write(tmp.path().join("gogo.toml"), toml).expect("write toml");

        let config = load_launcher_config(&HostContext::new(tmp.path())).expect("config");
        assert_eq!(config.toolchain, "tinygo");
        assert_eq!(config.path_var, "TINYGOPATH");
        assert_eq!(config.workspace, WorkspacePolicy::Required);
    }

    #[test]
    fn yaml_file_wins_over_toml_file() {
        let tmp = tempdir().expect("temp dir");
        fs::write(tmp.path().join("gogo.yml"), "toolchain: from-yaml\n").expect("write yaml");
        fs::write(tmp.path().join("gogo.toml"), "toolchain = \"from-toml\"\n").expect("write toml");

        let loaded = load_project_config_from_dir(tmp.path())
            .expect("load")
            .expect("config present");
        assert_eq!(loaded.data.toolchain.as_deref(), Some("from-yaml"));
    }

    #[test]
    fn environment_overrides_project_file() {
        let tmp = tempdir().expect("temp dir");
        fs::write(tmp.path().join("gogo.yml"), "toolchain: from-yaml\n").expect("write yaml");
        let host = HostContext::new(tmp.path())
            .with_var("GOGO_TOOLCHAIN", "from-env")
            .with_var("GOGO_WORKSPACE", "Optional");

        let config = load_launcher_config(&host).expect("config");
        assert_eq!(config.toolchain, "from-env");
        assert_eq!(config.workspace, WorkspacePolicy::Optional);
    }

    #[test]
    fn empty_environment_override_is_rejected() {
        let tmp = tempdir().expect("temp dir");
        let host = HostContext::new(tmp.path()).with_var("GOGO_MARKER", "  ");
        let err = load_launcher_config(&host).expect_err("must fail");
        assert!(err.to_string().contains("GOGO_MARKER"));
    }

    #[test]
    fn marker_with_separator_is_rejected() {
        let tmp = tempdir().expect("temp dir");
        let host = HostContext::new(tmp.path()).with_var("GOGO_MARKER", "a/b");
        let err = load_launcher_config(&host).expect_err("must fail");
        assert!(err.to_string().contains("single directory name"));

        let host = HostContext::new(tmp.path()).with_var("GOGO_MARKER", "..");
        assert!(load_launcher_config(&host).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = parse_yaml_str("toolchian: go\n").expect_err("typo must fail");
        assert!(err.to_string().contains("toolchian"));
    }

    #[test]
    fn fallback_toolchain_prefers_environment() {
        let host = HostContext::new("/work");
        assert_eq!(fallback_toolchain(&host), "go");

        let host = host.with_var("GOGO_TOOLCHAIN", "tinygo");
        assert_eq!(fallback_toolchain(&host), "tinygo");

        let host = HostContext::new("/work").with_var("GOGO_TOOLCHAIN", " ");
        assert_eq!(fallback_toolchain(&host), "go");
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = "sometimes".parse::<WorkspacePolicy>().expect_err("must fail");
        assert!(err.to_string().contains("sometimes"));
    }
}
