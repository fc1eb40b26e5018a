use std::ffi::{OsStr, OsString};

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;

use crate::config::{fallback_toolchain, load_launcher_config};
use crate::error::{EXIT_MISSING_ARGUMENTS, LauncherError};
use crate::tools::delegate::{Delegator, ProcessDelegator};
use crate::tools::{runner, toolchain};
use crate::utils::host::HostContext;
use crate::workspace::bootstrap::{BootstrapOutcome, bootstrap};

const EXAMPLES: &str = "\
Examples:
  gogo build app.go                       run `go build app.go` inside the workspace
  gogo bootstrap github.com/user/project  create the local GOPATH (run from the project root)
  gogo -C sub build                       any other argument is forwarded to the toolchain";

/// First arguments the launcher handles itself. Anything else, flags and
/// `--` included, is handed to the toolchain untouched.
const RESERVED: &[&str] = &["bootstrap", "-h", "--help", "-V", "--version"];

/// Root CLI for gogo
#[derive(Parser, Debug)]
#[command(name = "gogo", version)]
#[command(about = "Run the Go toolchain inside a project-local GOPATH workspace")]
#[command(disable_help_subcommand = true, after_help = EXAMPLES)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Create the workspace for the project in the current directory
    Bootstrap {
        /// Import path of the project, e.g. `github.com/user/project`
        import_path: String,
    },
    /// Forwarded verbatim to the toolchain
    #[command(external_subcommand)]
    Toolchain(Vec<OsString>),
}

impl Cli {
    /// Parse `argv`, bypassing clap unless the first argument is reserved.
    pub fn parse_launcher_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        match args.get(1) {
            Some(first) if !RESERVED.iter().any(|word| first.as_os_str() == OsStr::new(word)) => {
                Ok(Self {
                    command: Some(Commands::Toolchain(args[1..].to_vec())),
                })
            }
            _ => Self::try_parse_from(args),
        }
    }
}

/// Parse, dispatch and turn the result into a process exit code.
pub fn run<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = match Cli::parse_launcher_args(args) {
        Ok(cli) => cli,
        Err(err) => return report_clap_error(err),
    };

    let host = match HostContext::capture() {
        Ok(host) => host,
        Err(source) => {
            return report(LauncherError::workspace_io(
                "could not get working directory",
                source,
            ));
        }
    };

    match dispatch(cli, &host, &mut ProcessDelegator) {
        Ok(code) => code,
        Err(err) => report(err),
    }
}

pub fn dispatch(
    cli: Cli,
    host: &HostContext,
    delegator: &mut dyn Delegator,
) -> Result<i32, LauncherError> {
    let Some(command) = cli.command else {
        return Err(LauncherError::MissingArguments(
            "no toolchain command given".to_string(),
        ));
    };

    let config = match load_launcher_config(host) {
        Ok(config) => config,
        Err(err) => {
            // A missing toolchain outranks a broken project file.
            if matches!(command, Commands::Toolchain(_)) {
                toolchain::resolve_toolchain(&fallback_toolchain(host), host)?;
            }
            return Err(err.into());
        }
    };
    debug!(
        toolchain = %config.toolchain,
        marker = %config.marker,
        source = ?config.source,
        "effective configuration"
    );

    match command {
        Commands::Bootstrap { import_path } => {
            match bootstrap(&host.cwd, &config.marker, &import_path)? {
                BootstrapOutcome::Created(ws) => {
                    println!("Bootstrapped workspace in {:?}", ws.marker_dir());
                }
                BootstrapOutcome::AlreadyBootstrapped(ws) => {
                    println!("project is already bootstrapped in {:?}", ws.root());
                }
            }
            Ok(0)
        }
        Commands::Toolchain(args) => runner::run_toolchain(host, &config, &args, delegator),
    }
}

fn report(err: LauncherError) -> i32 {
    let code = err.exit_code();
    let missing_args = matches!(err, LauncherError::MissingArguments(_));
    eprintln!("error: {:#}", anyhow::Error::from(err));
    if missing_args {
        eprintln!("\n{}", Cli::command().render_help());
    }
    code
}

fn report_clap_error(err: clap::Error) -> i32 {
    // Help and version go to stdout; everything else is a usage error.
    if let Err(e) = err.print() {
        eprintln!("error: could not print usage: {e}");
    }
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_MISSING_ARGUMENTS,
    }
}
