mod cli;
mod config;
mod error;
mod tools;
mod utils;
mod workspace;

#[cfg(test)]
mod testing;

use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics only ever go to stderr; stdout belongs to the toolchain.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env("GOGO_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    std::process::exit(cli::run(std::env::args_os()));
}
