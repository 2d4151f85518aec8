//! # `Fogg`
//!
//! `fogg` validates the configuration of a Foggfile deployment before any
//! cloud resource is touched. Parameters given on the command line take
//! precedence over the defaults in a Foggfile; the environment config the
//! Foggfile points at is checked section by section.
//!
//! ## Usage
//!
//! **With a Foggfile in the current directory:**
//! ```sh
//! fogg
//! ```
//!
//! **Overriding Foggfile values:**
//! ```sh
//! fogg --foggfile ./deploy/Foggfile --location westus --subnet-address web=10.0.1.0/24
//! ```
//!
//! The resolved deployment plan is printed as JSON on stdout.

use anyhow::Result;
use clap::Parser as _;
use fogg::cli::Args;
use fogg::error::FoggError;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing subscriber based on verbose flag
    let log_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so stdout only carries the plan
    fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match fogg::run(&args) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<FoggError>()
                    .map_or(1, FoggError::exit_code),
            );
        }
    }
}
