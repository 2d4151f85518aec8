//! `Fogg` - configuration resolution for Foggfile deployments
//!
//! This library merges command-line parameters with Foggfile defaults,
//! validates the environment config's VM, OS and DSC sections, and expands
//! `@{subnet|tag}` placeholders, producing the deployment plan that the
//! provisioning stage consumes.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::{Context as _, Result};
use cli::Args;
use config::Deployment;
use operations::environment::{Environment, validate_environment};
use operations::resolve::resolve_deployment;
use serde::Serialize;
use system::{RealSystem, System};
use tracing::info;

/// Resolved deployment together with its validated environment
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct DeploymentPlan {
    pub deployment: Deployment,
    pub environment: Environment,
}

/// Resolve and validate everything needed to provision a deployment
///
/// # Errors
///
/// Returns an error if:
/// - The parameters cannot be resolved into a valid deployment
/// - The environment config is invalid
#[inline]
pub fn plan(args: &Args, system: &dyn System) -> Result<DeploymentPlan> {
    let params = args.to_params()?;
    let mut deployment = resolve_deployment(system, params)?;
    let environment = validate_environment(system, &mut deployment)?;

    info!(
        "Deployment '{}' in {} is valid",
        deployment.resource_group_name, deployment.location
    );

    Ok(DeploymentPlan {
        deployment,
        environment,
    })
}

/// Main entry point for the fogg library
pub fn run(args: &Args) -> Result<()> {
    let system = RealSystem;
    let plan = plan(args, &system)?;

    let output =
        serde_json::to_string_pretty(&plan).context("Failed to serialize deployment plan")?;

    // Output to stdout (not using logging)
    println!("{output}");

    Ok(())
}
