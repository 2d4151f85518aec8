//! Deployment resolution
//!
//! Merges explicit parameters with Foggfile defaults, builds the
//! [`Deployment`] and runs the top-level parameter validation.

use crate::config::deployment::{Credential, Deployment, remove_rg_tag};
use crate::config::foggfile::{FOGGFILE_NAME, Foggfile};
use crate::config::json::PropertyMap;
use crate::config::presence::{ConfigValue, all_empty, is_blank};
use crate::config::validation::validate_parameters;
use crate::error::FoggError;
use crate::system::System;
use crate::utils::path::{absolutize, resolve_relative};
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Explicitly supplied deployment parameters, usually from the command line
#[derive(Debug, Clone, Default)]
pub struct ResolveParams {
    pub resource_group_name: Option<String>,
    pub location: Option<String>,
    pub subscription_name: Option<String>,
    pub subnet_addresses: PropertyMap,
    /// Relative to the current directory
    pub config_path: Option<String>,
    /// Relative to the current directory
    pub foggfile: Option<String>,
    pub subscription_credential: Option<Credential>,
    pub vm_credential: Option<Credential>,
    pub vnet_address: Option<String>,
    pub vnet_resource_group_name: Option<String>,
    pub vnet_name: Option<String>,
}

impl ResolveParams {
    /// Whether no parameter other than the Foggfile path was supplied
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        all_empty(&self.presence_values())
    }

    fn presence_values(&self) -> Vec<ConfigValue> {
        let credential = |c: Option<&Credential>| {
            c.map_or(ConfigValue::Absent, |c| ConfigValue::Other(c.username.clone()))
        };

        vec![
            ConfigValue::from(self.resource_group_name.as_deref()),
            ConfigValue::from(self.location.as_deref()),
            ConfigValue::from(self.subscription_name.as_deref()),
            ConfigValue::Sequence(
                self.subnet_addresses
                    .values()
                    .map(|cidr| ConfigValue::Text(cidr.clone()))
                    .collect(),
            ),
            ConfigValue::from(self.config_path.as_deref()),
            credential(self.subscription_credential.as_ref()),
            credential(self.vm_credential.as_ref()),
            ConfigValue::from(self.vnet_address.as_deref()),
            ConfigValue::from(self.vnet_resource_group_name.as_deref()),
            ConfigValue::from(self.vnet_name.as_deref()),
        ]
    }
}

/// Resolve a validated deployment from explicit parameters and Foggfile defaults
///
/// Explicit values always win; the Foggfile only fills fields left empty.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit Foggfile does not exist, or none is found when no parameters were given
/// - The Foggfile cannot be parsed, or its config path does not exist
/// - The merged parameters fail validation
#[inline]
pub fn resolve_deployment(system: &dyn System, mut params: ResolveParams) -> Result<Deployment> {
    let cwd = system
        .current_dir()
        .context("Failed to determine the current directory")?;

    let mut config_path = non_blank(params.config_path.take()).map(|p| absolutize(&cwd, &p));

    if let Some(foggfile_path) = locate_foggfile(system, &cwd, &params)? {
        info!("Using Foggfile: {}", foggfile_path.display());
        let foggfile = Foggfile::load(system, &foggfile_path)?;
        merge_foggfile(&mut params, &foggfile);

        if config_path.is_none()
            && let Some(relative) = non_blank(foggfile.config_path.clone())
        {
            let foggfile_dir = foggfile_path.parent().unwrap_or(cwd.as_path());
            let resolved = resolve_relative(system, foggfile_dir, &relative)
                .context("ConfigPath declared in the Foggfile does not exist")?;
            debug!("ConfigPath taken from Foggfile: {}", resolved.display());
            config_path = Some(resolved);
        }
    }

    let mut deployment = build_deployment(params, config_path);

    validate_parameters(system, &mut deployment)?;

    deployment.normalize_names();
    Ok(deployment)
}

/// Decide which Foggfile, if any, supplies defaults
fn locate_foggfile(
    system: &dyn System,
    cwd: &Path,
    params: &ResolveParams,
) -> Result<Option<PathBuf>> {
    if let Some(explicit) = params.foggfile.as_deref().filter(|p| !is_blank(Some(p))) {
        let path = absolutize(cwd, explicit);
        if !system.is_file(&path)? {
            return Err(FoggError::path_not_found(format!(
                "Foggfile does not exist: {}",
                path.display()
            ))
            .into());
        }
        return Ok(Some(path));
    }

    if !params.is_empty() {
        debug!("Parameters supplied explicitly, not looking for a Foggfile");
        return Ok(None);
    }

    let default = cwd.join(FOGGFILE_NAME);
    if system.is_file(&default)? {
        return Ok(Some(default));
    }

    Err(FoggError::config_discovery(format!(
        "No {FOGGFILE_NAME} found in {} and no parameters supplied",
        cwd.display()
    ))
    .into())
}

/// Fill every empty parameter from the Foggfile (except the config path)
fn merge_foggfile(params: &mut ResolveParams, foggfile: &Foggfile) {
    fill(
        &mut params.resource_group_name,
        foggfile.resource_group_name.as_ref(),
        "ResourceGroupName",
    );
    fill(&mut params.location, foggfile.location.as_ref(), "Location");
    fill(
        &mut params.subscription_name,
        foggfile.subscription_name.as_ref(),
        "SubscriptionName",
    );
    fill(&mut params.vnet_address, foggfile.vnet_address.as_ref(), "VNetAddress");
    fill(
        &mut params.vnet_resource_group_name,
        foggfile.vnet_resource_group_name.as_ref(),
        "VNetResourceGroupName",
    );
    fill(&mut params.vnet_name, foggfile.vnet_name.as_ref(), "VNetName");

    if params.subnet_addresses.is_empty() {
        let subnets = foggfile.subnet_map();
        if !subnets.is_empty() {
            debug!("SubnetAddresses taken from Foggfile");
            params.subnet_addresses = subnets;
        }
    }
}

fn fill(target: &mut Option<String>, fallback: Option<&String>, field: &str) {
    if is_blank(target.as_deref()) && !is_blank(fallback.map(String::as_str)) {
        debug!("{field} taken from Foggfile");
        *target = fallback.cloned();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .filter(|v| !is_blank(Some(v)))
        .map(|v| v.trim().to_owned())
}

/// Build the unvalidated deployment from merged parameters
fn build_deployment(params: ResolveParams, config_path: Option<PathBuf>) -> Deployment {
    let resource_group_name = non_blank(params.resource_group_name).unwrap_or_default();
    let short_resource_group_name = remove_rg_tag(&resource_group_name);

    let vnet_resource_group_name = non_blank(params.vnet_resource_group_name);
    let vnet_name = non_blank(params.vnet_name);
    let use_existing_vnet = vnet_resource_group_name.is_some() && vnet_name.is_some();

    let config_path = config_path.unwrap_or_default();
    let config_parent = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    Deployment {
        resource_group_name,
        short_resource_group_name,
        location: non_blank(params.location).unwrap_or_default(),
        subscription_name: non_blank(params.subscription_name).unwrap_or_default(),
        subscription_credential: params.subscription_credential,
        vm_credential: params.vm_credential,
        vnet_address: non_blank(params.vnet_address),
        vnet_resource_group_name,
        vnet_name,
        use_existing_vnet,
        subnet_addresses: params.subnet_addresses,
        config_path,
        config_parent,
        has_dsc_scripts: false,
        dsc_scripts: Default::default(),
        nsg_associations: Default::default(),
    }
}
