//! Section validators
//!
//! Every validator stops at the first violation it finds.

use crate::config::deployment::Deployment;
use crate::config::environment::{OsSection, OsType, VmSection};
use crate::config::json::to_property_map;
use crate::config::presence::{ConfigValue, is_blank};
use crate::error::FoggError;
use crate::system::System;
use crate::utils::path::find_file;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Prompt shown when no subscription name was given anywhere
pub const SUBSCRIPTION_PROMPT: &str = "Azure subscription name";

/// Validate the VM sections of an environment config
///
/// Returns the number of VM sections.
///
/// # Errors
///
/// Returns an error if:
/// - There are no VM sections
/// - A section has no tag, or its tag has no subnet address
/// - A count is missing or not a positive whole number
/// - An off-count is not a whole number in `1..=count`
/// - A load-balanced section (count > 1) has no port
/// - A section has no OS and there is no global OS section
/// - A section's OS is not an object
#[inline]
pub fn validate_vms(
    vms: &[VmSection],
    deployment: &Deployment,
    global_os: Option<&OsSection>,
) -> Result<usize> {
    if vms.is_empty() {
        return Err(FoggError::missing_field("No VM sections have been supplied").into());
    }

    for (index, vm) in vms.iter().enumerate() {
        validate_vm(vm, index, deployment, global_os)?;
    }

    Ok(vms.len())
}

/// Validate a single VM section
fn validate_vm(
    vm: &VmSection,
    index: usize,
    deployment: &Deployment,
    global_os: Option<&OsSection>,
) -> Result<()> {
    let tag = match vm.tag.as_deref() {
        Some(tag) if !is_blank(Some(tag)) => tag,
        _ => {
            return Err(FoggError::missing_field(format!(
                "VM section #{} has no tag",
                index + 1
            ))
            .into());
        }
    };

    if !deployment.subnet_addresses.contains_key(tag) {
        return Err(FoggError::referential_integrity(format!(
            "No subnet address has been supplied for VM tag '{tag}'"
        ))
        .into());
    }

    let Some(count) = integer_field(tag, "count", vm.count.as_ref())? else {
        return Err(FoggError::missing_field(format!("VM '{tag}': count is required")).into());
    };

    if count <= 0 {
        return Err(FoggError::range(format!(
            "VM '{tag}': count must be greater than 0, got {count}"
        ))
        .into());
    }

    if let Some(off) = integer_field(tag, "off-count", vm.off.as_ref())?
        && (off <= 0 || off > count)
    {
        return Err(FoggError::range(format!(
            "VM '{tag}': off-count must be between 1 and the VM count ({count}), got {off}"
        ))
        .into());
    }

    if count > 1 && ConfigValue::from(vm.port.as_ref()).is_empty() {
        return Err(FoggError::missing_field(format!(
            "VM '{tag}': a port is required when count is greater than 1 (load balanced)"
        ))
        .into());
    }

    if global_os.is_none() && ConfigValue::from(vm.os.as_ref()).is_empty() {
        return Err(FoggError::missing_field(format!(
            "VM '{tag}': no OS section supplied and no global OS section exists"
        ))
        .into());
    }

    if let Some(os) = vm.os.as_ref()
        && !ConfigValue::from(os).is_empty()
        && !os.is_object()
    {
        return Err(FoggError::invalid_enum(format!(
            "VM '{tag}': os must be an OS section object, got {os}"
        ))
        .into());
    }

    debug!("VM section '{tag}' is valid");
    Ok(())
}

/// Whole-number value of a VM field; absent and `null` are `None`
fn integer_field(tag: &str, field: &str, value: Option<&Value>) -> Result<Option<i64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or_else(|| {
            FoggError::range(format!(
                "VM '{tag}': {field} must be a whole number, got {value}"
            ))
            .into()
        }),
    }
}

/// Validate an OS section; a missing section is accepted
///
/// # Errors
///
/// Returns an error if:
/// - Size, publisher, offer, sku or type is missing
/// - The type is not `windows` or `linux`
#[inline]
pub fn validate_os(tag: &str, os: Option<&OsSection>) -> Result<()> {
    let Some(os) = os else {
        return Ok(());
    };

    let required = [
        ("size", os.size.as_deref()),
        ("publisher", os.publisher.as_deref()),
        ("offer", os.offer.as_deref()),
        ("sku", os.sku.as_deref()),
        ("type", os.os_type.as_deref()),
    ];

    for (field, value) in required {
        if is_blank(value) {
            return Err(FoggError::missing_field(format!(
                "{tag}: OS {field} is required"
            ))
            .into());
        }
    }

    if let Some(os_type) = os.os_type.as_deref()
        && os_type.parse::<OsType>().is_err()
    {
        return Err(FoggError::invalid_enum(format!(
            "{tag}: OS type '{os_type}' is invalid. Must be 'windows' or 'linux'"
        ))
        .into());
    }

    Ok(())
}

/// Resolve DSC script paths against the config file's directory
///
/// Sets the deployment's DSC flag and replaces its DSC map with absolute
/// script paths. A missing or empty `paths` object means no DSC scripts.
///
/// # Errors
///
/// Returns an error if:
/// - A script path does not exist
#[inline]
pub fn validate_dsc_paths(
    system: &dyn System,
    deployment: &mut Deployment,
    paths: Option<&Value>,
) -> Result<()> {
    if ConfigValue::from(paths).is_empty() {
        deployment.has_dsc_scripts = false;
        return Ok(());
    }

    deployment.has_dsc_scripts = true;

    let mut scripts = BTreeMap::new();
    for (tag, relative) in to_property_map(paths) {
        let absolute = find_file(system, &deployment.config_parent, &relative)?
            .ok_or_else(|| {
                FoggError::path_not_found(format!(
                    "DSC script for '{tag}' does not exist: {relative}"
                ))
            })?;
        debug!("DSC script for '{tag}': {}", absolute.display());
        scripts.insert(tag, absolute);
    }

    deployment.dsc_scripts = scripts;
    Ok(())
}

/// Validate the top-level deployment parameters
///
/// Prompts for the subscription name when none was supplied.
///
/// # Errors
///
/// Returns an error if:
/// - The resource group name or location is missing
/// - The VNet address is missing and no existing VNet is referenced
/// - There are no subnet addresses
/// - The config path is missing or does not exist
/// - The prompt fails or returns a blank subscription name
#[inline]
pub fn validate_parameters(system: &dyn System, deployment: &mut Deployment) -> Result<()> {
    if is_blank(Some(&deployment.resource_group_name)) {
        return Err(FoggError::missing_field("No resource group name supplied").into());
    }

    if is_blank(Some(&deployment.location)) {
        return Err(FoggError::missing_field("No location supplied").into());
    }

    if !deployment.use_existing_vnet && is_blank(deployment.vnet_address.as_deref()) {
        return Err(FoggError::missing_field(
            "No VNet address supplied and no existing VNet referenced",
        )
        .into());
    }

    if deployment.subnet_addresses.is_empty() {
        return Err(FoggError::missing_field("No subnet addresses supplied").into());
    }

    if deployment.config_path.as_os_str().is_empty() {
        return Err(FoggError::missing_field("No config path supplied").into());
    }

    let config_exists = system.is_file(&deployment.config_path).with_context(|| {
        format!(
            "Failed to check config path: {}",
            deployment.config_path.display()
        )
    })?;
    if !config_exists {
        return Err(FoggError::path_not_found(format!(
            "Config path does not exist: {}",
            deployment.config_path.display()
        ))
        .into());
    }

    if is_blank(Some(&deployment.subscription_name)) {
        warn!("No subscription name supplied");
        let answer = system
            .prompt(SUBSCRIPTION_PROMPT)
            .context("Failed to prompt for subscription name")?;
        if is_blank(Some(&answer)) {
            return Err(FoggError::missing_field("No subscription name supplied").into());
        }
        deployment.subscription_name = answer.trim().to_owned();
        info!("Using subscription '{}'", deployment.subscription_name);
    }

    Ok(())
}
