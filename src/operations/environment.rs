//! Environment config validation
//!
//! Loads the config file a [`Deployment`] points at, validates its OS, VM and
//! DSC sections, and expands subnet placeholders in firewall rules.

use crate::config::deployment::Deployment;
use crate::config::environment::{EnvironmentConfig, FirewallSection, OsSection, OsType};
use crate::config::json::{PropertyMap, load_json, value_to_string};
use crate::config::placeholder::{Placeholder, parse_placeholder, port_component, split_rule};
use crate::config::presence::ConfigValue;
use crate::config::validation::{validate_dsc_paths, validate_os, validate_vms};
use crate::error::FoggError;
use crate::system::System;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

/// Tag used in messages about the global OS section
const GLOBAL_OS_TAG: &str = "global";

/// Validated environment, ready for provisioning
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct Environment {
    pub vms: Vec<VmPlan>,
}

/// One validated VM section with its effective settings
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct VmPlan {
    pub tag: String,
    pub count: i64,
    pub off: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub subnet: String,
    /// The section's own OS, or the global one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<OsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_type: Option<OsType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub firewall: Vec<FirewallRule>,
}

/// Traffic direction of a firewall rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A firewall rule with its address placeholder expanded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallRule {
    pub direction: Direction,
    pub address: String,
    pub port: String,
}

/// Load and parse an environment config file
///
/// # Errors
///
/// Returns a parse error if:
/// - The file cannot be read or is not valid JSON
/// - The sections do not have the expected shape
#[inline]
pub fn load_environment(system: &dyn System, path: &Path) -> Result<EnvironmentConfig> {
    let document = load_json(system, path)?;

    serde_json::from_value(document).map_err(|e| {
        FoggError::parse(format!(
            "Invalid environment config {}: {e}",
            path.display()
        ))
        .into()
    })
}

/// Validate the environment config of a deployment
///
/// Records the DSC script paths on `deployment`.
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be loaded
/// - The global OS section, a VM section or a VM's own OS section is invalid
/// - A DSC script does not exist
#[inline]
pub fn validate_environment(system: &dyn System, deployment: &mut Deployment) -> Result<Environment> {
    let config = load_environment(system, &deployment.config_path)?;
    let global_os = config.os.as_ref();

    validate_os(GLOBAL_OS_TAG, global_os)?;
    let vm_count = validate_vms(&config.vms, deployment, global_os)?;

    let mut own_os = Vec::with_capacity(vm_count);
    for vm in &config.vms {
        let tag = vm.tag.as_deref().unwrap_or_default();
        let os = match vm.os.as_ref() {
            Some(value) if !ConfigValue::from(value).is_empty() => {
                Some(OsSection::from_value(tag, value)?)
            }
            _ => None,
        };
        validate_os(tag, os.as_ref())?;
        own_os.push(os);
    }

    let dsc_paths = config.dsc.as_ref().and_then(|dsc| dsc.paths.as_ref());
    validate_dsc_paths(system, deployment, dsc_paths)?;

    let vms = config
        .vms
        .iter()
        .zip(own_os)
        .map(|(vm, os)| {
            let tag = vm.tag.clone().unwrap_or_default();
            let os = os.or_else(|| global_os.cloned());
            let os_type = os
                .as_ref()
                .and_then(|os| os.os_type.as_deref())
                .and_then(|t| t.parse::<OsType>().ok());
            let firewall = vm
                .firewall
                .as_ref()
                .map(|fw| expand_firewall(fw, &deployment.subnet_addresses, &tag))
                .unwrap_or_default();

            VmPlan {
                subnet: deployment
                    .subnet_addresses
                    .get(&tag)
                    .cloned()
                    .unwrap_or_default(),
                count: vm.count.as_ref().and_then(Value::as_i64).unwrap_or_default(),
                off: vm.off.as_ref().and_then(Value::as_i64).unwrap_or_default(),
                port: vm
                    .port
                    .as_ref()
                    .filter(|p| !ConfigValue::from(*p).is_empty())
                    .map(value_to_string),
                os,
                os_type,
                firewall,
                tag,
            }
        })
        .collect();

    info!("Validated {vm_count} VM section(s)");
    Ok(Environment { vms })
}

/// Expand every inbound and outbound rule of a VM section
fn expand_firewall(firewall: &FirewallSection, subnets: &PropertyMap, tag: &str) -> Vec<FirewallRule> {
    let inbound = firewall
        .inbound
        .iter()
        .map(|rule| expand_rule(rule, Direction::Inbound, subnets, tag));
    let outbound = firewall
        .outbound
        .iter()
        .map(|rule| expand_rule(rule, Direction::Outbound, subnets, tag));

    inbound.chain(outbound).collect()
}

/// Split a rule into address and port, resolving the address placeholder
fn expand_rule(rule: &str, direction: Direction, subnets: &PropertyMap, tag: &str) -> FirewallRule {
    let parts = split_rule(rule.trim());
    let raw_address = parts.first().copied().unwrap_or_default();

    let address = match parse_placeholder(raw_address, subnets, tag) {
        Placeholder::Resolved(cidr) => cidr,
        Placeholder::Unresolved => {
            warn!("VM '{tag}': leaving unresolved placeholder '{raw_address}'");
            raw_address.to_owned()
        }
        Placeholder::NoMatch => raw_address.to_owned(),
    };

    FirewallRule {
        direction,
        address,
        port: port_component(&parts).to_owned(),
    }
}
