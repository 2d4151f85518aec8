//! Environment config file sections

use crate::error::FoggError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Contents of the environment config file named by `ConfigPath`
///
/// Only the sections this crate validates are modeled; other provisioning
/// fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[non_exhaustive]
pub struct EnvironmentConfig {
    #[serde(rename = "VMs", default)]
    pub vms: Vec<VmSection>,

    /// Default OS for every VM section that does not declare one
    #[serde(rename = "OS", default)]
    pub os: Option<OsSection>,

    #[serde(rename = "DSC", default)]
    pub dsc: Option<DscSection>,
}

/// One group of identical VMs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VmSection {
    pub tag: Option<String>,
    /// Raw JSON; the VM validator checks that it is a whole number
    pub count: Option<Value>,
    /// Number of VMs to leave switched off
    pub off: Option<Value>,
    /// Load balancer port, needed once there is more than one VM
    pub port: Option<Value>,
    pub os: Option<Value>,
    #[serde(default)]
    pub firewall: Option<FirewallSection>,
}

/// Firewall rules of a VM section, as `ADDRESS-PORT` strings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FirewallSection {
    #[serde(default)]
    pub inbound: Vec<String>,
    #[serde(default)]
    pub outbound: Vec<String>,
}

/// Desired state configuration scripts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DscSection {
    /// Subnet tag -> script path relative to the config file
    pub paths: Option<Value>,
}

/// Image and size of a VM
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OsSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub os_type: Option<String>,
}

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsType {
    Windows,
    Linux,
}

impl FromStr for OsType {
    type Err = FoggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "windows" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            _ => Err(FoggError::invalid_enum(format!(
                "OS type '{s}' is invalid. Must be 'windows' or 'linux'"
            ))),
        }
    }
}

impl OsSection {
    /// Parse an inline OS section from a VM's `os` value
    ///
    /// # Errors
    ///
    /// Returns a parse error if the value is not an OS object
    #[inline]
    pub fn from_value(tag: &str, value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| {
            FoggError::parse(format!("VM '{tag}': invalid OS section: {e}")).into()
        })
    }
}
