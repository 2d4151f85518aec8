//! The resolved deployment descriptor handed to provisioning

use crate::config::json::PropertyMap;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static RG_TAG: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(r"(?i)-rg"));

/// Opaque credential handle; only the user name is carried
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credential {
    pub username: String,
}

impl Credential {
    /// Create a credential for a user name
    #[inline]
    pub fn new<S: Into<String>>(username: S) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// Normalized deployment configuration
///
/// Built once by the resolver, then refined in place by the validators
/// (subscription prompt, DSC script paths).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
pub struct Deployment {
    pub resource_group_name: String,
    pub short_resource_group_name: String,
    pub location: String,
    pub subscription_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_credential: Option<Credential>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_credential: Option<Credential>,
    #[serde(rename = "VNetAddress", skip_serializing_if = "Option::is_none")]
    pub vnet_address: Option<String>,
    #[serde(rename = "VNetResourceGroupName", skip_serializing_if = "Option::is_none")]
    pub vnet_resource_group_name: Option<String>,
    #[serde(rename = "VNetName", skip_serializing_if = "Option::is_none")]
    pub vnet_name: Option<String>,
    #[serde(rename = "UseExistingVNet")]
    pub use_existing_vnet: bool,
    pub subnet_addresses: PropertyMap,
    pub config_path: PathBuf,
    pub config_parent: PathBuf,
    #[serde(rename = "HasDscScripts")]
    pub has_dsc_scripts: bool,
    #[serde(rename = "DscScripts")]
    pub dsc_scripts: BTreeMap<String, PathBuf>,
    #[serde(rename = "NsgMap")]
    pub nsg_associations: BTreeMap<String, String>,
}

impl Deployment {
    /// Lower-case the resource group name and its short form
    #[inline]
    pub fn normalize_names(&mut self) {
        self.resource_group_name = self.resource_group_name.to_lowercase();
        self.short_resource_group_name = self.short_resource_group_name.to_lowercase();
    }
}

/// Remove every `-rg` (any case) from a resource group name
#[must_use]
#[inline]
pub fn remove_rg_tag(name: &str) -> String {
    match RG_TAG.as_ref() {
        Ok(pattern) => pattern.replace_all(name, "").into_owned(),
        Err(_) => name.to_owned(),
    }
}
