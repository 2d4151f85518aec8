//! Foggfile loading and parsing

use crate::config::json::{PropertyMap, load_json, to_property_map};
use crate::config::schema::validate_against_schema;
use crate::error::FoggError;
use crate::system::System;
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Name of the Foggfile looked up in the working directory
pub const FOGGFILE_NAME: &str = "Foggfile";

/// Deployment defaults declared in a Foggfile
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[non_exhaustive]
pub struct Foggfile {
    pub resource_group_name: Option<String>,
    pub location: Option<String>,
    pub subscription_name: Option<String>,
    #[serde(rename = "VNetAddress")]
    pub vnet_address: Option<String>,
    #[serde(rename = "VNetResourceGroupName")]
    pub vnet_resource_group_name: Option<String>,
    #[serde(rename = "VNetName")]
    pub vnet_name: Option<String>,
    /// Relative to the Foggfile's own directory
    pub config_path: Option<String>,
    pub subnet_addresses: Option<Value>,
}

impl Foggfile {
    /// Load, schema-check and parse a Foggfile
    ///
    /// # Errors
    ///
    /// Returns a parse error if:
    /// - The file cannot be read or is not valid JSON
    /// - The document does not match the Foggfile schema
    #[inline]
    pub fn load(system: &dyn System, path: &Path) -> Result<Self> {
        let document = load_json(system, path)?;
        let origin = path.display().to_string();
        validate_against_schema(&document, &origin)?;

        serde_json::from_value(document).map_err(|e| {
            FoggError::parse(format!("Failed to parse Foggfile {origin}: {e}")).into()
        })
    }

    /// Subnet tag -> CIDR mapping declared in the file
    #[must_use]
    #[inline]
    pub fn subnet_map(&self) -> PropertyMap {
        to_property_map(self.subnet_addresses.as_ref())
    }
}
