use crate::config::deployment::Credential;
use crate::config::json::PropertyMap;
use crate::operations::resolve::ResolveParams;
use clap::Parser;

/// Command-line arguments for fogg
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "fogg")]
#[command(about = "Validates and resolves Foggfile deployment configuration")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Resource group to deploy into
    #[arg(short = 'g', long, value_name = "NAME")]
    pub resource_group_name: Option<String>,

    /// Azure location, e.g. westeurope
    #[arg(short, long, value_name = "LOCATION")]
    pub location: Option<String>,

    /// Subscription name (prompted for when not supplied anywhere)
    #[arg(short, long, value_name = "NAME")]
    pub subscription_name: Option<String>,

    /// Subnet address in TAG=CIDR format (can be specified multiple times)
    #[arg(long = "subnet-address", value_name = "TAG=CIDR")]
    pub subnet_addresses: Vec<String>,

    /// Environment config file path
    #[arg(short, long, value_name = "PATH")]
    pub config_path: Option<String>,

    /// Foggfile path (defaults to ./Foggfile when no other parameter is given)
    #[arg(short, long, value_name = "PATH")]
    pub foggfile: Option<String>,

    /// User name for the subscription login
    #[arg(long, value_name = "USER")]
    pub subscription_user: Option<String>,

    /// Administrator user name for the VMs
    #[arg(long, value_name = "USER")]
    pub vm_user: Option<String>,

    /// Address space of the VNet to create
    #[arg(long, value_name = "CIDR")]
    pub vnet_address: Option<String>,

    /// Resource group of an existing VNet
    #[arg(long, value_name = "NAME")]
    pub vnet_resource_group_name: Option<String>,

    /// Name of an existing VNet
    #[arg(long, value_name = "NAME")]
    pub vnet_name: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Convert the arguments into resolver parameters
    pub fn to_params(&self) -> anyhow::Result<ResolveParams> {
        Ok(ResolveParams {
            resource_group_name: self.resource_group_name.clone(),
            location: self.location.clone(),
            subscription_name: self.subscription_name.clone(),
            subnet_addresses: parse_subnet_args(&self.subnet_addresses)?,
            config_path: self.config_path.clone(),
            foggfile: self.foggfile.clone(),
            subscription_credential: self.subscription_user.as_deref().map(Credential::new),
            vm_credential: self.vm_user.as_deref().map(Credential::new),
            vnet_address: self.vnet_address.clone(),
            vnet_resource_group_name: self.vnet_resource_group_name.clone(),
            vnet_name: self.vnet_name.clone(),
        })
    }
}

/// Parse `--subnet-address` arguments into a tag -> CIDR map
fn parse_subnet_args(subnet_args: &[String]) -> anyhow::Result<PropertyMap> {
    let mut result = PropertyMap::new();

    for arg in subnet_args {
        let (tag, cidr) = parse_key_value(arg)?;
        if tag.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "Invalid subnet address '{arg}'. The tag cannot be empty"
            ));
        }
        if result.insert(tag.trim().to_owned(), cidr.trim().to_owned()).is_some() {
            return Err(anyhow::anyhow!(
                "Subnet tag '{}' was given more than once",
                tag.trim()
            ));
        }
    }

    Ok(result)
}

/// Parse KEY=VALUE string
fn parse_key_value(arg: &str) -> anyhow::Result<(String, String)> {
    match arg.split_once('=') {
        Some((key, value)) => Ok((key.to_owned(), value.to_owned())),
        None => Err(anyhow::anyhow!(
            "Invalid subnet address format '{arg}'. Expected TAG=CIDR"
        )),
    }
}
