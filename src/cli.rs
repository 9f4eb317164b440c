//! Command line arguments of the two tools.
//!
//! Arguments are optional at the clap level and checked by
//! [`CommonArgs::settings`], so a missing value produces the same error
//! whether it was left out on the command line or in the environment.

use crate::config::{self, Settings, DEFAULT_API_ROOT};
use crate::error::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Flags shared by both tools.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Cloud API access token
    #[arg(long, env = "SAKURACLOUD_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Cloud API access token secret
    #[arg(long, env = "SAKURACLOUD_ACCESS_TOKEN_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Zone of the mobile gateway (tk1a, tk1b, is1a, is1b)
    #[arg(long, env = "SAKURACLOUD_ZONE")]
    pub zone: Option<String>,

    /// CIDR block to search for free addresses, e.g. 192.168.0.0/24
    #[arg(long)]
    pub cidr: Option<String>,

    /// Resource id of the mobile gateway
    #[arg(long = "mgw-resource-id")]
    pub mgw_resource_id: Option<String>,

    /// API root, only changed to test against a stub server
    #[arg(long, env = "SAKURACLOUD_API_ROOT", default_value = DEFAULT_API_ROOT, hide = true)]
    pub api_root: String,

    /// Increase log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl CommonArgs {
    /// Validate the shared flags before any network call is made.
    pub fn settings(&self) -> Result<Settings> {
        let mgw_resource_id = config::required(self.mgw_resource_id.as_deref(), "mgw-resource-id")?;
        let token = config::required(self.token.as_deref(), "token")?;
        let secret = config::required(self.secret.as_deref(), "secret")?;
        let zone = config::validate_zone(config::required(self.zone.as_deref(), "zone")?)?;
        let network = config::validate_cidr(config::required(self.cidr.as_deref(), "cidr")?)?;

        Ok(Settings {
            credentials: config::Credentials {
                token: token.to_string(),
                secret: secret.to_string(),
            },
            zone,
            network,
            mgw_resource_id: mgw_resource_id.to_string(),
            api_root: self.api_root.trim_end_matches('/').to_string(),
        })
    }
}

/// List the unused IP addresses of a CIDR block on a mobile gateway
#[derive(Parser, Debug)]
#[command(name = "get-unused-ip", version, about, long_about = None)]
pub struct UnusedIpArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Register SIMs from a CSV file and assign them free IP addresses
#[derive(Parser, Debug)]
#[command(name = "register-sim", version, about, long_about = None)]
pub struct RegisterSimArgs {
    /// CSV file with one ICCID,passcode pair per line and no header
    #[arg(long)]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl RegisterSimArgs {
    /// Validate the CSV path and the shared flags.
    pub fn settings(&self) -> Result<(PathBuf, Settings)> {
        let csv = self
            .csv
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or(crate::Error::MissingArgument("csv"))?;
        Ok((csv.clone(), self.common.settings()?))
    }
}
