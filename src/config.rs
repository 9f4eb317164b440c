//! Validated settings shared by both tools.

use crate::error::{Error, Result};
use crate::models::Ipv4;
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// Root of the zone scoped API endpoints.
pub const DEFAULT_API_ROOT: &str = "https://secure.sakura.ad.jp/cloud/zone";

/// Version path appended after the zone.
pub const API_VERSION_PATH: &str = "api/cloud/1.1";

/// SIM resources are only managed through this zone, whatever zone the gateway is in.
pub const SIM_ZONE: Zone = Zone::Is1a;

/// Deployment region of the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Tk1a,
    Tk1b,
    Is1a,
    Is1b,
}

impl Zone {
    /// Every zone the tools accept.
    pub const ALL: [Zone; 4] = [Zone::Tk1a, Zone::Tk1b, Zone::Is1a, Zone::Is1b];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Tk1a => "tk1a",
            Zone::Tk1b => "tk1b",
            Zone::Is1a => "is1a",
            Zone::Is1b => "is1b",
        }
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Zone> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.as_str() == s)
            .ok_or_else(|| Error::InvalidZone {
                zone: s.to_string(),
                valid: Zone::ALL.iter().join(", "),
            })
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API access token pair, sent as HTTP Basic authentication.
#[derive(Clone)]
pub struct Credentials {
    pub token: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token)
            .field("secret", &"***")
            .finish()
    }
}

/// Everything a tool needs to talk to one mobile gateway.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub zone: Zone,
    pub network: Ipv4,
    pub mgw_resource_id: String,
    pub api_root: String,
}

/// Check that `zone` is one of [`Zone::ALL`].
pub fn validate_zone(zone: &str) -> Result<Zone> {
    zone.parse()
}

/// Parse the CIDR block to search.
pub fn validate_cidr(cidr: &str) -> Result<Ipv4> {
    Ipv4::new(cidr)
}

/// Return the value of a required argument, treating blank as missing.
pub fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingArgument(name)),
    }
}
