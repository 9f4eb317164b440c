//! IPv4 network utilities.
//!
//! Provides the [`Ipv4`] network value (address plus prefix length) and the
//! bit helpers the address enumerator is built on.

use crate::error::{Error, Result};
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// Lengths above [`MAX_LENGTH`] are treated as 32.
///
/// # Examples
/// ```
/// use mobile_connect::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24), 0xFFFFFF00);
/// assert_eq!(get_cidr_mask(0), 0);
/// ```
pub fn get_cidr_mask(len: u8) -> u32 {
    let right_len = u32::from(MAX_LENGTH.saturating_sub(len));
    u32::MAX.checked_shl(right_len).unwrap_or(0)
}

/// Get the network address (all host bits zero) for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) & get_cidr_mask(len))
}

/// Calculate the broadcast address (all host bits one) for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Ipv4Addr {
    let mask = get_cidr_mask(len);
    let network_bits = u32::from(addr) & mask;
    Ipv4Addr::from(network_bits | !mask)
}

/// Big-endian byte-wise increment of an address.
///
/// The last octet is incremented and a wrap from 255 to 0 carries into the
/// next more significant octet. Returns `None` once the carry runs off the
/// most significant octet, i.e. after `255.255.255.255`.
pub fn next_addr(addr: Ipv4Addr) -> Option<Ipv4Addr> {
    let mut octets = addr.octets();
    for octet in octets.iter_mut().rev() {
        *octet = octet.wrapping_add(1);
        if *octet != 0 {
            return Some(Ipv4Addr::from(octets));
        }
    }
    None
}

/// IPv4 network in CIDR notation.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address as given, host bits may be set.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4> {
        let invalid = |reason: String| Error::InvalidCidr {
            cidr: addr_cidr.to_string(),
            reason,
        };

        let (addr, mask) = addr_cidr
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid("expected <address>/<prefix length>".to_string()))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| invalid(format!("invalid address {addr}")))?;
        // u8::from_str takes a leading '+', a prefix length is digits only
        let mask: u8 = Some(mask)
            .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|m| m.parse().ok())
            .ok_or_else(|| invalid(format!("invalid prefix length {mask}")))?;
        if mask > MAX_LENGTH {
            return Err(invalid(format!("prefix length {mask} is longer than 32")));
        }
        Ok(Ipv4 { addr, mask })
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        cut_addr(self.addr, self.mask)
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask)
    }

    /// Check if an IP address is contained within this subnet.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        cut_addr(ip, self.mask) == self.lo()
    }

    /// Number of addresses strictly between the network and broadcast address.
    pub fn host_count(&self) -> u64 {
        (1u64 << MAX_LENGTH.saturating_sub(self.mask)).saturating_sub(2)
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
