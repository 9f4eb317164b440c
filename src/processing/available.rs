//! Unused address enumeration.
//!
//! Walks a network in ascending order and yields every host address that is
//! not reserved and not already bound to a SIM.

use crate::models::{next_addr, Ipv4};
use std::collections::HashSet;
use std::iter::FusedIterator;
use std::net::Ipv4Addr;

/// Lazy iterator over the free host addresses of a network.
///
/// Single pass: call [`available_addresses`] again for another traversal.
/// Dropping it early is fine, nothing is computed ahead of the consumer.
#[derive(Debug, Clone)]
pub struct AvailableAddrs<'a> {
    network: Ipv4,
    network_addr: Ipv4Addr,
    broadcast_addr: Ipv4Addr,
    used: &'a HashSet<Ipv4Addr>,
    cursor: Option<Ipv4Addr>,
}

/// Enumerate the addresses of `network` that can be handed out.
///
/// Skips the network address, the broadcast address and every member of
/// `used`. The network is expected to be validated already.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use std::net::Ipv4Addr;
/// use mobile_connect::models::Ipv4;
/// use mobile_connect::processing::available_addresses;
///
/// let network = Ipv4::new("192.168.1.0/29").unwrap();
/// let used = HashSet::from([Ipv4Addr::new(192, 168, 1, 1)]);
/// let first = available_addresses(network, &used).next();
/// assert_eq!(first, Some(Ipv4Addr::new(192, 168, 1, 2)));
/// ```
pub fn available_addresses(network: Ipv4, used: &HashSet<Ipv4Addr>) -> AvailableAddrs<'_> {
    let network_addr = network.lo();
    AvailableAddrs {
        network,
        network_addr,
        broadcast_addr: network.hi(),
        used,
        cursor: Some(network_addr),
    }
}

impl Iterator for AvailableAddrs<'_> {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(addr) = self.cursor {
            if !self.network.contains(addr) {
                self.cursor = None;
                break;
            }
            self.cursor = next_addr(addr);

            if addr == self.network_addr || addr == self.broadcast_addr {
                continue;
            }
            if self.used.contains(&addr) {
                log::trace!("skip used address {addr}");
                continue;
            }
            return Some(addr);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Some(addr) if self.network.contains(addr) => {
                let remaining = u64::from(u32::from(self.broadcast_addr))
                    .saturating_sub(u64::from(u32::from(addr)));
                (0, usize::try_from(remaining).ok())
            }
            _ => (0, Some(0)),
        }
    }
}

impl FusedIterator for AvailableAddrs<'_> {}
