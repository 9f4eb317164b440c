//! Domain models for the mobile gateway tools.
//!
//! - [`Ipv4`] - IPv4 network in CIDR notation
//! - [`SimRecord`] - SIM card to register
//! - API response payloads of the mobile gateway and SIM endpoints

mod ipv4;
mod sim;

// Re-export public types
pub use ipv4::{broadcast_addr, cut_addr, get_cidr_mask, next_addr, Ipv4, MAX_LENGTH};
pub use sim::{
    CommonServiceItem, FatalResponse, GatewaySim, IsOkResponse, SimCreateResponse,
    SimListResponse, SimRecord,
};
