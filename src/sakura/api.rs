//! Operations the tools need from the cloud API.

use crate::error::Result;
use crate::models::SimRecord;
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// SIM and mobile gateway operations.
///
/// [`super::SakuraClient`] is the HTTP implementation; tests use in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait SimApi {
    /// Addresses already assigned to SIMs attached to the mobile gateway.
    async fn used_addresses(&self) -> Result<HashSet<Ipv4Addr>>;

    /// Create the SIM resource and return its id, `None` if it already exists.
    async fn create_sim(&self, sim: &SimRecord) -> Result<Option<String>>;

    /// Attach a SIM resource to the mobile gateway.
    async fn attach_sim(&self, sim_id: &str) -> Result<()>;

    /// Assign a fixed address to a SIM resource.
    async fn assign_ip(&self, sim_id: &str, ip: Ipv4Addr) -> Result<()>;
}
