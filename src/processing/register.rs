//! Bulk SIM registration.
//!
//! Each SIM is created, attached to the mobile gateway and given the next
//! free address, strictly one request at a time. The first failure stops the
//! run. Nothing is rolled back: a SIM created but not attached, or attached
//! but without an address, stays that way.

use crate::error::{Error, Result};
use crate::models::SimRecord;
use crate::output::Progress;
use crate::sakura::SimApi;
use std::io::Write;
use std::net::Ipv4Addr;

/// What a successful run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    /// ICCID and assigned address of every newly registered SIM, in order.
    pub registered: Vec<(String, Ipv4Addr)>,
    /// ICCIDs that already existed and were left alone.
    pub skipped: Vec<String>,
}

/// Register `sims` in order, handing out `addrs` in order.
///
/// Fails with [`Error::InsufficientAddresses`] before any API call when there
/// are fewer addresses than SIMs. A SIM that already exists is skipped and
/// does not use up an address.
pub async fn register_sims<A: SimApi, W: Write>(
    api: &A,
    sims: &[SimRecord],
    addrs: &[Ipv4Addr],
    progress: &mut Progress<W>,
) -> Result<RegisterSummary> {
    if sims.len() > addrs.len() {
        return Err(Error::InsufficientAddresses {
            sims: sims.len(),
            addresses: addrs.len(),
        });
    }

    let mut summary = RegisterSummary::default();
    let mut free = addrs.iter().copied();

    for sim in sims {
        progress.step(format_args!("SIM registration (ICCID: {})", sim.iccid));
        let sim_id = match mark(progress, api.create_sim(sim).await)? {
            Some(sim_id) => {
                progress.ok();
                sim_id
            }
            None => {
                progress.skip();
                log::info!("SIM {} is already registered, skipped", sim.iccid);
                summary.skipped.push(sim.iccid.clone());
                continue;
            }
        };
        log::debug!("SIM {} created as {sim_id}", sim.iccid);

        progress.step(", attach to mobile gateway");
        mark(progress, api.attach_sim(&sim_id).await)?;
        progress.ok();

        // Skipped SIMs do not consume an address, so the cursor never passes the SIM count.
        let ip = free.next().ok_or_else(|| Error::InsufficientAddresses {
            sims: sims.len(),
            addresses: addrs.len(),
        })?;
        progress.step(format_args!(", assign IP address ({ip})"));
        mark(progress, api.assign_ip(&sim_id, ip).await)?;
        progress.ok_line();

        log::info!("SIM {} ({sim_id}) registered with {ip}", sim.iccid);
        summary.registered.push((sim.iccid.clone(), ip));
    }

    Ok(summary)
}

/// Print `[FAILED]` for an error and pass the result through.
fn mark<T, W: Write>(progress: &mut Progress<W>, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        progress.failed();
        log::debug!("step failed: {e}");
    }
    result
}
