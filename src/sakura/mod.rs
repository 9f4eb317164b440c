//! Cloud API access.
//!
//! - [`api`] - the [`SimApi`] operations the tools rely on
//! - [`client`] - the HTTP implementation of [`SimApi`]

mod api;
mod client;

// Re-export public types and functions
pub use api::SimApi;
pub use client::{
    addresses_of, endpoint_url, parse_assign_ip, parse_attach_sim, parse_create_sim,
    parse_sim_list, SakuraClient,
};
