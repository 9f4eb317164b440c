//! Core logic of the two tools.
//!
//! - [`available`] - enumeration of unused addresses in a network
//! - [`register`] - bulk SIM registration

mod available;
mod register;

// Re-export public functions
pub use available::{available_addresses, AvailableAddrs};
pub use register::{register_sims, RegisterSummary};
