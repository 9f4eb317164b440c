//! Command line tools for SIMs on a Sakura Cloud mobile gateway.
//!
//! - `get-unused-ip` lists the free host addresses of a CIDR block.
//! - `register-sim` registers SIMs from a CSV file and assigns them free addresses.
//!
//! The binaries are thin: argument handling lives in [`cli`] and [`config`],
//! the address walk and the registration sequence in [`processing`], and the
//! HTTP calls behind the [`sakura::SimApi`] trait.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod sakura;

pub use error::{Error, Result};
