//! Input files.
//!
//! - [`sim_csv`] - SIM list CSV loading

mod sim_csv;

pub use sim_csv::{load_sim_list, read_sim_list};
