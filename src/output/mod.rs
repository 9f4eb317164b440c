//! Console output.
//!
//! - [`progress`] - step and result markers for long running commands

mod progress;

pub use progress::Progress;
