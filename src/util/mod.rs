//! Utility functions and helpers
//!
//! ## Modules
//!
//! - [`deadline`] - Per-operation deadlines for warehouse calls

pub mod deadline;

#[cfg(test)]
pub(crate) mod log_capture;
