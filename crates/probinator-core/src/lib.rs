//! Probinator Core
//!
//! Core types, traits, and error handling for the probinator conformance
//! harness: response-envelope interpretation, probe results and grading,
//! shared run state, and the seams probes and runners meet at.

pub mod config;
pub mod error;
pub mod outcome;
pub mod report;
pub mod state;
pub mod traits;

pub use config::*;
pub use error::{HarnessError, Result};
pub use outcome::*;
pub use report::*;
pub use state::*;
pub use traits::*;
