//! Probinator Engine
//!
//! Sequential plan execution and report handling: the [`PlanRunner`] walks an
//! ordered plan applying the continue-on-soft-failure rule, and the output
//! module renders and persists the resulting [`RunReport`](probinator_core::RunReport).

pub mod output;
pub mod runner;

pub use output::{format_json, format_text, write_report};
pub use runner::{PlanRunner, RunContext, RunPhase};
