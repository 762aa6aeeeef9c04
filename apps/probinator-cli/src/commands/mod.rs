//! CLI command implementations

pub mod info;
pub mod plan;
pub mod report;
pub mod run;
