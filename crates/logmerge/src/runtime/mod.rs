//! Runtime module — process lifecycle: logging, CLI, run.

pub mod boot;
pub mod cli;
pub mod run;
