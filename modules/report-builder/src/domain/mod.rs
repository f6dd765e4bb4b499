//! Domain layer: build states, runner port, orchestration.

pub mod error;
pub mod runner;
pub mod service;
