//! Infrastructure: process-based build runner.

pub mod process;
