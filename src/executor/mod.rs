//! Command execution module
//!
//! Provides async process execution with:
//! - Streaming or captured output
//! - Timeout support
//! - Exit code pass-through
//! - Program lookup before spawning

pub mod runner;

pub use runner::*;
