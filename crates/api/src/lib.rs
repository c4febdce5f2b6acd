//! # GeoRemind App
//!
//! Application layer - commands and the command-line entry point.
//!
//! This crate contains:
//! - Commands (host UI → monitor bridge)
//! - Application context (dependency injection)
//! - The `georemind` binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
