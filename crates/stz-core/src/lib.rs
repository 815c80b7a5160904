//! Shared configuration, error types and logging bootstrap for the `stz`
//! toolkit crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
