//! `stz` toolkit - integration test support.
//!
//! This crate re-exports the facade so the integration tests under `tests/`
//! exercise the crates the way downstream users see them.

pub use stz::{chronos, fetch, prelude, shared, util};
