//! Event dispatch.
//!
//! Submodules:
//! - [`signal`] – named, ordered multi-listener channel with synchronous emit
pub mod signal;
