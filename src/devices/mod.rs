//! Device implementations
//!
//! Only mock devices live in this crate; real hardware bindings implement
//! the [`crate::drivers`] traits in their own crates.

pub mod mock;
