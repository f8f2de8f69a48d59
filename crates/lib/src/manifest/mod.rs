//! Utility manifests.
//!
//! A manifest describes, per utility, the strategies that can provide it and
//! the versions each strategy knows about. This module owns the data types and
//! the on-disk lookup; interpreting a manifest is the job of [`crate::strategy`].

mod finder;
mod types;

pub use finder::*;
pub use types::*;
