//! Deprecated property aliasing.
//!
//! Lets an object keep answering to an old property name while steering
//! callers toward the new one: every access through the old name reports a
//! deprecation and then forwards to the new name.
//!
//! ## Contents
//! - [`PropertyAccess`]  the get/set collaborator the aliases forward to
//! - [`PropertyAliases`] table of `deprecated key → new key` aliases

mod alias;

pub use alias::{PropertyAccess, PropertyAliases, deprecation_message};
