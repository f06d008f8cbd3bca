//! Shared contact intake domain primitives.
//!
//! This crate owns the submission contract, validation, and email
//! rendering. It intentionally excludes AWS SDK and Lambda runtime
//! concerns; those live in `crates/contact_intake_lambda`.

pub mod contract;
pub mod email;
