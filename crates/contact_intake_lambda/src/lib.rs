//! AWS-oriented adapters and handlers for contact intake.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! mailer seam, and the entry-point binary) and leaves the submission
//! contract and email rendering to `contact_intake_core`.

pub mod adapters;
pub mod handlers;
