//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: text-generation models the stages can be run against
//! - [`location::Location`]: a validated research target ("City, State")
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod location;
pub mod model;
