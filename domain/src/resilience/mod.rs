//! Resilience domain
//!
//! Pure decisions behind retrying a failed service call: whether an error is
//! worth retrying, and how long to wait before the next attempt.

pub mod classification;
pub mod policy;

pub use classification::ErrorClassification;
pub use policy::RetryPolicy;
