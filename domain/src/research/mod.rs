//! Research domain
//!
//! The four-stage food truck research pipeline: stage contracts, typed
//! records, validation, fallbacks and the state a run accumulates.

pub mod context;
pub mod fallback;
pub mod records;
pub mod response;
pub mod stage;
pub mod state;
pub mod validation;
