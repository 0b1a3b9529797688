//! API endpoint modules organized by resource.
//!
//! Each module adds typed methods to [`crate::ApiClient`] for one group of
//! service actions.

pub mod analyses;
pub mod jobs;
pub mod samples;
