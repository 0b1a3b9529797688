//! VMRay Core - constants, error handling, configuration and logging.
//!
//! Shared foundation for the VMRay API client:
//! - Service constants (default endpoint, embedded root CA, action names)
//! - The `VmrayError` type covering every failure category
//! - File and environment based client configuration
//! - Structured logging with tracing

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Re-export commonly used items at the crate root
pub use config::ClientConfig;
pub use error::{VmrayError, VmrayResult};
pub use logging::{init_logging, log_filter};
