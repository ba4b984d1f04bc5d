// Declare modules at the root level
pub mod config;
pub mod domain;
pub mod error;
pub mod executor;
pub mod measurements;
pub mod producer;
pub mod query;
pub mod sampler;
pub mod telemetry;
pub mod time;
pub mod validators;

// Test utilities module (available in test and integration test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export at root for convenience
pub use config::*;
pub use domain::*;
pub use error::*;
pub use executor::*;
pub use measurements::*;
pub use producer::*;
pub use query::*;
pub use sampler::*;
pub use telemetry::*;
pub use time::*;
pub use validators::*;
