//! # wikitruth-telemetry
//!
//! Structured logging for the WikiTruth comparison pipeline.
//!
//! ## Usage
//!
//! ```rust
//! use wikitruth_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_telemetry("wikitruth")?;
//!     info!("pipeline ready");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, trace, warn, Instrument, Span};

pub use init::init_telemetry;
pub use spans::*;
