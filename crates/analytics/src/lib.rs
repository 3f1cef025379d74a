//! # Macroscope Analytics
//!
//! The time-series transforms applied to indicator tables after they are fetched:
//! date filtering, annualized rates of change, and event-indexed performance around
//! anchor dates (alone or averaged across anchors).
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the data
//!   provider or of how results are drawn. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `TimeSeriesTransformer` takes tables as input and
//!   returns new tables. Insufficient history and clipped windows show up as missing
//!   cells, never as errors.
//!
//! ## Public API
//!
//! - `TimeSeriesTransformer`: the transforms.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod transformer;

// Re-export the key components to create a clean, public-facing API.
pub use error::AnalyticsError;
pub use transformer::TimeSeriesTransformer;
