//! Facade refinement algorithms.
//!
//! - **Subdivision**: length-tiered curve splitting and threshold-driven
//!   midpoint splitting of triangle/quad faces
//! - **Welding**: hash-indexed vertex deduplication used while splitting faces
//! - **Progress**: callbacks for long-running batch work

pub mod progress;
pub mod subdivide;
pub mod weld;

pub use progress::Progress;
