#![deny(missing_docs)]
//! mdadoc AsciiDoc backend: tree transformation, rendering and the
//! conversion entry points.

/// Parallel batch conversion.
pub mod batch;
/// Single document conversion.
pub mod convert;
/// AsciiDoc serialization.
pub mod renderer;
/// Tree rewriting passes.
pub mod transform;

pub use batch::{BatchInput, BatchOptions, BatchOutcome, BatchResult, BatchStats, convert_batch};
pub use convert::convert;
pub use renderer::render;
pub use transform::{TransformContext, transform};
