//! Compact mask expansion and coarse shape patterns.

/// Character-set bitset used for mask slots.
pub mod charset;
/// Mask parser and slot matching.
pub mod expand;
/// Shape pattern builder.
pub mod shape;

pub use charset::CharSet;
pub use expand::{expand_mask, ExpandedMask, MaskError, MaskSlot};
pub use shape::{query_shape, shape_patterns, ShapePattern};
