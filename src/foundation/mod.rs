/// Geometry, colors and canvas types.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
pub(crate) mod math;
