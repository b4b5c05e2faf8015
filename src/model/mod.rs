//! Data shapes: upstream payload, normalized rows, and API records.

pub mod catalog;
pub mod payload;
pub mod record;

pub use catalog::*;
pub use payload::*;
pub use record::*;
