//! HTTP handlers for catalog reads and sync control.

pub mod catalog;
pub mod sync;
pub use catalog::*;
pub use sync::*;
