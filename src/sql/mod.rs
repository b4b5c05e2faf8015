//! Safe SQL builder: identifiers and sort direction from fixed whitelists only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
