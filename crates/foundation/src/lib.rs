pub mod geo;
pub mod tiles;

// Foundation crate: small, well-tested primitives only.
pub use geo::*;
pub use tiles::*;
