pub mod attributes;
pub mod feature_collection;
pub mod loader;

pub use attributes::*;
pub use feature_collection::*;
pub use loader::*;
