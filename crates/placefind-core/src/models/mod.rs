pub mod place;
pub mod query;

pub use place::*;
pub use query::*;
