//! Client for the address autocomplete service.

pub mod autocomplete;
pub mod error;
pub mod http;

pub use autocomplete::AutocompleteSource;
pub use error::{PlacesError, Result};
