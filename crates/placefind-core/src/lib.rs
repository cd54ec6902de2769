pub mod cache;
pub mod config;
pub mod debounce;
pub mod error;
pub mod listeners;
pub mod models;
pub mod source;

pub use cache::QueryCache;
pub use config::{AppConfig, LogConfig, SearchConfig, UiConfig};
pub use debounce::Debouncer;
pub use error::{ExitCode, PlacefindError, Result};
pub use listeners::{ListenerGuard, ListenerSet};
pub use models::*;
pub use source::{MemorySource, PlaceSource};
