use std::fmt;
use std::sync::Arc;

use super::place::{QueryResult, SearchOption};

/// Entity tag used for address lookups.
pub const PLACE_ENTITY: &str = "Place";

/// Cache key for a remote lookup: the entity tag plus the free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub entity: &'static str,
    pub text: String,
}

impl QueryKey {
    pub fn place(text: impl Into<String>) -> Self {
        Self {
            entity: PLACE_ENTITY,
            text: text.into(),
        }
    }

    /// Only non-empty keys may be fetched.
    pub fn is_enabled(&self) -> bool {
        !self.text.is_empty()
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity, self.text)
    }
}

/// Execution state of one cached lookup.
#[derive(Debug, Clone, Default)]
pub enum QueryState {
    /// Not triggered yet.
    #[default]
    Idle,
    Fetching,
    Ready(Arc<QueryResult>),
    Failed(String),
}

impl QueryState {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match self {
            Self::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// Options available for rendering and navigation.
    pub fn options(&self) -> &[SearchOption] {
        self.result().map(QueryResult::options).unwrap_or(&[])
    }
}
