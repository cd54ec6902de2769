use serde::{Deserialize, Serialize};

/// One address suggestion returned by the autocomplete service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOption {
    pub place_id: String,
    pub address: String,
}

impl SearchOption {
    pub fn new(place_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            address: address.into(),
        }
    }
}

/// Response envelope of the autocomplete service.
///
/// `data` is `None` when the service omitted it; `status` and `message`
/// are carried through but not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub data: Option<Vec<SearchOption>>,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub status: bool,
}

impl QueryResult {
    pub fn with_options(options: Vec<SearchOption>) -> Self {
        Self {
            data: Some(options),
            message: String::new(),
            status: true,
        }
    }

    /// Options to render, or an empty slice when there is no data.
    pub fn options(&self) -> &[SearchOption] {
        self.data.as_deref().unwrap_or(&[])
    }

    pub fn has_options(&self) -> bool {
        !self.options().is_empty()
    }
}
