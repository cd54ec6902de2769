use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{PlacefindError, Result};
use crate::models::QueryResult;

/// A remote collaborator that resolves free text into address suggestions.
#[async_trait]
pub trait PlaceSource: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, text: &str) -> Result<QueryResult>;
}

/// In-memory source with canned responses. Counts every lookup.
#[derive(Debug, Default)]
pub struct MemorySource {
    responses: Mutex<HashMap<String, std::result::Result<QueryResult, String>>>,
    latency: Duration,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn respond(self, text: &str, result: QueryResult) -> Self {
        self.responses.lock().insert(text.to_string(), Ok(result));
        self
    }

    pub fn fail(self, text: &str, message: &str) -> Self {
        self.responses
            .lock()
            .insert(text.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every text looked up so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl PlaceSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, text: &str) -> Result<QueryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(text.to_string());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let canned = self.responses.lock().get(text).cloned();
        match canned {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(PlacefindError::Network(message)),
            None => Ok(QueryResult::default()),
        }
    }
}
