use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::tracker::transport::{Fetch, QueryParams};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub endpoint: String,
    pub query: QueryParams,
    pub with_envelope: bool,
}

/// Replays canned responses in order and records every request.
pub struct ScriptedFetch {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedFetch {
    pub fn new(responses: Vec<Result<Value>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Fetch for ScriptedFetch {
    async fn get(&self, endpoint: &str, query: &QueryParams, with_envelope: bool) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint: endpoint.to_string(),
            query: query.clone(),
            with_envelope,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::api(endpoint, None, "script exhausted")))
    }
}
