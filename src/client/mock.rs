//! Mock DevHub RPC client for testing
//!
//! Provides a scripted [`RpcClient`] for unit tests without a running
//! conductor.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use super::models::{AgentInfo, RpcResponse};
use super::{RpcCall, RpcClient};
use crate::error::{ApiError, Result};

type Outcome = std::result::Result<RpcResponse, ApiError>;

/// Mock RPC client for testing.
///
/// Responses are keyed by zome function name. A call takes, in order: the
/// pending one-shot error, the next queued outcome for its function, or the
/// sticky response for its function. Anything else fails with `NotFound`.
///
/// # Example
/// ```ignore
/// let mock = MockRpcClient::new()
///     .with_response("get_dna", RpcResponse::Entity(dna))
///     .await;
///
/// let response = mock.call(&RpcCall::new("dnarepo", "dna_library", "get_dna")).await?;
/// ```
#[derive(Default)]
pub struct MockRpcClient {
    /// Responses returned on every call to a function
    responses: Arc<Mutex<HashMap<String, RpcResponse>>>,
    /// Outcomes returned once each, ahead of the sticky response
    queued: Arc<Mutex<HashMap<String, VecDeque<Outcome>>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Calls per function
    call_count: Arc<Mutex<HashMap<String, usize>>>,
    /// Captured calls for test assertions
    captured_calls: Arc<Mutex<Vec<RpcCall>>>,
    /// Gates holding calls mid-flight, consumed one per call
    gates: Arc<Mutex<HashMap<String, VecDeque<Arc<CallGate>>>>>,
}

/// Holds one call open until the test releases it.
///
/// Permits are stored, so `release` may come before the call arrives and
/// `entered` may be awaited after it did.
#[derive(Debug, Default)]
pub struct CallGate {
    entered: Notify,
    release: Notify,
}

impl CallGate {
    /// Wait until the gated call is in flight
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call return
    pub fn release(&self) {
        self.release.notify_one();
    }
}

impl MockRpcClient {
    /// Create a new mock client with no responses configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response returned by every call to `function`.
    pub async fn with_response(self, function: &str, response: RpcResponse) -> Self {
        self.responses
            .lock()
            .await
            .insert(function.to_string(), response);
        self
    }

    /// Configure `whoami` to report `agent`.
    pub async fn with_agent(self, agent: AgentInfo) -> Self {
        let record = serde_json::to_value(&agent).expect("agent info serializes");
        self.with_response("whoami", RpcResponse::Record(record))
            .await
    }

    /// Configure an error to return on the next call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Queue a response for the next call to `function`.
    pub async fn queue_response(self, function: &str, response: RpcResponse) -> Self {
        self.push(function, Ok(response)).await;
        self
    }

    /// Queue an error for the next call to `function`.
    pub async fn queue_error(&self, function: &str, error: ApiError) {
        self.push(function, Err(error)).await;
    }

    /// Hold the next ungated call to `function` until the returned gate is released.
    pub async fn gate(&self, function: &str) -> Arc<CallGate> {
        let gate = Arc::new(CallGate::default());
        self.gates
            .lock()
            .await
            .entry(function.to_string())
            .or_default()
            .push_back(gate.clone());
        gate
    }

    /// Number of calls made to `function`.
    pub async fn call_count(&self, function: &str) -> usize {
        self.call_count
            .lock()
            .await
            .get(function)
            .copied()
            .unwrap_or(0)
    }

    /// Number of calls made to any function.
    pub async fn total_calls(&self) -> usize {
        self.call_count.lock().await.values().sum()
    }

    /// Get all captured calls for test assertions.
    pub async fn captured_calls(&self) -> Vec<RpcCall> {
        self.captured_calls.lock().await.clone()
    }

    async fn push(&self, function: &str, outcome: Outcome) {
        self.queued
            .lock()
            .await
            .entry(function.to_string())
            .or_default()
            .push_back(outcome);
    }

    /// Take the outcome for one call to `function`.
    async fn next_outcome(&self, function: &str) -> Result<RpcResponse> {
        if let Some(e) = self.error.lock().await.take() {
            return Err(e.into());
        }

        let queued = self
            .queued
            .lock()
            .await
            .get_mut(function)
            .and_then(VecDeque::pop_front);
        if let Some(outcome) = queued {
            return outcome.map_err(Into::into);
        }

        match self.responses.lock().await.get(function) {
            Some(response) => Ok(response.clone()),
            None => Err(ApiError::NotFound(format!("no mock response for {}", function)).into()),
        }
    }
}

#[async_trait]
impl RpcClient for MockRpcClient {
    async fn call(&self, call: &RpcCall) -> Result<RpcResponse> {
        self.captured_calls.lock().await.push(call.clone());
        *self
            .call_count
            .lock()
            .await
            .entry(call.function.clone())
            .or_default() += 1;

        // Decide the outcome before parking so call order fixes which
        // response each call gets
        let outcome = self.next_outcome(&call.function).await;

        let gate = self
            .gates
            .lock()
            .await
            .get_mut(&call.function)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::Entity;

    fn get_dna() -> RpcCall {
        RpcCall::new("dnarepo", "dna_library", "get_dna")
    }

    #[tokio::test]
    async fn test_sticky_response() {
        let entity = Entity::new("id-1", "addr-1");
        let mock = MockRpcClient::new()
            .with_response("get_dna", RpcResponse::Entity(entity.clone()))
            .await;

        for _ in 0..2 {
            let response = mock.call(&get_dna()).await.unwrap();
            assert_eq!(response, RpcResponse::Entity(entity.clone()));
        }
        assert_eq!(mock.call_count("get_dna").await, 2);
    }

    #[tokio::test]
    async fn test_missing_response_is_not_found() {
        let mock = MockRpcClient::new();

        let err = mock.call(&get_dna()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_error_consumed_once() {
        let mock = MockRpcClient::new()
            .with_response("get_dna", RpcResponse::Collection(vec![]))
            .await
            .with_error(ApiError::Network("offline".to_string()))
            .await;

        assert!(mock.call(&get_dna()).await.is_err());
        assert!(mock.call(&get_dna()).await.is_ok());
    }

    #[tokio::test]
    async fn test_queue_before_sticky() {
        let mock = MockRpcClient::new()
            .with_response("get_dna", RpcResponse::Bytes(vec![2]))
            .await
            .queue_response("get_dna", RpcResponse::Bytes(vec![1]))
            .await;

        assert_eq!(mock.call(&get_dna()).await.unwrap(), RpcResponse::Bytes(vec![1]));
        assert_eq!(mock.call(&get_dna()).await.unwrap(), RpcResponse::Bytes(vec![2]));
    }

    #[tokio::test]
    async fn test_captured_calls() {
        let mock = MockRpcClient::new();
        let call = get_dna().args(serde_json::json!({ "id": "id-1" }));

        let _ = mock.call(&call).await;

        assert_eq!(mock.captured_calls().await, vec![call]);
        assert_eq!(mock.total_calls().await, 1);
    }

    #[tokio::test]
    async fn test_gate_holds_call() {
        let mock = MockRpcClient::new()
            .with_response("get_dna", RpcResponse::Bytes(vec![]))
            .await;
        let gate = mock.gate("get_dna").await;
        let call = get_dna();

        let (response, ()) = tokio::join!(mock.call(&call), async {
            gate.entered().await;
            gate.release();
        });

        assert!(response.is_ok());
    }
}
