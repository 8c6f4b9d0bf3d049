//! Remote synchronization contract.
//!
//! A sync endpoint receives `{"action": ..., "data": ...}` and answers with
//! `{"success": ..., "data": ..., "error": ...}`. Transports only move these
//! messages; merging is decided here.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use meterbook_domain::MeterStore;

use crate::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Test,
    Save,
    Load,
}

impl SyncAction {
    pub fn key(self) -> &'static str {
        match self {
            SyncAction::Test => "test",
            SyncAction::Save => "save",
            SyncAction::Load => "load",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRequest<'a> {
    pub action: SyncAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a MeterStore>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SyncResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Moves sync messages to and from a remote endpoint.
pub trait SyncTransport {
    fn send(&self, request: &SyncRequest<'_>) -> Result<SyncResponse, CoreError>;
}

/// Outcome of a pull.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// Remote keys were merged into the store; lists the keys that were taken.
    Merged(Vec<String>),
    /// The endpoint answered successfully but had no data.
    Empty,
}

pub struct SyncService;

impl SyncService {
    pub fn test(transport: &dyn SyncTransport) -> Result<(), CoreError> {
        let response = transport.send(&SyncRequest {
            action: SyncAction::Test,
            data: None,
        })?;
        Self::ensure_success(&response)?;
        info!("sync endpoint reachable");
        Ok(())
    }

    pub fn push(transport: &dyn SyncTransport, store: &MeterStore) -> Result<(), CoreError> {
        let response = transport.send(&SyncRequest {
            action: SyncAction::Save,
            data: Some(store),
        })?;
        Self::ensure_success(&response)?;
        info!(
            customers = store.customers.len(),
            readings = store.reading_count(),
            "store pushed to sync endpoint"
        );
        Ok(())
    }

    /// Fetches the remote copy and merges it into `store`.
    pub fn pull(
        transport: &dyn SyncTransport,
        store: &mut MeterStore,
    ) -> Result<PullOutcome, CoreError> {
        let response = transport.send(&SyncRequest {
            action: SyncAction::Load,
            data: None,
        })?;
        Self::ensure_success(&response)?;
        let Some(remote) = response.data else {
            return Ok(PullOutcome::Empty);
        };
        let (merged, keys) = merge_remote(store, remote)?;
        *store = merged;
        info!(keys = ?keys, "remote data merged");
        Ok(PullOutcome::Merged(keys))
    }

    fn ensure_success(response: &SyncResponse) -> Result<(), CoreError> {
        if response.success {
            Ok(())
        } else {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| "endpoint reported failure".into());
            warn!(%message, "sync request rejected");
            Err(CoreError::Sync(message))
        }
    }
}

/// Shallow merge: each top-level key present in `remote` replaces the local
/// value wholesale (last writer wins per key, not per reading). Partitions
/// are re-sorted afterwards so the store stays date-ordered.
pub fn merge_remote(
    local: &MeterStore,
    remote: Value,
) -> Result<(MeterStore, Vec<String>), CoreError> {
    let Value::Object(remote) = remote else {
        return Err(CoreError::Sync("remote data is not an object".into()));
    };
    let mut merged = match serde_json::to_value(local)? {
        Value::Object(map) => map,
        _ => return Err(CoreError::Serde("store did not serialize to an object".into())),
    };
    let mut keys = Vec::with_capacity(remote.len());
    for (key, value) in remote {
        keys.push(key.clone());
        merged.insert(key, value);
    }
    let mut store: MeterStore = serde_json::from_value(Value::Object(merged))
        .map_err(|err| CoreError::Sync(format!("remote data does not fit the store: {}", err)))?;
    for history in store.meter_data.values_mut() {
        history.normalize();
    }
    Ok((store, keys))
}
