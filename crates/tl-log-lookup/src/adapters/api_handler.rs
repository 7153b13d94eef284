//! # JSON Query Handler
//!
//! Adapter turning JSON-RPC style method calls from the serving layer into
//! [`LogLookupApi`] queries.
//!
//! ## Architecture
//!
//! ```text
//! RPC server → handle_api_query → ApiQueryHandler → LogLookupApi
//! ```
//!
//! Hashes travel as hex strings, with or without a `0x` prefix.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared_types::{Hash, LeafRecord, SignedTreeHead};

use crate::domain::LookupError;
use crate::ports::LogLookupApi;

/// Error from API query handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiQueryError {
    /// JSON-RPC error code
    pub code: i32,
    /// Human-readable description
    pub message: String,
}

impl ApiQueryError {
    /// Unknown method name.
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {}", method),
        }
    }

    /// Missing or malformed parameters, or an impossible range.
    pub fn invalid_params(msg: &str) -> Self {
        Self {
            code: -32602,
            message: msg.to_string(),
        }
    }

    /// No answer exists yet; the caller may retry after the next refresh.
    pub fn not_found(what: &str) -> Self {
        Self {
            code: -32001,
            message: format!("Not found: {}", what),
        }
    }
}

impl std::fmt::Display for ApiQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiQueryError {}

impl From<LookupError> for ApiQueryError {
    fn from(err: LookupError) -> Self {
        Self::invalid_params(&err.to_string())
    }
}

/// Tree head as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TreeHeadResponse {
    pub tree_size: u64,
    pub timestamp: u64,
    pub sha256_root_hash: String,
    pub log_id: String,
    pub tree_head_signature: String,
}

impl From<&SignedTreeHead> for TreeHeadResponse {
    fn from(sth: &SignedTreeHead) -> Self {
        Self {
            tree_size: sth.tree_size,
            timestamp: sth.timestamp,
            sha256_root_hash: hex::encode(sth.sha256_root_hash),
            log_id: hex::encode(sth.log_id),
            tree_head_signature: hex::encode(&sth.signature.signature),
        }
    }
}

/// Audit proof as served to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditProofResponse {
    /// Position of the proven leaf
    pub leaf_index: u64,
    /// Tree size the path leads to
    pub tree_size: u64,
    /// Hex-encoded sibling hashes, leaf level first
    pub audit_path: Vec<String>,
    /// Set for proofs against the published tree head.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Query handler over a lookup engine.
pub struct ApiQueryHandler<A: ?Sized> {
    api: Arc<A>,
}

impl<A: LogLookupApi + ?Sized> ApiQueryHandler<A> {
    /// Create a new API handler.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Handle ping request (health check).
    pub fn handle_ping(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "component": "tl-log-lookup",
            "tree_size": self.api.tree_size(),
        })
    }

    /// Handle get_metrics request.
    pub fn handle_get_metrics(&self) -> serde_json::Value {
        serde_json::to_value(self.api.stats()).unwrap_or_default()
    }

    /// Handle get_sth request.
    pub fn handle_get_sth(&self) -> Result<serde_json::Value, ApiQueryError> {
        let sth = self
            .api
            .get_sth()
            .ok_or_else(|| ApiQueryError::not_found("no tree head published yet"))?;
        Ok(serde_json::to_value(TreeHeadResponse::from(&sth)).unwrap_or_default())
    }

    /// Handle get_index request.
    pub fn handle_get_index(&self, leaf_hash: Hash) -> serde_json::Value {
        match self.api.get_index(&leaf_hash) {
            Some(leaf_index) => serde_json::json!({ "found": true, "leaf_index": leaf_index }),
            None => serde_json::json!({ "found": false }),
        }
    }

    /// Handle get_audit_proof request.
    pub fn handle_get_audit_proof(
        &self,
        leaf_index: u64,
        tree_size: u64,
    ) -> Result<serde_json::Value, ApiQueryError> {
        let proof = self.api.audit_proof(leaf_index, tree_size).ok_or_else(|| {
            ApiQueryError::not_found(&format!("leaf {leaf_index} in tree of size {tree_size}"))
        })?;
        Ok(Self::audit_response(proof.leaf_index, proof.tree_size, &proof.path, None))
    }

    /// Handle get_audit_proof_by_hash request.
    ///
    /// Without `tree_size` the proof is built against the published tree head.
    pub fn handle_get_audit_proof_by_hash(
        &self,
        leaf_hash: Hash,
        tree_size: Option<u64>,
    ) -> Result<serde_json::Value, ApiQueryError> {
        let missing = || ApiQueryError::not_found(&format!("leaf hash {}", hex::encode(leaf_hash)));
        match tree_size {
            Some(tree_size) => {
                let proof = self
                    .api
                    .audit_proof_by_hash_at(&leaf_hash, tree_size)
                    .ok_or_else(missing)?;
                Ok(Self::audit_response(proof.leaf_index, proof.tree_size, &proof.path, None))
            }
            None => {
                let proof = self.api.audit_proof_by_hash(&leaf_hash).ok_or_else(missing)?;
                Ok(Self::audit_response(
                    proof.leaf_index,
                    proof.tree_size,
                    &proof.path,
                    Some(proof.timestamp),
                ))
            }
        }
    }

    /// Handle get_consistency request.
    pub fn handle_get_consistency(
        &self,
        first: u64,
        second: u64,
    ) -> Result<serde_json::Value, ApiQueryError> {
        let proof = self
            .api
            .consistency_proof(first, second)?
            .ok_or_else(|| ApiQueryError::not_found(&format!("tree size {second}")))?;
        Ok(serde_json::json!({
            "first": proof.first,
            "second": proof.second,
            "consistency": proof.path.iter().map(hex::encode).collect::<Vec<_>>(),
        }))
    }

    /// Handle get_leaf_hash request.
    pub fn handle_get_leaf_hash(&self, merkle_leaf: Vec<u8>) -> serde_json::Value {
        let record = LeafRecord {
            merkle_leaf,
            ..LeafRecord::default()
        };
        serde_json::json!({ "leaf_hash": hex::encode(self.api.leaf_hash(&record)) })
    }

    fn audit_response(
        leaf_index: u64,
        tree_size: u64,
        path: &[Hash],
        timestamp: Option<u64>,
    ) -> serde_json::Value {
        let response = AuditProofResponse {
            leaf_index,
            tree_size,
            audit_path: path.iter().map(hex::encode).collect(),
            timestamp,
        };
        serde_json::to_value(response).unwrap_or_default()
    }
}

/// Handle an API query from the serving layer.
///
/// ## Supported Methods
///
/// - `ping`: Health check
/// - `get_metrics`: Engine counters
/// - `get_sth`: Published tree head
/// - `get_index`: Position of a leaf hash (`leaf_hash`)
/// - `get_audit_proof`: Audit proof by position (`leaf_index`, `tree_size`)
/// - `get_audit_proof_by_hash`: Audit proof by hash (`leaf_hash`, optional `tree_size`)
/// - `get_consistency`: Consistency proof (`first`, `second`)
/// - `get_leaf_hash`: Leaf hash of hex-encoded leaf input (`leaf_input`)
pub fn handle_api_query<A: LogLookupApi + ?Sized>(
    handler: &ApiQueryHandler<A>,
    method: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value, ApiQueryError> {
    match method {
        "ping" => Ok(handler.handle_ping()),
        "get_metrics" => Ok(handler.handle_get_metrics()),
        "get_sth" => handler.handle_get_sth(),
        "get_index" => {
            let leaf_hash = parse_hash_param(params, "leaf_hash")?;
            Ok(handler.handle_get_index(leaf_hash))
        }
        "get_audit_proof" => {
            let leaf_index = parse_u64_param(params, "leaf_index")?;
            let tree_size = parse_u64_param(params, "tree_size")?;
            handler.handle_get_audit_proof(leaf_index, tree_size)
        }
        "get_audit_proof_by_hash" => {
            let leaf_hash = parse_hash_param(params, "leaf_hash")?;
            let tree_size = match params.get("tree_size") {
                None | Some(serde_json::Value::Null) => None,
                Some(_) => Some(parse_u64_param(params, "tree_size")?),
            };
            handler.handle_get_audit_proof_by_hash(leaf_hash, tree_size)
        }
        "get_consistency" => {
            let first = parse_u64_param(params, "first")?;
            let second = parse_u64_param(params, "second")?;
            handler.handle_get_consistency(first, second)
        }
        "get_leaf_hash" => {
            let input = parse_hex_param(params, "leaf_input")?;
            Ok(handler.handle_get_leaf_hash(input))
        }
        _ => Err(ApiQueryError::method_not_found(method)),
    }
}

fn parse_hex_param(params: &serde_json::Value, name: &str) -> Result<Vec<u8>, ApiQueryError> {
    let hex_str = params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiQueryError::invalid_params(&format!("Missing {} parameter", name)))?;

    hex::decode(hex_str.trim_start_matches("0x"))
        .map_err(|_| ApiQueryError::invalid_params("Invalid hex format"))
}

/// Parse a hash parameter from JSON params.
fn parse_hash_param(params: &serde_json::Value, name: &str) -> Result<Hash, ApiQueryError> {
    let bytes = parse_hex_param(params, name)?;
    bytes
        .try_into()
        .map_err(|_| ApiQueryError::invalid_params("Hash must be 32 bytes"))
}

fn parse_u64_param(params: &serde_json::Value, name: &str) -> Result<u64, ApiQueryError> {
    params
        .get(name)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| {
            ApiQueryError::invalid_params(&format!("Missing or invalid {} parameter", name))
        })
}
