//! # API Query Handler
//!
//! JSON query routing for the atomic swap module.
//!
//! ## Endpoints
//!
//! | path                      | params                                              |
//! |---------------------------|-----------------------------------------------------|
//! | `swap`                    | `{random_number_hash}`                              |
//! | `swapout`                 | `{address, status?, page_size?, page_num?}`         |
//! | `swapin` / `by-recipient` | `{address, status?, page_size?, page_num?}`         |
//! | `ping`                    | none                                                |

use crate::domain::{
    invariant_address_length, invariant_random_number_hash_length, SwapError, SwapStatus,
    CODESPACE,
};
use crate::ports::{AtomicSwapApi, SwapPage};
use serde::{Deserialize, Serialize};
use shared_types::{AccAddress, HexBytes};

/// Swaps created by an address.
pub const QUERY_SWAP_OUT: &str = "swapout";
/// Swaps addressed to an address.
pub const QUERY_SWAP_IN: &str = "swapin";
/// Alias of [`QUERY_SWAP_IN`].
pub const QUERY_BY_RECIPIENT: &str = "by-recipient";
/// Swap by commitment.
pub const QUERY_SWAP: &str = "swap";

/// Error from API query handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiQueryError {
    pub codespace: u32,
    pub code: u32,
    pub message: String,
}

impl From<SwapError> for ApiQueryError {
    fn from(e: SwapError) -> Self {
        Self {
            codespace: CODESPACE,
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ApiQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.codespace, self.code, self.message)
    }
}

impl std::error::Error for ApiQueryError {}

/// Params of the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapListParams {
    pub address: AccAddress,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_num: usize,
}

impl SwapListParams {
    fn into_page(self) -> Result<(AccAddress, SwapPage), SwapError> {
        invariant_address_length(&self.address)?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<SwapStatus>)
            .transpose()
            .map_err(SwapError::InvalidQueryRequest)?;
        Ok((
            self.address,
            SwapPage {
                status,
                page_size: self.page_size,
                page_num: self.page_num,
            },
        ))
    }
}

/// Params of the by-hash endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapByHashParams {
    pub random_number_hash: HexBytes,
}

/// Query handler over any `AtomicSwapApi`.
pub struct ApiGatewayHandler<S> {
    service: S,
}

impl<S: AtomicSwapApi> ApiGatewayHandler<S> {
    /// Create a new API handler.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Get mutable access to the service.
    pub fn service_mut(&mut self) -> &mut S {
        &mut self.service
    }

    /// Handle ping request (health check).
    pub fn handle_ping(&self) -> serde_json::Value {
        serde_json::json!({
            "status": "ok",
            "subsystem": "qc-15-atomic-swap"
        })
    }

    /// Swap by commitment.
    pub fn handle_swap(&self, params: SwapByHashParams) -> Result<serde_json::Value, SwapError> {
        invariant_random_number_hash_length(&params.random_number_hash)?;
        let swap = self.service.get_swap(params.random_number_hash.as_bytes())?;
        to_json(&swap)
    }

    /// Swaps created by `address`.
    pub fn handle_swap_out(&self, params: SwapListParams) -> Result<serde_json::Value, SwapError> {
        let (address, page) = params.into_page()?;
        to_json(&self.service.swaps_by_creator(&address, &page)?)
    }

    /// Swaps addressed to `address`.
    pub fn handle_swap_in(&self, params: SwapListParams) -> Result<serde_json::Value, SwapError> {
        let (address, page) = params.into_page()?;
        to_json(&self.service.swaps_by_recipient(&address, &page)?)
    }
}

/// Handle an API query.
pub fn handle_api_query<S: AtomicSwapApi>(
    handler: &ApiGatewayHandler<S>,
    method: &str,
    params: &serde_json::Value,
) -> Result<serde_json::Value, ApiQueryError> {
    let result = match method {
        "ping" => Ok(handler.handle_ping()),
        QUERY_SWAP => parse_params(params).and_then(|p| handler.handle_swap(p)),
        QUERY_SWAP_OUT => parse_params(params).and_then(|p| handler.handle_swap_out(p)),
        QUERY_SWAP_IN | QUERY_BY_RECIPIENT => {
            parse_params(params).and_then(|p| handler.handle_swap_in(p))
        }
        _ => Err(SwapError::InvalidQueryRequest(format!(
            "unknown atomic swap query endpoint {}",
            method
        ))),
    };
    result.map_err(ApiQueryError::from)
}

/// Handle a raw query: `path` selects the endpoint, `data` is the JSON params.
pub fn handle_raw_query<S: AtomicSwapApi>(
    handler: &ApiGatewayHandler<S>,
    path: &str,
    data: &[u8],
) -> Result<Vec<u8>, ApiQueryError> {
    let params: serde_json::Value = if data.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(data).map_err(|e| {
            ApiQueryError::from(SwapError::InvalidQueryRequest(format!(
                "incorrectly formatted request data: {}",
                e
            )))
        })?
    };
    let value = handle_api_query(handler, path, &params)?;
    serde_json::to_vec(&value).map_err(|e| ApiQueryError::from(SwapError::Codec(e.to_string())))
}

fn parse_params<T: serde::de::DeserializeOwned>(params: &serde_json::Value) -> Result<T, SwapError> {
    serde_json::from_value(params.clone()).map_err(|e| {
        SwapError::InvalidQueryRequest(format!("incorrectly formatted request data: {}", e))
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, SwapError> {
    serde_json::to_value(value).map_err(|e| SwapError::Codec(e.to_string()))
}
