//! JSON-RPC 2.0 message types for the resource protocol.
//!
//! Every input line is one request object; every output line is one
//! response object echoing the request's `id`.
//!
//! # Message Shapes
//!
//! - **Request**: `{"id": ..., "method": "resources/list" | "resources/read", "params": {...}}`
//! - **Success**: `{"jsonrpc": "2.0", "id": ..., "result": ...}`
//! - **Error**: `{"jsonrpc": "2.0", "id": ..., "error": {"code": ..., "message": "..."}}`
//!
//! # Constraints
//!
//! - The `id` is opaque and echoed verbatim; an absent or `null` id is echoed as `null`
//! - The `jsonrpc` field of a request is not required
//! - An unknown method is answered with a success envelope whose result is
//!   `{"error": "Unknown method: <method>"}`

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON-RPC version written on every response.
pub const JSONRPC_VERSION: &str = "2.0";

/// Server name reported in the startup log.
pub const SERVER_NAME: &str = "context-index-mcp";

/// Method listing every resource in the catalog.
pub const METHOD_RESOURCES_LIST: &str = "resources/list";

/// Method reading one resource by URI.
pub const METHOD_RESOURCES_READ: &str = "resources/read";

/// An opaque request correlation token.
///
/// Any non-null JSON value is accepted and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Value);

impl RequestId {
    /// Wraps a JSON value, treating `null` as "no id".
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        (!value.is_null()).then_some(Self(value))
    }

    /// Returns the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self(Value::from(n))
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(Value::from(s))
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => write!(f, "{s}"),
            other => write!(f, "{other}"),
        }
    }
}

/// A parsed request body, one variant per method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    /// `resources/list`; params are ignored.
    List,
    /// `resources/read` for one URI.
    Read {
        /// The resource URI from `params.uri`.
        uri: String,
    },
    /// Any other method name.
    Unknown {
        /// The method as sent by the client.
        method: String,
    },
}

/// A request line after parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingRequest {
    /// Correlation id to echo, if any.
    pub id: Option<RequestId>,
    /// What the client asked for.
    pub request: ResourceRequest,
}

impl IncomingRequest {
    /// Returns the method name of this request.
    #[must_use]
    pub fn method(&self) -> &str {
        match &self.request {
            ResourceRequest::List => METHOD_RESOURCES_LIST,
            ResourceRequest::Read { .. } => METHOD_RESOURCES_READ,
            ResourceRequest::Unknown { method } => method,
        }
    }
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadParams {
    /// URI of the resource to read.
    pub uri: String,
}

/// A successful JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this response corresponds to (`null` if none).
    pub id: Option<RequestId>,

    /// The result of the method call.
    pub result: Value,
}

impl JsonRpcResponse {
    /// Creates a new success response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Value is not const-compatible
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// JSON-RPC 2.0 error codes used by this server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid JSON was received by the server.
    ParseError,
    /// The JSON sent is not a valid request object.
    InvalidRequest,
    /// Invalid method parameters.
    InvalidParams,
    /// Internal error.
    InternalError,
    /// The addressed resource does not exist.
    ResourceNotFound,
}

impl ErrorCode {
    /// Returns the numeric code for this error.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ResourceNotFound => -32002,
        }
    }

    /// Returns the default message for this error code.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid Request",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ResourceNotFound => "Resource not found",
        }
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorData {
    /// The error code.
    pub code: i32,

    /// A human-readable description of the error.
    pub message: String,
}

impl JsonRpcErrorData {
    /// Creates a new error with a custom message.
    #[must_use]
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            message: message.into(),
        }
    }
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    /// Always "2.0".
    pub jsonrpc: &'static str,

    /// The request ID this error corresponds to (`null` if unknown).
    pub id: Option<RequestId>,

    /// The error details.
    pub error: JsonRpcErrorData,
}

impl JsonRpcError {
    /// Creates a new error response.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // JsonRpcErrorData contains String
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorData) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }

    /// Creates a parse error response (ID cannot be determined).
    #[must_use]
    pub fn parse_error(detail: impl fmt::Display) -> Self {
        Self::new(
            None,
            JsonRpcErrorData::with_message(
                ErrorCode::ParseError,
                format!("{}: {detail}", ErrorCode::ParseError.default_message()),
            ),
        )
    }

    /// Creates an invalid request error response.
    #[must_use]
    pub fn invalid_request(id: Option<RequestId>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InvalidRequest, message),
        )
    }

    /// Creates an invalid params error response.
    #[must_use]
    pub fn invalid_params(id: Option<RequestId>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InvalidParams, message),
        )
    }

    /// Creates an internal error response.
    #[must_use]
    pub fn internal_error(id: Option<RequestId>, message: impl Into<String>) -> Self {
        Self::new(
            id,
            JsonRpcErrorData::with_message(ErrorCode::InternalError, message),
        )
    }
}

/// Parses one input line into a request.
///
/// The line is taken as raw bytes so that invalid UTF-8 is reported as a
/// parse error rather than an I/O failure.
///
/// # Errors
///
/// Returns a `JsonRpcError` if the line is not a JSON object, has no string
/// `method`, or is a `resources/read` without a string `params.uri`. The id is
/// carried on the error whenever it could be extracted.
pub fn parse_request(line: &[u8]) -> Result<IncomingRequest, JsonRpcError> {
    let value: Value = serde_json::from_slice(line).map_err(JsonRpcError::parse_error)?;

    let Value::Object(mut obj) = value else {
        return Err(JsonRpcError::invalid_request(
            None,
            "Request must be a JSON object",
        ));
    };

    let id = obj.remove("id").and_then(RequestId::from_value);

    let method = match obj.remove("method") {
        Some(Value::String(method)) => method,
        Some(_) => {
            return Err(JsonRpcError::invalid_request(
                id,
                "method field must be a string",
            ))
        }
        None => return Err(JsonRpcError::invalid_request(id, "Missing method field")),
    };

    let request = match method.as_str() {
        METHOD_RESOURCES_LIST => ResourceRequest::List,
        METHOD_RESOURCES_READ => {
            let Some(params) = obj.remove("params") else {
                return Err(JsonRpcError::invalid_params(
                    id,
                    "Missing resources/read params",
                ));
            };
            let params: ReadParams = match serde_json::from_value(params) {
                Ok(params) => params,
                Err(e) => {
                    return Err(JsonRpcError::invalid_params(
                        id,
                        format!("Invalid resources/read params: {e}"),
                    ))
                }
            };
            ResourceRequest::Read { uri: params.uri }
        }
        _ => ResourceRequest::Unknown { method },
    };

    Ok(IncomingRequest { id, request })
}
