//! Request dispatch against the catalog.
//!
//! The dispatcher turns one input line into exactly one response. It holds
//! the catalog built at startup and never mutates it.

use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::{Catalog, ResourceError, UriScheme};
use crate::mcp::protocol::{
    parse_request, ErrorCode, IncomingRequest, JsonRpcError, JsonRpcErrorData, JsonRpcResponse,
    RequestId, ResourceRequest,
};

/// A resource entry in a `resources/list` result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// Resource URI.
    pub uri: String,
    /// `<service>/<relative path>`.
    pub name: String,
    /// `<service> - <file name>`.
    pub description: String,
    /// Content-type label.
    pub mime_type: &'static str,
}

/// Result of `resources/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListResourcesResult {
    /// Every record in the catalog.
    pub resources: Vec<ResourceDescriptor>,
}

/// One content item in a `resources/read` result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    /// The URI as requested.
    pub uri: String,
    /// Content-type label.
    pub mime_type: &'static str,
    /// File content.
    pub text: String,
}

/// Result of `resources/read`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    /// Always exactly one item.
    pub contents: Vec<ResourceContents>,
}

/// Resolves requests against an immutable catalog.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: Catalog,
    scheme: UriScheme,
}

impl Dispatcher {
    /// Creates a dispatcher over `catalog`, addressing resources with `scheme`.
    #[must_use]
    pub const fn new(catalog: Catalog, scheme: UriScheme) -> Self {
        Self { catalog, scheme }
    }

    /// Returns the catalog being served.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handles one input line and returns the response to write.
    ///
    /// # Errors
    ///
    /// Returns the error envelope to write when the line is malformed or the
    /// request fails. This is a response, not a failure of the dispatcher.
    pub fn handle_line(&self, line: &[u8]) -> Result<JsonRpcResponse, JsonRpcError> {
        let request = parse_request(line).map_err(|error| {
            tracing::warn!(error = %error.error.message, "Malformed request");
            error
        })?;

        self.handle_request(request)
    }

    /// Handles a parsed request.
    ///
    /// # Errors
    ///
    /// Returns the error envelope for a failed `resources/read`.
    pub fn handle_request(
        &self,
        request: IncomingRequest,
    ) -> Result<JsonRpcResponse, JsonRpcError> {
        let IncomingRequest { id, request } = request;
        let logged_id = id.as_ref().map(tracing::field::display);

        let result = match request {
            ResourceRequest::List => {
                tracing::debug!(id = logged_id, "resources/list");
                to_result_value(&self.list_resources(), id.as_ref())?
            }
            ResourceRequest::Read { uri } => {
                tracing::debug!(id = logged_id, %uri, "resources/read");
                let contents = self.read_resource(&uri).map_err(|err| {
                    tracing::warn!(%uri, error = %err, "Resource read failed");
                    resource_error(id.clone(), &err)
                })?;
                to_result_value(&contents, id.as_ref())?
            }
            ResourceRequest::Unknown { method } => {
                tracing::debug!(id = logged_id, %method, "Unknown method");
                json!({ "error": format!("Unknown method: {method}") })
            }
        };

        Ok(JsonRpcResponse::success(id, result))
    }

    /// Lists every record in the catalog.
    #[must_use]
    pub fn list_resources(&self) -> ListResourcesResult {
        let resources = self
            .catalog
            .records()
            .map(|record| ResourceDescriptor {
                uri: self.scheme.to_uri(&record.service, &record.relative_path),
                name: record.display_name(),
                description: record.description(),
                mime_type: record.mime_type(),
            })
            .collect();

        ListResourcesResult { resources }
    }

    /// Reads the resource addressed by `uri`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI is malformed, names an unknown service or
    /// path, or the file cannot be read as UTF-8 text.
    pub fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let path = self.scheme.parse(uri)?;
        let record = self.catalog.resolve(path.service, path.relative_path)?;
        let text = record.read_text()?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: record.mime_type(),
                text,
            }],
        })
    }
}

/// Serialises a method result.
fn to_result_value<T: Serialize>(
    result: &T,
    id: Option<&RequestId>,
) -> Result<Value, JsonRpcError> {
    serde_json::to_value(result).map_err(|e| {
        tracing::error!(error = %e, "Failed to serialise result");
        JsonRpcError::internal_error(id.cloned(), "Internal error: failed to serialise result")
    })
}

/// Maps a resource failure to its error envelope.
fn resource_error(id: Option<RequestId>, err: &ResourceError) -> JsonRpcError {
    let code = match err {
        ResourceError::InvalidUri(_) => ErrorCode::InvalidParams,
        ResourceError::ServiceNotFound { .. } | ResourceError::FileNotFound { .. } => {
            ErrorCode::ResourceNotFound
        }
        ResourceError::ReadError { .. } => ErrorCode::InternalError,
    };

    JsonRpcError::new(id, JsonRpcErrorData::with_message(code, err.to_string()))
}
