use instasent::ApiError;
use std::fmt;

/// Errors surfaced by node operations and option loaders.
///
/// Parameter problems are caught before any HTTP call is made; upstream
/// failures keep the normalized [`ApiError`] intact.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeError {
    /// A required parameter is absent, null or blank
    MissingParameter(String),
    /// A parameter is present but has the wrong shape
    InvalidParameter { name: String, reason: String },
    /// The resource/operation pair is not offered by the node
    UnknownOperation { resource: String, operation: String },
    /// No option loader with this name
    UnknownOptionsMethod(String),
    /// The API answered 2xx but the payload could not be read
    InvalidResponse(String),
    /// The API call failed
    Api(ApiError),
}

impl NodeError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        NodeError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_operation(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        NodeError::UnknownOperation {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// True when the caller supplied bad input (as opposed to an upstream failure).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            NodeError::MissingParameter(_)
                | NodeError::InvalidParameter { .. }
                | NodeError::UnknownOperation { .. }
                | NodeError::UnknownOptionsMethod(_)
        )
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::MissingParameter(name) => {
                write!(f, "Missing required parameter '{}'", name)
            }
            NodeError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            NodeError::UnknownOperation {
                resource,
                operation,
            } => write!(
                f,
                "The operation \"{}\" is not supported for resource \"{}\"",
                operation, resource
            ),
            NodeError::UnknownOptionsMethod(method) => {
                write!(f, "Unknown options method '{}'", method)
            }
            NodeError::InvalidResponse(msg) => write!(f, "Unexpected API response: {}", msg),
            NodeError::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for NodeError {}

impl From<ApiError> for NodeError {
    fn from(e: ApiError) -> Self {
        NodeError::Api(e)
    }
}
