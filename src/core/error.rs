//! Error taxonomy for inventory operations
//!
//! Every remote call resolves to one of these variants so callers can decide
//! between a banner message and a per-operation rejection.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::config::ConfigError;
use crate::schema::ValidationFailure;

/// Errors surfaced by the inventory client and the product store
#[derive(Debug, Error, Diagnostic)]
pub enum InventoryError {
    /// The request never reached the service or the response never arrived
    #[error("could not reach the inventory service: {message}")]
    #[diagnostic(
        code(invman::network),
        help("check that the service is running and that --base-url is correct")
    )]
    Network { message: String },

    /// The service answered with a non-2xx status
    #[error("inventory service returned {status}: {message}")]
    #[diagnostic(code(invman::server))]
    Server { status: u16, message: String },

    /// Form input was rejected before submission
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationFailure),

    /// A 2xx response whose body does not match the contract
    #[error("unexpected response body from the inventory service: {message}")]
    #[diagnostic(code(invman::decode))]
    Decode { message: String },

    /// The client could not be built from its configuration
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// No product with this id exists in any page
    #[error("no product found with id '{id}'")]
    #[diagnostic(
        code(invman::not_found),
        help("run `invman product list --format id` to see existing ids")
    )]
    NotFound { id: String },
}

impl InventoryError {
    /// Whether the failure came from transport rather than from the service
    pub fn is_network(&self) -> bool {
        matches!(self, InventoryError::Network { .. })
    }

    /// HTTP status for server errors
    pub fn status(&self) -> Option<u16> {
        match self {
            InventoryError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            InventoryError::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            InventoryError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            InventoryError::Network {
                message: err.to_string(),
            }
        }
    }
}

pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = InventoryError::Server {
            status: 404,
            message: "Product not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "inventory service returned 404: Product not found"
        );
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_error_is_network() {
        let err = InventoryError::Network {
            message: "connection refused".to_string(),
        };
        assert!(err.is_network());
        assert_eq!(err.status(), None);
    }
}
