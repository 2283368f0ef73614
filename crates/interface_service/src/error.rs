//! Service error handling

use serde::Serialize;
use thiserror::Error;

use core_kernel::{PortError, TemporalError};
use domain_insights::InsightError;
use domain_settlement::SettlementError;

/// Errors returned by the application services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller is not an active member of the group
    #[error("Forbidden: {caller} is not a member of group {group}")]
    Forbidden {
        caller: String,
        group: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Ledger error: {0}")]
    Port(#[from] PortError),

    #[error("Unable to compute balances: {0}")]
    Settlement(#[from] SettlementError),

    #[error("Unable to compute insights: {0}")]
    Insight(#[from] InsightError),
}

impl From<TemporalError> for ServiceError {
    fn from(err: TemporalError) -> Self {
        ServiceError::BadRequest(err.to_string())
    }
}

/// Error body a request handler can return as-is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ServiceError {
    /// Whether the caller, not the system, is at fault
    pub fn is_client_error(&self) -> bool {
        match self {
            ServiceError::Forbidden { .. }
            | ServiceError::NotFound(_)
            | ServiceError::BadRequest(_) => true,
            ServiceError::Port(e) => matches!(e, PortError::NotFound { .. } | PortError::Validation { .. }),
            ServiceError::Configuration(_)
            | ServiceError::Settlement(_)
            | ServiceError::Insight(_) => false,
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Port(e) if e.is_transient())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Forbidden { .. } => "forbidden",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::Configuration(_) => "configuration_error",
            ServiceError::Port(PortError::NotFound { .. }) => "not_found",
            ServiceError::Port(_) => "ledger_unavailable",
            ServiceError::Settlement(SettlementError::Imbalanced { .. }) => "ledger_imbalanced",
            ServiceError::Settlement(_) => "ledger_inconsistent",
            ServiceError::Insight(_) => "insight_error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_client_error() {
        let err = ServiceError::Forbidden {
            caller: "MEM-1".to_string(),
            group: "GRP-1".to_string(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.to_response().error, "forbidden");
    }

    #[test]
    fn test_port_errors() {
        let missing: ServiceError = PortError::not_found("Group", "GRP-1").into();
        assert!(missing.is_client_error());
        assert_eq!(missing.code(), "not_found");

        let down: ServiceError = PortError::connection("store offline").into();
        assert!(!down.is_client_error());
        assert!(down.is_transient());
    }

    #[test]
    fn test_bad_month_is_bad_request() {
        let err: ServiceError = TemporalError::InvalidMonth("2024-13".to_string()).into();
        assert!(matches!(err, ServiceError::BadRequest(_)));
    }
}
