// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    MissingViewParameter,
    EntityNotFound,
    InstanceNotFound,
    SecurityViolation,
    RegistryUnavailable,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingViewParameter => "missing_view_parameter",
            Self::EntityNotFound => "entity_not_found",
            Self::InstanceNotFound => "instance_not_found",
            Self::SecurityViolation => "security_violation",
            Self::RegistryUnavailable => "registry_unavailable",
            Self::Internal => "internal",
        }
    }

    /// Canonical status mapping for the read surface: 400 for missing
    /// parameters, 404 for unknown type/instance, 403 for structural
    /// security violations, 5xx otherwise.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::MissingViewParameter => 400,
            Self::EntityNotFound | Self::InstanceNotFound => 404,
            Self::SecurityViolation => 403,
            Self::RegistryUnavailable => 503,
            Self::Internal => 500,
        }
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn missing_view(request_id: &str) -> Self {
        Self::new(
            ApiErrorCode::MissingViewParameter,
            "query parameter \"view\" is required",
            json!({"parameter": "view"}),
            request_id,
        )
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
