// SPDX-License-Identifier: Apache-2.0

use crate::source::SourceError;
use verdant_cards::CardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TraversalErrorCode {
    UnknownEntity,
    UnknownInstance,
    ViewNotFound,
    ViewKindMismatch,
    RootMismatch,
    DepthCeilingExceeded,
    Source,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalError {
    pub code: TraversalErrorCode,
    pub message: String,
}

impl TraversalError {
    #[must_use]
    pub fn new(code: TraversalErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Structural mismatch between a request and a view's declared
    /// contract. Surfaced as 403 and logged as a security-relevant
    /// event, never swallowed.
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self.code,
            TraversalErrorCode::ViewNotFound
                | TraversalErrorCode::ViewKindMismatch
                | TraversalErrorCode::RootMismatch
                | TraversalErrorCode::DepthCeilingExceeded
        )
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self.code,
            TraversalErrorCode::UnknownEntity | TraversalErrorCode::UnknownInstance
        )
    }
}

impl std::fmt::Display for TraversalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for TraversalError {}

impl From<CardError> for TraversalError {
    fn from(value: CardError) -> Self {
        match value {
            CardError::NotFound(entity_type) => Self::new(
                TraversalErrorCode::UnknownEntity,
                format!("unknown entity type {entity_type:?}"),
            ),
            // Anything else cannot exist past bootstrap; if it surfaces
            // here the cache itself is broken.
            other => Self::new(TraversalErrorCode::Source, other.to_string()),
        }
    }
}

impl From<SourceError> for TraversalError {
    fn from(value: SourceError) -> Self {
        Self::new(
            TraversalErrorCode::Source,
            format!("instance source failure: {value}"),
        )
    }
}
