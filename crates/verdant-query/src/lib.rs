// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! View-scoped graph traversal and impact analysis.
//!
//! Both services are read-only and hold no per-request state: every
//! invocation allocates its own queue, visited set, and accumulators, so
//! arbitrarily many traversals can run concurrently against the shared
//! immutable card cache.

mod error;
mod graph;
mod guard;
mod impact;
mod source;
mod spec;

pub use error::{TraversalError, TraversalErrorCode};
pub use graph::GraphService;
pub use guard::{GraphGuard, ImpactGuard};
pub use impact::ImpactService;
pub use source::{
    FixtureData, FixtureInstance, FixtureRelated, FixtureSource, InstanceRecord, InstanceSource,
    SourceError,
};
pub use spec::{
    NodeFilter, TraversalSpec, GRAPH_DEFAULT_DEPTH, IMPACT_DEFAULT_DEPTH, IMPACT_DEPTH_CEILING,
};

pub const CRATE_NAME: &str = "verdant-query";
