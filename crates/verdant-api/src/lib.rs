// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Wire contract for the graph/impact read surface.

mod dto;
mod errors;

pub use dto::{
    CardListResponseDto, CardResponseDto, GraphEdgeDto, GraphNodeDto, GraphResponseDto,
    ImpactItemDto, ImpactReportDto, ImpactRootDto, ImpactSummaryDto, RegistryStatsDto, VersionDto,
};
pub use errors::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "verdant-api";
pub const API_VERSION: &str = "v1";
