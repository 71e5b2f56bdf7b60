// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for the layout pipeline.

use crate::analysis::AnalysisError;
use crate::shape::ShapeError;

/// Error produced by the top-level layout entry points.
///
/// Recoverable conditions (shaping buffer growth, tolerance escalation and
/// the final panic fallback of the line breaker) are handled internally and
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// A precondition on the paragraph, region or obstruction inputs was
    /// violated. The layout call was aborted before any stage ran.
    #[error("invalid layout input: {0}")]
    InvalidInput(&'static str),
    /// The text-analysis collaborator failed.
    #[error("text analysis failed")]
    Analysis(#[from] AnalysisError),
    /// The glyph-shaping or font-resolution collaborator failed.
    #[error("glyph shaping failed")]
    Shaping(#[from] ShapeError),
}
