// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optimal-fit line layout for rich, bidirectional text.
//!
//! Galley turns a paragraph of pre-analyzed, pre-shaped text into a
//! sequence of visually placed lines, choosing break positions that
//! minimize a global badness cost rather than greedily filling each line.
//! Lines flow around caller-supplied obstruction rectangles and floated
//! inline objects, runs are reordered for bidirectional text, and the
//! result answers hit-testing and text-index queries.
//!
//! Text analysis, glyph shaping and font resolution are collaborator
//! traits ([`TextAnalyzer`], [`GlyphShaper`], [`FontResolver`]) the
//! embedding application implements; galley owns everything between those
//! seams and the final pixel-positioned clusters.

mod analysis;
mod context;
mod error;
mod font;
mod resolve;
mod shape;
mod util;

pub mod layout;
pub mod style;

#[cfg(test)]
mod tests;

pub use analysis::{
    AnalysisError, AnalysisSource, BreakCondition, CharAnalysis, NumberSubstitution, Script,
    TextAnalyzer,
};
pub use context::LayoutContext;
pub use error::LayoutError;
pub use font::{FontError, FontHandle, FontMetrics, FontQuery, FontResolver};
pub use layout::TextMetrics;
pub use shape::{GlyphShaper, ShapeBuffer, ShapeError, ShapeRequest};
pub use style::{Alignment, FormatRun, Paragraph, ParagraphStyle};

pub use peniko::kurbo::Rect;
