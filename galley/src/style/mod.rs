// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input model: formatting runs and paragraph-level settings.

mod font;

pub use font::{FontFeature, FontSpec, FontStretch, FontStyle, FontWeight};

use core::ops::Range;

use crate::analysis::NumberSubstitution;

/// Horizontal alignment of a paragraph's lines.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum Alignment {
    /// Align lines to the leading edge.
    #[default]
    Leading,
    /// Align lines to the trailing edge.
    Trailing,
    /// Center each line.
    Center,
    /// Justify by stretching and shrinking inter-word glue; the last line
    /// of the paragraph stays ragged.
    Stretch,
}

/// Which edge of the layout region a floated object is carved out of.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FloatEdge {
    /// The edge lines start from.
    Leading,
    /// The edge lines end at.
    Trailing,
}

/// Vertical anchor of a floated object.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FloatAnchor {
    /// The top of the paragraph; resolvable before line breaking begins.
    Paragraph,
    /// The line carrying the object; resolvable only once breaking reaches
    /// that line.
    Line,
}

/// Placement of an inline object.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum ObjectPlacement {
    /// The object flows with the text as a fixed-width box.
    Inline,
    /// The object occupies rectangular space carved out of the line grid.
    Float {
        /// Horizontal alignment of the carved rectangle.
        edge: FloatEdge,
        /// Vertical anchor of the carved rectangle.
        anchor: FloatAnchor,
    },
}

/// An object embedded in the text in place of the characters of its run.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct InlineObject {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// How the object participates in layout.
    pub placement: ObjectPlacement,
}

/// A span of characters sharing one set of formatting properties.
///
/// Runs must be sorted, non-overlapping and together cover the paragraph's
/// characters exactly. Ranges are in characters, not bytes.
#[derive(Clone, PartialEq, Debug)]
pub struct FormatRun<'a> {
    /// Character range the run covers.
    pub range: Range<usize>,
    /// Font selection properties.
    pub font: FontSpec<'a>,
    /// Point size.
    pub size: f32,
    /// OpenType feature settings.
    pub features: &'a [FontFeature],
    /// Locale override; the paragraph's base locale applies when `None`.
    pub locale: Option<&'a str>,
    /// Number-substitution method for digits in the run.
    pub number_substitution: Option<NumberSubstitution>,
    /// Object replacing the run's characters, if any.
    pub object: Option<InlineObject>,
}

impl<'a> FormatRun<'a> {
    /// A run with default properties over the given range.
    pub fn new(range: Range<usize>, font: FontSpec<'a>, size: f32) -> Self {
        Self {
            range,
            font,
            size,
            features: &[],
            locale: None,
            number_substitution: None,
            object: None,
        }
    }
}

/// Paragraph-level settings.
///
/// Em-relative values (`leading`, `indent`, `tracking`, `spacing`) resolve
/// against `size` for the line grid and against each cluster's own point
/// size for per-cluster spacing.
#[derive(Clone, PartialEq, Debug)]
pub struct ParagraphStyle<'a> {
    /// Overall line alignment.
    pub alignment: Alignment,
    /// Base point size of the paragraph; sets the line-grid height together
    /// with `leading`.
    pub size: f32,
    /// Line height in em.
    pub leading: f32,
    /// First-line indentation in em.
    pub indent: f32,
    /// Tracking (additional advance per cluster) in em.
    pub tracking: f32,
    /// Additional inter-word spacing in em.
    pub spacing: f32,
    /// Base locale of the paragraph.
    pub base_locale: &'a str,
}

impl Default for ParagraphStyle<'_> {
    fn default() -> Self {
        Self {
            alignment: Alignment::default(),
            size: 16.0,
            leading: 1.2,
            indent: 0.0,
            tracking: 0.0,
            spacing: 0.0,
            base_locale: "en-US",
        }
    }
}

impl ParagraphStyle<'_> {
    /// Height of one row of the line grid, in pixels.
    pub(crate) fn line_height(&self) -> f32 {
        self.leading * self.size
    }
}

/// A paragraph to be typeset: text, formatting runs and settings.
#[derive(Clone, Debug)]
pub struct Paragraph<'a> {
    /// The full text.
    pub text: &'a str,
    /// Formatting runs covering the text.
    pub runs: &'a [FormatRun<'a>],
    /// Paragraph-level settings.
    pub style: ParagraphStyle<'a>,
}
