// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use peniko::kurbo::Rect;

use crate::analysis::BreakCondition;
use crate::font::FontHandle;

/// What a cluster contributes to the line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum ContentType {
    /// Ordinary text.
    #[default]
    Normal,
    /// An inline object flowing with the text.
    Inline,
    /// An object carving space out of the line grid.
    Floater,
    /// A control or formatting character with no visible shape.
    Format,
}

/// Visibility of a formatted cluster.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum DisplayMode {
    /// Drawn normally.
    #[default]
    Visible,
    /// Occupies its position but draws nothing.
    Neutral,
    /// Eliminated by line breaking; zero width.
    Suppressed,
}

/// A shaped glyph.
#[derive(Copy, Clone, Default, PartialEq, Debug)]
pub struct Glyph {
    /// Glyph identifier in its font.
    pub id: u32,
    /// Horizontal offset from the pen position.
    pub x: f32,
    /// Vertical offset from the baseline.
    pub y: f32,
    /// Advance width.
    pub advance: f32,
}

pub(crate) const WHITESPACE: u16 = 1;
pub(crate) const SOFT_HYPHEN: u16 = 2;

/// Sentinel line index for formatted clusters outside the line flow.
pub(crate) const NO_LINE: u32 = u32::MAX;

/// A shaped cluster: the smallest indivisible unit of text plus glyphs.
#[derive(Clone, Debug)]
pub(crate) struct ClusterData {
    /// Range of source characters.
    pub(crate) text_range: Range<u32>,
    /// Range of glyphs in the layout's glyph arena.
    pub(crate) glyph_range: Range<u32>,
    /// Advance width, including tracking and word spacing.
    pub(crate) advance: f32,
    /// Content classification.
    pub(crate) content: ContentType,
    /// Bidi level.
    pub(crate) bidi_level: u8,
    /// Index of the owning format run.
    pub(crate) style_index: u16,
    /// Index of the owning shaping run.
    pub(crate) run_index: u32,
    /// Break opportunity before the cluster.
    pub(crate) break_before: BreakCondition,
    /// Break opportunity after the cluster.
    pub(crate) break_after: BreakCondition,
    /// `WHITESPACE` / `SOFT_HYPHEN` bits.
    pub(crate) flags: u16,
}

impl ClusterData {
    pub(crate) fn is_whitespace(&self) -> bool {
        self.flags & WHITESPACE != 0
    }

    pub(crate) fn is_soft_hyphen(&self) -> bool {
        self.flags & SOFT_HYPHEN != 0
    }
}

/// A shaped run: the font and size its clusters were shaped with.
#[derive(Clone, Debug)]
pub(crate) struct RunData {
    /// Font the run was shaped with; `None` for inline-object runs.
    pub(crate) font: Option<FontHandle>,
    /// Point size.
    pub(crate) size: f32,
}

/// Pixel metrics of a laid-out line.
#[derive(Copy, Clone, Default, Debug)]
pub struct LineMetrics {
    /// Maximum ascent over the line's runs.
    pub ascent: f32,
    /// Maximum descent over the line's runs.
    pub descent: f32,
    /// Absolute y position of the baseline.
    pub baseline: f32,
    /// Underline offset from the baseline (typically negative).
    pub underline_offset: f32,
    /// Underline thickness.
    pub underline_thickness: f32,
    /// Strikethrough offset from the baseline.
    pub strikethrough_offset: f32,
    /// Strikethrough thickness.
    pub strikethrough_thickness: f32,
    /// Sum of displayed advances.
    pub advance: f32,
    /// Advance of trailing whitespace included in `advance`.
    pub trailing_whitespace: f32,
}

/// A laid-out line.
#[derive(Clone, Debug)]
pub(crate) struct LineData {
    /// Range of formatted clusters, in visual order.
    pub(crate) formatted_range: Range<usize>,
    /// Adjustment ratio chosen by the breaker.
    pub(crate) ratio: f64,
    /// Whether the line was accepted in panic mode (may be overfull).
    pub(crate) overfull: bool,
    /// Bounding rectangle of the line's content.
    pub(crate) rect: Rect,
    /// Pixel metrics.
    pub(crate) metrics: LineMetrics,
}

/// Final placement of one cluster.
#[derive(Copy, Clone, Debug)]
pub(crate) struct FormattedCluster {
    /// Index of the cluster.
    pub(crate) cluster: u32,
    /// Line the cluster landed on, or [`NO_LINE`] for floaters.
    pub(crate) line: u32,
    /// Left edge in pixels.
    pub(crate) x: f32,
    /// Top edge in pixels.
    pub(crate) y: f32,
    /// Displayed width in pixels.
    pub(crate) width: f32,
    /// Height in pixels.
    pub(crate) height: f32,
    /// Visibility.
    pub(crate) display: DisplayMode,
}

/// Buffers for one paragraph layout. Reused across calls via [`Self::clear`].
#[derive(Clone, Default, Debug)]
pub(crate) struct LayoutData {
    pub(crate) base_level: u8,
    /// Paragraph length in characters.
    pub(crate) text_len: usize,
    /// Height of one row of the line grid.
    pub(crate) line_height: f32,
    /// The layout region.
    pub(crate) region: Rect,
    /// Whether any line was accepted in panic mode.
    pub(crate) overflowed: bool,

    // Output of shaping.
    pub(crate) runs: Vec<RunData>,
    pub(crate) clusters: Vec<ClusterData>,
    pub(crate) glyphs: Vec<Glyph>,

    // Output of line breaking and assembly.
    pub(crate) lines: Vec<LineData>,
    pub(crate) formatted: Vec<FormattedCluster>,
    /// Maps cluster index to its entry in `formatted`.
    pub(crate) cluster_to_formatted: Vec<u32>,
}

impl LayoutData {
    pub(crate) fn clear(&mut self) {
        self.base_level = 0;
        self.text_len = 0;
        self.line_height = 0.;
        self.region = Rect::ZERO;
        self.overflowed = false;
        self.runs.clear();
        self.clusters.clear();
        self.glyphs.clear();
        self.lines.clear();
        self.formatted.clear();
        self.cluster_to_formatted.clear();
    }

    /// Returns the cluster containing the given character index.
    pub(crate) fn cluster_for_index(&self, index: usize) -> Option<usize> {
        let index = index as u32;
        self.clusters
            .binary_search_by(|c| {
                if index < c.text_range.start {
                    core::cmp::Ordering::Greater
                } else if index >= c.text_range.end {
                    core::cmp::Ordering::Less
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .ok()
    }
}
