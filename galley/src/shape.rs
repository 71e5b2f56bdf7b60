// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shaping-run segmentation and the contract with the glyph-shaping
//! collaborator.
//!
//! Consecutive characters sharing a format run, script, bidi level and
//! locale are grouped into shaping runs. Each run is handed to the
//! [`GlyphShaper`] once; a shaper reporting
//! [`ShapeError::InsufficientCapacity`] has its buffer grown and is retried,
//! invisibly to the caller.

use log::trace;

use crate::analysis::{BreakCondition, Script};
use crate::error::LayoutError;
use crate::font::{FontCache, FontError, FontHandle, FontQuery, FontResolver};
use crate::layout::data::{
    ClusterData, ContentType, Glyph, LayoutData, RunData, SOFT_HYPHEN, WHITESPACE,
};
use crate::resolve::CharFormat;
use crate::style::{FontFeature, ObjectPlacement, Paragraph};
use crate::util::nearly_zero;

/// One run of text to be shaped: uniform font, script, bidi and locale.
#[derive(Debug)]
pub struct ShapeRequest<'a> {
    /// Characters of the run, in logical order.
    pub chars: &'a [char],
    /// Script of the run.
    pub script: Script,
    /// Bidi level of the run.
    pub bidi_level: u8,
    /// Locale of the run.
    pub locale: &'a str,
    /// Font to shape with.
    pub font: FontHandle,
    /// Point size.
    pub size: f32,
    /// OpenType feature settings.
    pub features: &'a [FontFeature],
}

/// Output buffer a shaper fills.
///
/// A shaper writes at most [`capacity`](Self::capacity) glyphs; if that is
/// not enough it reports [`ShapeError::InsufficientCapacity`] with the size
/// it needs and is retried with a grown buffer. `cluster_map` holds one
/// entry per character of the request: the index of the first glyph of the
/// character's cluster, non-decreasing across the run.
#[derive(Debug)]
pub struct ShapeBuffer {
    /// Shaped glyphs, in logical cluster order.
    pub glyphs: Vec<Glyph>,
    /// Character-to-glyph cluster map.
    pub cluster_map: Vec<u32>,
    capacity: usize,
}

impl Default for ShapeBuffer {
    fn default() -> Self {
        Self {
            glyphs: Vec::new(),
            cluster_map: Vec::new(),
            capacity: 256,
        }
    }
}

impl ShapeBuffer {
    /// Maximum number of glyphs a shaper may write.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.glyphs.clear();
        self.cluster_map.clear();
    }

    fn grow(&mut self, needed: usize) {
        self.capacity = needed.max(self.capacity * 2);
        self.glyphs.reserve(self.capacity);
    }
}

/// Error reported by a glyph shaper.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// The run needs more glyph storage than the buffer allows. Recovered
    /// internally by growing the buffer and retrying.
    #[error("shaping buffer too small, {needed} glyphs needed")]
    InsufficientCapacity {
        /// Glyph capacity the run requires.
        needed: usize,
    },
    /// Font resolution failed.
    #[error(transparent)]
    Font(#[from] FontError),
    /// The shaping backend failed.
    #[error("{0}")]
    Backend(String),
}

/// The glyph-shaping collaborator.
pub trait GlyphShaper {
    /// Shapes one run into `out`.
    fn shape(&self, request: &ShapeRequest<'_>, out: &mut ShapeBuffer) -> Result<(), ShapeError>;
}

/// Groups characters into shaping runs, shapes each and fills the layout's
/// run, cluster and glyph arenas.
pub(crate) fn shape_text(
    chars: &[char],
    formats: &[CharFormat],
    paragraph: &Paragraph<'_>,
    resolver: &impl FontResolver,
    shaper: &impl GlyphShaper,
    fonts: &mut FontCache,
    buffer: &mut ShapeBuffer,
    data: &mut LayoutData,
) -> Result<(), LayoutError> {
    let style = &paragraph.style;
    let mut start = 0;
    while start < chars.len() {
        let format = &formats[start];
        let run = &paragraph.runs[format.style_index as usize];
        let locale = run.locale.unwrap_or(style.base_locale);
        let mut end = start + 1;
        while end < chars.len() {
            let next = &formats[end];
            if next.style_index != format.style_index
                || next.script != format.script
                || next.bidi_level != format.bidi_level
            {
                break;
            }
            end += 1;
        }

        if let Some(object) = &run.object {
            push_object_run(data, format, start..end, object.placement, object.width);
        } else {
            let font = fonts
                .get(resolver, FontQuery::from_spec(&run.font))
                .map_err(ShapeError::from)?;
            let request = ShapeRequest {
                chars: &chars[start..end],
                script: format.script,
                bidi_level: format.bidi_level,
                locale,
                font,
                size: run.size,
                features: run.features,
            };
            shape_run(shaper, &request, buffer)?;
            push_shaped_run(data, formats, &request, buffer, start, style.tracking, style.spacing);
        }
        start = end;
    }

    finish_break_conditions(data);
    Ok(())
}

/// Invokes the shaper, growing the buffer on capacity exhaustion.
fn shape_run(
    shaper: &impl GlyphShaper,
    request: &ShapeRequest<'_>,
    buffer: &mut ShapeBuffer,
) -> Result<(), ShapeError> {
    loop {
        buffer.clear();
        match shaper.shape(request, buffer) {
            Ok(()) => {
                if buffer.cluster_map.len() != request.chars.len() {
                    return Err(ShapeError::Backend(
                        "shaper returned a cluster map of the wrong length".into(),
                    ));
                }
                return Ok(());
            }
            Err(ShapeError::InsufficientCapacity { needed }) => {
                if needed <= buffer.capacity() {
                    return Err(ShapeError::Backend(
                        "shaper requested a capacity it already had".into(),
                    ));
                }
                trace!("growing shape buffer to {needed} glyphs");
                buffer.grow(needed);
            }
            Err(err) => return Err(err),
        }
    }
}

/// Emits a single cluster covering an inline-object run.
fn push_object_run(
    data: &mut LayoutData,
    format: &CharFormat,
    text_range: core::ops::Range<usize>,
    placement: ObjectPlacement,
    width: f32,
) {
    let (content, advance) = match placement {
        ObjectPlacement::Inline => (ContentType::Inline, width),
        // Floaters take no inline width; they occupy rows of the line grid
        // once resolved.
        ObjectPlacement::Float { .. } => (ContentType::Floater, 0.),
    };
    let glyph_start = data.glyphs.len();
    data.clusters.push(ClusterData {
        text_range: text_range.start as u32..text_range.end as u32,
        glyph_range: glyph_start as u32..glyph_start as u32,
        advance,
        content,
        bidi_level: format.bidi_level,
        style_index: format.style_index,
        run_index: data.runs.len() as u32,
        break_before: format.break_before,
        break_after: format.break_after,
        flags: 0,
    });
    data.runs.push(RunData { font: None, size: 0. });
}

/// Converts one shaped run into clusters and glyphs.
fn push_shaped_run(
    data: &mut LayoutData,
    formats: &[CharFormat],
    request: &ShapeRequest<'_>,
    buffer: &ShapeBuffer,
    char_base: usize,
    tracking_em: f32,
    spacing_em: f32,
) {
    let tracking = tracking_em * request.size;
    let spacing = spacing_em * request.size;
    let run_glyph_start = data.glyphs.len();
    data.glyphs.extend_from_slice(&buffer.glyphs);

    let char_count = request.chars.len();
    let mut i = 0;
    while i < char_count {
        let glyph_first = buffer.cluster_map[i];
        let mut j = i + 1;
        while j < char_count && buffer.cluster_map[j] == glyph_first {
            j += 1;
        }
        let glyph_last = if j < char_count {
            buffer.cluster_map[j]
        } else {
            buffer.glyphs.len() as u32
        };

        let format = &formats[char_base + i];
        let mut flags = 0;
        if formats[char_base + i..char_base + j].iter().all(CharFormat::is_whitespace) {
            flags |= WHITESPACE;
        }
        if format.is_soft_hyphen() {
            flags |= SOFT_HYPHEN;
        }
        let mut advance: f32 = buffer.glyphs[glyph_first as usize..glyph_last as usize]
            .iter()
            .map(|g| g.advance)
            .sum();
        if !nearly_zero(tracking) {
            advance += tracking;
        }
        if flags & WHITESPACE != 0 && !nearly_zero(spacing) {
            advance += spacing;
        }

        let content = if format.is_soft_hyphen() {
            ContentType::Format
        } else {
            ContentType::Normal
        };
        data.clusters.push(ClusterData {
            text_range: (char_base + i) as u32..(char_base + j) as u32,
            glyph_range: run_glyph_start as u32 + glyph_first..run_glyph_start as u32 + glyph_last,
            advance,
            content,
            bidi_level: request.bidi_level,
            style_index: format.style_index,
            run_index: data.runs.len() as u32,
            break_before: format.break_before,
            break_after: formats[char_base + j - 1].break_after,
            flags,
        });
        i = j;
    }

    data.runs.push(RunData {
        font: Some(request.font),
        size: request.size,
    });
}

/// Combines adjacent break conditions and classifies control clusters.
fn finish_break_conditions(data: &mut LayoutData) {
    let len = data.clusters.len();
    for i in 0..len {
        let next_before = if i + 1 < len {
            data.clusters[i + 1].break_before
        } else {
            BreakCondition::MustBreak
        };
        let cluster = &mut data.clusters[i];
        cluster.break_after = cluster.break_after.combine(next_before);
        if cluster.break_after == BreakCondition::MustBreak
            && cluster.content == ContentType::Normal
            && cluster.is_whitespace()
        {
            // Hard-break controls occupy an index but have no visible shape.
            cluster.content = ContentType::Format;
        }
    }
}
