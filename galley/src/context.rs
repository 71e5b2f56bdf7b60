// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context for layout.

use peniko::kurbo::Rect;

use crate::analysis::{AnalysisError, CharAnalysis, TextAnalyzer};
use crate::error::LayoutError;
use crate::font::{FontCache, FontResolver};
use crate::layout::item::{BreakIndex, LineItem};
use crate::layout::line::optimal::LineBreaker;
use crate::layout::typeset::{break_lines, build_items, TypesetState};
use crate::layout::{assemble, TextMetrics};
use crate::resolve::{self, CharFormat, FormatSource};
use crate::shape::{shape_text, GlyphShaper, ShapeBuffer};
use crate::style::{Alignment, Paragraph};

/// Context for typesetting paragraphs.
///
/// Owns every scratch buffer of the pipeline, so buffers are reused across
/// calls instead of reallocated. A context must be used from one caller at
/// a time: each call takes `&mut self` for its full duration and no state
/// leaks between calls.
#[derive(Default, Debug)]
pub struct LayoutContext {
    chars: Vec<char>,
    analysis: Vec<CharAnalysis>,
    formats: Vec<CharFormat>,
    fonts: FontCache,
    shape_buffer: ShapeBuffer,
    items: Vec<LineItem>,
    breaker: LineBreaker,
    breaks: Vec<BreakIndex>,
    state: TypesetState,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Typesets a paragraph into the given region, flowing around the
    /// caller's obstruction rectangles.
    pub fn typeset<A, S, F>(
        &mut self,
        analyzer: &A,
        shaper: &S,
        fonts: &F,
        paragraph: &Paragraph<'_>,
        region: Rect,
        obstructions: &[Rect],
    ) -> Result<TextMetrics, LayoutError>
    where
        A: TextAnalyzer,
        S: GlyphShaper,
        F: FontResolver,
    {
        let mut metrics = TextMetrics::new();
        self.typeset_into(analyzer, shaper, fonts, paragraph, region, obstructions, &mut metrics)?;
        Ok(metrics)
    }

    /// Typesets a paragraph, reusing the buffers of an existing metrics
    /// object. On error the metrics object is left cleared; results are
    /// never partially applied.
    pub fn typeset_into<A, S, F>(
        &mut self,
        analyzer: &A,
        shaper: &S,
        fonts: &F,
        paragraph: &Paragraph<'_>,
        region: Rect,
        obstructions: &[Rect],
        metrics: &mut TextMetrics,
    ) -> Result<(), LayoutError>
    where
        A: TextAnalyzer,
        S: GlyphShaper,
        F: FontResolver,
    {
        metrics.data.clear();
        validate_region(region, obstructions)?;
        self.chars.clear();
        self.chars.extend(paragraph.text.chars());
        resolve::validate(paragraph, self.chars.len())?;

        let source = FormatSource::new(paragraph, self.chars.len());
        self.analysis.clear();
        let base_level = analyzer.analyze(paragraph.text, &source, &mut self.analysis)?;
        if self.analysis.len() != self.chars.len() {
            return Err(
                AnalysisError("analyzer did not return one record per character".into()).into(),
            );
        }
        resolve::resolve_formats(paragraph.runs, &self.analysis, &mut self.formats);

        let data = &mut metrics.data;
        data.base_level = base_level;
        data.text_len = self.chars.len();
        data.line_height = paragraph.style.line_height();
        data.region = region;
        shape_text(
            &self.chars,
            &self.formats,
            paragraph,
            fonts,
            shaper,
            &mut self.fonts,
            &mut self.shape_buffer,
            data,
        )
        .inspect_err(|_| data.clear())?;

        let style = &paragraph.style;
        let justified = style.alignment == Alignment::Stretch;
        build_items(data, paragraph, justified, &mut self.items, &mut self.state);
        break_lines(
            &self.items,
            &mut self.state,
            &mut self.breaker,
            region,
            f64::from(data.line_height),
            f64::from(style.indent * style.size),
            base_level & 1 != 0,
            obstructions,
            &mut self.breaks,
        );
        assemble(
            data,
            paragraph,
            &self.items,
            &self.breaks,
            &mut self.state,
            style.alignment,
        );
        Ok(())
    }
}

fn validate_region(region: Rect, obstructions: &[Rect]) -> Result<(), LayoutError> {
    let finite =
        |r: &Rect| r.x0.is_finite() && r.x1.is_finite() && r.y0.is_finite() && r.y1.is_finite();
    if !finite(&region) || region.x1 <= region.x0 || region.y1 < region.y0 {
        return Err(LayoutError::InvalidInput(
            "layout region must be finite with positive width",
        ));
    }
    if !obstructions.iter().all(finite) {
        return Err(LayoutError::InvalidInput("obstruction rectangles must be finite"));
    }
    Ok(())
}
