// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Rect;

use crate::layout::TextMetrics;
use crate::style::{FontSpec, FormatRun, Paragraph, ParagraphStyle};
use crate::LayoutContext;

use super::{MonoShaper, SimpleAnalyzer, TestFonts};

/// Base point size of the test paragraphs.
pub(crate) const SIZE: f32 = 10.0;
/// Advance of one monospace character at [`SIZE`].
pub(crate) const CHAR_W: f32 = MonoShaper::ADVANCE_EM * SIZE;
/// Height of one row of the test line grid.
pub(crate) const LINE_H: f32 = 10.0;

/// Paragraph style used throughout the tests: 10pt, solid leading.
pub(crate) fn style() -> ParagraphStyle<'static> {
    ParagraphStyle {
        size: SIZE,
        leading: 1.0,
        ..ParagraphStyle::default()
    }
}

/// One default-styled format run covering `text`.
pub(crate) fn runs_for(text: &str) -> Vec<FormatRun<'static>> {
    vec![FormatRun::new(
        0..text.chars().count(),
        FontSpec::new("mono"),
        SIZE,
    )]
}

/// Typesets `text` as a plain paragraph into a region of the given width.
pub(crate) fn typeset(ctx: &mut LayoutContext, text: &str, width: f64) -> TextMetrics {
    let runs = runs_for(text);
    let paragraph = Paragraph {
        text,
        runs: &runs,
        style: style(),
    };
    typeset_para(ctx, &paragraph, Rect::new(0., 0., width, 1000.), &[])
}

/// Typesets an arbitrary paragraph, panicking on pipeline errors.
pub(crate) fn typeset_para(
    ctx: &mut LayoutContext,
    paragraph: &Paragraph<'_>,
    region: Rect,
    obstructions: &[Rect],
) -> TextMetrics {
    ctx.typeset(
        &SimpleAnalyzer,
        &MonoShaper,
        &TestFonts,
        paragraph,
        region,
        obstructions,
    )
    .expect("typeset")
}
