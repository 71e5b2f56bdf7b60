// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic mock collaborators. The shaper is monospaced so every
//! expected position in the tests is computable by hand.

use crate::analysis::{
    AnalysisError, AnalysisSource, BreakCondition, CharAnalysis, Script, TextAnalyzer,
};
use crate::font::{FontError, FontHandle, FontMetrics, FontQuery, FontResolver};
use crate::layout::Glyph;
use crate::shape::{GlyphShaper, ShapeBuffer, ShapeError, ShapeRequest};

const LATIN: Script = Script(1);
const HEBREW: Script = Script(2);
const CJK: Script = Script(3);

fn is_hebrew(c: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&c)
}

fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Table-driven stand-in for a real text analyzer: spaces break, newlines
/// must break, no-break spaces forbid breaks, Hebrew is right-to-left and
/// ideographs break on both sides.
pub(crate) struct SimpleAnalyzer;

impl TextAnalyzer for SimpleAnalyzer {
    fn analyze(
        &self,
        text: &str,
        _source: &dyn AnalysisSource,
        out: &mut Vec<CharAnalysis>,
    ) -> Result<u8, AnalysisError> {
        let base: u8 = text
            .chars()
            .find_map(|c| {
                if is_hebrew(c) {
                    Some(1)
                } else if c.is_alphanumeric() {
                    Some(0)
                } else {
                    None
                }
            })
            .unwrap_or(0);
        for c in text.chars() {
            let mut a = CharAnalysis {
                script: if is_hebrew(c) {
                    HEBREW
                } else if is_cjk(c) {
                    CJK
                } else {
                    LATIN
                },
                bidi_level: if is_hebrew(c) {
                    1
                } else if base == 1 {
                    if c.is_alphanumeric() { 2 } else { 1 }
                } else {
                    0
                },
                ..CharAnalysis::default()
            };
            match c {
                ' ' => {
                    a.is_whitespace = true;
                    a.break_after = BreakCondition::CanBreak;
                }
                '\n' => {
                    a.is_whitespace = true;
                    a.break_after = BreakCondition::MustBreak;
                }
                '\u{00A0}' => {
                    a.is_whitespace = true;
                    a.break_before = BreakCondition::MayNotBreak;
                    a.break_after = BreakCondition::MayNotBreak;
                }
                '\u{00AD}' => {
                    a.is_soft_hyphen = true;
                    a.break_after = BreakCondition::CanBreak;
                }
                c if is_cjk(c) => {
                    a.break_before = BreakCondition::CanBreak;
                    a.break_after = BreakCondition::CanBreak;
                }
                _ => {}
            }
            out.push(a);
        }
        Ok(base)
    }
}

/// Monospace shaper: one glyph per character, advance `0.5 em`, newlines
/// zero-width. Honors the buffer-capacity protocol.
#[derive(Default)]
pub(crate) struct MonoShaper;

impl MonoShaper {
    pub(crate) const ADVANCE_EM: f32 = 0.5;
}

impl GlyphShaper for MonoShaper {
    fn shape(&self, request: &ShapeRequest<'_>, out: &mut ShapeBuffer) -> Result<(), ShapeError> {
        if request.chars.len() > out.capacity() {
            return Err(ShapeError::InsufficientCapacity {
                needed: request.chars.len(),
            });
        }
        for (i, c) in request.chars.iter().enumerate() {
            let advance = if *c == '\n' {
                0.
            } else {
                Self::ADVANCE_EM * request.size
            };
            out.glyphs.push(Glyph {
                id: *c as u32,
                x: 0.,
                y: 0.,
                advance,
            });
            out.cluster_map.push(i as u32);
        }
        Ok(())
    }
}

/// Resolver with one face: 1000 upem, ascent 800, descent 200.
pub(crate) struct TestFonts;

impl FontResolver for TestFonts {
    fn resolve(&self, _query: &FontQuery) -> Result<FontHandle, FontError> {
        Ok(FontHandle {
            id: 1,
            metrics: FontMetrics {
                units_per_em: 1000,
                ascent: 800,
                descent: 200,
                line_gap: 0,
                underline_position: -100,
                underline_thickness: 50,
                strikethrough_position: 300,
                strikethrough_thickness: 50,
            },
        })
    }
}
