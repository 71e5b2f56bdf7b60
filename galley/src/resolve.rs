// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character format model: one dense record per character, merging the
//! caller's formatting runs with the analyzer's results.

use core::ops::Range;

use crate::analysis::{
    AnalysisSource, BreakCondition, CharAnalysis, NumberSubstitution, Script,
};
use crate::error::LayoutError;
use crate::style::{FormatRun, Paragraph};

pub(crate) const WHITESPACE: u8 = 1;
pub(crate) const SOFT_HYPHEN: u8 = 2;

/// Merged per-character formatting and analysis. Pure data.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CharFormat {
    /// Index of the owning [`FormatRun`].
    pub(crate) style_index: u16,
    /// Script of the character.
    pub(crate) script: Script,
    /// Resolved bidi level.
    pub(crate) bidi_level: u8,
    /// Break opportunity before the character.
    pub(crate) break_before: BreakCondition,
    /// Break opportunity after the character.
    pub(crate) break_after: BreakCondition,
    /// `WHITESPACE` / `SOFT_HYPHEN` bits.
    pub(crate) flags: u8,
}

impl CharFormat {
    pub(crate) fn is_whitespace(&self) -> bool {
        self.flags & WHITESPACE != 0
    }

    pub(crate) fn is_soft_hyphen(&self) -> bool {
        self.flags & SOFT_HYPHEN != 0
    }
}

/// Validates the paragraph inputs. Precondition violations fail fast here,
/// before any collaborator runs.
pub(crate) fn validate(paragraph: &Paragraph<'_>, char_len: usize) -> Result<(), LayoutError> {
    let style = &paragraph.style;
    if !(style.size.is_finite() && style.size > 0.0) {
        return Err(LayoutError::InvalidInput("paragraph size must be finite and positive"));
    }
    if !(style.leading.is_finite() && style.leading > 0.0) {
        return Err(LayoutError::InvalidInput("leading must be finite and positive"));
    }
    if !(style.indent.is_finite() && style.indent >= 0.0) {
        return Err(LayoutError::InvalidInput("indent must be finite and non-negative"));
    }
    if !style.tracking.is_finite() || !style.spacing.is_finite() {
        return Err(LayoutError::InvalidInput("tracking and spacing must be finite"));
    }
    let mut next = 0;
    for run in paragraph.runs {
        if run.range.start != next || run.range.end < run.range.start {
            return Err(LayoutError::InvalidInput(
                "format runs must be sorted, non-overlapping and contiguous",
            ));
        }
        if !(run.size.is_finite() && run.size > 0.0) {
            return Err(LayoutError::InvalidInput("run size must be finite and positive"));
        }
        if let Some(object) = &run.object {
            if !(object.width.is_finite()
                && object.width >= 0.0
                && object.height.is_finite()
                && object.height >= 0.0)
            {
                return Err(LayoutError::InvalidInput(
                    "inline object dimensions must be finite and non-negative",
                ));
            }
        }
        next = run.range.end;
    }
    if next != char_len {
        return Err(LayoutError::InvalidInput("format runs must cover the text exactly"));
    }
    if paragraph.runs.len() > u16::MAX as usize {
        return Err(LayoutError::InvalidInput("too many format runs"));
    }
    Ok(())
}

/// Builds the dense character format array from runs and analysis results.
///
/// `analysis` must hold one entry per character; the caller checks this
/// against the analyzer contract before calling.
pub(crate) fn resolve_formats(
    runs: &[FormatRun<'_>],
    analysis: &[CharAnalysis],
    out: &mut Vec<CharFormat>,
) {
    out.clear();
    out.reserve(analysis.len());
    for (style_index, run) in runs.iter().enumerate() {
        for index in run.range.clone() {
            let a = &analysis[index];
            let mut flags = 0;
            if a.is_whitespace {
                flags |= WHITESPACE;
            }
            if a.is_soft_hyphen {
                flags |= SOFT_HYPHEN;
            }
            out.push(CharFormat {
                style_index: style_index as u16,
                script: a.script,
                bidi_level: a.bidi_level,
                break_before: a.break_before,
                break_after: a.break_after,
                flags,
            });
        }
    }
}

/// [`AnalysisSource`] over the caller's formatting runs, giving the analyzer
/// its segmenting view of locales and number substitution.
pub(crate) struct FormatSource<'a> {
    runs: &'a [FormatRun<'a>],
    base_locale: &'a str,
    char_len: usize,
}

impl<'a> FormatSource<'a> {
    pub(crate) fn new(paragraph: &'a Paragraph<'a>, char_len: usize) -> Self {
        Self {
            runs: paragraph.runs,
            base_locale: paragraph.style.base_locale,
            char_len,
        }
    }

    fn run_at(&self, index: usize) -> Option<(usize, &FormatRun<'a>)> {
        self.runs
            .iter()
            .enumerate()
            .find(|(_, run)| run.range.contains(&index))
    }

    /// Extends a run's range over neighbors sharing the same value.
    fn segment<T: PartialEq>(
        &self,
        start_run: usize,
        value: &T,
        get: impl Fn(&FormatRun<'a>) -> T,
    ) -> Range<usize> {
        let mut lo = self.runs[start_run].range.start;
        let mut hi = self.runs[start_run].range.end;
        for run in self.runs[..start_run].iter().rev() {
            if get(run) == *value {
                lo = run.range.start;
            } else {
                break;
            }
        }
        for run in &self.runs[start_run + 1..] {
            if get(run) == *value {
                hi = run.range.end;
            } else {
                break;
            }
        }
        lo..hi
    }
}

impl AnalysisSource for FormatSource<'_> {
    fn locale_at(&self, index: usize) -> (&str, Range<usize>) {
        let Some((run_index, run)) = self.run_at(index) else {
            return (self.base_locale, 0..self.char_len);
        };
        let locale = run.locale.unwrap_or(self.base_locale);
        let base = self.base_locale;
        let range = self.segment(run_index, &locale, |r| r.locale.unwrap_or(base));
        (locale, range)
    }

    fn number_substitution_at(
        &self,
        index: usize,
    ) -> (Option<NumberSubstitution>, Range<usize>) {
        let Some((run_index, run)) = self.run_at(index) else {
            return (None, 0..self.char_len);
        };
        let value = run.number_substitution;
        let range = self.segment(run_index, &value, |r| r.number_substitution);
        (value, range)
    }
}
