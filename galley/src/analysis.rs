// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract with the text-analysis collaborator.
//!
//! Galley never classifies raw text itself: script identification, bidi
//! resolution and line-break-opportunity classification are performed by an
//! external analyzer which fills one [`CharAnalysis`] per character. The
//! analyzer may in turn query the paragraph being analyzed through
//! [`AnalysisSource`], a segmenting callback surface the pipeline implements
//! on top of the caller's formatting runs.

use core::ops::Range;

/// Identifier for the script of a character, as assigned by the analyzer.
///
/// Galley only compares script ids for equality when segmenting shaping
/// runs; the numbering scheme belongs to the analyzer.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Script(pub u16);

/// Identifier for a number-substitution method supplied by the caller.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct NumberSubstitution(pub u32);

/// Classification of the line-break opportunity on one side of a character.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum BreakCondition {
    /// No opinion; the opposite side of the neighboring character decides.
    #[default]
    Neutral,
    /// A line break is allowed here.
    CanBreak,
    /// A line break is forbidden here.
    MayNotBreak,
    /// A line break is mandatory here.
    MustBreak,
}

/// Per-character result of text analysis.
#[derive(Copy, Clone, Default, Debug)]
pub struct CharAnalysis {
    /// Script of the character.
    pub script: Script,
    /// Resolved bidi embedding level (even = LTR, odd = RTL).
    pub bidi_level: u8,
    /// Break opportunity before the character.
    pub break_before: BreakCondition,
    /// Break opportunity after the character.
    pub break_after: BreakCondition,
    /// Whether the character is whitespace.
    pub is_whitespace: bool,
    /// Whether the character is a soft (conditional) hyphen.
    pub is_soft_hyphen: bool,
}

/// Segmenting queries the analyzer may issue against the paragraph.
///
/// Both queries return the value at a position together with the longest
/// contiguous range over which that value holds, so the analyzer can consume
/// the paragraph run-by-run rather than character-by-character.
pub trait AnalysisSource {
    /// Returns the locale name in effect at `index` and the longest range
    /// of characters sharing it.
    fn locale_at(&self, index: usize) -> (&str, Range<usize>);

    /// Returns the number-substitution method in effect at `index`, if any,
    /// and the longest range of characters sharing it.
    fn number_substitution_at(&self, index: usize)
        -> (Option<NumberSubstitution>, Range<usize>);
}

/// Error reported by a text analyzer.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AnalysisError(pub String);

/// The text-analysis collaborator.
pub trait TextAnalyzer {
    /// Analyzes `text`, pushing one [`CharAnalysis`] per `char` onto `out`,
    /// and returns the paragraph's base bidi level.
    ///
    /// `out` is cleared by the caller before the call.
    fn analyze(
        &self,
        text: &str,
        source: &dyn AnalysisSource,
        out: &mut Vec<CharAnalysis>,
    ) -> Result<u8, AnalysisError>;
}

impl BreakCondition {
    /// Combines the break-after condition of a character with the
    /// break-before condition of its successor. The more restrictive side
    /// wins, except that a mandatory break always wins.
    pub(crate) fn combine(self, other: Self) -> Self {
        use BreakCondition::*;
        match (self, other) {
            (MustBreak, _) | (_, MustBreak) => MustBreak,
            (MayNotBreak, _) | (_, MayNotBreak) => MayNotBreak,
            (CanBreak, _) | (_, CanBreak) => CanBreak,
            (Neutral, Neutral) => Neutral,
        }
    }
}
