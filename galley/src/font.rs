// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contract with the font-resolution collaborator.

use hashbrown::HashMap;

use crate::style::{FontSpec, FontStretch, FontStyle, FontWeight};

/// Key for resolving and caching a font.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct FontQuery {
    /// Family name.
    pub family: String,
    /// Visual style.
    pub style: FontStyle,
    /// Weight.
    pub weight: FontWeight,
    /// Width class.
    pub stretch: FontStretch,
}

impl FontQuery {
    pub(crate) fn from_spec(spec: &FontSpec<'_>) -> Self {
        Self {
            family: spec.family.to_owned(),
            style: spec.style,
            weight: spec.weight,
            stretch: spec.stretch,
        }
    }
}

/// Scalable metrics of a resolved font, in font design units.
///
/// Values are converted to pixels by `value * point_size / units_per_em`.
/// Positions follow the usual font convention: positive y is above the
/// baseline, so underline positions are typically negative.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontMetrics {
    /// Design units per em.
    pub units_per_em: u16,
    /// Distance from baseline to the top of the em box.
    pub ascent: i32,
    /// Distance from baseline to the bottom of the em box (positive).
    pub descent: i32,
    /// Recommended additional spacing between lines.
    pub line_gap: i32,
    /// Position of the underline relative to the baseline.
    pub underline_position: i32,
    /// Thickness of the underline.
    pub underline_thickness: i32,
    /// Position of the strikethrough relative to the baseline.
    pub strikethrough_position: i32,
    /// Thickness of the strikethrough.
    pub strikethrough_thickness: i32,
}

impl FontMetrics {
    /// Converts a design-unit value to pixels at the given point size.
    pub fn scale(&self, value: i32, point_size: f32) -> f32 {
        value as f32 * point_size / self.units_per_em.max(1) as f32
    }
}

/// A resolved font: a cheap, copyable identifier plus its metrics.
///
/// The identifier is opaque to galley; it is carried through to the output
/// so renderers can recover the font a cluster was shaped with.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontHandle {
    /// Resolver-assigned identifier.
    pub id: u32,
    /// Metrics of the font.
    pub metrics: FontMetrics,
}

/// Error reported by a font resolver.
#[derive(Debug, thiserror::Error)]
#[error("no font for family {family:?}")]
pub struct FontError {
    /// The family that failed to resolve.
    pub family: String,
}

/// The font-resolution collaborator.
pub trait FontResolver {
    /// Resolves a query to a font handle.
    fn resolve(&self, query: &FontQuery) -> Result<FontHandle, FontError>;
}

/// Memoizes resolver lookups for the duration of a context's lifetime.
#[derive(Default, Debug)]
pub(crate) struct FontCache {
    map: HashMap<FontQuery, FontHandle>,
}

impl FontCache {
    pub(crate) fn get(
        &mut self,
        resolver: &impl FontResolver,
        query: FontQuery,
    ) -> Result<FontHandle, FontError> {
        if let Some(handle) = self.map.get(&query) {
            return Ok(*handle);
        }
        let handle = resolver.resolve(&query)?;
        self.map.insert(query, handle);
        Ok(handle)
    }
}
