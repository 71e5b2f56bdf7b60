// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::font::FontHandle;

use super::{Cluster, TextMetrics};

/// A maximal span of a line's clusters sharing font, point size and bidi
/// level, in visual order.
#[derive(Clone, Debug)]
pub struct Run<'a> {
    pub(crate) layout: &'a TextMetrics,
    pub(crate) formatted_range: Range<usize>,
}

impl<'a> Run<'a> {
    fn shaping_run(&self) -> &'a crate::layout::data::RunData {
        let data = &self.layout.data;
        let cluster = &data.clusters[data.formatted[self.formatted_range.start].cluster as usize];
        &data.runs[cluster.run_index as usize]
    }

    /// Returns the font of the run, or `None` for inline-object runs.
    pub fn font(&self) -> Option<FontHandle> {
        self.shaping_run().font
    }

    /// Returns the point size of the run.
    pub fn font_size(&self) -> f32 {
        self.shaping_run().size
    }

    /// Returns the bidi level of the run.
    pub fn bidi_level(&self) -> u8 {
        let data = &self.layout.data;
        data.clusters[data.formatted[self.formatted_range.start].cluster as usize].bidi_level
    }

    /// Returns `true` if the run has right-to-left directionality.
    pub fn is_rtl(&self) -> bool {
        self.bidi_level() & 1 != 0
    }

    /// Returns the number of clusters in the run.
    pub fn len(&self) -> usize {
        self.formatted_range.len()
    }

    /// Returns `true` if the run is empty.
    pub fn is_empty(&self) -> bool {
        self.formatted_range.is_empty()
    }

    /// Returns an iterator over the run's clusters in visual order.
    pub fn clusters(&self) -> impl Iterator<Item = Cluster<'a>> + 'a + Clone {
        let layout = self.layout;
        self.formatted_range
            .clone()
            .map(move |formatted| Cluster { layout, formatted })
    }
}
