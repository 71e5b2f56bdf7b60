// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

pub(crate) mod optimal;

use peniko::kurbo::Rect;

use super::data::LineData;
use super::{Cluster, LineMetrics, Run, TextMetrics};

/// A laid-out line of a paragraph.
#[derive(Copy, Clone, Debug)]
pub struct Line<'a> {
    pub(crate) layout: &'a TextMetrics,
    pub(crate) index: u32,
    pub(crate) data: &'a LineData,
}

impl<'a> Line<'a> {
    /// Returns the index of the line within the paragraph.
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Returns the pixel metrics for the line.
    pub fn metrics(&self) -> &LineMetrics {
        &self.data.metrics
    }

    /// Returns the bounding rectangle of the line's content.
    pub fn rect(&self) -> Rect {
        self.data.rect
    }

    /// Returns the adjustment ratio the breaker chose for the line.
    pub fn ratio(&self) -> f64 {
        self.data.ratio
    }

    /// Returns `true` if the line was accepted in panic mode and may
    /// exceed its available width.
    pub fn is_overfull(&self) -> bool {
        self.data.overfull
    }

    /// Returns the number of formatted clusters on the line.
    pub fn len(&self) -> usize {
        self.data.formatted_range.len()
    }

    /// Returns `true` if the line carries no clusters.
    pub fn is_empty(&self) -> bool {
        self.data.formatted_range.is_empty()
    }

    /// Returns an iterator over the line's clusters in visual order.
    pub fn clusters(&self) -> impl Iterator<Item = Cluster<'a>> + 'a + Clone {
        let layout = self.layout;
        self.data
            .formatted_range
            .clone()
            .map(move |formatted| Cluster { layout, formatted })
    }

    /// Returns an iterator over the line's runs: maximal spans of clusters
    /// sharing font, point size and bidi level, in visual order.
    pub fn runs(&self) -> impl Iterator<Item = Run<'a>> + 'a + Clone {
        RunIter {
            layout: self.layout,
            next: self.data.formatted_range.start,
            end: self.data.formatted_range.end,
        }
    }
}

#[derive(Clone, Debug)]
struct RunIter<'a> {
    layout: &'a TextMetrics,
    next: usize,
    end: usize,
}

impl<'a> Iterator for RunIter<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let data = &self.layout.data;
        let key = |formatted: usize| {
            let cluster = &data.clusters[data.formatted[formatted].cluster as usize];
            let run = &data.runs[cluster.run_index as usize];
            (run.font.map(|f| f.id), run.size.to_bits(), cluster.bidi_level)
        };
        let start = self.next;
        let first = key(start);
        let mut stop = start + 1;
        while stop < self.end && key(stop) == first {
            stop += 1;
        }
        self.next = stop;
        Some(Run {
            layout: self.layout,
            formatted_range: start..stop,
        })
    }
}
