// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use peniko::kurbo::Rect;

use super::data::{ContentType, DisplayMode, FormattedCluster, Glyph, NO_LINE};
use super::TextMetrics;

/// A formatted cluster: the smallest indivisible unit of text and glyphs,
/// with its final pixel placement.
#[derive(Copy, Clone, Debug)]
pub struct Cluster<'a> {
    pub(crate) layout: &'a TextMetrics,
    pub(crate) formatted: usize,
}

impl<'a> Cluster<'a> {
    fn placed(&self) -> &'a FormattedCluster {
        &self.layout.data.formatted[self.formatted]
    }

    fn data(&self) -> &'a super::data::ClusterData {
        &self.layout.data.clusters[self.placed().cluster as usize]
    }

    /// Returns the source character range of the cluster.
    pub fn text_range(&self) -> Range<usize> {
        let range = &self.data().text_range;
        range.start as usize..range.end as usize
    }

    /// Returns the cluster's glyphs.
    pub fn glyphs(&self) -> &'a [Glyph] {
        let range = &self.data().glyph_range;
        &self.layout.data.glyphs[range.start as usize..range.end as usize]
    }

    /// Returns the final pixel region of the cluster.
    pub fn region(&self) -> Rect {
        let placed = self.placed();
        Rect::new(
            f64::from(placed.x),
            f64::from(placed.y),
            f64::from(placed.x + placed.width),
            f64::from(placed.y + placed.height),
        )
    }

    /// Returns the display mode assigned during formatting.
    pub fn display(&self) -> DisplayMode {
        self.placed().display
    }

    /// Returns the content classification of the cluster.
    pub fn content(&self) -> ContentType {
        self.data().content
    }

    /// Returns the line the cluster landed on; floaters live outside the
    /// line flow.
    pub fn line_index(&self) -> Option<usize> {
        let line = self.placed().line;
        (line != NO_LINE).then_some(line as usize)
    }

    /// Returns `true` if the cluster has right-to-left directionality.
    pub fn is_rtl(&self) -> bool {
        self.data().bidi_level & 1 != 0
    }

    /// Returns `true` if the cluster is whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.data().is_whitespace()
    }
}

impl TextMetrics {
    fn formatted_for_index(&self, index: usize) -> Option<&FormattedCluster> {
        let cluster = self.data.cluster_for_index(index)?;
        let formatted = *self.data.cluster_to_formatted.get(cluster)?;
        (formatted != u32::MAX).then(|| &self.data.formatted[formatted as usize])
    }

    /// Returns `true` if `index` is the first character of its cluster.
    pub fn is_cluster_start(&self, index: usize) -> bool {
        self.data
            .cluster_for_index(index)
            .map(|c| self.data.clusters[c].text_range.start as usize == index)
            .unwrap_or(false)
    }

    /// Returns `true` if the cluster containing `index` is drawn.
    pub fn is_cluster_visible(&self, index: usize) -> bool {
        self.formatted_for_index(index)
            .map(|f| f.display == DisplayMode::Visible)
            .unwrap_or(false)
    }

    /// Returns `true` if the character at `index` has right-to-left
    /// directionality.
    pub fn is_right_to_left(&self, index: usize) -> bool {
        self.data
            .cluster_for_index(index)
            .map(|c| self.data.clusters[c].bidi_level & 1 != 0)
            .unwrap_or(false)
    }

    /// Returns the region containing the character at `index`.
    pub fn index_region(&self, index: usize) -> Option<Rect> {
        let placed = self.formatted_for_index(index)?;
        Some(Rect::new(
            f64::from(placed.x),
            f64::from(placed.y),
            f64::from(placed.x + placed.width),
            f64::from(placed.y + placed.height),
        ))
    }

    /// Returns the union of the regions of the visible clusters whose text
    /// intersects `range`, or `None` if no visible cluster does.
    pub fn range_region(&self, range: Range<usize>) -> Option<Rect> {
        let mut union: Option<Rect> = None;
        for placed in &self.data.formatted {
            if placed.display != DisplayMode::Visible {
                continue;
            }
            let text = &self.data.clusters[placed.cluster as usize].text_range;
            if (text.start as usize) < range.end && range.start < text.end as usize {
                let rect = Rect::new(
                    f64::from(placed.x),
                    f64::from(placed.y),
                    f64::from(placed.x + placed.width),
                    f64::from(placed.y + placed.height),
                );
                union = Some(match union {
                    Some(u) => u.union(rect),
                    None => rect,
                });
            }
        }
        union
    }

    /// Returns the text index nearest to the given point.
    pub fn hit_test(&self, x: f64, y: f64) -> usize {
        let data = &self.data;
        if data.lines.is_empty() {
            return 0;
        }
        let mut best_line = 0;
        let mut best_dist = f64::INFINITY;
        for (index, line) in data.lines.iter().enumerate() {
            let rect = line.rect;
            let dist = if y < rect.y0 {
                rect.y0 - y
            } else if y > rect.y1 {
                y - rect.y1
            } else {
                0.
            };
            if dist < best_dist {
                best_dist = dist;
                best_line = index;
            }
        }

        let line = &data.lines[best_line];
        let mut best: Option<(f64, usize)> = None;
        for placed in &data.formatted[line.formatted_range.clone()] {
            if placed.display == DisplayMode::Suppressed {
                continue;
            }
            let cluster = &data.clusters[placed.cluster as usize];
            let x0 = f64::from(placed.x);
            let x1 = f64::from(placed.x + placed.width);
            let dist = if x < x0 {
                x0 - x
            } else if x > x1 {
                x - x1
            } else {
                0.
            };
            // The near edge decides the index; edges swap for RTL clusters.
            let near_start = (x < (x0 + x1) * 0.5) != (cluster.bidi_level & 1 != 0);
            let index = if near_start {
                cluster.text_range.start as usize
            } else {
                cluster.text_range.end as usize
            };
            if best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, index));
            }
        }
        best.map(|(_, index)| index).unwrap_or(0)
    }
}
