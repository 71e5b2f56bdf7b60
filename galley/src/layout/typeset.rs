// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The typesetter: converts shaped clusters into break items, resolves
//! floaters against the line grid and drives the multi-pass breaking
//! policy.

use log::debug;
use peniko::kurbo::Rect;

use crate::analysis::BreakCondition;
use crate::layout::data::{ContentType, LayoutData};
use crate::layout::item::{BreakIndex, Demerits, LineItem};
use crate::layout::line::optimal::{BreakObserver, BreakParams, LineBreaker, LineWidths};
use crate::layout::obstruction::LineSlots;
use crate::style::{FloatAnchor, FloatEdge, ObjectPlacement, Paragraph};

/// Stretch standing in for "infinite" in the ragged encodings. Large enough
/// that any underfull line reaches ratio ~0, finite so running sums stay
/// exact.
const RAGGED_STRETCH: f64 = 1.0e5;

/// Cost of breaking at a soft hyphen.
const SOFT_HYPHEN_COST: Demerits = Demerits(5.0);

/// Tolerances of the successive breaking attempts; the last runs in panic
/// mode and cannot fail.
const TOLERANCES: [f64; 6] = [1., 3., 5., 7., 9., 20.];

/// A floater captured during item building, waiting for placement.
#[derive(Copy, Clone, Debug)]
struct Floater {
    /// Item index of the marker box carrying the floater.
    item: usize,
    /// Cluster index of the floater.
    cluster: u32,
    width: f64,
    height: f64,
    edge: FloatEdge,
    anchor: FloatAnchor,
}

/// Obstruction and floater state for one paragraph, reset between breaking
/// attempts.
#[derive(Default, Debug)]
pub(crate) struct TypesetState {
    pub(crate) slots: LineSlots,
    floaters: Vec<Floater>,
    /// Resolved rectangle per floater, in `floaters` order.
    placed: Vec<Option<Rect>>,
    /// First floater not yet passed by the item scan.
    cursor: usize,
    base_rtl: bool,
}

impl TypesetState {
    /// Discards all breaking state and floater placements, restoring the
    /// caller-supplied obstructions, then re-resolves paragraph-anchored
    /// floaters.
    fn reset(
        &mut self,
        region: Rect,
        line_height: f64,
        indent: f64,
        base_rtl: bool,
        obstructions: &[Rect],
    ) {
        self.slots
            .reset(region, line_height, indent, base_rtl, obstructions);
        self.base_rtl = base_rtl;
        self.placed.clear();
        self.placed.resize(self.floaters.len(), None);
        self.cursor = 0;
        for i in 0..self.floaters.len() {
            if self.floaters[i].anchor == FloatAnchor::Paragraph {
                let rect = self.place(self.floaters[i], 0);
                self.placed[i] = Some(rect);
            }
        }
    }

    /// Carves the floater's rectangle out of the line grid at `row`.
    fn place(&mut self, floater: Floater, row: u32) -> Rect {
        let region = self.slots.region();
        let line_height = self.slots.line_height();
        // Floaters occupy whole rows.
        let rows = (floater.height / line_height).ceil().max(1.);
        let y0 = region.y0 + row as f64 * line_height;
        let y1 = y0 + rows * line_height;
        let at_left = match floater.edge {
            FloatEdge::Leading => !self.base_rtl,
            FloatEdge::Trailing => self.base_rtl,
        };
        let rect = if at_left {
            Rect::new(region.x0, y0, region.x0 + floater.width, y1)
        } else {
            Rect::new(region.x1 - floater.width, y0, region.x1, y1)
        };
        self.slots.add_obstruction(rect);
        rect
    }

    /// Resolved rectangle of the floater for a cluster, if any.
    pub(crate) fn floater_rect(&self, cluster: u32) -> Option<Rect> {
        self.floaters
            .iter()
            .position(|f| f.cluster == cluster)
            .and_then(|i| self.placed[i])
    }
}

impl LineWidths for TypesetState {
    fn line_width(&mut self, line: usize) -> f64 {
        self.slots.slot(line).width()
    }
}

impl BreakObserver for TypesetState {
    fn before_item(&mut self, index: usize, _item: &LineItem, line: usize) {
        // Line-anchored floaters resolve the first time their carrying item
        // is examined, on the deepest line under consideration. This mutates
        // the obstruction set and may change slot answers for later lines.
        while self.cursor < self.floaters.len() && self.floaters[self.cursor].item <= index {
            if self.placed[self.cursor].is_none() {
                let row = self.slots.row_of(line);
                let floater = self.floaters[self.cursor];
                let rect = self.place(floater, row);
                self.placed[self.cursor] = Some(rect);
            }
            self.cursor += 1;
        }
    }
}

/// Converts shaped clusters into the break-item stream.
///
/// The stream always ends in an infinite-stretch glue plus a forced break,
/// so a breaking attempt in panic mode cannot fail.
pub(crate) fn build_items(
    data: &LayoutData,
    paragraph: &Paragraph<'_>,
    justified: bool,
    items: &mut Vec<LineItem>,
    state: &mut TypesetState,
) {
    items.clear();
    state.floaters.clear();

    let forced = -Demerits::INFINITY;
    let clusters = &data.clusters;
    for (index, cluster) in clusters.iter().enumerate() {
        let ci = index as u32;
        let advance = f64::from(cluster.advance);
        // A zero-cost break is offered after clusters that allow one and
        // are not followed by whitespace (the glue itself breaks there).
        let explicit_break_after = cluster.break_after == BreakCondition::CanBreak
            && clusters.get(index + 1).is_some_and(|next| {
                !next.is_whitespace()
                    && matches!(next.content, ContentType::Normal | ContentType::Inline)
            });

        match cluster.content {
            ContentType::Floater => {
                let run = &paragraph.runs[cluster.style_index as usize];
                if let Some(object) = &run.object {
                    if let ObjectPlacement::Float { edge, anchor } = object.placement {
                        state.floaters.push(Floater {
                            item: items.len(),
                            cluster: ci,
                            width: f64::from(object.width),
                            height: f64::from(object.height),
                            edge,
                            anchor,
                        });
                    }
                }
                // Floaters hold no inline width; the marker keeps the
                // cluster addressable during the scan.
                items.push(LineItem::Box {
                    width: 0.,
                    pos: Some(ci),
                });
            }
            ContentType::Format if cluster.is_soft_hyphen() => {
                if justified {
                    items.push(LineItem::penalty(advance, SOFT_HYPHEN_COST, true, Some(ci)));
                } else {
                    items.push(LineItem::penalty(0., Demerits::INFINITY, false, None));
                    items.push(LineItem::glue(0., RAGGED_STRETCH, 0., None));
                    items.push(LineItem::penalty(advance, SOFT_HYPHEN_COST, true, Some(ci)));
                }
            }
            ContentType::Format if cluster.break_after == BreakCondition::MustBreak => {
                items.push(LineItem::glue(0., RAGGED_STRETCH, 0., Some(ci)));
                items.push(LineItem::penalty(0., forced, false, None));
            }
            ContentType::Format => {
                items.push(LineItem::Box {
                    width: advance,
                    pos: Some(ci),
                });
            }
            ContentType::Normal
                if cluster.is_whitespace() && cluster.break_after != BreakCondition::MayNotBreak =>
            {
                if justified {
                    items.push(LineItem::glue(advance, advance / 2., advance / 3., Some(ci)));
                } else {
                    // The width-bearing glue rides behind the break so the
                    // space lands on neither line when the break is taken;
                    // the negative stretch cancels the pair when it is not.
                    items.push(LineItem::glue(0., RAGGED_STRETCH, 0., None));
                    items.push(LineItem::penalty(0., Demerits::NONE, false, None));
                    items.push(LineItem::glue(advance, -RAGGED_STRETCH, 0., Some(ci)));
                }
            }
            ContentType::Normal | ContentType::Inline => {
                items.push(LineItem::Box {
                    width: advance,
                    pos: Some(ci),
                });
                if cluster.break_after == BreakCondition::MustBreak {
                    items.push(LineItem::glue(0., RAGGED_STRETCH, 0., None));
                    items.push(LineItem::penalty(0., forced, false, None));
                } else if explicit_break_after {
                    items.push(LineItem::penalty(0., Demerits::NONE, false, None));
                }
            }
        }
    }

    if !items.last().is_some_and(LineItem::is_forced_break) {
        items.push(LineItem::glue(0., RAGGED_STRETCH, 0., None));
        items.push(LineItem::penalty(0., forced, false, None));
    }
}

/// Runs the multi-pass breaking policy.
///
/// Each failed attempt fully resets the obstruction and slot state:
/// floaters are laid out lazily, so a later attempt may see different line
/// widths than the one that failed.
pub(crate) fn break_lines(
    items: &[LineItem],
    state: &mut TypesetState,
    breaker: &mut LineBreaker,
    region: Rect,
    line_height: f64,
    indent: f64,
    base_rtl: bool,
    obstructions: &[Rect],
    breaks: &mut Vec<BreakIndex>,
) {
    for (attempt, tolerance) in TOLERANCES.iter().enumerate() {
        let panic = attempt + 1 == TOLERANCES.len();
        state.reset(region, line_height, indent, base_rtl, obstructions);
        let params = BreakParams {
            tolerance: *tolerance,
            panic,
        };
        if breaker.break_items(items, state, params, breaks) {
            debug!(
                "paragraph broken into {} lines at tolerance {tolerance}",
                breaks.len()
            );
            return;
        }
        debug!("no feasible breaks at tolerance {tolerance}, escalating");
    }
    // The panic attempt accepts overfull lines and the item stream ends in
    // a forced break, so control cannot reach this point.
    unreachable!("panic-mode breaking attempt failed");
}
