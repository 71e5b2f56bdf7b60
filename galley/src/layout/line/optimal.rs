// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optimal-fit line breaking.
//!
//! A worklist of active breakpoint candidates evolves item-by-item over the
//! break stream; at every feasible breakpoint each active candidate is
//! scored against the line it would close, the best new candidate per
//! fitness class is kept, and candidates whose line can no longer fit are
//! retired. The admission window over the per-item minimum bounds the
//! active set, which keeps the search tractable without a full
//! shortest-path pass.
//!
//! Breakpoint records live in an arena and link to their predecessors by
//! index; the winning chain is walked once to produce the break list.

use log::trace;
use smallvec::SmallVec;

use crate::layout::item::{BreakIndex, Demerits, LineFitness, LineItem};

/// Per-line available width, supplied by the obstruction oracle.
pub(crate) trait LineWidths {
    /// Width available to the line with the given index.
    fn line_width(&mut self, line: usize) -> f64;
}

/// Strategy invoked as the breaker scans the item stream. Floater
/// resolution hooks in here.
pub(crate) trait BreakObserver {
    /// Called once per item, before the item is measured or analyzed.
    /// `line` is the largest line index among the active candidates: the
    /// line the item would land on along the deepest chain. Lines above it
    /// are already measured, so geometry changes at `line` or below cannot
    /// contradict them.
    fn before_item(&mut self, index: usize, item: &LineItem, line: usize);
}

/// Parameters of one breaking attempt.
#[derive(Copy, Clone, Debug)]
pub(crate) struct BreakParams {
    /// Maximum acceptable |ratio| for a feasible line.
    pub(crate) tolerance: f64,
    /// Accept overfull lines rather than failing.
    pub(crate) panic: bool,
}

#[derive(Copy, Clone, Debug)]
struct BreakNode {
    /// Item position of the break.
    item: u32,
    /// Number of the line ending at this break.
    line: u32,
    /// Fitness class of that line.
    fitness: LineFitness,
    /// Running sums up to (and including) this break.
    total_width: f64,
    total_stretch: f64,
    total_shrink: f64,
    /// Accumulated demerits of the chain ending here.
    demerits: Demerits,
    /// Chosen adjustment ratio of the line ending here.
    ratio: f64,
    /// Whether the breaking item was a flagged penalty.
    flagged: bool,
    /// Arena index of the previous break; the root links to itself.
    prev: u32,
}

#[derive(Copy, Clone)]
struct Candidate {
    demerits: Demerits,
    ratio: f64,
    fitness: LineFitness,
    prev: u32,
}

#[derive(Copy, Clone, Default)]
struct Totals {
    width: f64,
    stretch: f64,
    shrink: f64,
}

/// Reusable state of the optimal-fit breaker.
#[derive(Default, Debug)]
pub(crate) struct LineBreaker {
    arena: Vec<BreakNode>,
    active: SmallVec<[u32; 16]>,
}

impl LineBreaker {
    /// Finds the minimum-demerit break chain for `items`.
    ///
    /// Returns `false` when no feasible chain exists at the given
    /// tolerance; with `panic` set the call always succeeds provided the
    /// stream ends in a forced break.
    pub(crate) fn break_items<D: LineWidths + BreakObserver>(
        &mut self,
        items: &[LineItem],
        driver: &mut D,
        params: BreakParams,
        out: &mut Vec<BreakIndex>,
    ) -> bool {
        out.clear();
        self.arena.clear();
        self.arena.push(BreakNode {
            item: 0,
            line: 0,
            fitness: LineFitness::Tight,
            total_width: 0.,
            total_stretch: 0.,
            total_shrink: 0.,
            demerits: Demerits::NONE,
            ratio: 0.,
            flagged: false,
            prev: 0,
        });
        self.active.clear();
        self.active.push(0);

        let mut last_deactivated = 0_u32;
        let mut running = Totals::default();
        let mut prev_was_box = false;

        for (index, item) in items.iter().enumerate() {
            let current_line = self
                .active
                .iter()
                .map(|&i| self.arena[i as usize].line)
                .max()
                .unwrap_or(0) as usize;
            driver.before_item(index, item, current_line);

            let feasible = match item {
                LineItem::Penalty { cost, .. } => !cost.is_positive_infinity(),
                LineItem::Glue { .. } => prev_was_box,
                LineItem::Box { .. } => false,
            };

            match item {
                LineItem::Box { width, .. } => running.width += width,
                LineItem::Glue {
                    width,
                    stretch,
                    shrink,
                    ..
                } => {
                    running.width += width;
                    running.stretch += stretch;
                    running.shrink += shrink;
                }
                LineItem::Penalty { .. } => {}
            }

            if feasible {
                self.examine(items, index, item, &running, driver, params, &mut last_deactivated);
                if self.active.is_empty() {
                    if params.panic {
                        trace!("no live candidate at item {index}; reactivating last break");
                        self.active.push(last_deactivated);
                    } else {
                        // Every future candidate needs an active
                        // predecessor, so the attempt is already lost.
                        return false;
                    }
                }
            }
            prev_was_box = item.is_box();
        }

        let Some(&winner) = self.active.iter().min_by(|&&a, &&b| {
            self.arena[a as usize]
                .demerits
                .0
                .total_cmp(&self.arena[b as usize].demerits.0)
        }) else {
            return false;
        };

        let mut index = winner;
        while index != 0 {
            let node = &self.arena[index as usize];
            out.push(BreakIndex {
                item: node.item as usize,
                ratio: node.ratio,
            });
            index = node.prev;
        }
        out.reverse();
        true
    }

    /// Scores every active candidate against a break at `item`, retires the
    /// ones that can no longer fit and admits the per-fitness bests.
    fn examine<W: LineWidths>(
        &mut self,
        items: &[LineItem],
        index: usize,
        item: &LineItem,
        running: &Totals,
        driver: &mut W,
        params: BreakParams,
        last_deactivated: &mut u32,
    ) {
        let forced = item.is_forced_break();
        let item_flagged = item.is_flagged();
        let penalty_width = item.penalty_width();
        let cost = match item {
            LineItem::Penalty { cost, .. } => *cost,
            _ => Demerits::NONE,
        };

        let mut candidates: [Option<Candidate>; 4] = [None; 4];
        let mut item_best = f64::INFINITY;
        let mut kept: SmallVec<[u32; 16]> = SmallVec::new();

        for &node_index in &self.active {
            let node = self.arena[node_index as usize];
            let available = driver.line_width(node.line as usize);
            let length = running.width - node.total_width + penalty_width;
            let ratio = if length < available {
                let stretch = running.stretch - node.total_stretch;
                if stretch > 0. {
                    (available - length) / stretch
                } else {
                    f64::INFINITY
                }
            } else if length > available {
                let shrink = running.shrink - node.total_shrink;
                if shrink > 0. {
                    (available - length) / shrink
                } else {
                    f64::NEG_INFINITY
                }
            } else {
                0.
            };

            if (-1.0..=params.tolerance).contains(&ratio) || forced {
                let badness = (ratio / params.tolerance).abs().powi(3);
                let mut demerits = Demerits((10. + 100. * badness).powi(2));
                if !forced {
                    if cost.0 >= 0. {
                        demerits += Demerits(cost.0 * cost.0);
                    } else {
                        demerits = demerits - Demerits(cost.0 * cost.0);
                    }
                }
                if item_flagged && node.flagged {
                    demerits += Demerits::FLAGGED_PENALTY;
                }
                let fitness = LineFitness::from_ratio(ratio);
                if fitness.gap(node.fitness) > 1 {
                    demerits += Demerits::FITNESS_PENALTY;
                }
                let total = node.demerits + demerits;
                let slot = fitness as usize;
                if candidates[slot].is_none_or(|c| total.0 < c.demerits.0) {
                    candidates[slot] = Some(Candidate {
                        demerits: total,
                        // An infinite positive ratio means no stretch was
                        // consumed; record an exact fit. Negative infinity
                        // is kept: it marks an overfull forced line.
                        ratio: if ratio == f64::INFINITY { 0. } else { ratio },
                        fitness,
                        prev: node_index,
                    });
                }
                item_best = item_best.min(total.0);
            }

            if ratio < -1.0 || forced {
                *last_deactivated = node_index;
            } else {
                kept.push(node_index);
            }
        }
        self.active = kept;

        // Discardable material after the break (glue and unforced
        // penalties, up to the next box) belongs to neither line; fold it
        // into the new candidates' totals.
        let mut totals = *running;
        for next in &items[index + 1..] {
            match next {
                LineItem::Glue {
                    width,
                    stretch,
                    shrink,
                    ..
                } => {
                    totals.width += width;
                    totals.stretch += stretch;
                    totals.shrink += shrink;
                }
                LineItem::Penalty { cost, .. } if !cost.is_negative_infinity() => {}
                _ => break,
            }
        }

        for candidate in candidates.into_iter().flatten() {
            if candidate.demerits.0 <= item_best + Demerits::FITNESS_PENALTY.0 {
                let line = self.arena[candidate.prev as usize].line + 1;
                let node_index = self.arena.len() as u32;
                self.arena.push(BreakNode {
                    item: index as u32,
                    line,
                    fitness: candidate.fitness,
                    total_width: totals.width,
                    total_stretch: totals.stretch,
                    total_shrink: totals.shrink,
                    demerits: candidate.demerits,
                    ratio: candidate.ratio,
                    flagged: item_flagged,
                    prev: candidate.prev,
                });
                self.active.push(node_index);
            }
        }
    }
}
