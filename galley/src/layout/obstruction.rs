// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The line-width oracle: lazily carves the layout region into usable line
//! slots around a mutable set of obstruction rectangles.

use peniko::kurbo::Rect;
use smallvec::SmallVec;

/// One usable horizontal segment of the line grid.
#[derive(Copy, Clone, PartialEq, Debug)]
pub(crate) struct LineSlot {
    /// Left edge.
    pub(crate) x0: f64,
    /// Right edge.
    pub(crate) x1: f64,
    /// Top of the slot's row.
    pub(crate) y: f64,
    /// Row of the line grid the slot lies on.
    pub(crate) row: u32,
}

impl LineSlot {
    pub(crate) fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Lazily computed, cached line slots for one breaking attempt.
///
/// Slots are enumerated top-to-bottom, left-to-right; a row overlapped by
/// obstructions yields one slot per free segment wider than the line
/// height (narrower slivers are rejected). Rows continue below the region
/// indefinitely, so a paragraph taller than its region overflows downward.
#[derive(Default, Debug)]
pub(crate) struct LineSlots {
    region: Rect,
    line_height: f64,
    indent: f64,
    base_rtl: bool,
    obstructions: Vec<Rect>,
    slots: Vec<LineSlot>,
    next_row: u32,
}

impl LineSlots {
    /// Resets to the caller-supplied obstructions, discarding every cached
    /// slot and previously resolved floater.
    pub(crate) fn reset(
        &mut self,
        region: Rect,
        line_height: f64,
        indent: f64,
        base_rtl: bool,
        obstructions: &[Rect],
    ) {
        self.region = region;
        self.line_height = line_height;
        self.indent = indent;
        self.base_rtl = base_rtl;
        self.obstructions.clear();
        self.obstructions.extend_from_slice(obstructions);
        self.slots.clear();
        self.next_row = 0;
    }

    pub(crate) fn region(&self) -> Rect {
        self.region
    }

    pub(crate) fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Returns the slot for the given line index, computing rows as needed.
    pub(crate) fn slot(&mut self, index: usize) -> LineSlot {
        while self.slots.len() <= index {
            self.push_row();
        }
        self.slots[index]
    }

    /// Top of the row a slot index lies on without forcing later rows.
    pub(crate) fn row_of(&mut self, index: usize) -> u32 {
        self.slot(index).row
    }

    /// Adds an obstruction, invalidating cached slots from the first row it
    /// touches. Answers already handed out for earlier lines are unchanged.
    pub(crate) fn add_obstruction(&mut self, rect: Rect) {
        self.obstructions.push(rect);
        let affected = ((rect.y0 - self.region.y0) / self.line_height).floor().max(0.) as u32;
        self.slots.retain(|slot| slot.row < affected);
        self.next_row = self.next_row.min(affected);
    }

    /// Computes the slots of the next row. A row fully clear of
    /// obstructions always yields a slot, so slot indices never run out.
    fn push_row(&mut self) {
        loop {
            let row = self.next_row;
            self.next_row += 1;
            let y0 = self.region.y0 + row as f64 * self.line_height;
            let y1 = y0 + self.line_height;

            let mut blocks: SmallVec<[(f64, f64); 4]> = self
                .obstructions
                .iter()
                .filter(|r| r.y0 < y1 && r.y1 > y0)
                .map(|r| (r.x0, r.x1))
                .collect();
            blocks.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut segments: SmallVec<[(f64, f64); 4]> = SmallVec::new();
            let mut cursor = self.region.x0;
            for (bx0, bx1) in &blocks {
                if *bx0 > cursor {
                    segments.push((cursor, (*bx0).min(self.region.x1)));
                }
                cursor = cursor.max(*bx1);
            }
            if cursor < self.region.x1 {
                segments.push((cursor, self.region.x1));
            }

            let clear = blocks.is_empty();
            let before = self.slots.len();
            for (x0, x1) in &segments {
                if x1 - x0 > self.line_height || clear {
                    self.push_slot(*x0, *x1, y0, row);
                }
            }
            if self.slots.len() > before {
                return;
            }
        }
    }

    fn push_slot(&mut self, mut x0: f64, mut x1: f64, y: f64, row: u32) {
        // The first slot of the paragraph reserves the indentation.
        if self.slots.is_empty() {
            if self.base_rtl {
                x1 = (x1 - self.indent).max(x0);
            } else {
                x0 = (x0 + self.indent).min(x1);
            }
        }
        self.slots.push(LineSlot { x0, x1, y, row });
    }
}
