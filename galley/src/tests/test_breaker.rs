// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit tests for the optimal-fit breaker over hand-built item vectors.

use crate::layout::item::{BreakIndex, Demerits, LineItem};
use crate::layout::line::optimal::{BreakObserver, BreakParams, LineBreaker, LineWidths};

/// Constant-width oracle with a no-op observer.
struct FixedWidths(f64);

impl LineWidths for FixedWidths {
    fn line_width(&mut self, _line: usize) -> f64 {
        self.0
    }
}

impl BreakObserver for FixedWidths {
    fn before_item(&mut self, _index: usize, _item: &LineItem, _line: usize) {}
}

const FILL: f64 = 1.0e5;

fn boxed(width: f64) -> LineItem {
    LineItem::Box { width, pos: None }
}

fn forced() -> LineItem {
    LineItem::penalty(0., -Demerits::INFINITY, false, None)
}

fn finish(items: &mut Vec<LineItem>) {
    items.push(LineItem::glue(0., FILL, 0., None));
    items.push(forced());
}

fn run(items: &[LineItem], width: f64, tolerance: f64, panic: bool) -> Option<Vec<BreakIndex>> {
    let mut breaker = LineBreaker::default();
    let mut out = Vec::new();
    let params = BreakParams { tolerance, panic };
    breaker
        .break_items(items, &mut FixedWidths(width), params, &mut out)
        .then_some(out)
}

/// The classic vector: three boxes of width 4 separated by glue 1/1/1 at
/// line width 6. Each line is one box plus its glue stretched by exactly
/// the full stretch, so the breaks land on the glues at ratio 1 and the
/// chain is feasible on the very first tolerance.
#[test]
fn canonical_tex_vector() {
    let mut items = vec![
        boxed(4.),
        LineItem::glue(1., 1., 1., None),
        boxed(4.),
        LineItem::glue(1., 1., 1., None),
        boxed(4.),
    ];
    finish(&mut items);

    let breaks = run(&items, 6., 1., false).expect("feasible at tolerance 1");
    let positions: Vec<_> = breaks.iter().map(|b| b.item).collect();
    assert_eq!(positions, vec![1, 3, 6], "breaks land on the glues and the end");
    assert!((breaks[0].ratio - 1.).abs() < 1e-9, "first line consumes all stretch");
    assert!((breaks[1].ratio - 1.).abs() < 1e-9, "second line consumes all stretch");
    assert!(
        breaks[2].ratio >= 0. && breaks[2].ratio < 1e-3,
        "final line rides the finishing glue"
    );
}

#[test]
fn break_positions_strictly_increase() {
    let mut items = Vec::new();
    for _ in 0..12 {
        items.push(boxed(3.));
        items.push(LineItem::glue(1., 0.5, 0.33, None));
    }
    items.pop();
    finish(&mut items);

    let breaks = run(&items, 10., 3., false).expect("feasible");
    for pair in breaks.windows(2) {
        assert!(pair[0].item < pair[1].item, "positions must increase");
    }
}

#[test]
fn exact_fit_single_line() {
    let mut items = vec![boxed(4.)];
    finish(&mut items);

    let breaks = run(&items, 4., 1., false).expect("feasible");
    assert_eq!(breaks.len(), 1, "one line");
    assert_eq!(breaks[0].item, 2, "break at the forced end");
    assert_eq!(breaks[0].ratio, 0., "exact fit");
}

/// A forced penalty is always a breakpoint, even when the line before it
/// is badly underfull.
#[test]
fn forced_break_always_taken() {
    let mut items = vec![boxed(4.), LineItem::glue(1., 1., 1., None), boxed(4.), forced(), boxed(4.)];
    finish(&mut items);

    for tolerance in [1., 9.] {
        let breaks = run(&items, 100., tolerance, false).expect("feasible");
        assert_eq!(breaks[0].item, 3, "line ends exactly at the forced penalty");
    }
}

/// An unbreakable box wider than the line: every tolerance fails, and the
/// panic pass returns a single overfull line.
#[test]
fn panic_accepts_overfull_line() {
    let mut items = vec![boxed(100.)];
    finish(&mut items);

    for tolerance in [1., 3., 5., 7., 9.] {
        assert!(run(&items, 50., tolerance, false).is_none(), "infeasible without panic");
    }
    let breaks = run(&items, 50., 20., true).expect("panic pass succeeds");
    assert_eq!(breaks.len(), 1, "exactly one line");
    assert_eq!(breaks[0].item, 2, "the forced end closes the overfull line");
    assert!(breaks[0].ratio < -1., "the line is marked overfull");
}

/// Every non-forced break satisfies the ratio bound for the tolerance that
/// produced it.
#[test]
fn ratios_within_tolerance() {
    let mut items = Vec::new();
    for width in [3., 2., 4., 3., 2., 3., 4., 2., 3.] {
        items.push(boxed(width));
        items.push(LineItem::glue(1., 0.5, 0.33, None));
    }
    items.pop();
    finish(&mut items);

    let tolerance = 3.;
    let breaks = run(&items, 9., tolerance, false).expect("feasible");
    let (last, rest) = breaks.split_last().expect("non-empty");
    for brk in rest {
        assert!(
            brk.ratio >= -1. && brk.ratio <= tolerance,
            "ratio {} outside [-1, {tolerance}]",
            brk.ratio
        );
    }
    assert!(last.ratio >= -1., "final forced line is not overfull");
}

#[test]
fn identical_input_identical_breaks() {
    let mut items = Vec::new();
    for width in [3., 4., 2., 5., 3., 4.] {
        items.push(boxed(width));
        items.push(LineItem::glue(1., 0.5, 0.33, None));
    }
    items.pop();
    finish(&mut items);

    let first = run(&items, 11., 3., false).expect("feasible");
    let second = run(&items, 11., 3., false).expect("feasible");
    assert_eq!(first, second, "breaking is deterministic");
}
