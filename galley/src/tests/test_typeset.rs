// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end typesetting tests.

use peniko::kurbo::Rect;

use crate::layout::{DisplayMode, TextMetrics};
use crate::style::{Alignment, Paragraph};
use crate::{LayoutContext, LayoutError};

use super::utils::{
    runs_for, style, typeset, typeset_para, MonoShaper, SimpleAnalyzer, TestFonts, CHAR_W, LINE_H,
};

fn snapshot(metrics: &TextMetrics) -> Vec<(u32, f32, f32, f32, DisplayMode)> {
    metrics
        .data
        .formatted
        .iter()
        .map(|f| (f.cluster, f.x, f.y, f.width, f.display))
        .collect()
}

#[test]
fn single_short_line() {
    let mut ctx = LayoutContext::new();
    let metrics = typeset(&mut ctx, "hello", 1000.);
    assert_eq!(metrics.len(), 1);
    let line = metrics.get(0).expect("one line");
    assert!(line.ratio() >= 0., "loose line has a non-negative ratio");
    assert!(!metrics.overflowed());
    assert_eq!(line.metrics().advance, 5. * CHAR_W);
    assert_eq!(line.rect(), Rect::new(0., 0., f64::from(5. * CHAR_W), f64::from(LINE_H)));
    assert_eq!(line.metrics().ascent, 8.);
    assert_eq!(line.metrics().descent, 2.);
    assert_eq!(line.metrics().baseline, 8.);
    assert_eq!(line.metrics().underline_offset, -1.);
    assert_eq!(line.metrics().underline_thickness, 0.5);
}

#[test]
fn ragged_text_wraps_per_word() {
    let mut ctx = LayoutContext::new();
    let metrics = typeset(&mut ctx, "aaa bbb ccc", 17.);
    assert_eq!(metrics.len(), 3, "one word per line at this width");
    for line in metrics.lines() {
        assert_eq!(line.metrics().advance, 3. * CHAR_W);
        assert!(!line.is_overfull());
    }
    // The spaces were consumed by the breaks.
    assert!(!metrics.is_cluster_visible(3));
    assert!(!metrics.is_cluster_visible(7));
}

#[test]
fn hard_break_splits_lines() {
    let mut ctx = LayoutContext::new();
    let metrics = typeset(&mut ctx, "ab\ncd", 1000.);
    assert_eq!(metrics.len(), 2, "the newline forces a second line");
    assert!(!metrics.is_cluster_visible(2), "the newline itself is invisible");
    let region = metrics.index_region(3).expect("c is placed");
    assert_eq!(region.x0, 0.);
    assert_eq!(region.y0, f64::from(LINE_H), "second line sits on the next row");
}

/// A single unbreakable word wider than the region: all tolerances fail
/// and the forced panic attempt returns exactly one overfull line.
#[test]
fn oversized_word_goes_overfull() {
    let mut ctx = LayoutContext::new();
    let metrics = typeset(&mut ctx, "aaaaaaaaaaaaaaaaaaaa", 50.);
    assert_eq!(metrics.len(), 1, "exactly one line");
    assert!(metrics.overflowed());
    let line = metrics.get(0).expect("one line");
    assert!(line.is_overfull());
    assert_eq!(line.metrics().advance, 20. * CHAR_W, "the whole word is on the line");
}

/// A justified line that only fits at ratio 2.8 fails the first attempt
/// and succeeds after tolerance escalation.
#[test]
fn tolerance_escalation_recovers() {
    let mut ctx = LayoutContext::new();
    let text = "aa bb";
    let runs = runs_for(text);
    let mut para_style = style();
    para_style.alignment = Alignment::Stretch;
    let paragraph = Paragraph {
        text,
        runs: &runs,
        style: para_style,
    };
    let metrics = typeset_para(&mut ctx, &paragraph, Rect::new(0., 0., 22., 1000.), &[]);
    assert_eq!(metrics.len(), 2);
    assert!(!metrics.overflowed());
    let ratio = metrics.get(0).expect("first line").ratio();
    assert!((ratio - 2.8).abs() < 1e-9, "first line stretches at ratio 2.8, got {ratio}");
}

/// A soft hyphen is taken when it is the only way to fit, and the hyphen
/// material appears at the line end; when the line is wide enough it
/// vanishes instead.
#[test]
fn soft_hyphen_taken_only_when_needed() {
    let mut ctx = LayoutContext::new();
    let text = "aaa\u{00AD}bbb";
    let runs = runs_for(text);
    let mut para_style = style();
    para_style.alignment = Alignment::Stretch;
    let paragraph = Paragraph {
        text,
        runs: &runs,
        style: para_style,
    };

    let narrow = typeset_para(&mut ctx, &paragraph, Rect::new(0., 0., 20., 1000.), &[]);
    assert_eq!(narrow.len(), 2, "the word breaks at the hyphen");
    assert!(narrow.is_cluster_visible(3), "the hyphen is rendered");
    assert_eq!(
        narrow.index_region(3),
        Some(Rect::new(
            f64::from(3. * CHAR_W),
            0.,
            f64::from(4. * CHAR_W),
            f64::from(LINE_H)
        )),
        "the hyphen closes the first line"
    );

    let wide = typeset_para(&mut ctx, &paragraph, Rect::new(0., 0., 1000., 1000.), &[]);
    assert_eq!(wide.len(), 1);
    assert!(!wide.is_cluster_visible(3), "the unchosen hyphen is suppressed");
}

#[test]
fn trailing_alignment_offsets_line() {
    let mut ctx = LayoutContext::new();
    let text = "aa";
    let runs = runs_for(text);
    for (alignment, x0) in [
        (Alignment::Leading, 0.),
        (Alignment::Center, 45.),
        (Alignment::Trailing, 90.),
    ] {
        let mut para_style = style();
        para_style.alignment = alignment;
        let paragraph = Paragraph {
            text,
            runs: &runs,
            style: para_style,
        };
        let metrics = typeset_para(&mut ctx, &paragraph, Rect::new(0., 0., 100., 1000.), &[]);
        let region = metrics.index_region(0).expect("a is placed");
        assert_eq!(region.x0, x0, "{alignment:?} line starts at {x0}");
    }
}

#[test]
fn first_line_reserves_indent() {
    let mut ctx = LayoutContext::new();
    let text = "aaaa aaaa aaaa";
    let runs = runs_for(text);
    let mut para_style = style();
    para_style.indent = 1.0;
    let paragraph = Paragraph {
        text,
        runs: &runs,
        style: para_style,
    };
    let metrics = typeset_para(&mut ctx, &paragraph, Rect::new(0., 0., 30., 1000.), &[]);
    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics.index_region(0).expect("first word").x0, 10., "indent is one em");
    assert_eq!(metrics.index_region(5).expect("second word").x0, 0.);
}

#[test]
fn empty_paragraph_yields_one_empty_line() {
    let mut ctx = LayoutContext::new();
    let metrics = typeset(&mut ctx, "", 100.);
    assert_eq!(metrics.len(), 1);
    assert!(metrics.get(0).expect("line").is_empty());
}

#[test]
fn identical_input_identical_output() {
    let mut a = LayoutContext::new();
    let mut b = LayoutContext::new();
    let first = typeset(&mut a, "the quick brown fox jumps", 60.);
    let second = typeset(&mut b, "the quick brown fox jumps", 60.);
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(first.len(), second.len());
    for (x, y) in first.lines().zip(second.lines()) {
        assert_eq!(x.rect(), y.rect());
    }
}

/// A reused context and a reused metrics object give the same output as a
/// fresh pair, even with an unrelated layout in between.
#[test]
fn reused_context_is_idempotent() {
    let mut ctx = LayoutContext::new();
    let fresh = typeset(&mut ctx, "pack my box with five dozen", 80.);

    let unrelated = typeset(&mut ctx, "אבג quodlibet\nxyz", 40.);

    let runs = runs_for("pack my box with five dozen");
    let paragraph = Paragraph {
        text: "pack my box with five dozen",
        runs: &runs,
        style: style(),
    };
    let mut reused = unrelated;
    ctx.typeset_into(
        &SimpleAnalyzer,
        &MonoShaper,
        &TestFonts,
        &paragraph,
        Rect::new(0., 0., 80., 1000.),
        &[],
        &mut reused,
    )
    .expect("typeset");
    assert_eq!(snapshot(&fresh), snapshot(&reused));
}

#[test]
fn invalid_inputs_fail_fast() {
    let mut ctx = LayoutContext::new();
    let text = "abc";
    let runs = runs_for("ab");
    let paragraph = Paragraph {
        text,
        runs: &runs,
        style: style(),
    };
    let err = ctx
        .typeset(
            &SimpleAnalyzer,
            &MonoShaper,
            &TestFonts,
            &paragraph,
            Rect::new(0., 0., 100., 100.),
            &[],
        )
        .expect_err("runs do not cover the text");
    assert!(matches!(err, LayoutError::InvalidInput(_)));

    let runs = runs_for(text);
    let paragraph = Paragraph {
        text,
        runs: &runs,
        style: style(),
    };
    for region in [
        Rect::new(0., 0., 0., 100.),
        Rect::new(0., 0., f64::NAN, 100.),
    ] {
        let err = ctx
            .typeset(&SimpleAnalyzer, &MonoShaper, &TestFonts, &paragraph, region, &[])
            .expect_err("degenerate region");
        assert!(matches!(err, LayoutError::InvalidInput(_)));
    }
}
