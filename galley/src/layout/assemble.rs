// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line assembly: replays the break items against the chosen breakpoints,
//! places clusters with a bidi-aware pen and computes line metrics.

use peniko::kurbo::Rect;

use crate::layout::data::{
    ContentType, DisplayMode, FormattedCluster, LayoutData, LineData, LineMetrics, NO_LINE,
};
use crate::layout::item::{BreakIndex, LineItem};
use crate::layout::typeset::TypesetState;
use crate::style::{Alignment, Paragraph};

#[derive(Copy, Clone, Debug)]
struct Placed {
    cluster: Option<u32>,
    width: f32,
    display: DisplayMode,
    bidi_level: u8,
}

pub(crate) fn assemble(
    data: &mut LayoutData,
    paragraph: &Paragraph<'_>,
    items: &[LineItem],
    breaks: &[BreakIndex],
    state: &mut TypesetState,
    alignment: Alignment,
) {
    let justified = alignment == Alignment::Stretch;
    let base_rtl = data.base_level & 1 != 0;
    let base_level = data.base_level;
    let line_height = data.line_height;

    data.cluster_to_formatted.clear();
    data.cluster_to_formatted.resize(data.clusters.len(), u32::MAX);
    let LayoutData {
        ref clusters,
        ref runs,
        ref mut lines,
        ref mut formatted,
        ref mut cluster_to_formatted,
        ref mut overflowed,
        ..
    } = *data;

    let mut placed: Vec<Placed> = Vec::new();
    let mut start = 0_usize;
    for (line_no, brk) in breaks.iter().enumerate() {
        let slot = state.slots.slot(line_no);
        let overfull = brk.ratio < -1.0;
        // Shrink never exceeds the glue's shrink bound, even on overfull
        // panic lines.
        let applied = if justified { brk.ratio.max(-1.0) } else { 0. };

        placed.clear();
        let mut seen_content = false;
        let mut prev_level = base_level;
        for (offset, item) in items[start..=brk.item].iter().enumerate() {
            let at_break = start + offset == brk.item;
            match item {
                LineItem::Box { width, pos } => {
                    if let Some(ci) = pos {
                        let cluster = &clusters[*ci as usize];
                        if cluster.content == ContentType::Floater {
                            // Emitted later from its resolved rectangle.
                            continue;
                        }
                        let display = if cluster.content == ContentType::Format {
                            DisplayMode::Neutral
                        } else {
                            DisplayMode::Visible
                        };
                        prev_level = cluster.bidi_level;
                        placed.push(Placed {
                            cluster: Some(*ci),
                            width: *width as f32,
                            display,
                            bidi_level: cluster.bidi_level,
                        });
                    } else {
                        placed.push(Placed {
                            cluster: None,
                            width: *width as f32,
                            display: DisplayMode::Visible,
                            bidi_level: prev_level,
                        });
                    }
                    seen_content = true;
                }
                LineItem::Glue {
                    width,
                    stretch,
                    shrink,
                    pos,
                } => {
                    // Glue is suppressed at the chosen break and before any
                    // content on the line.
                    let suppressed = at_break || !seen_content;
                    let adjusted = if suppressed {
                        0.
                    } else if justified {
                        width + applied * if applied < 0. { *shrink } else { *stretch }
                    } else {
                        *width
                    };
                    if let Some(ci) = pos {
                        let cluster = &clusters[*ci as usize];
                        let display = if suppressed {
                            DisplayMode::Suppressed
                        } else if cluster.content == ContentType::Format {
                            DisplayMode::Neutral
                        } else {
                            DisplayMode::Visible
                        };
                        prev_level = cluster.bidi_level;
                        placed.push(Placed {
                            cluster: Some(*ci),
                            width: adjusted as f32,
                            display,
                            bidi_level: cluster.bidi_level,
                        });
                    } else if adjusted != 0. {
                        placed.push(Placed {
                            cluster: None,
                            width: adjusted as f32,
                            display: DisplayMode::Suppressed,
                            bidi_level: prev_level,
                        });
                    }
                }
                LineItem::Penalty { width, pos, .. } => {
                    let Some(ci) = pos else { continue };
                    if at_break && seen_content {
                        // A chosen penalty renders its material (the
                        // hyphen).
                        prev_level = clusters[*ci as usize].bidi_level;
                        placed.push(Placed {
                            cluster: Some(*ci),
                            width: *width as f32,
                            display: DisplayMode::Visible,
                            bidi_level: prev_level,
                        });
                    } else {
                        // Unchosen penalties vanish; penalties are never
                        // rendered at line start.
                        placed.push(Placed {
                            cluster: Some(*ci),
                            width: 0.,
                            display: DisplayMode::Suppressed,
                            bidi_level: clusters[*ci as usize].bidi_level,
                        });
                    }
                }
            }
        }

        // Starting pen position per alignment; free space never goes
        // negative so overfull lines stay anchored to the leading edge.
        let total: f32 = placed.iter().map(|p| p.width).sum();
        let free = (slot.width() as f32 - total).max(0.);
        let pen_start = if base_rtl {
            match alignment {
                Alignment::Leading | Alignment::Stretch => slot.x1 as f32,
                Alignment::Center => slot.x1 as f32 - free * 0.5,
                Alignment::Trailing => slot.x1 as f32 - free,
            }
        } else {
            match alignment {
                Alignment::Leading | Alignment::Stretch => slot.x0 as f32,
                Alignment::Center => slot.x0 as f32 + free * 0.5,
                Alignment::Trailing => slot.x0 as f32 + free,
            }
        };

        // Place in visual order: runs in logical order along the base
        // direction, clusters within counter-directional runs reversed.
        let formatted_start = formatted.len();
        let y = slot.y as f32;
        let mut pen = pen_start;
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut span_start = 0;
        while span_start < placed.len() {
            let level = placed[span_start].bidi_level;
            let mut span_end = span_start + 1;
            while span_end < placed.len() && placed[span_end].bidi_level == level {
                span_end += 1;
            }
            let span = &placed[span_start..span_end];
            let reversed = (level & 1 != 0) != base_rtl;
            for k in 0..span.len() {
                let entry = if reversed {
                    span[span.len() - 1 - k]
                } else {
                    span[k]
                };
                let x = if base_rtl { pen - entry.width } else { pen };
                if let Some(ci) = entry.cluster {
                    if entry.display != DisplayMode::Suppressed {
                        min_x = min_x.min(x);
                        max_x = max_x.max(x + entry.width);
                    }
                    cluster_to_formatted[ci as usize] = formatted.len() as u32;
                    formatted.push(FormattedCluster {
                        cluster: ci,
                        line: line_no as u32,
                        x,
                        y,
                        width: entry.width,
                        height: line_height,
                        display: entry.display,
                    });
                }
                pen = if base_rtl {
                    pen - entry.width
                } else {
                    pen + entry.width
                };
            }
            span_start = span_end;
        }

        // Decoration metrics: component-wise maximum by absolute value over
        // the runs present on the line, in pixels.
        let mut metrics = LineMetrics::default();
        let mut have_metrics = false;
        for pass in 0..2 {
            for entry in &placed {
                if pass == 0 && entry.display == DisplayMode::Suppressed {
                    continue;
                }
                let Some(ci) = entry.cluster else { continue };
                let cluster = &clusters[ci as usize];
                let run = &runs[cluster.run_index as usize];
                if let Some(font) = run.font {
                    let m = font.metrics;
                    metrics.ascent = metrics.ascent.max(m.scale(m.ascent, run.size));
                    metrics.descent = metrics.descent.max(m.scale(m.descent, run.size));
                    max_abs(&mut metrics.underline_offset, m.scale(m.underline_position, run.size));
                    max_abs(
                        &mut metrics.underline_thickness,
                        m.scale(m.underline_thickness, run.size),
                    );
                    max_abs(
                        &mut metrics.strikethrough_offset,
                        m.scale(m.strikethrough_position, run.size),
                    );
                    max_abs(
                        &mut metrics.strikethrough_thickness,
                        m.scale(m.strikethrough_thickness, run.size),
                    );
                    have_metrics = true;
                } else if cluster.content == ContentType::Inline {
                    // Inline objects sit on the baseline; their height
                    // contributes ascent.
                    let object = paragraph.runs[cluster.style_index as usize].object;
                    if let Some(object) = object {
                        metrics.ascent = metrics.ascent.max(object.height);
                        have_metrics = true;
                    }
                }
            }
            if have_metrics {
                break;
            }
        }
        let half_leading = (line_height - (metrics.ascent + metrics.descent)) * 0.5;
        metrics.baseline = y + half_leading + metrics.ascent;

        // Trailing whitespace, scanned from the logical end of the line.
        for entry in placed.iter().rev() {
            let Some(ci) = entry.cluster else { continue };
            if entry.display == DisplayMode::Suppressed {
                continue;
            }
            if clusters[ci as usize].is_whitespace() {
                metrics.trailing_whitespace += entry.width;
            } else {
                break;
            }
        }

        let rect = if min_x <= max_x {
            metrics.advance = max_x - min_x;
            Rect::new(f64::from(min_x), slot.y, f64::from(max_x), slot.y + f64::from(line_height))
        } else {
            Rect::new(
                f64::from(pen_start),
                slot.y,
                f64::from(pen_start),
                slot.y + f64::from(line_height),
            )
        };

        *overflowed |= overfull;
        lines.push(LineData {
            formatted_range: formatted_start..formatted.len(),
            ratio: brk.ratio,
            overfull,
            rect,
            metrics,
        });
        start = brk.item + 1;
    }

    // Floaters live outside the line flow; emit them from their resolved
    // rectangles.
    for (ci, cluster) in clusters.iter().enumerate() {
        if cluster.content != ContentType::Floater {
            continue;
        }
        if let Some(rect) = state.floater_rect(ci as u32) {
            cluster_to_formatted[ci] = formatted.len() as u32;
            formatted.push(FormattedCluster {
                cluster: ci as u32,
                line: NO_LINE,
                x: rect.x0 as f32,
                y: rect.y0 as f32,
                width: rect.width() as f32,
                height: rect.height() as f32,
                display: DisplayMode::Visible,
            });
        }
    }
}

fn max_abs(slot: &mut f32, value: f32) {
    if value.abs() > slot.abs() {
        *slot = value;
    }
}
