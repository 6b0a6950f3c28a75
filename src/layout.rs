//! Box layout
//!
//! Measures an offset-box tree and flattens it into absolute primitives in
//! pixel space (origin top-left, y down), ready for a drawing backend.
//!
//! Text is measured with a fixed advance of 0.6 em per character so layout
//! stays independent of the fonts installed on the machine.

use crate::ir::{Align, AnchoredBox, Artist, DrawingArea, OffsetBox, Packer};
use crate::style::{MarkerShape, TextStyle};
use plotters::style::RGBAColor;

const CHAR_ADVANCE: f64 = 0.6;
const LINE_HEIGHT: f64 = 1.2;
/// Shortest dash or gap drawn, in pixels
pub const MIN_DASH: f64 = 0.5;

/// Axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Rectangle given as figure fractions [left, bottom, width, height]
    pub fn from_fractions(fractions: [f64; 4], width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let [left, bottom, fw, fh] = fractions;
        Bounds {
            x: left * w,
            y: h - (bottom + fh) * h,
            width: fw * w,
            height: fh * h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Positioned drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        fill: RGBAColor,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: RGBAColor,
        /// On/off lengths; empty for solid
        dash: Vec<f64>,
    },
    Marker {
        center: (f64, f64),
        shape: MarkerShape,
        size: f64,
        color: RGBAColor,
    },
    Text {
        /// Top-left corner
        pos: (f64, f64),
        text: String,
        style: TextStyle,
    },
}

pub fn measure(node: &OffsetBox) -> Extent {
    match node {
        OffsetBox::Text(t) => Extent {
            width: t.text.chars().count() as f64 * t.style.size * CHAR_ADVANCE,
            height: t.style.size * LINE_HEIGHT,
        },
        OffsetBox::Drawing(d) => Extent {
            width: d.width,
            height: d.height,
        },
        OffsetBox::HPack(p) => {
            let extents: Vec<Extent> = p.children.iter().map(measure).collect();
            let content: f64 = extents.iter().map(|e| e.width).sum::<f64>() + gaps(p);
            let tallest = extents.iter().map(|e| e.height).fold(0.0, f64::max);
            Extent {
                width: content + 2.0 * p.pad,
                height: p.height.unwrap_or(tallest + 2.0 * p.pad),
            }
        }
        OffsetBox::VPack(p) => {
            let extents: Vec<Extent> = p.children.iter().map(measure).collect();
            let content: f64 = extents.iter().map(|e| e.height).sum::<f64>() + gaps(p);
            let widest = extents.iter().map(|e| e.width).fold(0.0, f64::max);
            Extent {
                width: widest + 2.0 * p.pad,
                height: p.height.unwrap_or(content + 2.0 * p.pad),
            }
        }
    }
}

fn gaps(p: &Packer) -> f64 {
    p.sep * p.children.len().saturating_sub(1) as f64
}

/// Flatten a box whose top-left corner sits at (x, y)
pub fn place(node: &OffsetBox, x: f64, y: f64, out: &mut Vec<Primitive>) {
    match node {
        OffsetBox::Text(t) => out.push(Primitive::Text {
            pos: (x, y),
            text: t.text.clone(),
            style: t.style.clone(),
        }),
        OffsetBox::Drawing(d) => place_drawing(d, x, y, out),
        OffsetBox::HPack(p) => {
            let outer = measure(node);
            let mut cx = x + p.pad;
            for child in &p.children {
                let e = measure(child);
                let cy = match p.align {
                    Align::Left => y + p.pad,
                    Align::Center => y + (outer.height - e.height) / 2.0,
                    Align::Right => y + outer.height - p.pad - e.height,
                };
                place(child, cx, cy, out);
                cx += e.width + p.sep;
            }
        }
        OffsetBox::VPack(p) => {
            let outer = measure(node);
            let mut cy = y + p.pad;
            for child in &p.children {
                let e = measure(child);
                let cx = match p.align {
                    Align::Left => x + p.pad,
                    Align::Center => x + (outer.width - e.width) / 2.0,
                    Align::Right => x + outer.width - p.pad - e.width,
                };
                place(child, cx, cy, out);
                cy += e.height + p.sep;
            }
        }
    }
}

/// Drawing areas use a bottom-left origin; flip into pixel space
fn place_drawing(d: &DrawingArea, x: f64, y: f64, out: &mut Vec<Primitive>) {
    let to_px = |ax: f64, ay: f64| (x + ax, y + d.height - ay);

    for artist in &d.artists {
        match artist {
            Artist::Rect {
                x: rx,
                y: ry,
                width,
                height,
                fill,
            } => {
                let (x0, y1) = to_px(*rx, *ry);
                let (x1, y0) = to_px(rx + width, ry + height);
                out.push(Primitive::Rect {
                    x0,
                    y0,
                    x1,
                    y1,
                    fill: *fill,
                });
            }
            Artist::Line {
                xs,
                ys,
                color,
                linetype,
                marker,
            } => {
                let points: Vec<(f64, f64)> = xs
                    .iter()
                    .zip(ys)
                    .map(|(ax, ay)| to_px(*ax, *ay))
                    .collect();
                if points.len() > 1 {
                    out.push(Primitive::Polyline {
                        points: points.clone(),
                        color: *color,
                        dash: linetype.dash_pattern(),
                    });
                }
                if let Some(m) = marker {
                    out.extend(points.into_iter().map(|center| Primitive::Marker {
                        center,
                        shape: m.shape,
                        size: m.size,
                        color: *color,
                    }));
                }
            }
        }
    }
}

/// Outer rectangle of an anchored box, padding included
pub fn anchored_bounds(anchored: &AnchoredBox, axes: Bounds, font_size: f64) -> Bounds {
    let content = measure(&anchored.child);
    let pad = anchored.pad * font_size;
    let borderpad = anchored.borderpad * font_size;
    let (width, height) = (content.width + 2.0 * pad, content.height + 2.0 * pad);

    let (bx, by) = anchored.bbox_to_anchor;
    let anchor_x = axes.x + bx * axes.width;
    let anchor_y = axes.y + (1.0 - by) * axes.height;

    // Boxes anchored by an edge keep `borderpad` away from the anchor
    let (fx, fy) = anchored.loc.fractions();
    Bounds {
        x: anchor_x - fx * width + (1.0 - 2.0 * fx) * borderpad,
        y: anchor_y - fy * height + (1.0 - 2.0 * fy) * borderpad,
        width,
        height,
    }
}

/// Position an anchored box against the axes and flatten it
pub fn layout_anchored(anchored: &AnchoredBox, axes: Bounds, font_size: f64) -> Vec<Primitive> {
    let outer = anchored_bounds(anchored, axes, font_size);
    let pad = anchored.pad * font_size;

    let mut out = Vec::new();
    place(&anchored.child, outer.x + pad, outer.y + pad, &mut out);
    out
}

/// Split a polyline into its visible dash segments.
///
/// A pattern with no positive length is solid. Shorter lengths are raised to
/// [`MIN_DASH`], which bounds the number of segments by the line length.
pub fn dash_segments(points: &[(f64, f64)], dash: &[f64]) -> Vec<Vec<(f64, f64)>> {
    if !dash.iter().any(|d| *d > 0.0) {
        return vec![points.to_vec()];
    }
    let dash: Vec<f64> = dash.iter().map(|d| d.max(MIN_DASH)).collect();

    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut index = 0;
    let mut remaining = dash[0];
    let mut on = true;

    for pair in points.windows(2) {
        let (sx, sy) = pair[0];
        let (ex, ey) = pair[1];
        let total = ((ex - sx).powi(2) + (ey - sy).powi(2)).sqrt();
        if total == 0.0 || !total.is_finite() {
            continue;
        }
        let (ux, uy) = ((ex - sx) / total, (ey - sy) / total);
        let at = |d: f64| (sx + ux * d, sy + uy * d);
        let mut travelled = 0.0;

        while travelled < total {
            if on && current.is_empty() {
                current.push(at(travelled));
            }
            let step = remaining.min(total - travelled);
            travelled += step;
            remaining -= step;
            if on {
                current.push(at(travelled));
            }

            if remaining <= 0.0 {
                if on && current.len() > 1 {
                    segments.push(std::mem::take(&mut current));
                }
                current.clear();
                on = !on;
                index = (index + 1) % dash.len();
                remaining = dash[index];
            }
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
}
