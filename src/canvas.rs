use anyhow::{Context, Result};
use image::ImageEncoder;
use log::{debug, warn};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;

use crate::error::LegendError;
use crate::ir::AnchoredBox;
use crate::layout::{self, Bounds, Primitive};
use crate::style::{FontFace, MarkerShape};
use crate::surface::Surface;
use crate::{OutputFormat, RenderOptions};

/// Largest accepted width or height, in pixels
pub const MAX_DIMENSION: u32 = 16_384;

/// Figure with an empty axes frame that legend blocks are anchored to
pub struct Canvas {
    width: u32,
    height: u32,
    axes: [f64; 4],
    font_size: f64,
    format: OutputFormat,
    overlays: Vec<AnchoredBox>,
}

impl Canvas {
    pub fn new(options: &RenderOptions) -> Self {
        Self {
            width: options.width,
            height: options.height,
            axes: options.axes,
            font_size: options.layout.font_size,
            format: options.format,
            overlays: Vec::new(),
        }
    }

    /// Data area in pixels
    pub fn axes_bounds(&self) -> Bounds {
        Bounds::from_fractions(self.axes, self.width, self.height)
    }

    pub fn overlays(&self) -> &[AnchoredBox] {
        &self.overlays
    }

    fn check_size(&self) -> Result<()> {
        let in_range = |v: u32| (1..=MAX_DIMENSION).contains(&v);
        if !in_range(self.width) || !in_range(self.height) {
            anyhow::bail!(
                "Canvas size {}x{} is out of range (1 to {} pixels per side)",
                self.width,
                self.height,
                MAX_DIMENSION
            );
        }
        Ok(())
    }

    /// Encode in the configured output format
    pub fn render(self) -> Result<Vec<u8>> {
        match self.format {
            OutputFormat::Png => self.render_png(),
            OutputFormat::Svg => self.render_svg().map(String::into_bytes),
        }
    }

    pub fn render_png(self) -> Result<Vec<u8>> {
        self.check_size()?;
        let len = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(3))
            .context("Canvas buffer size overflows")?;
        let mut buffer = vec![0u8; len];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            self.draw(&root)?;
        }

        let mut png_bytes = Vec::new();
        {
            let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
            encoder
                .write_image(&buffer, self.width, self.height, image::ColorType::Rgb8)
                .context("Failed to encode PNG")?;
        }

        Ok(png_bytes)
    }

    pub fn render_svg(self) -> Result<String> {
        self.check_size()?;
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            self.draw(&root)?;
        }
        Ok(svg)
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).context("Failed to fill background")?;

        let axes = self.axes_bounds();
        root.draw(&Rectangle::new(
            [px(axes.x, axes.y), px(axes.x + axes.width, axes.y + axes.height)],
            BLACK.stroke_width(1),
        ))
        .context("Failed to draw axes frame")?;

        for overlay in &self.overlays {
            let mut primitives = layout::layout_anchored(overlay, axes, self.font_size);
            if overlay.clip_on {
                primitives.retain(|p| inside(p, axes));
            }
            debug!(
                "drawing overlay at {:?} with {} primitives",
                overlay.bbox_to_anchor,
                primitives.len()
            );

            for primitive in &primitives {
                draw_primitive(root, primitive)?;
            }

            if overlay.frame_on {
                let b = layout::anchored_bounds(overlay, axes, self.font_size);
                root.draw(&Rectangle::new(
                    [px(b.x, b.y), px(b.x + b.width, b.y + b.height)],
                    BLACK.stroke_width(1),
                ))
                .context("Failed to draw legend frame")?;
            }
        }

        root.present().context("Failed to present drawing")?;
        Ok(())
    }
}

impl Surface for Canvas {
    fn add_overlay(&mut self, overlay: AnchoredBox) -> Result<(), LegendError> {
        let (x, y) = overlay.bbox_to_anchor;
        if !x.is_finite() || !y.is_finite() {
            return Err(LegendError::Surface(format!(
                "anchor ({}, {}) is not a finite position",
                x, y
            )));
        }
        self.overlays.push(overlay);
        Ok(())
    }
}

fn px(x: f64, y: f64) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

/// Anchor point of a primitive lies within the axes rectangle
fn inside(primitive: &Primitive, axes: Bounds) -> bool {
    let (x, y) = match primitive {
        Primitive::Rect { x0, y0, .. } => (*x0, *y0),
        Primitive::Polyline { points, .. } => match points.first() {
            Some(p) => *p,
            None => return false,
        },
        Primitive::Marker { center, .. } => *center,
        Primitive::Text { pos, .. } => *pos,
    };
    x >= axes.x && x <= axes.x + axes.width && y >= axes.y && y <= axes.y + axes.height
}

fn draw_primitive<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    primitive: &Primitive,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    match primitive {
        Primitive::Rect { x0, y0, x1, y1, fill } => {
            root.draw(&Rectangle::new([px(*x0, *y0), px(*x1, *y1)], fill.filled()))
                .context("Failed to draw swatch rectangle")?;
        }
        Primitive::Polyline { points, color, dash } => {
            for segment in layout::dash_segments(points, dash) {
                let segment: Vec<(i32, i32)> = segment.iter().map(|(x, y)| px(*x, *y)).collect();
                root.draw(&PathElement::new(segment, color.stroke_width(1)))
                    .context("Failed to draw swatch line")?;
            }
        }
        Primitive::Marker { center, shape, size, color } => {
            draw_marker(root, *center, *shape, *size, *color)?;
        }
        Primitive::Text { pos, text, style } => {
            let font_style = match style.face {
                FontFace::Plain => FontStyle::Normal,
                FontFace::Bold | FontFace::BoldItalic => FontStyle::Bold,
                FontFace::Italic => FontStyle::Italic,
            };
            let font = (style.family.as_str(), style.size)
                .into_font()
                .style(font_style)
                .color(&style.color);
            // Bitmap text needs a system font; keep the glyphs when none loads
            if let Err(e) = root.draw(&Text::new(text.as_str(), px(pos.0, pos.1), font)) {
                warn!("skipping text '{}': {}", text.trim(), e);
            }
        }
    }
    Ok(())
}

/// Radius for a glyph of diameter `size`: at least 1 px, at most the
/// diagonal of the drawing area
fn marker_radius(size: f64, (width, height): (u32, u32)) -> f64 {
    let limit = f64::from(width).hypot(f64::from(height)).max(1.0);
    if size.is_finite() {
        (size / 2.0).clamp(1.0, limit)
    } else {
        1.0
    }
}

fn draw_marker<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    center: (f64, f64),
    shape: MarkerShape,
    size: f64,
    color: RGBAColor,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let r = marker_radius(size, root.dim_in_pixel());
    let (cx, cy) = center;
    let at = |dx: f64, dy: f64| px(cx + dx, cy + dy);

    let result = match shape {
        MarkerShape::Circle => root.draw(&Circle::new(px(cx, cy), r.round() as i32, color.filled())),
        MarkerShape::Square => root.draw(&Rectangle::new([at(-r, -r), at(r, r)], color.filled())),
        MarkerShape::TriangleUp => root.draw(&Polygon::new(
            vec![at(0.0, -r), at(-r, r), at(r, r)],
            color.filled(),
        )),
        MarkerShape::TriangleDown => root.draw(&Polygon::new(
            vec![at(0.0, r), at(-r, -r), at(r, -r)],
            color.filled(),
        )),
        MarkerShape::Diamond => root.draw(&Polygon::new(
            vec![at(0.0, -r), at(r, 0.0), at(0.0, r), at(-r, 0.0)],
            color.filled(),
        )),
        MarkerShape::Cross => root
            .draw(&PathElement::new(vec![at(-r, -r), at(r, r)], color.stroke_width(1)))
            .and_then(|_| {
                root.draw(&PathElement::new(vec![at(-r, r), at(r, -r)], color.stroke_width(1)))
            }),
        MarkerShape::Plus => root
            .draw(&PathElement::new(vec![at(-r, 0.0), at(r, 0.0)], color.stroke_width(1)))
            .and_then(|_| {
                root.draw(&PathElement::new(vec![at(0.0, -r), at(0.0, r)], color.stroke_width(1)))
            }),
        MarkerShape::Star => {
            // Five outer points alternating with inner points at 0.4 r
            let points: Vec<(i32, i32)> = (0..10)
                .map(|i| {
                    let radius = if i % 2 == 0 { r } else { 0.4 * r };
                    let angle = std::f64::consts::PI * (i as f64 / 5.0 - 0.5);
                    at(radius * angle.cos(), radius * angle.sin())
                })
                .collect();
            root.draw(&Polygon::new(points, color.filled()))
        }
    };
    result.context("Failed to draw marker")?;
    Ok(())
}
