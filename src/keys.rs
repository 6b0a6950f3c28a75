// Swatch builders: one icon + label row per legend entry

use crate::error::LegendError;
use crate::ir::{Aesthetic, Align, Artist, DrawingArea, Marker, OffsetBox, Packer, TextArea, VisualValue};
use crate::style::{LineType, MarkerShape, TextStyle, BLACK};
use plotters::style::RGBAColor;

/// Font size the swatch geometry is expressed in
pub const FONT_SIZE: f64 = 10.0;
/// Labels longer than this are cut
pub const MAX_LABEL_LENGTH: usize = 20;

/// Marker size of a combined key with no size mapped
pub const DEFAULT_SIZE: f64 = 20.0;
/// Vertical position of combined-key glyphs inside their area
pub const KEY_Y_OFFSET: f64 = 10.0;
pub const KEY_HEIGHT: f64 = 20.0;
/// Horizontal extent of a combined line key
pub const KEY_LINE_WIDTH: f64 = 20.0;

// Row packing shared by every standalone key
const ROW_PAD: f64 = 5.0;
const ROW_SEP: f64 = 0.0;

/// Capitalize the first letter of every word, lowercase the rest
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// First `max_length` characters of a label
pub fn truncate_label(label: &str, max_length: usize) -> String {
    label.chars().take(max_length).collect()
}

/// Bold legend title, e.g. " Weight "
pub fn make_title(title: &str) -> OffsetBox {
    OffsetBox::Text(TextArea {
        text: format!(" {} ", title_case(title)),
        style: TextStyle::bold(),
    })
}

/// Plain label used by combined rows
pub fn make_label(label: &str, max_length: usize) -> OffsetBox {
    OffsetBox::Text(TextArea {
        text: truncate_label(label, max_length),
        style: TextStyle::default(),
    })
}

/// Indented label used by standalone rows
fn key_label(label: &str) -> OffsetBox {
    OffsetBox::Text(TextArea {
        text: format!("  {}", truncate_label(label, MAX_LABEL_LENGTH)),
        style: TextStyle::default(),
    })
}

fn key_row(viz: DrawingArea, label: &str, height: Option<f64>) -> OffsetBox {
    OffsetBox::HPack(Packer {
        children: vec![OffsetBox::Drawing(viz), key_label(label)],
        align: Align::Center,
        pad: ROW_PAD,
        sep: ROW_SEP,
        height,
    })
}

fn marker_artist(x: f64, y: f64, shape: MarkerShape, size: f64, color: RGBAColor) -> Artist {
    Artist::Line {
        xs: vec![x],
        ys: vec![y],
        color,
        linetype: LineType::Solid,
        marker: Some(Marker { shape, size }),
    }
}

/// Color and fill swatch: a filled rectangle left of the label
pub fn make_line_key(label: &str, color: RGBAColor) -> OffsetBox {
    let mut viz = DrawingArea::new(20.0, 20.0);
    viz.add_artist(Artist::Rect {
        x: 0.0,
        y: 5.0,
        width: 16.0,
        height: 5.0,
        fill: color,
    });
    key_row(viz, label, Some(25.0))
}

/// Linetype swatch: a short dashed (or solid) segment
pub fn make_linetype_key(label: &str, linetype: &LineType) -> OffsetBox {
    let mut viz = DrawingArea::new(30.0, 20.0);
    let xs: Vec<f64> = (0..7).map(|i| (0.5 + 0.25 * i as f64) * FONT_SIZE).collect();
    let ys = vec![0.75 * FONT_SIZE; xs.len()];
    viz.add_artist(Artist::Line {
        xs,
        ys,
        color: BLACK,
        linetype: linetype.clone(),
        marker: None,
    });
    key_row(viz, label, None)
}

/// Shape swatch: a single marker glyph
pub fn make_shape_key(label: &str, shape: MarkerShape) -> OffsetBox {
    let mut viz = DrawingArea::new(15.0, 20.0);
    viz.add_artist(marker_artist(
        0.5 * FONT_SIZE,
        0.75 * FONT_SIZE,
        shape,
        0.5 * FONT_SIZE,
        BLACK,
    ));
    key_row(viz, label, None)
}

/// Size swatch: a circle scaled by size / 20
pub fn make_size_key(label: &str, size: f64) -> OffsetBox {
    let mut viz = DrawingArea::new(15.0, 20.0);
    viz.add_artist(marker_artist(
        0.5 * FONT_SIZE,
        0.75 * FONT_SIZE,
        MarkerShape::Circle,
        size / 20.0,
        BLACK,
    ));
    key_row(viz, label, None)
}

/// Build the standalone swatch row for one aesthetic value
pub fn make_key(aesthetic: Aesthetic, label: &str, value: &VisualValue) -> Result<OffsetBox, LegendError> {
    let mismatch = || LegendError::InvalidVisualValue {
        aesthetic,
        value: format!("{:?}", value),
    };

    match aesthetic {
        Aesthetic::Color | Aesthetic::Fill => {
            value.as_color().map(|c| make_line_key(label, c)).ok_or_else(mismatch)
        }
        Aesthetic::Linetype => value
            .as_linetype()
            .map(|l| make_linetype_key(label, l))
            .ok_or_else(mismatch),
        Aesthetic::Shape => value.as_shape().map(|s| make_shape_key(label, s)).ok_or_else(mismatch),
        Aesthetic::Size => value.as_size().map(|s| make_size_key(label, s)).ok_or_else(mismatch),
        Aesthetic::Alpha => Err(LegendError::NoStandaloneKey(aesthetic)),
    }
}

/// Combined marker glyph folding color, shape and size together.
/// Missing components default to black, circle and size 20.
pub fn make_shape(
    color: Option<RGBAColor>,
    shape: Option<MarkerShape>,
    size: Option<f64>,
    y_offset: f64,
    height: f64,
) -> DrawingArea {
    let color = color.unwrap_or(BLACK);
    let shape = shape.unwrap_or_default();
    let size = size.unwrap_or(DEFAULT_SIZE);

    let mut viz = DrawingArea::new(15.0, height);
    viz.add_artist(marker_artist(0.0, y_offset, shape, size / 20.0, color));
    viz
}

/// Combined line glyph folding color and linetype together.
/// Missing components default to black and solid.
pub fn make_line(
    color: Option<RGBAColor>,
    style: Option<&LineType>,
    width: f64,
    y_offset: f64,
    height: f64,
) -> DrawingArea {
    let color = color.unwrap_or(BLACK);
    let linetype = style.cloned().unwrap_or_default();

    let mut viz = DrawingArea::new(30.0, height);
    let xs: Vec<f64> = (0..3).map(|i| i as f64 * width / 3.0).collect();
    let ys = vec![y_offset; xs.len()];
    viz.add_artist(Artist::Line {
        xs,
        ys,
        color,
        linetype,
        marker: None,
    });
    viz
}
