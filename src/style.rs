//! Visual-value resolution
//!
//! Turns the raw strings found in a legend document into concrete styles:
//! colors, marker shapes, line types and text styles.
//!
//! ```text
//! color / fill  -> RGBAColor   ("red", "k", "#ff0000", "rgb(255, 0, 0)")
//! shape         -> MarkerShape ("o", "s", "^", "circle", ...)
//! linetype      -> LineType    ("solid", "--", "dashdot", "4 2", ...)
//! ```

use crate::parser::visual;
use plotters::style::RGBAColor;

/// Opaque black, the fallback for every unmapped color.
pub const BLACK: RGBAColor = RGBAColor(0, 0, 0, 1.0);

/// Font face variants
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FontFace {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

/// Fully resolved text style ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub color: RGBAColor,
    pub size: f64,
    pub face: FontFace,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            family: "sans-serif".to_string(),
            color: BLACK,
            size: 10.0,
            face: FontFace::Plain,
        }
    }
}

impl TextStyle {
    pub fn bold() -> Self {
        TextStyle {
            face: FontFace::Bold,
            ..Default::default()
        }
    }
}

/// Line type variants
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LineType {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    /// Explicit on/off sequence in pixels
    Custom(Vec<f64>),
}

impl LineType {
    /// On/off dash lengths; empty for a continuous stroke.
    pub fn dash_pattern(&self) -> Vec<f64> {
        match self {
            LineType::Solid => Vec::new(),
            LineType::Dashed => vec![6.0, 3.0],
            LineType::Dotted => vec![1.0, 3.0],
            LineType::DashDot => vec![6.0, 3.0, 1.0, 3.0],
            LineType::Custom(seq) => seq.clone(),
        }
    }
}

/// Marker glyphs available to shape swatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
    Star,
}

/// Parse a color string, supporting named colors, single-letter codes,
/// hex (#RGB, #RRGGBB, #RRGGBBAA) and rgb()/rgba() functions
pub fn parse_color(color_str: &str) -> Option<RGBAColor> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return visual::parse_hex_color(color_str);
    }
    if color_str.starts_with("rgb") {
        return visual::parse_rgb_function(color_str);
    }

    let (r, g, b) = match color_str.to_lowercase().as_str() {
        "w" | "white" => (255, 255, 255),
        "k" | "black" => (0, 0, 0),
        "r" | "red" => (255, 0, 0),
        "g" | "green" => (0, 128, 0),
        "b" | "blue" => (0, 0, 255),
        "y" | "yellow" => (255, 255, 0),
        "c" | "cyan" => (0, 255, 255),
        "m" | "magenta" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "pink" => (255, 192, 203),
        "brown" => (139, 69, 19),
        "olive" => (128, 128, 0),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (64, 64, 64),
        "lightgray" | "lightgrey" => (192, 192, 192),
        // gray0 = black, gray100 = white
        s if s.starts_with("gray") || s.starts_with("grey") => {
            let n = s[4..].parse::<u8>().ok().filter(|n| *n <= 100)?;
            let v = (n as f64 * 2.55).round() as u8;
            (v, v, v)
        }
        _ => return None,
    };
    Some(RGBAColor(r, g, b, 1.0))
}

/// Parse a linetype given by name, by short code, or as a dash sequence
pub fn parse_linetype(linetype: &str) -> Option<LineType> {
    match linetype.trim().to_lowercase().as_str() {
        "solid" | "-" => Some(LineType::Solid),
        "dashed" | "dash" | "--" => Some(LineType::Dashed),
        "dotted" | "dot" | ":" => Some(LineType::Dotted),
        "dashdot" | "dotdash" | "-." => Some(LineType::DashDot),
        other => visual::parse_dash_sequence(other).map(LineType::Custom),
    }
}

/// Parse a marker code or name into a MarkerShape
pub fn parse_shape(shape: &str) -> Option<MarkerShape> {
    let shape = shape.trim();
    // Single-letter codes are case sensitive
    let parsed = match shape {
        "o" | "." => MarkerShape::Circle,
        "s" => MarkerShape::Square,
        "^" => MarkerShape::TriangleUp,
        "v" => MarkerShape::TriangleDown,
        "D" | "d" => MarkerShape::Diamond,
        "x" | "X" => MarkerShape::Cross,
        "+" | "P" => MarkerShape::Plus,
        "*" => MarkerShape::Star,
        _ => match shape.to_lowercase().as_str() {
            "circle" => MarkerShape::Circle,
            "square" => MarkerShape::Square,
            "triangle" | "triangle_up" => MarkerShape::TriangleUp,
            "triangle_down" => MarkerShape::TriangleDown,
            "diamond" => MarkerShape::Diamond,
            "cross" => MarkerShape::Cross,
            "plus" => MarkerShape::Plus,
            "star" => MarkerShape::Star,
            _ => return None,
        },
    };
    Some(parsed)
}

/// Give a color the requested opacity
pub fn with_alpha(color: RGBAColor, alpha: f64) -> RGBAColor {
    RGBAColor(color.0, color.1, color.2, alpha.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_color("#FF0000"), Some(RGBAColor(255, 0, 0, 1.0)));
        assert_eq!(parse_color("#00ff00"), Some(RGBAColor(0, 255, 0, 1.0)));
        assert_eq!(parse_color("#F00"), Some(RGBAColor(255, 0, 0, 1.0)));
        assert_eq!(parse_color("#CCCCCC"), Some(RGBAColor(204, 204, 204, 1.0)));
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn test_parse_named_color() {
        assert_eq!(parse_color("white"), Some(RGBAColor(255, 255, 255, 1.0)));
        assert_eq!(parse_color("k"), Some(BLACK));
        assert_eq!(parse_color("Red"), Some(RGBAColor(255, 0, 0, 1.0)));
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_parse_gray_scale() {
        assert_eq!(parse_color("gray0"), Some(RGBAColor(0, 0, 0, 1.0)));
        assert_eq!(parse_color("gray100"), Some(RGBAColor(255, 255, 255, 1.0)));
        assert_eq!(parse_color("gray50"), Some(RGBAColor(127, 127, 127, 1.0)));
        assert_eq!(parse_color("grey90"), Some(RGBAColor(229, 229, 229, 1.0)));
        assert_eq!(parse_color("gray101"), None);
    }

    #[test]
    fn test_parse_rgb_color() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(RGBAColor(10, 20, 30, 1.0)));
        assert_eq!(parse_color("rgba(10,20,30,0.5)"), Some(RGBAColor(10, 20, 30, 0.5)));
    }

    #[test]
    fn test_parse_linetype() {
        assert_eq!(parse_linetype("solid"), Some(LineType::Solid));
        assert_eq!(parse_linetype("--"), Some(LineType::Dashed));
        assert_eq!(parse_linetype(":"), Some(LineType::Dotted));
        assert_eq!(parse_linetype("-."), Some(LineType::DashDot));
        assert_eq!(parse_linetype("4 2"), Some(LineType::Custom(vec![4.0, 2.0])));
        assert_eq!(parse_linetype("wiggly"), None);
    }

    #[test]
    fn test_dash_patterns() {
        assert!(LineType::Solid.dash_pattern().is_empty());
        assert_eq!(LineType::Dashed.dash_pattern(), vec![6.0, 3.0]);
        assert_eq!(LineType::Custom(vec![2.0, 1.0]).dash_pattern(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_parse_shape() {
        assert_eq!(parse_shape("o"), Some(MarkerShape::Circle));
        assert_eq!(parse_shape("D"), Some(MarkerShape::Diamond));
        assert_eq!(parse_shape("^"), Some(MarkerShape::TriangleUp));
        assert_eq!(parse_shape("Square"), Some(MarkerShape::Square));
        assert_eq!(parse_shape("hexagon"), None);
    }

    #[test]
    fn test_with_alpha_clamps() {
        assert_eq!(with_alpha(BLACK, 0.3), RGBAColor(0, 0, 0, 0.3));
        assert_eq!(with_alpha(BLACK, 7.0), BLACK);
    }
}
