// Parsers for the visual values found in legend documents

pub mod lexer;
pub mod visual;

pub use visual::{parse_dash_sequence, parse_hex_color, parse_number, parse_rgb_function};
