// Visual value parsers: hex colors, rgb() colors, numbers and dash sequences

use super::lexer::{list_item, number_literal, ws};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, hex_digit1, u8 as byte},
    combinator::{all_consuming, opt},
    multi::many1,
    sequence::{delimited, preceded},
    IResult,
};
use plotters::style::RGBAColor;

/// Parse a hex color
/// Format: #RGB, #RRGGBB or #RRGGBBAA
fn hex_color(input: &str) -> IResult<&str, RGBAColor> {
    let (rest, digits) = preceded(char('#'), hex_digit1)(input)?;

    let color = match digits.len() {
        3 => RGBAColor(
            channel(&digits[0..1]) * 17,
            channel(&digits[1..2]) * 17,
            channel(&digits[2..3]) * 17,
            1.0,
        ),
        6 | 8 => {
            let alpha = if digits.len() == 8 {
                channel(&digits[6..8]) as f64 / 255.0
            } else {
                1.0
            };
            RGBAColor(
                channel(&digits[0..2]),
                channel(&digits[2..4]),
                channel(&digits[4..6]),
                alpha,
            )
        }
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::HexDigit,
            )))
        }
    };

    Ok((rest, color))
}

/// Value of one or two validated hex digits
fn channel(digits: &str) -> u8 {
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0u32, |acc, d| acc * 16 + d) as u8
}

/// Parse an rgb()/rgba() color function
/// Format: rgb(255, 0, 0) or rgba(255, 0, 0, 0.5)
fn rgb_function(input: &str) -> IResult<&str, RGBAColor> {
    let (input, _) = ws(alt((tag("rgba"), tag("rgb"))))(input)?;
    let (input, _) = ws(char('('))(input)?;
    let (input, r) = list_item(byte)(input)?;
    let (input, g) = list_item(byte)(input)?;
    let (input, b) = list_item(byte)(input)?;
    let (input, alpha) = opt(list_item(number_literal))(input)?;
    let (input, _) = ws(char(')'))(input)?;

    Ok((input, RGBAColor(r, g, b, alpha.unwrap_or(1.0).clamp(0.0, 1.0))))
}

/// Parse an on/off dash sequence
/// Format: `4 2`, `4, 2` or `(4, 2, 1, 2)`
fn dash_sequence(input: &str) -> IResult<&str, Vec<f64>> {
    alt((
        delimited(ws(char('(')), many1(list_item(number_literal)), ws(char(')'))),
        many1(list_item(number_literal)),
    ))(input)
}

pub fn parse_hex_color(input: &str) -> Option<RGBAColor> {
    all_consuming(ws(hex_color))(input).ok().map(|(_, c)| c)
}

pub fn parse_rgb_function(input: &str) -> Option<RGBAColor> {
    all_consuming(rgb_function)(input).ok().map(|(_, c)| c)
}

/// Parse a finite number, surrounded by optional whitespace
pub fn parse_number(input: &str) -> Option<f64> {
    all_consuming(ws(number_literal))(input)
        .ok()
        .map(|(_, v)| v)
        .filter(|v| v.is_finite())
}

/// Shortest dash or gap accepted, in pixels
const MIN_DASH_LENGTH: f64 = 0.5;

/// Parse a dash sequence; it must hold an even number of lengths, each at
/// least half a pixel
pub fn parse_dash_sequence(input: &str) -> Option<Vec<f64>> {
    let (_, seq) = all_consuming(dash_sequence)(input).ok()?;
    if seq.len() % 2 != 0 || seq.iter().any(|v| !v.is_finite() || *v < MIN_DASH_LENGTH) {
        return None;
    }
    Some(seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_forms() {
        assert_eq!(parse_hex_color("#ff8000"), Some(RGBAColor(255, 128, 0, 1.0)));
        assert_eq!(parse_hex_color("#abc"), Some(RGBAColor(170, 187, 204, 1.0)));
        assert_eq!(parse_hex_color("#00000000"), Some(RGBAColor(0, 0, 0, 0.0)));
    }

    #[test]
    fn test_hex_color_rejects_bad_lengths() {
        assert_eq!(parse_hex_color("#ff"), None);
        assert_eq!(parse_hex_color("#fffff"), None);
        assert_eq!(parse_hex_color("#ggg"), None);
        assert_eq!(parse_hex_color("fff"), None);
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(parse_rgb_function("rgb(1, 2, 3)"), Some(RGBAColor(1, 2, 3, 1.0)));
        assert_eq!(parse_rgb_function("rgba(1,2,3,0.25)"), Some(RGBAColor(1, 2, 3, 0.25)));
        assert_eq!(parse_rgb_function("rgb(256, 0, 0)"), None);
        assert_eq!(parse_rgb_function("rgb(1, 2)"), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("40"), Some(40.0));
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("12px"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_dash_sequence() {
        assert_eq!(parse_dash_sequence("4 2"), Some(vec![4.0, 2.0]));
        assert_eq!(parse_dash_sequence("(4, 2, 1, 2)"), Some(vec![4.0, 2.0, 1.0, 2.0]));
        assert_eq!(parse_dash_sequence("4"), None);
        assert_eq!(parse_dash_sequence("4 -2"), None);
        assert_eq!(parse_dash_sequence("0.5 0.5"), Some(vec![0.5, 0.5]));
        assert_eq!(parse_dash_sequence("1e-30 1e-30"), None);
        assert_eq!(parse_dash_sequence("dashes"), None);
    }
}
