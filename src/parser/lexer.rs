// Lexer utilities shared by the visual-value parsers

use nom::{
    character::complete::{char, multispace0},
    combinator::opt,
    number::complete::double,
    sequence::{delimited, terminated},
    IResult,
};

/// Parse and consume whitespace
pub fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a number literal (integer or float)
pub fn number_literal(input: &str) -> IResult<&str, f64> {
    double(input)
}

/// Parse a list item followed by an optional comma
/// Format: `4, ` or `4 `
pub fn list_item<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    terminated(ws(inner), opt(ws(char(','))))
}
