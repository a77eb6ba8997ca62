//! nom parsers for the numeric content of a single fixed-width field

// nom parser combinators
use nom::branch::alt;
use nom::character::complete::{char, digit0, digit1, one_of};
use nom::combinator::{all_consuming, opt, recognize};
use nom::error::{Error, ErrorKind};
use nom::sequence::{pair, preceded, tuple};
use nom::IResult;

/// More convenient error creation for nom
fn cause(s: &str) -> nom::Err<Error<&str>> {
    nom::Err::Error(Error::new(s, ErrorKind::Float))
}

/// Split a string slice at a specific column
///
/// Fails if the slice is shorter than `n` or `n` is not on a char boundary.
pub(crate) fn split_column(i: &str, n: usize) -> IResult<&str, &str> {
    match (i.get(..n), i.get(n..)) {
        (Some(head), Some(rest)) => Ok((rest, head)),
        _ => Err(cause(i)),
    }
}

/// Signed mantissa, e.g. `-1.234`, `12`, `1.`, `.5`
fn mantissa(i: &str) -> IResult<&str, &str> {
    recognize(pair(
        opt(one_of("+-")),
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
    ))(i)
}

/// Exponent in any of the forms `e-5`, `E+05`, `D5`, or the compact `-5`
fn exponent(i: &str) -> IResult<&str, &str> {
    alt((
        preceded(one_of("eEdD"), recognize(pair(opt(one_of("+-")), digit1))),
        recognize(pair(one_of("+-"), digit1)),
    ))(i)
}

/// Fortran-style real number, including the compact exponent notation
///
/// The ENDF convention drops the `E` to fit more precision into 11 columns,
/// so `1.234567-5` is `1.234567e-5`.
pub(crate) fn fortran_f64(i: &str) -> IResult<&str, f64> {
    let (rest, (m, e)) = tuple((mantissa, opt(exponent)))(i)?;

    let text = match e {
        Some(e) => format!("{m}e{e}"),
        None => m.to_string(),
    };

    text.parse::<f64>()
        .map(|value| (rest, value))
        .map_err(|_| cause(i))
}

/// Signed integer value
pub(crate) fn fortran_i64(i: &str) -> IResult<&str, i64> {
    let (rest, text) = recognize(pair(opt(one_of("+-")), digit1))(i)?;
    text.parse::<i64>()
        .map(|value| (rest, value))
        .map_err(|_| cause(i))
}

/// Decode the full content of a float field, blank fields being zero
pub(crate) fn float_field(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0.0);
    }
    all_consuming(fortran_f64)(field).ok().map(|(_, v)| v)
}

/// Decode the full content of an integer field, blank fields being zero
pub(crate) fn integer_field(field: &str) -> Option<i64> {
    let field = field.trim();
    if field.is_empty() {
        return Some(0);
    }
    all_consuming(fortran_i64)(field).ok().map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(" 1.390000-4", 1.39e-4)]
    #[case(" 2.487540+0", 2.48754)]
    #[case("-2.500000+5", -2.5e5)]
    #[case(" 1.23456+10", 1.23456e10)]
    #[case("+1.0-10", 1.0e-10)]
    #[case("2.996458-4", 2.996458e-4)]
    fn compact_exponent(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(float_field(text), Some(expected));
    }

    #[rstest]
    #[case("1.5e-3", 1.5e-3)]
    #[case("1.5E+03", 1.5e3)]
    #[case("1.5D2", 150.0)]
    #[case("-0.25", -0.25)]
    #[case("7", 7.0)]
    #[case("3.", 3.0)]
    #[case(".5", 0.5)]
    fn standard_notation(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(float_field(text), Some(expected));
    }

    #[test]
    fn blank_fields_are_zero() {
        assert_eq!(float_field("           "), Some(0.0));
        assert_eq!(integer_field("    "), Some(0));
    }

    #[rstest]
    #[case("abc")]
    #[case("1.0-")]
    #[case("1.0 2.0")]
    #[case("1.0e")]
    #[case("--1.0")]
    fn rejects_malformed_floats(#[case] text: &str) {
        assert_eq!(float_field(text), None);
    }

    #[test]
    fn integers() {
        assert_eq!(integer_field("       9228"), Some(9228));
        assert_eq!(integer_field("-3"), Some(-3));
        assert_eq!(integer_field("1.0"), None);
    }

    #[test]
    fn exact_exponent_reconstruction() {
        // must round identically to the standard spelling
        let (_, compact) = fortran_f64("9.161621-6").unwrap();
        assert_eq!(compact, "9.161621e-6".parse::<f64>().unwrap());
    }

    #[test]
    fn split_on_columns() {
        assert_eq!(split_column("abcdef", 2), Ok(("cdef", "ab")));
        assert!(split_column("ab", 3).is_err());
    }
}
