use super::{Arg, Expr};
use crate::error::ExpressionError;
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt, recognize},
    multi::separated_list0,
    sequence::{delimited, pair, preceded, terminated, tuple},
};

/// Parses one program expression.
///
/// ```
/// use turnflow::expression::{parse_expression, Expr};
///
/// let expr = parse_expression("revise_hotel(area=north, name=\"the lensfield\")").unwrap();
/// assert_eq!(expr.call_name(), Some("revise_hotel"));
/// assert_eq!(expr.args()[1].value, Expr::literal("the lensfield"));
/// ```
pub fn parse_expression(input: &str) -> Result<Expr, ExpressionError> {
    match all_consuming(delimited(multispace0, call, multispace0))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(err) => Err(ExpressionError::Syntax {
            input: input.to_string(),
            message: match err {
                nom::Err::Error(e) | nom::Err::Failure(e) => {
                    format!("unexpected input at '{}'", truncate(e.input))
                }
                nom::Err::Incomplete(_) => "incomplete input".to_string(),
            },
        }),
    }
}

fn truncate(rest: &str) -> &str {
    match rest.char_indices().nth(24) {
        Some((idx, _)) => &rest[..idx],
        None => rest,
    }
}

// =============================================================================
// HELPER PARSERS
// =============================================================================

fn ws<'a, O>(
    inner: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// A constructor name, optionally carrying the `?` or `??` constraint suffix.
fn type_name(input: &str) -> IResult<&str, &str> {
    recognize(pair(identifier, opt(alt((tag("??"), tag("?"))))))(input)
}

fn quoted_string(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)
}

fn bare_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, '(' | ')' | ',' | '=' | '"' | '\'')
    })(input)
}

fn literal(input: &str) -> IResult<&str, Expr> {
    map(alt((quoted_string, bare_word)), Expr::literal)(input)
}

fn value(input: &str) -> IResult<&str, Expr> {
    alt((call, literal))(input)
}

fn argument(input: &str) -> IResult<&str, Arg> {
    map(
        pair(opt(terminated(identifier, ws(char('=')))), ws(value)),
        |(slot, value)| Arg {
            slot: slot.map(str::to_string),
            value,
        },
    )(input)
}

fn call(input: &str) -> IResult<&str, Expr> {
    map(
        tuple((
            type_name,
            preceded(multispace0, char('(')),
            ws(separated_list0(char(','), ws(argument))),
            char(')'),
        )),
        |(name, _, args, _)| Expr::call(name, args),
    )(input)
}
