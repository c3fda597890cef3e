//! Textual grammar of token values: `{path.to.token}` references and the
//! numeric prefix of dimension strings such as `12px` or `-1.5rem`.

use crate::TokenValue;

/// Returns the inner path when `value` is exactly of the form `{path}`.
pub fn parse_reference(value: &str) -> Option<&str> {
    expr_parser::reference(value).ok()
}

/// Returns the reference path carried by a token value, if any.
pub fn reference_path(value: &TokenValue) -> Option<&str> {
    match value {
        TokenValue::Text(text) => parse_reference(text),
        _ => None,
    }
}

/// Leading number of a dimension string, ignoring any unit suffix.
pub fn parse_dimension(value: &str) -> Option<f64> {
    expr_parser::dimension(value).ok()
}

peg::parser! {
  grammar expr_parser() for str {
    rule _ = quiet!{[' ' | '\n' | '\t' | '\r']*}

    rule sign() = ['+' | '-']
    rule digits() = ['0'..='9']+
    rule exponent() = ['e' | 'E'] sign()? digits()

    rule number() -> f64
        = n:$(sign()? (digits() ("." digits()?)? / "." digits()) exponent()?) {?
            n.parse().or(Err("number"))
        }

    pub(crate) rule reference() -> &'input str = "{" p:$([^ '}']+) "}" { p }

    pub(crate) rule dimension() -> f64 = _ n:number() [_]* { n }
  }
}

#[test]
fn test() {
    assert_eq!(parse_reference("{color.brand.500}"), Some("color.brand.500"));
    assert_eq!(parse_reference("{a}"), Some("a"));
    assert_eq!(parse_reference("{}"), None);
    assert_eq!(parse_reference("#ff00ff"), None);
    assert_eq!(parse_reference("{a} * {b}"), None);
    assert_eq!(parse_reference(" {a}"), None);
    assert_eq!(parse_reference("{a}px"), None);

    assert_eq!(parse_dimension("12px"), Some(12.0));
    assert_eq!(parse_dimension("-1.5rem"), Some(-1.5));
    assert_eq!(parse_dimension(".5em"), Some(0.5));
    assert_eq!(parse_dimension("  4"), Some(4.0));
    assert_eq!(parse_dimension("1e2ms"), Some(100.0));
    assert_eq!(parse_dimension("3em"), Some(3.0));
    assert_eq!(parse_dimension("200ms"), Some(200.0));
    assert_eq!(parse_dimension("px"), None);
    assert_eq!(parse_dimension("{spacing.md}"), None);
    assert_eq!(parse_dimension(""), None);
}
