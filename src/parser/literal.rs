use crate::ast::prelude::{Literal, Operand, Span};
use crate::parser::parser::SentenceParser;
use crate::parser::prelude::{ParseError, Rule};
use crate::parser::utils::{invalid, path_of, string_content};
use pest::iterators::Pair;
use pest::Parser;

/// Parses the restricted literal grammar: integers, floats, booleans, null,
/// quoted strings and bracketed lists/maps of literals. Anything else is
/// kept verbatim as a string; nothing is ever evaluated.
pub fn parse_literal(text: &str) -> Literal {
    try_literal(text).unwrap_or_else(|| Literal::Str(text.trim().to_string()))
}

pub(crate) fn try_literal(text: &str) -> Option<Literal> {
    let input = SentenceParser::parse(Rule::literal_input, text).ok()?;
    let literal = input
        .flatten()
        .find(|pair| pair.as_rule() == Rule::literal)?;
    build_literal(literal).ok()
}

pub(crate) fn build_literal(pair: Pair<Rule>) -> Result<Literal, ParseError> {
    let span: Span = pair.as_span().into();
    match pair.as_rule() {
        Rule::literal | Rule::cond_value | Rule::dict_key => pair
            .into_inner()
            .next()
            .ok_or_else(|| invalid(span, "expected a literal".into()))
            .and_then(build_literal),
        Rule::int => pair
            .as_str()
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| invalid(span, format!("integer '{}' is out of range", pair.as_str()))),
        Rule::float => pair
            .as_str()
            .parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| invalid(span, format!("'{}' is not a number", pair.as_str()))),
        Rule::boolean => Ok(Literal::Bool(pair.as_str().eq_ignore_ascii_case("true"))),
        Rule::null => Ok(Literal::Null),
        Rule::string | Rule::sq_string | Rule::dq_string => Ok(Literal::Str(string_content(pair))),
        Rule::bare_word => Ok(Literal::Str(pair.as_str().to_string())),
        Rule::list_lit => pair
            .into_inner()
            .map(build_literal)
            .collect::<Result<Vec<_>, _>>()
            .map(Literal::List),
        Rule::map_lit => {
            let mut entries = Vec::new();
            for entry in pair.into_inner() {
                let entry_span: Span = entry.as_span().into();
                let mut inner = entry.into_inner();
                let key = inner
                    .next()
                    .ok_or_else(|| invalid(entry_span, "expected a key".into()))?;
                let key = match key.as_rule() {
                    Rule::string => string_content(key),
                    _ => key.as_str().to_string(),
                };
                let value = inner
                    .next()
                    .ok_or_else(|| invalid(entry_span, format!("expected a value for '{}'", key)))?;
                entries.push((key, build_literal(value)?));
            }
            Ok(Literal::Map(entries))
        }
        _ => Err(invalid(span, format!("'{}' is not a literal", pair.as_str()))),
    }
}

pub(crate) fn build_operand(pair: Pair<Rule>) -> Result<Operand, ParseError> {
    let span: Span = pair.as_span().into();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| invalid(span, "expected a value".into()))?;
    match inner.as_rule() {
        Rule::literal => build_literal(inner).map(Operand::Literal),
        _ => path_of(inner).map(Operand::Variable),
    }
}

pub(crate) fn build_operands(pair: Pair<Rule>) -> Result<Vec<Operand>, ParseError> {
    pair.into_inner()
        .filter(|inner| inner.as_rule() == Rule::operand)
        .map(build_operand)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars() {
        assert_eq!(parse_literal("42"), Literal::Int(42));
        assert_eq!(parse_literal("-7"), Literal::Int(-7));
        assert_eq!(parse_literal("2.5"), Literal::Float(2.5));
        assert_eq!(parse_literal("True"), Literal::Bool(true));
        assert_eq!(parse_literal("none"), Literal::Null);
        assert_eq!(parse_literal("'hi there'"), Literal::Str("hi there".into()));
        assert_eq!(parse_literal("\"x\""), Literal::Str("x".into()));
    }

    #[test]
    fn nested_containers() {
        assert_eq!(
            parse_literal("[1, 'two', [3.0]]"),
            Literal::List(vec![
                Literal::Int(1),
                Literal::Str("two".into()),
                Literal::List(vec![Literal::Float(3.0)]),
            ])
        );
        assert_eq!(
            parse_literal("{'a': 1, b: [true]}"),
            Literal::Map(vec![
                ("a".into(), Literal::Int(1)),
                ("b".into(), Literal::List(vec![Literal::Bool(true)])),
            ])
        );
    }

    #[test]
    fn unrecognized_text_stays_raw() {
        assert_eq!(parse_literal("hello world"), Literal::Str("hello world".into()));
        assert_eq!(parse_literal("1 + 2"), Literal::Str("1 + 2".into()));
        assert_eq!(parse_literal("[1, 2"), Literal::Str("[1, 2".into()));
    }
}
