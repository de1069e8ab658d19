use crate::ast::prelude::{BinaryOperator, ErrorData, Expr, Literal, Path, Span, UnaryOperator};
use crate::parser::literal::{build_literal, try_literal};
use crate::parser::parser::SentenceParser;
use crate::parser::prelude::{ParseError, Rule};
use crate::parser::utils::{build_path, invalid, path_of, string_content};
use lazy_static::lazy_static;
use pest::iterators::Pair;
use pest::Parser;
use std::collections::HashMap;

lazy_static! {
    static ref OPERATOR_WORDS: HashMap<&'static str, BinaryOperator> = HashMap::from([
        ("+", BinaryOperator::Add),
        ("plus", BinaryOperator::Add),
        ("-", BinaryOperator::Sub),
        ("minus", BinaryOperator::Sub),
        ("*", BinaryOperator::Mul),
        ("times", BinaryOperator::Mul),
        ("multiplied", BinaryOperator::Mul),
        ("/", BinaryOperator::Div),
        ("divided", BinaryOperator::Div),
        ("%", BinaryOperator::Mod),
        ("modulo", BinaryOperator::Mod),
        ("mod", BinaryOperator::Mod),
    ]);
}

/// Parses the restricted expression grammar: literals, variable paths
/// (`'a'`, `a.b`, `xs[0]`, `the value of x`), `+ - * / %` with their word
/// forms, one optional comparison and parentheses.
pub fn parse_expression(text: &str) -> Result<Expr, ParseError> {
    let mut pairs = SentenceParser::parse(Rule::expression_input, text).map_err(|e| {
        let (start, end) = match e.location {
            pest::error::InputLocation::Pos(pos) => (pos, pos),
            pest::error::InputLocation::Span((start, end)) => (start, end),
        };
        ParseError::InvalidSyntax(ErrorData::new(
            Span::new(start, end),
            format!("'{}' is not a valid expression", text.trim()),
        ))
    })?;

    let expression = pairs
        .next()
        .and_then(|input| input.into_inner().find(|pair| pair.as_rule() == Rule::expression))
        .ok_or_else(|| invalid(Span::whole(text), "expected an expression".into()))?;
    build_expression(expression)
}

/// Value position of `Set x to ...` and `with value ...`: a full literal
/// first, then a lone name, then an expression. Text that is none of these
/// is kept as a raw string.
pub fn parse_value(text: &str) -> Expr {
    let text = text.trim();
    if let Some(literal) = try_literal(text) {
        return Expr::Literal(literal);
    }
    if let Some(path) = parse_path(text) {
        return Expr::Name(path);
    }
    parse_expression(text).unwrap_or_else(|_| Expr::Literal(Literal::Str(text.to_string())))
}

/// Parses a bare variable path such as `config.ports[2]`.
pub fn parse_path(text: &str) -> Option<Path> {
    SentenceParser::parse(Rule::path_input, text.trim())
        .ok()?
        .flatten()
        .find(|pair| pair.as_rule() == Rule::path)
        .and_then(|pair| build_path(pair).ok())
}

pub(crate) fn build_expression(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    let span: Span = pair.as_span().into();
    let mut inner = pair.into_inner();
    let left = build_sum(
        inner
            .next()
            .ok_or_else(|| invalid(span, "expected an expression".into()))?,
    )?;

    match (inner.next(), inner.next()) {
        (Some(comparator), Some(right)) => Ok(Expr::binary(
            build_comparator(comparator)?,
            left,
            build_sum(right)?,
        )),
        _ => Ok(left),
    }
}

fn build_sum(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    build_chain(pair, build_product)
}

fn build_product(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    build_chain(pair, build_unary)
}

/// Left-associative `operand (op operand)*` level.
fn build_chain(
    pair: Pair<Rule>,
    operand: fn(Pair<Rule>) -> Result<Expr, ParseError>,
) -> Result<Expr, ParseError> {
    let span: Span = pair.as_span().into();
    let mut inner = pair.into_inner();
    let mut left = operand(
        inner
            .next()
            .ok_or_else(|| invalid(span, "expected an operand".into()))?,
    )?;

    while let Some(op) = inner.next() {
        let op = build_operator(&op)?;
        let right = operand(
            inner
                .next()
                .ok_or_else(|| invalid(span, format!("expected an operand after '{}'", op)))?,
        )?;
        left = Expr::binary(op, left, right);
    }

    Ok(left)
}

fn build_unary(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    let span: Span = pair.as_span().into();
    let mut inner = pair.into_inner();
    let first = inner
        .next()
        .ok_or_else(|| invalid(span, "expected an operand".into()))?;

    if first.as_rule() == Rule::negate {
        let operand = inner
            .next()
            .ok_or_else(|| invalid(span, "expected an operand after '-'".into()))?;
        return Ok(Expr::Unary {
            op: UnaryOperator::Negative,
            operand: Box::new(build_atom(operand)?),
        });
    }
    build_atom(first)
}

fn build_atom(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    match pair.as_rule() {
        Rule::expression => build_expression(pair),
        Rule::value_of | Rule::quoted_var | Rule::bare_var => path_of(pair).map(Expr::Variable),
        Rule::dq_string => Ok(Expr::Literal(Literal::Str(string_content(pair)))),
        Rule::int | Rule::float | Rule::boolean | Rule::null => build_literal(pair).map(Expr::Literal),
        _ => Err(invalid(
            pair.as_span().into(),
            format!("unexpected '{}' in expression", pair.as_str()),
        )),
    }
}

pub(crate) fn build_operator(pair: &Pair<Rule>) -> Result<BinaryOperator, ParseError> {
    let word = pair
        .as_str()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    OPERATOR_WORDS
        .get(word.as_str())
        .copied()
        .ok_or_else(|| invalid(pair.as_span().into(), format!("unknown operator '{}'", word)))
}

pub(crate) fn build_comparator(pair: Pair<Rule>) -> Result<BinaryOperator, ParseError> {
    let span: Span = pair.as_span().into();
    let inner = pair
        .into_inner()
        .next()
        .ok_or_else(|| invalid(span, "expected a comparison".into()))?;
    match inner.as_rule() {
        Rule::cmp_gt => Ok(BinaryOperator::Gt),
        Rule::cmp_ge => Ok(BinaryOperator::Ge),
        Rule::cmp_lt => Ok(BinaryOperator::Lt),
        Rule::cmp_le => Ok(BinaryOperator::Le),
        Rule::cmp_eq => Ok(BinaryOperator::Eq),
        Rule::cmp_ne => Ok(BinaryOperator::Ne),
        _ => Err(invalid(span, format!("unknown comparison '{}'", inner.as_str()))),
    }
}
