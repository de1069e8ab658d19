use crate::ast::prelude::{ErrorData, Path, PathSegment, Span};
use crate::parser::prelude::{ParseError, Rule};
use pest::iterators::Pair;
use std::collections::VecDeque;

/// Direct children of a statement pair, consumed by rule rather than by
/// position so that alternatives with different word order build the same way.
pub(crate) struct Parts<'i> {
    span: Span,
    pairs: VecDeque<Pair<'i, Rule>>,
}

impl<'i> Parts<'i> {
    pub(crate) fn of(pair: Pair<'i, Rule>) -> Self {
        Self {
            span: pair.as_span().into(),
            pairs: pair.into_inner().collect(),
        }
    }

    pub(crate) fn take(&mut self, rule: Rule) -> Option<Pair<'i, Rule>> {
        let position = self.pairs.iter().position(|pair| pair.as_rule() == rule)?;
        self.pairs.remove(position)
    }

    pub(crate) fn require(&mut self, rule: Rule, what: &str) -> Result<Pair<'i, Rule>, ParseError> {
        let span = self.span;
        self.take(rule)
            .ok_or_else(|| invalid(span, format!("expected {}", what)))
    }

    pub(crate) fn has(&self, rule: Rule) -> bool {
        self.pairs.iter().any(|pair| pair.as_rule() == rule)
    }
}

pub(crate) fn invalid(span: Span, message: String) -> ParseError {
    ParseError::InvalidSyntax(ErrorData::new(span, message))
}

pub(crate) fn build_path(pair: Pair<Rule>) -> Result<Path, ParseError> {
    let span: Span = pair.as_span().into();
    let mut inner = pair.into_inner();
    let root = inner
        .next()
        .ok_or_else(|| invalid(span, "expected a name".into()))?
        .as_str()
        .to_string();

    let mut segments = Vec::new();
    for segment in inner {
        match segment.as_rule() {
            Rule::ident => segments.push(PathSegment::Field(segment.as_str().to_string())),
            Rule::index => {
                let index = segment.as_str().parse::<usize>().map_err(|_| {
                    invalid(segment.as_span().into(), "index is too large".into())
                })?;
                segments.push(PathSegment::Index(index));
            }
            _ => {}
        }
    }

    Ok(Path { root, segments })
}

/// Path inside a `name`, `target`, `quoted_var` or `bare_var` pair.
pub(crate) fn path_of(pair: Pair<Rule>) -> Result<Path, ParseError> {
    let span: Span = pair.as_span().into();
    match pair.as_rule() {
        Rule::path => build_path(pair),
        _ => pair
            .into_inner()
            .flatten()
            .find(|inner| inner.as_rule() == Rule::path)
            .ok_or_else(|| invalid(span, "expected a name".into()))
            .and_then(build_path),
    }
}

/// Plain identifier inside a `var_name` or one of its wrappers.
pub(crate) fn ident_of(pair: Pair<Rule>) -> Result<String, ParseError> {
    let span: Span = pair.as_span().into();
    if pair.as_rule() == Rule::ident {
        return Ok(pair.as_str().to_string());
    }
    pair.into_inner()
        .flatten()
        .find(|inner| inner.as_rule() == Rule::ident)
        .map(|ident| ident.as_str().to_string())
        .ok_or_else(|| invalid(span, "expected an identifier".into()))
}

pub(crate) fn idents_of(pair: Pair<Rule>) -> Result<Vec<String>, ParseError> {
    pair.into_inner()
        .filter(|inner| inner.as_rule() == Rule::var_name)
        .map(ident_of)
        .collect()
}

/// Text of a quoted string without its quotes.
pub(crate) fn string_content(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .flatten()
        .find(|inner| matches!(inner.as_rule(), Rule::sq_inner | Rule::dq_inner))
        .map(|inner| inner.as_str().to_string())
        .unwrap_or_default()
}

pub(crate) fn resource_text(pair: Pair<Rule>) -> String {
    match pair.into_inner().next() {
        Some(inner) if inner.as_rule() == Rule::string => string_content(inner),
        Some(inner) => inner.as_str().to_string(),
        None => String::new(),
    }
}

/// First word of a matched keyword rule, lower-cased.
pub(crate) fn keyword(pair: &Pair<Rule>) -> String {
    pair.as_str()
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
