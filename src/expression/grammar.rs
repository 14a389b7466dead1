//! Expression parser implementation using chumsky
//!
//! ```text
//! expr       := ternary | access | literal
//! ternary    := condition '?' branch ':' rest
//! condition  := operand OP operand | <any tokens up to '?'>
//! access     := IDENT ('.' IDENT)+ | IDENT '[' INT ']' | IDENT
//! operand    := access | STRING | NUMBER
//! ```
//!
//! Ternary branches are captured as raw text: everything up to the first
//! `:` for the true branch, everything after it for the false branch.

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::ExpressionError;
use crate::expression::ast::*;
use crate::expression::lexer::Token;

/// Parse expression text (the inside of `{{ }}`) into an AST
pub fn parse_expression(input: &str) -> Result<Expr, Vec<ExpressionError>> {
    let len = input.len();

    let token_iter =
        crate::expression::lexer::lex(input).map(|(tok, span)| (tok, SimpleSpan::from(span)));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    expression_parser(input)
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

/// Source text covered by a span, trimmed
fn slice(src: &str, span: std::ops::Range<usize>) -> String {
    src.get(span).unwrap_or_default().trim().to_string()
}

/// Text of a ternary branch: a lone string literal loses its quotes
fn branch_text(src: &str, tokens: &[Token], span: std::ops::Range<usize>) -> String {
    match tokens {
        [Token::String(s)] => s.clone(),
        _ => slice(src, span),
    }
}

#[derive(Debug, Clone)]
enum AccessTail {
    Path(Vec<String>),
    Index(i64),
}

fn expression_parser<'a, I>(
    src: &'a str,
) -> impl Parser<'a, I, Expr, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let identifier = select! {
        Token::Ident(s) => s,
    }
    .labelled("identifier");

    let number = select! {
        Token::Number(n) => n,
    }
    .labelled("number");

    let string_literal = select! {
        Token::String(s) => s,
    }
    .labelled("string");

    // Array index must be a base-10 integer
    let index = number
        .clone()
        .try_map(|raw: String, span| {
            raw.parse::<i64>().map_err(|_| {
                Rich::custom(span, format!("array index must be an integer, found '{}'", raw))
            })
        })
        .delimited_by(just(Token::BracketOpen), just(Token::BracketClose));

    // name | name.a.b | name[i]
    let access = identifier
        .clone()
        .then(
            choice((
                just(Token::Dot)
                    .ignore_then(identifier.clone())
                    .repeated()
                    .at_least(1)
                    .collect::<Vec<_>>()
                    .map(AccessTail::Path),
                index.map(AccessTail::Index),
            ))
            .or_not(),
        )
        .map(|(name, tail)| match tail {
            None => Expr::Identifier(name),
            Some(AccessTail::Path(rest)) => {
                let mut segments = Vec::with_capacity(rest.len() + 1);
                segments.push(name);
                segments.extend(rest);
                Expr::Path(segments)
            }
            Some(AccessTail::Index(index)) => Expr::Index { name, index },
        });

    let literal = choice((
        string_literal.clone().map(Literal::String),
        number.clone().map(Literal::Number),
    ));

    let operand = choice((
        access.clone().map_with(move |_, e| {
            let text = slice(src, span_range(&e.span()));
            Operand {
                literal: text.clone(),
                text,
                is_reference: true,
            }
        }),
        literal.clone().map_with(move |lit, e| {
            let text = slice(src, span_range(&e.span()));
            let literal = match lit {
                Literal::String(s) => s,
                Literal::Number(_) => text.clone(),
            };
            Operand {
                text,
                literal,
                is_reference: false,
            }
        }),
    ));

    let compare_op = select! {
        Token::LooseEq => CompareOp::LooseEq,
        Token::StrictEq => CompareOp::StrictEq,
        Token::LooseNotEq => CompareOp::LooseNotEq,
        Token::StrictNotEq => CompareOp::StrictNotEq,
        Token::Greater => CompareOp::Greater,
        Token::Less => CompareOp::Less,
        Token::GreaterOrEqual => CompareOp::GreaterOrEqual,
        Token::LessOrEqual => CompareOp::LessOrEqual,
    }
    .labelled("comparison operator");

    let comparison = operand
        .clone()
        .then(compare_op)
        .then(operand)
        .map(|((left, op), right)| Comparison { left, op, right });

    // A comparison only counts when it spans the whole condition
    let condition = choice((
        comparison
            .then_ignore(just(Token::Question).rewind())
            .map(Some),
        any()
            .filter(|t: &Token| *t != Token::Question)
            .repeated()
            .at_least(1)
            .to(None),
    ))
    .map_with(move |comparison, e| Condition {
        text: slice(src, span_range(&e.span())),
        comparison,
    });

    let then_branch = any()
        .filter(|t: &Token| *t != Token::Colon)
        .repeated()
        .at_least(1)
        .collect::<Vec<Token>>()
        .map_with(move |tokens, e| branch_text(src, &tokens, span_range(&e.span())));

    let else_branch = any()
        .repeated()
        .at_least(1)
        .collect::<Vec<Token>>()
        .map_with(move |tokens, e| branch_text(src, &tokens, span_range(&e.span())));

    let ternary = condition
        .then_ignore(just(Token::Question))
        .then(then_branch)
        .then_ignore(just(Token::Colon))
        .then(else_branch)
        .map(|((condition, then_branch), else_branch)| {
            Expr::Ternary(Box::new(Ternary {
                condition,
                then_branch,
                else_branch,
            }))
        });

    choice((ternary, access, literal.map(Expr::Literal))).then_ignore(end())
}
