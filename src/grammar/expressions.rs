// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Parses expressions.
//!
//! Precedence is only partially baked into the tree shape: AND/OR chains
//! and the `||`/`+`/`-` operator run are kept as flat sibling lists inside
//! a single [`SyntaxKind::Concatenation`] (or bare `CompoundExpression`)
//! node, the same way the rest of this front-end stays a thin, lossless
//! layer. The semantic builder does the precedence folding when it walks
//! these children into IR, rather than the parser building a fully nested
//! tree up front.

use super::{expect_ident, parse_ident_group};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn parse_expression(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_logical(p);
    p.start_node_at(checkpoint, SyntaxKind::Expression);
    p.finish();
}

fn parse_logical(p: &mut Parser) {
    parse_compound(p);
    while matches!(p.current(), TokenKind::AndKw | TokenKind::OrKw) {
        p.bump_any();
        parse_compound(p);
    }
}

/// A `CompoundExpression`: a concatenation, optionally followed by a
/// comparison, `IN (...)`, `BETWEEN ... AND ...`, or `[NOT] LIKE`.
///
/// The IN/BETWEEN/LIKE family parses successfully here so the front-end
/// never rejects valid Oracle syntax; the builder is the one that raises
/// an unsupported-construct error for them, since that is a semantic
/// decision about the curated baseline, not a grammatical one.
fn parse_compound(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_concatenation(p);
    let negated = p.eat(TokenKind::NotKw);
    match p.current() {
        TokenKind::ComparisonOp if !negated => {
            p.bump_any();
            parse_concatenation(p);
        }
        TokenKind::InKw => {
            p.bump_any();
            p.expect(TokenKind::LParen);
            if !p.at(TokenKind::RParen) {
                parse_expression(p);
                while p.eat(TokenKind::Comma) {
                    parse_expression(p);
                }
            }
            p.expect(TokenKind::RParen);
        }
        TokenKind::BetweenKw => {
            p.bump_any();
            parse_concatenation(p);
            p.expect(TokenKind::AndKw);
            parse_concatenation(p);
        }
        TokenKind::LikeKw => {
            p.bump_any();
            parse_concatenation(p);
        }
        _ => {}
    }
    p.start_node_at(checkpoint, SyntaxKind::CompoundExpression);
    p.finish();
}

/// Concatenation (`||`) and additive (`+`, `-`, `/`) operators share one
/// flat run, wrapped only when at least one operator is actually present.
fn parse_concatenation(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_unary(p);
    let mut had_op = false;
    while matches!(
        p.current(),
        TokenKind::Concat | TokenKind::Plus | TokenKind::Minus | TokenKind::Slash
    ) {
        had_op = true;
        p.bump_any();
        parse_unary(p);
    }
    if had_op {
        p.start_node_at(checkpoint, SyntaxKind::Concatenation);
        p.finish();
    }
}

fn parse_unary(p: &mut Parser) {
    if p.at(TokenKind::Plus) || p.at(TokenKind::Minus) {
        p.bump_any();
    }
    parse_atom(p);
}

fn parse_atom(p: &mut Parser) {
    match p.current() {
        TokenKind::LParen => {
            p.bump(TokenKind::LParen);
            parse_expression(p);
            p.expect(TokenKind::RParen);
        }
        TokenKind::QuotedLiteral
        | TokenKind::AlternativeQuotedLiteral
        | TokenKind::Number
        | TokenKind::NullKw
        | TokenKind::BindVar => {
            p.bump_any();
        }
        TokenKind::Ident | TokenKind::QuotedIdent => {
            parse_ident_or_call(p);
        }
        _ => {
            p.error("expected an expression");
            p.bump_any();
        }
    }
}

/// A dotted name, optionally followed by `(args)` (a function/package-function
/// call) or `%attr` (a cursor attribute such as `c%FOUND`).
fn parse_ident_or_call(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_ident_group(p);
    if p.at(TokenKind::LParen) {
        p.bump(TokenKind::LParen);
        parse_argument_list(p);
        p.expect(TokenKind::RParen);
        p.start_node_at(checkpoint, SyntaxKind::FunctionInvocation);
        p.finish();
    } else if p.eat(TokenKind::Percentage) {
        if p.at(TokenKind::Ident) {
            p.bump_any();
        } else {
            p.error("expected a cursor attribute name");
        }
    }
}

pub(crate) fn parse_argument_list(p: &mut Parser) {
    p.start(SyntaxKind::ArgumentList);
    if !p.at(TokenKind::RParen) {
        parse_argument(p);
        while p.eat(TokenKind::Comma) {
            parse_argument(p);
        }
    }
    p.finish();
}

fn parse_argument(p: &mut Parser) {
    p.start(SyntaxKind::Argument);
    parse_expression(p);
    p.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_ok(input: &str) {
        let mut p = Parser::for_tests(input);
        parse_expression(&mut p);
        assert!(p.take_errors().is_empty(), "failed to parse {input:?}");
    }

    #[test]
    fn parses_arithmetic_and_concatenation() {
        check_ok("a + b - 1");
        check_ok("'foo' || bar || 'baz'");
    }

    #[test]
    fn parses_comparison_and_logical_chain() {
        check_ok("a = 1 AND b <> 2");
        check_ok("a = 1 OR b <> 2 AND c = 3");
    }

    #[test]
    fn parses_in_between_like_as_compound_expressions() {
        check_ok("a IN (1, 2, 3)");
        check_ok("a BETWEEN 1 AND 10");
        check_ok("a NOT LIKE 'x%'");
    }

    #[test]
    fn parses_function_call_and_cursor_attribute() {
        check_ok("UPPER(name)");
        check_ok("emp_cur%FOUND");
    }

    #[test]
    fn parses_parenthesized_expression() {
        check_ok("(a + b)");
    }
}
