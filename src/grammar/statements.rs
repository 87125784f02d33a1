// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Parses the curated statement subset that can appear inside a [`Block`]
//! (spec §4.4.1): assignments, field assignments, bare procedure/function
//! calls, `RAISE` / `RAISE_APPLICATION_ERROR`, `RETURN`, `NULL`, and the
//! explicit-cursor trio `FETCH` / `OPEN` / `CLOSE`.
//!
//! [`Block`]: crate::syntax::SyntaxKind::Block
//!
//! Anything outside this set (`IF`, loops, `CASE`, ...) is not in the
//! semantic IR's closed statement taxonomy (spec §4.4.1 only lists
//! `VariableDeclaration`, `Assignment`, `FieldAssignment`, `Call`,
//! `Raise`); the front-end has no grammar for it and reports a hard parse
//! error rather than silently skipping it, consistent with "any syntax
//! error yields `ParseError`" (spec §4.1).

use super::expressions::{parse_argument_list, parse_expression};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn parse_statement_list(p: &mut Parser, stop_at: &[TokenKind]) {
    p.start(SyntaxKind::StatementList);
    while !stop_at.contains(&p.current()) && !p.at(TokenKind::Eof) {
        parse_statement(p);
    }
    p.finish();
}

/// Parses exactly one statement. Exposed so [`super::declare_section`] can
/// fall through to it for a package body's bare init-section assignments
/// (spec §8 scenario 9: `v_range.min_sal := 50000;` with no enclosing
/// `BEGIN`).
pub(crate) fn parse_statement(p: &mut Parser) {
    match p.current() {
        TokenKind::RaiseKw | TokenKind::RaiseApplicationErrorKw => parse_raise_statement(p),
        TokenKind::ReturnKw => parse_return_statement(p),
        TokenKind::NullKw => parse_null_statement(p),
        TokenKind::FetchKw => parse_fetch_statement(p),
        TokenKind::OpenKw => parse_open_statement(p),
        TokenKind::CloseKw => parse_close_statement(p),
        TokenKind::Ident | TokenKind::QuotedIdent => parse_assignment_or_call(p),
        _ => {
            p.error("expected a statement");
            p.until(TokenKind::Semicolon);
            p.eat(TokenKind::Semicolon);
        }
    }
}

fn parse_raise_statement(p: &mut Parser) {
    p.start(SyntaxKind::RaiseStatement);
    if p.at(TokenKind::RaiseApplicationErrorKw) {
        p.bump(TokenKind::RaiseApplicationErrorKw);
        p.expect(TokenKind::LParen);
        parse_argument_list(p);
        p.expect(TokenKind::RParen);
    } else {
        p.bump(TokenKind::RaiseKw);
        if p.at(TokenKind::Ident) || p.at(TokenKind::QuotedIdent) {
            super::parse_ident_group(p);
        }
    }
    p.expect(TokenKind::Semicolon);
    p.finish();
}

fn parse_return_statement(p: &mut Parser) {
    p.start(SyntaxKind::ReturnStatement);
    p.bump(TokenKind::ReturnKw);
    if !p.at(TokenKind::Semicolon) {
        parse_expression(p);
    }
    p.expect(TokenKind::Semicolon);
    p.finish();
}

fn parse_null_statement(p: &mut Parser) {
    p.start(SyntaxKind::NullStatement);
    p.bump(TokenKind::NullKw);
    p.expect(TokenKind::Semicolon);
    p.finish();
}

/// `FETCH cursor [BULK COLLECT] INTO target [, target]*;`. `BULK COLLECT`
/// parses fine here (spec §4.1's front-end is permissive); the builder
/// rejects it (spec §4.4.2).
fn parse_fetch_statement(p: &mut Parser) {
    p.start(SyntaxKind::FetchStatement);
    p.bump(TokenKind::FetchKw);
    super::parse_ident_group(p);
    let bulk_collect = p.eat(TokenKind::BulkKw);
    if bulk_collect {
        p.expect(TokenKind::CollectKw);
    }
    p.expect(TokenKind::IntoKw);
    super::parse_ident_group(p);
    while p.eat(TokenKind::Comma) {
        super::parse_ident_group(p);
    }
    p.expect(TokenKind::Semicolon);
    p.finish();
}

fn parse_open_statement(p: &mut Parser) {
    p.start(SyntaxKind::OpenStatement);
    p.bump(TokenKind::OpenKw);
    super::parse_ident_group(p);
    p.expect(TokenKind::Semicolon);
    p.finish();
}

fn parse_close_statement(p: &mut Parser) {
    p.start(SyntaxKind::CloseStatement);
    p.bump(TokenKind::CloseKw);
    super::parse_ident_group(p);
    p.expect(TokenKind::Semicolon);
    p.finish();
}

/// Parses the dotted LHS path of an assignment or call statement itself
/// (not via [`super::parse_ident_group`]), so the caller can count the
/// true number of logical segments — the lexer may have already folded a
/// single embedded dot into one [`TokenKind::Ident`] token (see
/// `crate::lexer::token`), so counting `Dot` tokens alone would
/// undercount nesting depth for paths of three or more segments.
fn parse_lhs_path(p: &mut Parser) -> usize {
    p.start(SyntaxKind::IdentGroup);
    let mut segments = 0usize;
    loop {
        if p.at(TokenKind::Ident) || p.at(TokenKind::QuotedIdent) {
            segments += p.current_text().matches('.').count() + 1;
        }
        super::expect_ident(p);
        if p.at(TokenKind::Dot) {
            p.bump(TokenKind::Dot);
        } else {
            break;
        }
    }
    p.finish();
    segments
}

/// `lhs := expr;` (an [`Assignment`] or, for a dotted LHS, a
/// [`FieldAssignment`]), a procedure call `name(args);` / `name;`, or a
/// bare package-function call `pkg.name(args);`.
///
/// [`Assignment`]: crate::syntax::SyntaxKind::Assignment
/// [`FieldAssignment`]: crate::syntax::SyntaxKind::FieldAssignment
fn parse_assignment_or_call(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    let segments = parse_lhs_path(p);
    match p.current() {
        TokenKind::Assign => {
            p.bump(TokenKind::Assign);
            parse_expression(p);
            p.expect(TokenKind::Semicolon);
            let kind = if segments >= 2 {
                SyntaxKind::FieldAssignment
            } else {
                SyntaxKind::Assignment
            };
            p.start_node_at(checkpoint, kind);
            p.finish();
        }
        TokenKind::LParen => {
            p.bump(TokenKind::LParen);
            parse_argument_list(p);
            p.expect(TokenKind::RParen);
            p.expect(TokenKind::Semicolon);
            p.start_node_at(checkpoint, SyntaxKind::CallStatement);
            p.finish();
        }
        TokenKind::Semicolon => {
            p.bump(TokenKind::Semicolon);
            p.start_node_at(checkpoint, SyntaxKind::CallStatement);
            p.finish();
        }
        _ => {
            p.error("expected ':=' or '(' after identifier in statement");
            p.until(TokenKind::Semicolon);
            p.eat(TokenKind::Semicolon);
            p.start_node_at(checkpoint, SyntaxKind::CallStatement);
            p.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_ok(input: &str) {
        let mut p = Parser::for_tests(input);
        parse_statement_list(&mut p, &[TokenKind::Eof]);
        assert!(p.take_errors().is_empty(), "failed to parse {input:?}");
    }

    #[test]
    fn parses_simple_assignment() {
        check_ok("v_count := 1;");
    }

    #[test]
    fn parses_field_assignment() {
        check_ok("v_range.min_sal := 50000;");
    }

    #[test]
    fn parses_nested_field_assignment() {
        check_ok("v_emp.address.city := 'Boston';");
    }

    #[test]
    fn parses_procedure_call_with_and_without_args() {
        check_ok("dbms_output.put_line('hi');");
        check_ok("do_something;");
    }

    #[test]
    fn parses_raise_application_error() {
        check_ok("RAISE_APPLICATION_ERROR(-20123, 'boom');");
    }

    #[test]
    fn parses_bare_raise_and_named_raise() {
        check_ok("RAISE;");
        check_ok("RAISE my_exception;");
    }

    #[test]
    fn parses_return_and_null() {
        check_ok("RETURN 1;");
        check_ok("RETURN;");
        check_ok("NULL;");
    }

    #[test]
    fn parses_cursor_trio() {
        check_ok("OPEN c;");
        check_ok("FETCH c INTO v_id;");
        check_ok("FETCH c BULK COLLECT INTO v_ids;");
        check_ok("CLOSE c;");
    }

    #[test]
    fn nested_field_assignment_has_three_segments() {
        let mut p = Parser::for_tests("v_emp.address.city := 'Boston';");
        let segments = parse_lhs_path(&mut p);
        assert_eq!(segments, 3);
    }
}
