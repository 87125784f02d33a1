// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Parses PL/SQL declare sections: variable declarations, inline `TYPE`
//! declarations (the ones the elaboration engine later lowers to
//! `jsonb`), and cursor declarations.

use super::expressions::parse_expression;
use super::query::select_core;
use super::{expect_ident, statements, types};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// Parses declarations until a token in `stop_at` (or end of input) is
/// reached. Used both for top-level subprogram bodies (stop at `BEGIN`)
/// and package specs (stop at `END`).
///
/// A package body may carry its inline-type variables' initialization
/// statements directly in this section, with no enclosing `BEGIN`/`END`
/// init block (spec §8 scenario 9: `v_range.min_sal := 50000;` right
/// after the variable's own declaration). An `Ident`/`QuotedIdent` whose
/// very next token is `:=` or `(` cannot start a `name type ...;`
/// declaration, so it is handed to the statement grammar instead.
pub(crate) fn parse_declare_section(p: &mut Parser, stop_at: &[TokenKind]) {
    p.start(SyntaxKind::DeclareSection);
    while !stop_at.contains(&p.current()) && !p.at(TokenKind::Eof) {
        match p.current() {
            TokenKind::CursorKw => parse_cursor_decl(p),
            TokenKind::TypeKw => parse_type_decl(p),
            TokenKind::Ident | TokenKind::QuotedIdent
                if matches!(p.nth(1), TokenKind::Assign | TokenKind::LParen) =>
            {
                statements::parse_statement(p)
            }
            TokenKind::Ident | TokenKind::QuotedIdent => parse_variable_decl(p),
            _ => {
                p.error("expected a declaration");
                p.until(TokenKind::Semicolon);
                p.eat(TokenKind::Semicolon);
            }
        }
    }
    p.finish();
}

/// `name [CONSTANT] type [:= expr] ;`
fn parse_variable_decl(p: &mut Parser) {
    p.start(SyntaxKind::VariableDecl);
    expect_ident(p);
    p.eat(TokenKind::ConstantKw);
    types::parse_type_spec(p);
    if p.eat(TokenKind::Assign) {
        parse_expression(p);
    }
    p.expect(TokenKind::Semicolon);
    p.finish();
}

/// `TYPE name IS <record|table-of|varray> ;`
fn parse_type_decl(p: &mut Parser) {
    p.start(SyntaxKind::TypeDecl);
    p.bump(TokenKind::TypeKw);
    expect_ident(p);
    p.expect(TokenKind::IsKw);
    types::parse_type_spec(p);
    p.expect(TokenKind::Semicolon);
    p.finish();
}

/// `CURSOR name IS <select_statement> ;`
fn parse_cursor_decl(p: &mut Parser) {
    p.start(SyntaxKind::CursorDecl);
    p.bump(TokenKind::CursorKw);
    expect_ident(p);
    p.expect(TokenKind::IsKw);
    select_core(p);
    p.expect(TokenKind::Semicolon);
    p.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_ok(input: &str) {
        let mut p = Parser::for_tests(input);
        parse_declare_section(&mut p, &[TokenKind::BeginKw]);
        assert!(p.take_errors().is_empty(), "failed to parse {input:?}");
    }

    #[test]
    fn parses_plain_variable_decl() {
        check_ok("v_count NUMBER := 0;");
    }

    #[test]
    fn parses_constant_decl() {
        check_ok("c_max CONSTANT NUMBER(4) := 100;");
    }

    #[test]
    fn parses_rowtype_decl() {
        check_ok("v_emp emp%ROWTYPE;");
    }

    #[test]
    fn parses_inline_record_type_decl() {
        check_ok("TYPE t_rec IS RECORD (id NUMBER, name VARCHAR2(30)); v_rec t_rec;");
    }

    #[test]
    fn parses_cursor_decl() {
        check_ok("CURSOR emp_cur IS SELECT empno FROM emp WHERE deptno = 10;");
    }

    #[test]
    fn parses_multiple_decls_in_sequence() {
        check_ok(
            "v_a NUMBER;\nv_b VARCHAR2(10) := 'x';\nTYPE t_ids IS TABLE OF NUMBER INDEX BY BINARY_INTEGER;",
        );
    }
}
