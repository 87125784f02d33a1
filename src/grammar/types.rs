// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Parses data type specifications, including the inline RECORD / TABLE OF
//! / VARRAY shapes the elaboration engine later lowers to `jsonb`.
//!
//! There is deliberately no dedicated `Datatype` *node*: a type spec is
//! just a run of leaf tokens (or, for the inline collection/record forms,
//! a small nested node) under whichever declaration it belongs to. The
//! builder re-reads those children when it needs to classify the type.

use super::expect_ident;
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

pub(crate) fn parse_type_spec(p: &mut Parser) {
    match p.current() {
        TokenKind::NumberTyKw | TokenKind::VarcharTyKw | TokenKind::DateTyKw => p.bump_any(),
        TokenKind::RecordKw => parse_record_type(p),
        TokenKind::TableKw => parse_table_of_type(p),
        TokenKind::VarrayKw => parse_varray_type(p),
        TokenKind::Ident | TokenKind::QuotedIdent => {
            super::parse_ident_group(p);
            if p.at(TokenKind::RowtypeAttr) || p.at(TokenKind::TypeAttr) {
                p.bump_any();
            }
        }
        _ => p.error("expected a data type"),
    }
}

/// `RECORD (field1 type1, field2 type2, ...)`.
fn parse_record_type(p: &mut Parser) {
    p.start(SyntaxKind::RecordFieldList);
    p.bump(TokenKind::RecordKw);
    p.expect(TokenKind::LParen);
    if !p.at(TokenKind::RParen) {
        parse_record_field(p);
        while p.eat(TokenKind::Comma) {
            parse_record_field(p);
        }
    }
    p.expect(TokenKind::RParen);
    p.finish();
}

fn parse_record_field(p: &mut Parser) {
    p.start(SyntaxKind::RecordField);
    expect_ident(p);
    parse_type_spec(p);
    p.finish();
}

/// `TABLE OF <type> [INDEX BY <type>]`.
fn parse_table_of_type(p: &mut Parser) {
    p.start(SyntaxKind::CollectionSpec);
    p.bump(TokenKind::TableKw);
    p.expect(TokenKind::OfKw);
    parse_type_spec(p);
    if p.eat(TokenKind::IndexKw) {
        p.expect(TokenKind::ByKw);
        parse_type_spec(p);
    }
    p.finish();
}

/// `VARRAY(<capacity>) OF <type>`.
fn parse_varray_type(p: &mut Parser) {
    p.start(SyntaxKind::CollectionSpec);
    p.bump(TokenKind::VarrayKw);
    p.expect(TokenKind::LParen);
    p.expect(TokenKind::Number);
    p.expect(TokenKind::RParen);
    p.expect(TokenKind::OfKw);
    parse_type_spec(p);
    p.finish();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_number_type() {
        let mut p = Parser::for_tests("NUMBER(10,2)");
        parse_type_spec(&mut p);
        assert!(p.take_errors().is_empty());
    }

    #[test]
    fn parses_rowtype_attribute() {
        let mut p = Parser::for_tests("emp%ROWTYPE");
        parse_type_spec(&mut p);
        assert!(p.take_errors().is_empty());
    }

    #[test]
    fn parses_inline_record_type() {
        let mut p = Parser::for_tests("RECORD (id NUMBER, name VARCHAR2(30))");
        parse_type_spec(&mut p);
        assert!(p.take_errors().is_empty());
    }

    #[test]
    fn parses_table_of_index_by() {
        let mut p = Parser::for_tests("TABLE OF VARCHAR2(30) INDEX BY NUMBER");
        parse_type_spec(&mut p);
        assert!(p.take_errors().is_empty());
    }

    #[test]
    fn parses_varray() {
        let mut p = Parser::for_tests("VARRAY(10) OF NUMBER");
        parse_type_spec(&mut p);
        assert!(p.take_errors().is_empty());
    }
}
