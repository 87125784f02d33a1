// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Parses the four non-query [`crate::parser::ParseEntry`] productions:
//! `function_body`, `procedure_body`, `package_spec` and `package_body`.
//!
//! All four share the same `CREATE [OR REPLACE] ... IS|AS ... END [name];`
//! shell; what differs is the header (name, optional parameter list,
//! optional `RETURN` type) and what comes between `IS`/`AS` and `END`.

use super::{declare_section, expect_ident, statements, types};
use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// `CREATE [OR REPLACE] [EDITIONABLE|NONEDITIONABLE]`, all optional, as
/// Oracle's `CREATE FUNCTION`/`PROCEDURE`/`PACKAGE` DDL prefixes this.
fn parse_create_or_replace(p: &mut Parser) {
    if p.eat(TokenKind::CreateKw) {
        if p.eat(TokenKind::OrKw) {
            p.expect(TokenKind::ReplaceKw);
        }
        if !p.eat(TokenKind::EditionableKw) {
            p.eat(TokenKind::NoneditionableKw);
        }
    }
}

fn parse_param_list(p: &mut Parser) {
    p.start(SyntaxKind::ParamList);
    if !p.at(TokenKind::RParen) {
        parse_param(p);
        while p.eat(TokenKind::Comma) {
            parse_param(p);
        }
    }
    p.finish();
}

/// `name [IN] type [:= default]`. Parameter mode beyond a bare `IN` (e.g.
/// `OUT`, `IN OUT`) is not part of the curated baseline; see DESIGN.md.
fn parse_param(p: &mut Parser) {
    p.start(SyntaxKind::Param);
    expect_ident(p);
    p.eat(TokenKind::InKw);
    types::parse_type_spec(p);
    if p.eat(TokenKind::Assign) {
        super::expressions::parse_expression(p);
    }
    p.finish();
}

fn parse_function_header(p: &mut Parser) {
    p.start(SyntaxKind::FunctionHeader);
    expect_ident(p);
    if p.eat(TokenKind::LParen) {
        parse_param_list(p);
        p.expect(TokenKind::RParen);
    }
    p.expect(TokenKind::ReturnKw);
    types::parse_type_spec(p);
    // Trailing modifiers (DETERMINISTIC, PIPELINED, ...) carry no
    // translation semantics; skip to IS/AS.
    while !matches!(p.current(), TokenKind::IsKw | TokenKind::AsKw | TokenKind::Eof) {
        p.bump_any();
    }
    p.finish();
}

fn parse_procedure_header(p: &mut Parser) {
    p.start(SyntaxKind::ProcedureHeader);
    expect_ident(p);
    if p.eat(TokenKind::LParen) {
        parse_param_list(p);
        p.expect(TokenKind::RParen);
    }
    p.finish();
}

fn parse_is_or_as(p: &mut Parser) {
    if !p.eat(TokenKind::IsKw) {
        p.expect(TokenKind::AsKw);
    }
}

/// `DECLARE/BEGIN/END` unit (spec §4.4.1's `Block`): an optional declare
/// section, the executable statement list, and an optional (swallowed)
/// exception section.
fn parse_block(p: &mut Parser) {
    p.start(SyntaxKind::Block);
    declare_section::parse_declare_section(p, &[TokenKind::BeginKw, TokenKind::EndKw]);
    if p.eat(TokenKind::BeginKw) {
        statements::parse_statement_list(p, &[TokenKind::ExceptionKw, TokenKind::EndKw]);
    }
    if p.at(TokenKind::ExceptionKw) {
        parse_exception_section(p);
    }
    p.expect(TokenKind::EndKw);
    parse_optional_trailing_name(p);
    p.eat(TokenKind::Semicolon);
    p.finish();
}

/// Swallows an `EXCEPTION ... END` handler section verbatim. The grammar
/// stays lossless; the builder is the one that raises an unsupported-
/// construct error if it ever reaches this node (spec §9's Design Notes
/// restrict elaboration to declarations/assignments, and exception
/// handlers are outside the closed statement taxonomy of spec §4.4.1).
fn parse_exception_section(p: &mut Parser) {
    p.start(SyntaxKind::ExceptionSection);
    p.bump(TokenKind::ExceptionKw);
    while !p.at(TokenKind::EndKw) && !p.at(TokenKind::Eof) {
        p.bump_any();
    }
    p.finish();
}

fn parse_optional_trailing_name(p: &mut Parser) {
    if p.at(TokenKind::Ident) || p.at(TokenKind::QuotedIdent) {
        p.bump_any();
    }
}

/// Entry point for [`crate::parser::ParseEntry::FunctionBody`].
pub(crate) fn function_body(p: &mut Parser) {
    p.start(SyntaxKind::FunctionBody);
    parse_create_or_replace(p);
    p.expect(TokenKind::FunctionKw);
    parse_function_header(p);
    parse_is_or_as(p);
    parse_block(p);
    p.finish();
}

/// Entry point for [`crate::parser::ParseEntry::ProcedureBody`].
pub(crate) fn procedure_body(p: &mut Parser) {
    p.start(SyntaxKind::ProcedureBody);
    parse_create_or_replace(p);
    p.expect(TokenKind::ProcedureKw);
    parse_procedure_header(p);
    parse_is_or_as(p);
    parse_block(p);
    p.finish();
}

/// Entry point for [`crate::parser::ParseEntry::PackageSpec`]. Accepted
/// for analysis only (spec §4.1) — its sole consumer is
/// [`crate::inline_types::extract_package_context`], which re-parses the
/// spec text to collect variable and inline-type declarations; it is
/// never emitted.
pub(crate) fn package_spec(p: &mut Parser) {
    p.start(SyntaxKind::PackageSpec);
    parse_create_or_replace(p);
    p.expect(TokenKind::PackageKw);
    expect_ident(p);
    parse_is_or_as(p);
    declare_section::parse_declare_section(p, &[TokenKind::EndKw]);
    p.expect(TokenKind::EndKw);
    parse_optional_trailing_name(p);
    p.eat(TokenKind::Semicolon);
    p.finish();
}

/// Entry point for [`crate::parser::ParseEntry::PackageBody`].
pub(crate) fn package_body(p: &mut Parser) {
    p.start(SyntaxKind::PackageBody);
    parse_create_or_replace(p);
    p.expect(TokenKind::PackageKw);
    p.expect(TokenKind::BodyKw);
    expect_ident(p);
    parse_is_or_as(p);
    declare_section::parse_declare_section(p, &[TokenKind::BeginKw, TokenKind::EndKw]);
    if p.eat(TokenKind::BeginKw) {
        statements::parse_statement_list(p, &[TokenKind::ExceptionKw, TokenKind::EndKw]);
    }
    if p.at(TokenKind::ExceptionKw) {
        parse_exception_section(p);
    }
    p.expect(TokenKind::EndKw);
    parse_optional_trailing_name(p);
    p.eat(TokenKind::Semicolon);
    p.finish();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    fn check_ok(input: &str, entry: ParseEntry) {
        parse(input, entry).unwrap_or_else(|e| panic!("{input:?}: {e}"));
    }

    #[test]
    fn parses_function_body() {
        check_ok(
            "CREATE OR REPLACE FUNCTION deterministic_function \
             RETURN NUMBER DETERMINISTIC IS \
             BEGIN RETURN 1; END deterministic_function;",
            ParseEntry::FunctionBody,
        );
    }

    #[test]
    fn parses_procedure_body_with_params() {
        check_ok(
            "CREATE OR REPLACE PROCEDURE multiple_parameters(p1 VARCHAR2, p2 VARCHAR2) \
             IS BEGIN NULL; END multiple_parameters;",
            ParseEntry::ProcedureBody,
        );
    }

    #[test]
    fn parses_procedure_body_with_raise_application_error() {
        check_ok(
            "CREATE OR REPLACE PROCEDURE boom IS \
             BEGIN RAISE_APPLICATION_ERROR(-20123, 'boom'); END boom;",
            ParseEntry::ProcedureBody,
        );
    }

    #[test]
    fn parses_package_spec_with_inline_record_type() {
        check_ok(
            "CREATE OR REPLACE PACKAGE pkg IS \
             TYPE salary_range_t IS RECORD (min_sal NUMBER, max_sal NUMBER); \
             END pkg;",
            ParseEntry::PackageSpec,
        );
    }

    #[test]
    fn parses_package_body_with_bare_field_assignment() {
        check_ok(
            "CREATE OR REPLACE PACKAGE BODY pkg IS \
             v_range salary_range_t; \
             v_range.min_sal := 50000; \
             END pkg;",
            ParseEntry::PackageBody,
        );
    }

    #[test]
    fn parses_block_with_exception_section() {
        check_ok(
            "CREATE OR REPLACE PROCEDURE p IS \
             BEGIN NULL; EXCEPTION WHEN OTHERS THEN NULL; END p;",
            ParseEntry::ProcedureBody,
        );
    }
}
