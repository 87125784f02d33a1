// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements grammar parsing of the token tree from the lexer.
//!
//! The five [`crate::parser::ParseEntry`] productions all bottom out in the
//! same handful of shared building blocks (identifiers, data types,
//! expressions, declare sections, statement lists), split across the
//! sibling modules here the way the front-end grammar of a hand-rolled
//! recursive-descent parser usually is.

mod declare_section;
mod expressions;
mod program_unit;
mod query;
mod statements;
mod types;

pub(crate) use program_unit::{function_body, package_body, package_spec, procedure_body};
pub(crate) use query::select_statement;

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

/// Parses a (possibly schema- or package-qualified) dotted name into an
/// `IdentGroup` node.
///
/// The lexer already folds a single `a.b` into one [`TokenKind::Ident`]
/// token (see its regex), so this only needs to chain further `.segment`
/// tails explicitly.
pub(crate) fn parse_ident_group(p: &mut Parser) {
    p.start(SyntaxKind::IdentGroup);
    expect_ident(p);
    while p.at(TokenKind::Dot) {
        p.bump(TokenKind::Dot);
        expect_ident(p);
    }
    p.finish();
}

/// Consumes a single identifier-like token (plain or quoted), or records a
/// parse error if none is present.
pub(crate) fn expect_ident(p: &mut Parser) {
    if p.at(TokenKind::Ident) || p.at(TokenKind::QuotedIdent) {
        p.bump_any();
    } else {
        p.error("expected an identifier");
    }
}
