// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements the grammar front-end: lexing plus a hand-rolled recursive
//! descent / precedence-climbing parser that builds a lossless [`rowan`]
//! syntax tree.
//!
//! Loosely follows <https://arzg.github.io/lang/10/> and rowan's own
//! `s_expressions` example, as the teacher repo's doc comments point to.

use std::fmt;

use rowan::{GreenNode, GreenNodeBuilder};

use crate::lexer::{Lexer, Token, TokenKind};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// The grammar production at which parsing begins (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseEntry {
    SelectStatement,
    FunctionBody,
    ProcedureBody,
    PackageSpec,
    PackageBody,
}

impl fmt::Display for ParseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectStatement => "select_statement",
            Self::FunctionBody => "function_body",
            Self::ProcedureBody => "procedure_body",
            Self::PackageSpec => "package_spec",
            Self::PackageBody => "package_body",
        };
        f.write_str(name)
    }
}

/// A non-fatal observation surfaced alongside a successful parse, e.g. an
/// unterminated-looking construct that the lexer nonetheless recovered
/// from. Carried through to [`crate::result::TransformationResult`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// A hard parse failure: the front-end never recovers silently (spec §4.1).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
#[error("parse error at {line}:{column}: {message} (found {lexeme:?}, in {rule_stack:?})")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub lexeme: String,
    pub rule_stack: Vec<String>,
    pub message: String,
}

/// The result of a successful parse: a lossless syntax tree plus any
/// non-fatal diagnostics collected along the way.
#[derive(Debug)]
pub struct Parsed {
    green: GreenNode,
    diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Entry point for the grammar front-end (spec §4.1).
pub fn parse(input: &str, entry: ParseEntry) -> Result<Parsed, ParseError> {
    let mut parser = Parser::new(input);

    parser.builder.start_node(SyntaxKind::Root.into());
    match entry {
        ParseEntry::SelectStatement => crate::grammar::select_statement(&mut parser),
        ParseEntry::FunctionBody => crate::grammar::function_body(&mut parser),
        ParseEntry::ProcedureBody => crate::grammar::procedure_body(&mut parser),
        ParseEntry::PackageSpec => crate::grammar::package_spec(&mut parser),
        ParseEntry::PackageBody => crate::grammar::package_body(&mut parser),
    }
    parser.eat_trivia();
    parser.builder.finish_node();

    parser.finish_parse(input)
}

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    rule_stack: Vec<SyntaxKind>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: Lexer::new(text).collect(),
            pos: 0,
            builder: GreenNodeBuilder::new(),
            rule_stack: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Constructs a bare parser for unit tests of individual grammar
    /// productions, without going through [`parse`] and its `Root` node.
    #[cfg(test)]
    pub(crate) fn for_tests(text: &'a str) -> Self {
        Self::new(text)
    }

    /// Drains the errors collected so far, for unit tests that exercise a
    /// single grammar production rather than a whole [`ParseEntry`].
    #[cfg(test)]
    pub(crate) fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    fn finish_parse(mut self, input: &str) -> Result<Parsed, ParseError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let green = self.builder.finish();
        let _ = input;
        Ok(Parsed {
            green,
            diagnostics: Vec::new(),
        })
    }

    /// The next *significant* (non-trivia) token kind, without consuming it.
    pub(crate) fn current(&self) -> TokenKind {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// The kind of the `n`-th significant (non-trivia) token ahead, without
    /// consuming anything. `nth(0)` is equivalent to [`Self::current`].
    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    /// The raw text of the next significant token, for error messages and
    /// for re-splitting dotted identifiers the lexer folded into one token.
    pub(crate) fn current_text(&self) -> &'a str {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.text)
            .unwrap_or("<eof>")
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn start(&mut self, kind: SyntaxKind) {
        self.rule_stack.push(kind);
        self.builder.start_node(kind.into());
    }

    pub(crate) fn finish(&mut self) {
        self.rule_stack.pop();
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> rowan::Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: rowan::Checkpoint, kind: SyntaxKind) {
        self.rule_stack.push(kind);
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn eat_trivia(&mut self) {
        while self.tokens.get(self.pos).map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.push_raw();
        }
    }

    fn push_raw(&mut self) {
        let token = &self.tokens[self.pos];
        self.builder.token(SyntaxKind::from(token.kind).into(), token.text);
        self.pos += 1;
    }

    /// Consumes exactly one significant token (plus any preceding trivia),
    /// whatever it is. Used both for expected tokens and for error recovery.
    pub(crate) fn bump_any(&mut self) {
        self.eat_trivia();
        if self.pos < self.tokens.len() {
            self.push_raw();
        }
    }

    pub(crate) fn bump(&mut self, kind: TokenKind) {
        debug_assert!(self.at(kind), "expected to bump {kind:?}, at {:?}", self.current());
        self.bump_any();
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump_any();
            true
        } else {
            false
        }
    }

    /// Consumes a token of `kind` if present; otherwise records a hard
    /// parse error. Returns whether the token was present.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {kind:?}"));
            false
        }
    }

    /// Bumps tokens until (not including) the next occurrence of `kind` or
    /// end of input. Used as a local recovery strategy inside list grammar.
    pub(crate) fn until(&mut self, kind: TokenKind) {
        while !self.at(kind) && !self.at(TokenKind::Eof) {
            self.bump_any();
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let offset: usize = self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| usize::from(t.range.start()))
            .unwrap_or(self.text.len());
        let (line, column) = crate::lexer::line_col(self.text, offset);

        self.errors.push(ParseError {
            line,
            column,
            lexeme: self.current_text().to_owned(),
            rule_stack: self.rule_stack.iter().map(|k| format!("{k:?}")).collect(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_simple_select() {
        let parsed = parse("SELECT empno FROM emp", ParseEntry::SelectStatement).unwrap();
        assert_eq!(parsed.syntax().kind(), SyntaxKind::Root);
    }

    #[test]
    fn truncated_select_is_a_parse_error() {
        let err = parse("SELECT empno FROM", ParseEntry::SelectStatement).unwrap_err();
        assert!(err.message.to_lowercase().contains("expect") || !err.message.is_empty());
        assert_eq!(err.line, 1);
    }
}
