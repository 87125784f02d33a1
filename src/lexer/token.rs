// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Token definitions for the [`logos`] lexer.
//!
//! The keyword and punctuation set is a curated subset of Oracle PL/SQL —
//! exactly what the grammar front-end in [`crate::grammar`] needs to parse
//! `select_statement | function_body | procedure_body | package_spec |
//! package_body`. It is not a full Oracle lexicon.

use std::fmt;

#[derive(logos::Logos, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\n\r]+")]
    Whitespace,

    #[regex("--[^\n]*")]
    LineComment,

    #[regex(r"/\*(?s:.)*?\*/")]
    BlockComment,

    #[token("create", ignore(case))]
    CreateKw,
    #[token("or", ignore(case), priority = 10)]
    OrKw,
    #[token("replace", ignore(case))]
    ReplaceKw,
    #[token("editionable", ignore(case))]
    EditionableKw,
    #[token("noneditionable", ignore(case))]
    NoneditionableKw,
    #[token("package", ignore(case))]
    PackageKw,
    #[token("body", ignore(case))]
    BodyKw,
    #[token("procedure", ignore(case))]
    ProcedureKw,
    #[token("function", ignore(case))]
    FunctionKw,
    #[token("return", ignore(case))]
    ReturnKw,
    #[token("is", ignore(case))]
    IsKw,
    #[token("as", ignore(case))]
    AsKw,
    #[token("begin", ignore(case))]
    BeginKw,
    #[token("end", ignore(case))]
    EndKw,
    #[token("declare", ignore(case))]
    DeclareKw,
    #[token("exception", ignore(case))]
    ExceptionKw,
    #[token("constant", ignore(case))]
    ConstantKw,
    #[token("type", ignore(case))]
    TypeKw,
    #[token("record", ignore(case))]
    RecordKw,
    #[token("table", ignore(case))]
    TableKw,
    #[token("of", ignore(case))]
    OfKw,
    #[token("varray", ignore(case))]
    VarrayKw,
    #[token("index", ignore(case))]
    IndexKw,
    #[token("by", ignore(case))]
    ByKw,
    #[token("%rowtype", ignore(case))]
    RowtypeAttr,
    #[token("%type", ignore(case))]
    TypeAttr,

    #[token("select", ignore(case))]
    SelectKw,
    #[token("from", ignore(case))]
    FromKw,
    #[token("where", ignore(case))]
    WhereKw,
    #[token("group", ignore(case))]
    GroupKw,
    #[token("order", ignore(case))]
    OrderKw,
    #[token("having", ignore(case))]
    HavingKw,
    #[token("for", ignore(case))]
    ForKw,
    #[token("update", ignore(case))]
    UpdateKw,
    #[token("with", ignore(case))]
    WithKw,
    #[token("union", ignore(case))]
    UnionKw,
    #[token("intersect", ignore(case))]
    IntersectKw,
    #[token("minus", ignore(case))]
    MinusSetOpKw,
    #[token("all", ignore(case))]
    AllKw,

    #[token("and", ignore(case))]
    AndKw,
    #[token("not", ignore(case))]
    NotKw,
    #[token("in", ignore(case))]
    InKw,
    #[token("between", ignore(case))]
    BetweenKw,
    #[regex(r"(?i)like(c|2|4)?")]
    LikeKw,
    #[token("(+)")]
    OracleJoinKw,
    #[token("null", ignore(case))]
    NullKw,
    #[token("dual", ignore(case))]
    DualKw,

    #[token("if", ignore(case))]
    IfKw,
    #[token("then", ignore(case))]
    ThenKw,
    #[token("else", ignore(case))]
    ElseKw,
    #[token("elsif", ignore(case))]
    ElsifKw,
    #[token("loop", ignore(case))]
    LoopKw,
    #[token("cursor", ignore(case))]
    CursorKw,
    #[token("open", ignore(case))]
    OpenKw,
    #[token("fetch", ignore(case))]
    FetchKw,
    #[token("close", ignore(case))]
    CloseKw,
    #[token("into", ignore(case))]
    IntoKw,
    #[token("bulk", ignore(case))]
    BulkKw,
    #[token("collect", ignore(case))]
    CollectKw,
    #[token("raise", ignore(case))]
    RaiseKw,
    #[regex(r"(?i)raise_application_error")]
    RaiseApplicationErrorKw,

    #[regex(r"(?i)number(\s*\(\s*\d+\s*(,\s*\d+\s*)?\))?")]
    NumberTyKw,
    #[regex(r"(?i)varchar2?(\(\s*\d+\s*(\s*char|\s*byte)?\s*\))?")]
    VarcharTyKw,
    #[token("date", ignore(case))]
    DateTyKw,

    #[regex(r"-?\d+(\.\d+)?", priority = 3)]
    Number,
    #[regex(r"(?i)[a-z_][a-z0-9_$#]*(\.[a-z_][a-z0-9_$#]*)?")]
    Ident,
    #[regex(r#""(?:[^"]|"")+""#)]
    QuotedIdent,
    #[regex(r"'(?:[^']|'')*'")]
    QuotedLiteral,
    #[regex(r"(?i)q'[\[({<](?s:.)*?[\])}>]'")]
    AlternativeQuotedLiteral,
    #[regex(r"(?i):[a-z][a-z0-9_]*")]
    BindVar,

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":=")]
    Assign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("%")]
    Percentage,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Asterisk,
    #[token("/")]
    Slash,
    #[regex("<>|!=|<=|>=|<|>|=")]
    ComparisonOp,
    #[token("||")]
    Concat,

    Error,

    /// Marker token signalling end of input; never produced by the lexer itself.
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::LineComment | Self::BlockComment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn check(input: &str, kind: TokenKind) {
        let mut lexer = Lexer::new(input);
        let token = lexer.next().unwrap();
        assert_eq!(token.kind, kind);
        assert_eq!(token.text, input);
    }

    #[test]
    fn lex_spaces_and_newlines() {
        check("  \n", TokenKind::Whitespace);
    }

    #[test]
    fn lex_ident() {
        check("hello", TokenKind::Ident);
    }

    #[test]
    fn lex_quoted_ident() {
        check(r#""MixedCase""#, TokenKind::QuotedIdent);
    }

    #[test]
    fn lex_alternative_quoted_literal() {
        check("q'[it's fine]'", TokenKind::AlternativeQuotedLiteral);
    }

    #[test]
    fn lex_bind_var() {
        check(":old", TokenKind::BindVar);
    }
}
