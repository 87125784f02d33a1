// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Typed AST nodes over declare sections: variable declarations, inline
//! `TYPE` declarations (spec §4.5's elaboration source), and cursors.

use rowan::NodeOrToken;

use crate::syntax::SyntaxKind;

use super::typed_syntax_node;
use super::{AstNode, Expression};

typed_syntax_node!(
    DeclareSection,
    VariableDecl,
    TypeDecl,
    RecordFieldList,
    RecordField,
    CollectionSpec,
    CursorDecl
);

impl DeclareSection {
    pub fn variable_decls(&self) -> Vec<VariableDecl> {
        self.syntax.children().filter_map(VariableDecl::cast).collect()
    }

    pub fn type_decls(&self) -> Vec<TypeDecl> {
        self.syntax.children().filter_map(TypeDecl::cast).collect()
    }

    pub fn cursor_decls(&self) -> Vec<CursorDecl> {
        self.syntax.children().filter_map(CursorDecl::cast).collect()
    }
}

/// Reassembles the raw type-spec text between a declaration's name (and
/// optional `CONSTANT`) and its terminator (`:=` or `;`), for the scalar
/// and `%ROWTYPE`/`%TYPE` forms that have no dedicated type node (see
/// `crate::grammar::types`). Returns `None` once an inline `RECORD`/`TABLE
/// OF`/`VARRAY` node is reached — those are read structurally instead.
pub(crate) fn raw_type_text(node: &crate::syntax::SyntaxNode, skip_keywords: &[&str]) -> Option<String> {
    let mut out = String::new();
    let mut seen_name = false;
    for el in node.children_with_tokens() {
        match el {
            NodeOrToken::Token(t) if matches!(t.kind(), SyntaxKind::Whitespace | SyntaxKind::Comment) => {}
            NodeOrToken::Token(t) if !seen_name && matches!(t.kind(), SyntaxKind::Ident) => {
                seen_name = true;
            }
            NodeOrToken::Token(t)
                if t.kind() == SyntaxKind::Keyword
                    && skip_keywords.iter().any(|kw| t.text().eq_ignore_ascii_case(kw)) => {}
            NodeOrToken::Token(t) if matches!(t.kind(), SyntaxKind::Assign | SyntaxKind::Semicolon) => break,
            NodeOrToken::Node(n)
                if matches!(n.kind(), SyntaxKind::RecordFieldList | SyntaxKind::CollectionSpec | SyntaxKind::Expression) =>
            {
                if n.kind() == SyntaxKind::Expression {
                    break;
                }
                return None;
            }
            NodeOrToken::Token(t) => out.push_str(t.text()),
            NodeOrToken::Node(n) => out.push_str(&n.text().to_string()),
        }
    }
    Some(out)
}

impl VariableDecl {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident)
            .map(|t| t.text().to_owned())
    }

    pub fn is_constant(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .any(|t| t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("constant"))
    }

    /// The inline `RECORD (...)` shape, if the variable's type is one.
    pub fn record_fields(&self) -> Option<RecordFieldList> {
        self.syntax.children().find_map(RecordFieldList::cast)
    }

    /// The inline `TABLE OF`/`VARRAY` shape, if the variable's type is one.
    pub fn collection_spec(&self) -> Option<CollectionSpec> {
        self.syntax.children().find_map(CollectionSpec::cast)
    }

    /// The scalar/`%ROWTYPE`/`%TYPE` type text, e.g. `NUMBER(10,2)` or
    /// `emp%ROWTYPE`. `None` when the type is instead an inline record or
    /// collection (read via [`Self::record_fields`]/[`Self::collection_spec`]).
    pub fn type_text(&self) -> Option<String> {
        raw_type_text(&self.syntax, &["constant"]).filter(|s| !s.is_empty())
    }

    pub fn default_expr(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }
}

impl TypeDecl {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident)
            .map(|t| t.text().to_owned())
    }

    pub fn record_fields(&self) -> Option<RecordFieldList> {
        self.syntax.children().find_map(RecordFieldList::cast)
    }

    pub fn collection_spec(&self) -> Option<CollectionSpec> {
        self.syntax.children().find_map(CollectionSpec::cast)
    }
}

impl RecordFieldList {
    pub fn fields(&self) -> Vec<RecordField> {
        self.syntax.children().filter_map(RecordField::cast).collect()
    }
}

impl RecordField {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident)
            .map(|t| t.text().to_owned())
    }

    /// The field's scalar type text, e.g. `NUMBER` or `VARCHAR2(30)`.
    pub fn type_text(&self) -> String {
        raw_type_text(&self.syntax, &[]).unwrap_or_default()
    }
}

impl CollectionSpec {
    pub fn is_varray(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .next()
            .is_some_and(|t| t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("varray"))
    }

    /// `VARRAY(n)`'s capacity `n`, when this spec is a `VARRAY`.
    pub fn varray_capacity(&self) -> Option<u32> {
        if !self.is_varray() {
            return None;
        }
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == SyntaxKind::Integer)
            .and_then(|t| t.text().parse().ok())
    }

    /// The `INDEX BY` key type, when present — distinguishes Oracle's
    /// associative-array `TABLE OF ... INDEX BY ...` from a plain nested
    /// table (spec §4.5's `INDEX_BY` vs `TABLE_OF` categories).
    pub fn index_key_type(&self) -> Option<String> {
        let mut past_index_by = false;
        let mut out = String::new();
        for el in self.syntax.children_with_tokens() {
            match &el {
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("by") => {
                    past_index_by = true;
                    continue;
                }
                _ => {}
            }
            if past_index_by {
                match el {
                    NodeOrToken::Token(t) if !matches!(t.kind(), SyntaxKind::Whitespace | SyntaxKind::Comment) => {
                        out.push_str(t.text())
                    }
                    NodeOrToken::Node(n) => out.push_str(&n.text().to_string()),
                    _ => {}
                }
            }
        }
        (!out.is_empty()).then_some(out)
    }

    /// The element type's text, after `OF` and (for `VARRAY`) the
    /// capacity.
    pub fn element_type_text(&self) -> String {
        let mut past_of = false;
        let mut out = String::new();
        for el in self.syntax.children_with_tokens() {
            match &el {
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("of") => {
                    past_of = true;
                    continue;
                }
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("index") => {
                    break;
                }
                _ => {}
            }
            if past_of {
                match el {
                    NodeOrToken::Token(t) => out.push_str(t.text()),
                    NodeOrToken::Node(n) => out.push_str(&n.text().to_string()),
                }
            }
        }
        out
    }
}

impl CursorDecl {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident)
            .map(|t| t.text().to_owned())
    }

    pub fn select_statement(&self) -> Option<super::Subquery> {
        self.syntax.children().find_map(super::Subquery::cast)
    }
}
