// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Typed AST nodes for expressions.
//!
//! These stay thin on purpose, the same way the teacher's own
//! `ast::Expression` did: `filter_tokens`/`filter_nodes` hand the
//! `crate::builder` the raw children to walk, rather than this module
//! growing a node per operator. The precedence folding the parser already
//! baked into the tree shape (spec §4.4, `Concatenation` vs bare
//! `CompoundExpression`) is enough structure for the builder to render
//! PostgreSQL text from.

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::typed_syntax_node;
use super::AstNode;

typed_syntax_node!(Expression, CompoundExpression, Concatenation, FunctionInvocation, ArgumentList, Argument);

impl Expression {
    pub fn filter_tokens<F>(&self, filter: F) -> impl Iterator<Item = SyntaxToken>
    where
        F: Fn(&SyntaxToken) -> bool,
    {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(filter)
    }

    pub fn filter_nodes<F>(&self, filter: F) -> impl Iterator<Item = SyntaxNode>
    where
        F: Fn(&SyntaxNode) -> bool,
    {
        self.syntax.children().filter(filter)
    }

    /// The single [`CompoundExpression`] every `Expression` wraps (spec
    /// §4.4.1: `Expression(logical|cursor)`).
    pub fn compound(&self) -> Option<CompoundExpression> {
        self.syntax.children().find_map(CompoundExpression::cast)
    }
}

impl CompoundExpression {
    /// Any `IN` / `BETWEEN` / `LIKE` family keyword among this compound
    /// expression's direct tokens, lower-cased — these parse fine (spec
    /// §4.1) but are explicitly unsupported by the builder (spec §4.4.2).
    ///
    /// `LIKE`'s lexer token (`TokenKind::LikeKw`) maps to
    /// `SyntaxKind::ComparisonOp` rather than `SyntaxKind::Keyword` (see
    /// `crate::syntax::kind`), since the grammar treats it as one more
    /// comparison-producing operator; `IN`/`BETWEEN` stay plain keywords.
    /// Both token shapes are checked here.
    pub fn unsupported_keyword(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                let text = t.text().to_ascii_lowercase();
                match t.kind() {
                    SyntaxKind::Keyword => matches!(text.as_str(), "in" | "between"),
                    SyntaxKind::ComparisonOp => matches!(text.as_str(), "like" | "likec" | "like2" | "like4"),
                    _ => false,
                }
            })
            .map(|t| t.text().to_owned())
    }
}

impl FunctionInvocation {
    pub fn ident(&self) -> Option<super::IdentGroup> {
        self.syntax.children().find_map(super::IdentGroup::cast)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        self.syntax.children().find_map(ArgumentList::cast)
    }
}

impl ArgumentList {
    pub fn arguments(&self) -> Vec<Argument> {
        self.syntax.children().filter_map(Argument::cast).collect()
    }
}

impl Argument {
    pub fn expression(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }

    pub fn text(&self) -> String {
        self.syntax.text().to_string()
    }
}
