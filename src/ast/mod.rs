// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2022 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>
// SPDX-FileContributor: Sebastian Ziebell <sebastian.ziebell@asquera.de>

//! Implements a typed AST over the lossless [`rowan`] syntax tree the
//! front-end produces. Each node kind below is a thin, zero-cost wrapper
//! around a [`crate::syntax::SyntaxNode`] — no semantics live here, only
//! navigation. [`crate::builder`] is what turns this into the semantic IR.

mod block;
mod declare_section;
mod expressions;
mod identifier;
mod program_unit;
mod query;
mod statements;

use crate::syntax::{SyntaxKind, SyntaxToken};
pub use block::*;
pub use declare_section::*;
pub use expressions::*;
pub use identifier::*;
pub use program_unit::*;
pub use query::*;
pub use rowan::ast::AstNode;
pub use statements::*;

macro_rules! typed_syntax {
    ($synty:ty, $astty:ty, $name:ident $(; { $( $additional:item )+ } )? ) => {
        #[derive(Debug, Clone, Eq, PartialEq, Hash)]
        pub struct $name {
            pub(crate) syntax: $synty,
        }

        impl $astty for $name {
            $( $( $additional )+ )?

            fn can_cast(kind: crate::syntax::SyntaxKind) -> bool {
                kind == crate::syntax::SyntaxKind::$name
            }

            fn cast(syntax: $synty) -> Option<Self> {
                if Self::can_cast(syntax.kind()) {
                    Some(Self { syntax })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &$synty {
                &self.syntax
            }
        }
    };
}

/// Automatically generates a `struct` and [`AstNode`] impl for each
/// [`SyntaxKind`] variant named.
macro_rules! typed_syntax_node {
    ($( $name:ident ),+ $(,)?) => {
        $(
            crate::ast::typed_syntax!(crate::syntax::SyntaxNode, crate::ast::AstNode, $name; {
                type Language = crate::syntax::PlSqlLang;
            });
        )+
    };
}

/// Automatically generates a `struct` and [`AstToken`] impl for each
/// [`SyntaxKind`] variant named.
macro_rules! typed_syntax_token {
    ($( $name:ident ),+ $(,)?) => {
        $( crate::ast::typed_syntax!(crate::syntax::SyntaxToken, crate::ast::AstToken, $name); )+
    };
}

// So sibling modules can `use super::{typed_syntax_node, typed_syntax_token}`.
pub(self) use {typed_syntax, typed_syntax_node, typed_syntax_token};

/// Interface for typed AST tokens, the leaf-level counterpart of
/// [`AstNode`] (which `rowan` itself only defines for nodes).
pub trait AstToken {
    fn can_cast(kind: SyntaxKind) -> bool
    where
        Self: Sized;

    fn cast(token: SyntaxToken) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxToken;

    /// Returns the original source representation of the token.
    fn text(&self) -> &str {
        self.syntax().text()
    }
}

typed_syntax_node!(Root);
typed_syntax_token!(Ident, ComparisonOp);

impl Root {
    pub fn select_statement(&self) -> Option<SelectStatement> {
        self.syntax.children().find_map(SelectStatement::cast)
    }

    pub fn function_body(&self) -> Option<FunctionBody> {
        self.syntax.children().find_map(FunctionBody::cast)
    }

    pub fn procedure_body(&self) -> Option<ProcedureBody> {
        self.syntax.children().find_map(ProcedureBody::cast)
    }

    pub fn package_spec(&self) -> Option<PackageSpec> {
        self.syntax.children().find_map(PackageSpec::cast)
    }

    pub fn package_body(&self) -> Option<PackageBody> {
        self.syntax.children().find_map(PackageBody::cast)
    }
}

impl Ident {
    /// Returns the identifier's source text, case preserved.
    pub fn name(&self) -> String {
        self.syntax.text().to_string()
    }
}
