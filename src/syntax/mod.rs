// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Implements a syntax-level (lossless) representation of the input.

use num_traits::FromPrimitive;

pub use kind::SyntaxKind;

mod kind;

/// Dummy type for our PL/SQL language definition, for use with rowan.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum PlSqlLang {}

impl rowan::Language for PlSqlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        Self::Kind::from_u16(raw.0).unwrap()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Typed [`SyntaxNode`] with our [`PlSqlLang`] language definition.
pub type SyntaxNode = rowan::SyntaxNode<PlSqlLang>;
/// Typed [`SyntaxToken`] with our [`PlSqlLang`] language definition.
pub type SyntaxToken = rowan::SyntaxToken<PlSqlLang>;
/// Typed [`SyntaxElement`] with our [`PlSqlLang`] language definition.
#[allow(unused)]
pub type SyntaxElement = rowan::SyntaxElement<PlSqlLang>;
