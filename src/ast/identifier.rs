// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Typed AST node for a (possibly dotted) identifier path.

use super::typed_syntax_node;
use super::AstNode;
use crate::syntax::SyntaxKind;

typed_syntax_node!(IdentGroup);

impl IdentGroup {
    /// The full dotted text, exactly as written (case preserved). Built by
    /// concatenating the group's non-trivia token texts directly: the
    /// lexer may fold a single embedded dot into one [`SyntaxKind::Ident`]
    /// token (see `crate::lexer::token`), and a standalone
    /// [`SyntaxKind::Dot`] token already carries its own `.` text, so no
    /// extra separator is needed between children.
    pub fn name(&self) -> String {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| !matches!(t.kind(), SyntaxKind::Whitespace | SyntaxKind::Comment))
            .map(|t| t.text().to_owned())
            .collect()
    }

    /// The dotted path split into its logical segments, re-splitting any
    /// segment the lexer folded together.
    pub fn segments(&self) -> Vec<String> {
        self.name().split('.').map(str::to_owned).collect()
    }

    /// The last path segment — the "bare" name, e.g. `emp` out of
    /// `hr.emp`.
    pub fn last_segment(&self) -> String {
        self.segments().pop().unwrap_or_default()
    }

    pub fn is_qualified(&self) -> bool {
        self.segments().len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    fn parse_group(input: &str) -> IdentGroup {
        // `IdentGroup` has no standalone parse entry; a table reference
        // in a minimal `select_statement` is the simplest host for it.
        let parsed = parse(&format!("SELECT 1 FROM {input}"), ParseEntry::SelectStatement)
            .unwrap_or_else(|e| panic!("{input:?}: {e}"));
        parsed
            .syntax()
            .descendants()
            .find_map(IdentGroup::cast)
            .expect("expected an IdentGroup")
    }

    #[test]
    fn reassembles_three_segment_path() {
        let group = parse_group("schema.pkg.name");
        assert_eq!(group.name(), "schema.pkg.name");
        assert_eq!(group.segments(), vec!["schema", "pkg", "name"]);
        assert_eq!(group.last_segment(), "name");
        assert!(group.is_qualified());
    }

    #[test]
    fn single_segment_is_unqualified() {
        let group = parse_group("emp");
        assert_eq!(group.segments(), vec!["emp"]);
        assert!(!group.is_qualified());
    }
}
