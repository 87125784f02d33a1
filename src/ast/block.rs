// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Typed AST nodes for the executable `DECLARE`/`BEGIN`/`END` body a
//! function or procedure wraps (spec §4.4.1's `Block`).

use super::typed_syntax_node;
use super::{AstNode, DeclareSection, ExceptionSection};

typed_syntax_node!(Block, StatementList);

impl Block {
    pub fn declare_section(&self) -> Option<DeclareSection> {
        self.syntax.children().find_map(DeclareSection::cast)
    }

    pub fn statement_list(&self) -> Option<StatementList> {
        self.syntax.children().find_map(StatementList::cast)
    }

    /// Present when the body carries an `EXCEPTION ... END` handler
    /// section — the grammar accepts it losslessly, but the builder
    /// raises `Unsupported` if it is ever reached (see DESIGN.md).
    pub fn exception_section(&self) -> Option<ExceptionSection> {
        self.syntax.children().find_map(ExceptionSection::cast)
    }
}

impl StatementList {
    pub fn statements(&self) -> Vec<super::Statement> {
        self.syntax.children().filter_map(super::Statement::cast).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    #[test]
    fn reads_declare_section_and_statements() {
        let parsed = parse(
            "CREATE PROCEDURE p IS v_count NUMBER := 0; BEGIN v_count := 1; END p;",
            ParseEntry::ProcedureBody,
        )
        .unwrap();
        let block = parsed.syntax().descendants().find_map(Block::cast).unwrap();
        assert_eq!(block.declare_section().unwrap().variable_decls().len(), 1);
        assert_eq!(block.statement_list().unwrap().statements().len(), 1);
        assert!(block.exception_section().is_none());
    }

    #[test]
    fn reads_exception_section_presence() {
        let parsed = parse(
            "CREATE PROCEDURE p IS BEGIN NULL; EXCEPTION WHEN OTHERS THEN NULL; END p;",
            ParseEntry::ProcedureBody,
        )
        .unwrap();
        let block = parsed.syntax().descendants().find_map(Block::cast).unwrap();
        assert!(block.exception_section().is_some());
    }
}
