// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Typed AST nodes for the curated statement subset (spec §4.4.1):
//! assignments, field assignments, calls, `RAISE`, `RETURN`, `NULL`, and
//! the explicit-cursor trio `FETCH`/`OPEN`/`CLOSE`.

use crate::syntax::{SyntaxKind, SyntaxNode};

use super::typed_syntax_node;
use super::{AstNode, ArgumentList, Expression, IdentGroup};

typed_syntax_node!(
    Assignment,
    FieldAssignment,
    CallStatement,
    RaiseStatement,
    ReturnStatement,
    NullStatement,
    FetchStatement,
    OpenStatement,
    CloseStatement,
    ExceptionSection
);

/// Any one of the curated statement kinds — a sum type over the
/// individually-typed nodes above, so [`super::StatementList::statements`]
/// can return one homogeneous sequence without the caller needing to
/// `match` on `SyntaxKind` first.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Statement {
    Assignment(Assignment),
    FieldAssignment(FieldAssignment),
    Call(CallStatement),
    Raise(RaiseStatement),
    Return(ReturnStatement),
    Null(NullStatement),
    Fetch(FetchStatement),
    Open(OpenStatement),
    Close(CloseStatement),
}

impl AstNode for Statement {
    type Language = crate::syntax::PlSqlLang;

    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::Assignment
                | SyntaxKind::FieldAssignment
                | SyntaxKind::CallStatement
                | SyntaxKind::RaiseStatement
                | SyntaxKind::ReturnStatement
                | SyntaxKind::NullStatement
                | SyntaxKind::FetchStatement
                | SyntaxKind::OpenStatement
                | SyntaxKind::CloseStatement
        )
    }

    fn cast(syntax: SyntaxNode) -> Option<Self> {
        match syntax.kind() {
            SyntaxKind::Assignment => Assignment::cast(syntax).map(Statement::Assignment),
            SyntaxKind::FieldAssignment => FieldAssignment::cast(syntax).map(Statement::FieldAssignment),
            SyntaxKind::CallStatement => CallStatement::cast(syntax).map(Statement::Call),
            SyntaxKind::RaiseStatement => RaiseStatement::cast(syntax).map(Statement::Raise),
            SyntaxKind::ReturnStatement => ReturnStatement::cast(syntax).map(Statement::Return),
            SyntaxKind::NullStatement => NullStatement::cast(syntax).map(Statement::Null),
            SyntaxKind::FetchStatement => FetchStatement::cast(syntax).map(Statement::Fetch),
            SyntaxKind::OpenStatement => OpenStatement::cast(syntax).map(Statement::Open),
            SyntaxKind::CloseStatement => CloseStatement::cast(syntax).map(Statement::Close),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Statement::Assignment(n) => n.syntax(),
            Statement::FieldAssignment(n) => n.syntax(),
            Statement::Call(n) => n.syntax(),
            Statement::Raise(n) => n.syntax(),
            Statement::Return(n) => n.syntax(),
            Statement::Null(n) => n.syntax(),
            Statement::Fetch(n) => n.syntax(),
            Statement::Open(n) => n.syntax(),
            Statement::Close(n) => n.syntax(),
        }
    }
}

/// Both [`Assignment`] and [`FieldAssignment`] share the same shape: an
/// `IdentGroup` LHS path and an `Expression` RHS. `FieldAssignment`'s path
/// has two or more segments (spec §4.5: the last segment is a `jsonb`
/// field write); `Assignment`'s has exactly one.
fn lhs(syntax: &SyntaxNode) -> Option<IdentGroup> {
    syntax.children().find_map(IdentGroup::cast)
}

fn rhs(syntax: &SyntaxNode) -> Option<Expression> {
    syntax.children().find_map(Expression::cast)
}

impl Assignment {
    pub fn target(&self) -> Option<IdentGroup> {
        lhs(&self.syntax)
    }

    pub fn value(&self) -> Option<Expression> {
        rhs(&self.syntax)
    }
}

impl FieldAssignment {
    pub fn target(&self) -> Option<IdentGroup> {
        lhs(&self.syntax)
    }

    pub fn value(&self) -> Option<Expression> {
        rhs(&self.syntax)
    }
}

impl CallStatement {
    pub fn target(&self) -> Option<IdentGroup> {
        lhs(&self.syntax)
    }

    pub fn argument_list(&self) -> Option<ArgumentList> {
        self.syntax.children().find_map(ArgumentList::cast)
    }
}

impl RaiseStatement {
    /// `true` for `RAISE_APPLICATION_ERROR(-20xxx, 'message')` (spec
    /// §4.4.4 maps it to `RAISE EXCEPTION ... ERRCODE 'P0xxx'`), `false`
    /// for a plain `RAISE [name]`.
    pub fn is_application_error(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .next()
            .is_some_and(|t| t.text().eq_ignore_ascii_case("raise_application_error"))
    }

    pub fn application_error_args(&self) -> Option<ArgumentList> {
        self.syntax.children().find_map(ArgumentList::cast)
    }

    /// The named exception of a bare `RAISE name;`.
    pub fn exception_name(&self) -> Option<IdentGroup> {
        self.syntax.children().find_map(IdentGroup::cast)
    }
}

impl ReturnStatement {
    pub fn value(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }
}

impl FetchStatement {
    pub fn cursor(&self) -> Option<IdentGroup> {
        self.syntax.children().filter_map(IdentGroup::cast).next()
    }

    pub fn bulk_collect(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .any(|t| t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("bulk"))
    }

    pub fn into_targets(&self) -> Vec<IdentGroup> {
        self.syntax.children().filter_map(IdentGroup::cast).skip(1).collect()
    }
}

impl OpenStatement {
    pub fn cursor(&self) -> Option<IdentGroup> {
        self.syntax.children().find_map(IdentGroup::cast)
    }
}

impl CloseStatement {
    pub fn cursor(&self) -> Option<IdentGroup> {
        self.syntax.children().find_map(IdentGroup::cast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    fn statement(input: &str) -> Statement {
        let body = format!("CREATE PROCEDURE p IS BEGIN {input} END p;");
        let parsed = parse(&body, ParseEntry::ProcedureBody).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        parsed
            .syntax()
            .descendants()
            .find_map(Statement::cast)
            .expect("expected a statement")
    }

    #[test]
    fn reads_plain_assignment() {
        let stmt = statement("v_count := 1;");
        match stmt {
            Statement::Assignment(a) => {
                assert_eq!(a.target().unwrap().name(), "v_count");
                assert!(a.value().is_some());
            }
            other => panic!("expected Assignment, got {other:?}"),
        }
    }

    #[test]
    fn reads_field_assignment() {
        let stmt = statement("v_range.min_sal := 50000;");
        match stmt {
            Statement::FieldAssignment(a) => {
                assert_eq!(a.target().unwrap().name(), "v_range.min_sal");
            }
            other => panic!("expected FieldAssignment, got {other:?}"),
        }
    }

    #[test]
    fn reads_call_statement() {
        let stmt = statement("dbms_output.put_line('hi');");
        match stmt {
            Statement::Call(c) => {
                assert_eq!(c.target().unwrap().name(), "dbms_output.put_line");
                assert_eq!(c.argument_list().unwrap().arguments().len(), 1);
            }
            other => panic!("expected CallStatement, got {other:?}"),
        }
    }

    #[test]
    fn reads_raise_application_error() {
        let stmt = statement("RAISE_APPLICATION_ERROR(-20123, 'boom');");
        match stmt {
            Statement::Raise(r) => {
                assert!(r.is_application_error());
                assert_eq!(r.application_error_args().unwrap().arguments().len(), 2);
            }
            other => panic!("expected RaiseStatement, got {other:?}"),
        }
    }

    #[test]
    fn reads_fetch_into_targets() {
        let stmt = statement("FETCH c INTO v_id;");
        match stmt {
            Statement::Fetch(f) => {
                assert_eq!(f.cursor().unwrap().name(), "c");
                assert!(!f.bulk_collect());
                assert_eq!(f.into_targets().len(), 1);
            }
            other => panic!("expected FetchStatement, got {other:?}"),
        }
    }
}
