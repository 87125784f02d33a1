// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Builds [`Declaration`]/[`Statement`] IR from the typed declare-section
//! and statement AST.
//!
//! Whether a variable's declared type is an inline type (spec §4.5) is
//! decided here, structurally, without any catalog or context lookup: a
//! `VariableDecl` counts as inline-typed when it carries its own
//! `RECORD(...)`/`TABLE OF`/`VARRAY` shape, when its type text ends in
//! `%ROWTYPE`, or when its type text names a sibling `TYPE ... IS ...`
//! declared earlier in the same declare section. The actual field list
//! and init literal are only ever needed at emission time, from
//! `ctx.package_context()` — the builder only needs the yes/no answer.

use std::collections::HashSet;

use crate::ast::{self, AstNode};
use crate::builder::expr::build_expression;
use crate::builder::query::build_subquery;
use crate::error::{Result, TransformError};
use crate::ir::{Declaration, ExprNode, FetchTarget, RaiseKind, SelectStatement, Statement};

pub(crate) fn build_declare_section(section: &ast::DeclareSection) -> Result<Vec<Declaration>> {
    let type_names: HashSet<String> = section
        .type_decls()
        .iter()
        .filter_map(|t| t.name())
        .map(|n| n.to_ascii_lowercase())
        .collect();

    let mut decls = Vec::new();
    for variable in section.variable_decls() {
        decls.push(build_variable_decl(&variable, &type_names)?);
    }
    for cursor in section.cursor_decls() {
        decls.push(build_cursor_decl(&cursor)?);
    }
    Ok(decls)
}

fn build_variable_decl(decl: &ast::VariableDecl, type_names: &HashSet<String>) -> Result<Declaration> {
    let name = decl
        .name()
        .ok_or_else(|| TransformError::internal("VariableDecl built with no name"))?;

    if decl.record_fields().is_some() {
        return Ok(Declaration::Variable { name, data_type: "record".into(), default: None, is_inline_type: true });
    }
    if decl.collection_spec().is_some() {
        return Ok(Declaration::Variable { name, data_type: "collection".into(), default: None, is_inline_type: true });
    }

    let data_type = decl.type_text().unwrap_or_default();
    let is_inline_type =
        data_type.to_ascii_lowercase().ends_with("%rowtype") || type_names.contains(&data_type.to_ascii_lowercase());

    let default = if is_inline_type {
        None
    } else {
        decl.default_expr().map(|e| build_expression(&e)).transpose()?
    };

    Ok(Declaration::Variable { name, data_type, default, is_inline_type })
}

fn build_cursor_decl(decl: &ast::CursorDecl) -> Result<Declaration> {
    let name = decl
        .name()
        .ok_or_else(|| TransformError::internal("CursorDecl built with no name"))?;
    let subquery = decl
        .select_statement()
        .ok_or_else(|| TransformError::internal("CursorDecl built with no Subquery"))
        .and_then(|s| build_subquery(&s))?;
    let query = SelectStatement { with: Vec::new(), subquery, order_by: Vec::new(), for_update: false };
    Ok(Declaration::Cursor { name, query: Box::new(query) })
}

pub(crate) fn build_statement(stmt: &ast::Statement) -> Result<Statement> {
    match stmt {
        ast::Statement::Assignment(a) => {
            let target = a
                .target()
                .ok_or_else(|| TransformError::internal("Assignment built with no target IdentGroup"))?
                .name();
            let value = build_expression(
                &a.value()
                    .ok_or_else(|| TransformError::internal("Assignment built with no value Expression"))?,
            )?;
            Ok(Statement::Assignment { target, value })
        }
        ast::Statement::FieldAssignment(a) => {
            let mut segments = a
                .target()
                .ok_or_else(|| TransformError::internal("FieldAssignment built with no target IdentGroup"))?
                .segments();
            if segments.len() < 2 {
                return Err(TransformError::internal(format!(
                    "FieldAssignment target `{}` has fewer than two path segments",
                    segments.join(".")
                )));
            }
            let variable = segments.remove(0);
            let value = build_expression(
                &a.value()
                    .ok_or_else(|| TransformError::internal("FieldAssignment built with no value Expression"))?,
            )?;
            Ok(Statement::FieldAssignment { variable, path: segments, value })
        }
        ast::Statement::Call(c) => {
            let name = c
                .target()
                .ok_or_else(|| TransformError::internal("CallStatement built with no target IdentGroup"))?
                .segments();
            let args = build_argument_expressions(c.argument_list())?;
            Ok(Statement::Call { name, args })
        }
        ast::Statement::Raise(r) => build_raise(r),
        ast::Statement::Return(r) => {
            let value = r.value().map(|e| build_expression(&e)).transpose()?;
            Ok(Statement::Return(value))
        }
        ast::Statement::Null(_) => Ok(Statement::Null),
        ast::Statement::Fetch(f) => {
            if f.bulk_collect() {
                return Err(TransformError::unsupported(
                    "BULK COLLECT",
                    "FETCH ... BULK COLLECT INTO has no curated lowering in the baseline translator",
                ));
            }
            let cursor = f
                .cursor()
                .ok_or_else(|| TransformError::internal("FetchStatement built with no cursor IdentGroup"))?
                .name();
            let targets = f.into_targets().iter().map(|t| t.name()).collect();
            Ok(Statement::Fetch { cursor, target: FetchTarget::Into(targets) })
        }
        ast::Statement::Open(o) => {
            let cursor = o
                .cursor()
                .ok_or_else(|| TransformError::internal("OpenStatement built with no cursor IdentGroup"))?
                .name();
            Ok(Statement::Open { cursor })
        }
        ast::Statement::Close(c) => {
            let cursor = c
                .cursor()
                .ok_or_else(|| TransformError::internal("CloseStatement built with no cursor IdentGroup"))?
                .name();
            Ok(Statement::Close { cursor })
        }
    }
}

fn build_raise(stmt: &ast::RaiseStatement) -> Result<Statement> {
    if stmt.is_application_error() {
        let args = build_argument_expressions(stmt.application_error_args())?;
        return Ok(Statement::Raise { kind: RaiseKind::ApplicationError, name: None, args });
    }
    match stmt.exception_name() {
        Some(ident) => Ok(Statement::Raise { kind: RaiseKind::Named, name: Some(ident.name()), args: Vec::new() }),
        None => Ok(Statement::Raise { kind: RaiseKind::Reraise, name: None, args: Vec::new() }),
    }
}

fn build_argument_expressions(list: Option<ast::ArgumentList>) -> Result<Vec<ExprNode>> {
    list.map(|l| l.arguments())
        .unwrap_or_default()
        .iter()
        .map(|a| {
            a.expression()
                .ok_or_else(|| TransformError::internal("Argument built with no Expression"))
                .and_then(|e| build_expression(&e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    fn declare_section(input: &str) -> Vec<Declaration> {
        let body = format!("CREATE PROCEDURE p IS {input} BEGIN NULL; END p;");
        let parsed = parse(&body, ParseEntry::ProcedureBody).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        let section = parsed.syntax().descendants().find_map(ast::DeclareSection::cast).expect("expected a DeclareSection");
        build_declare_section(&section).unwrap()
    }

    fn statement(input: &str) -> Statement {
        let body = format!("CREATE PROCEDURE p IS BEGIN {input} END p;");
        let parsed = parse(&body, ParseEntry::ProcedureBody).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        let stmt = parsed.syntax().descendants().find_map(ast::Statement::cast).expect("expected a statement");
        build_statement(&stmt).unwrap()
    }

    #[test]
    fn builds_plain_variable_declaration() {
        let decls = declare_section("v_count NUMBER := 0;");
        match &decls[0] {
            Declaration::Variable { name, data_type, is_inline_type, default } => {
                assert_eq!(name, "v_count");
                assert_eq!(data_type, "NUMBER");
                assert!(!is_inline_type);
                assert!(default.is_some());
            }
            other => panic!("expected Variable, got {other:?}"),
        }
    }

    #[test]
    fn rowtype_suffix_is_detected_as_inline() {
        let decls = declare_section("v_emp emp%ROWTYPE;");
        match &decls[0] {
            Declaration::Variable { is_inline_type, .. } => assert!(is_inline_type),
            other => panic!("expected Variable, got {other:?}"),
        }
    }

    #[test]
    fn sibling_type_decl_reference_is_detected_as_inline() {
        let decls = declare_section(
            "TYPE salary_range_t IS RECORD (min_sal NUMBER, max_sal NUMBER); v_range salary_range_t;",
        );
        assert_eq!(decls.len(), 1, "TYPE decls themselves are not lowered as variables");
        match &decls[0] {
            Declaration::Variable { name, is_inline_type, .. } => {
                assert_eq!(name, "v_range");
                assert!(is_inline_type);
            }
            other => panic!("expected Variable, got {other:?}"),
        }
    }

    #[test]
    fn builds_cursor_declaration() {
        let decls = declare_section("CURSOR emp_cur IS SELECT empno FROM emp WHERE deptno = 10;");
        assert!(matches!(&decls[0], Declaration::Cursor { name, .. } if name == "emp_cur"));
    }

    #[test]
    fn builds_field_assignment() {
        let stmt = statement("v_range.min_sal := 50000;");
        match stmt {
            Statement::FieldAssignment { variable, path, .. } => {
                assert_eq!(variable, "v_range");
                assert_eq!(path, vec!["min_sal".to_string()]);
            }
            other => panic!("expected FieldAssignment, got {other:?}"),
        }
    }

    #[test]
    fn builds_nested_field_assignment() {
        let stmt = statement("v_emp.address.city := 'Boston';");
        match stmt {
            Statement::FieldAssignment { variable, path, .. } => {
                assert_eq!(variable, "v_emp");
                assert_eq!(path, vec!["address".to_string(), "city".to_string()]);
            }
            other => panic!("expected FieldAssignment, got {other:?}"),
        }
    }

    #[test]
    fn builds_application_error_raise() {
        let stmt = statement("RAISE_APPLICATION_ERROR(-20123, 'boom');");
        match stmt {
            Statement::Raise { kind, args, .. } => {
                assert_eq!(kind, RaiseKind::ApplicationError);
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected Raise, got {other:?}"),
        }
    }

    #[test]
    fn builds_bare_reraise() {
        let stmt = statement("RAISE;");
        assert!(matches!(stmt, Statement::Raise { kind: RaiseKind::Reraise, name: None, .. }));
    }

    #[test]
    fn rejects_bulk_collect_fetch() {
        let body = "CREATE PROCEDURE p IS BEGIN FETCH c BULK COLLECT INTO v_ids; END p;";
        let parsed = parse(body, ParseEntry::ProcedureBody).unwrap();
        let stmt = parsed.syntax().descendants().find_map(ast::Statement::cast).unwrap();
        assert!(matches!(build_statement(&stmt), Err(TransformError::Unsupported { .. })));
    }

    #[test]
    fn builds_call_statement_with_dotted_name() {
        let stmt = statement("dbms_output.put_line('hi');");
        match stmt {
            Statement::Call { name, args } => {
                assert_eq!(name, vec!["dbms_output".to_string(), "put_line".to_string()]);
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected Call, got {other:?}"),
        }
    }
}
