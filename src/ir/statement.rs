// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Statement- and declaration-level IR (spec §4.4.1/§4.4.5): variable and
//! cursor declarations, and the PL/pgSQL statement family a function or
//! procedure body is built from. Inline-type declaration/assignment
//! lowering (spec §4.5) and cursor-attribute-aware `FETCH` (spec §4.4.5)
//! both live here, at emission time.

use crate::context::TransformationContext;
use crate::error::{Result, TransformError};
use crate::ir::ExprNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// `name data_type [:= default]`. `inline_type` is `Some` when
    /// `data_type` names a package-level `RECORD`/`%ROWTYPE`/`TABLE OF`/
    /// `VARRAY`/`INDEX BY` type (spec §4.5): the declaration then lowers
    /// to a bare `jsonb` column initialized to the category's empty
    /// literal, discarding any Oracle-side default (the curated baseline
    /// never elaborates a non-empty inline-type default, spec §9).
    Variable { name: String, data_type: String, default: Option<ExprNode>, is_inline_type: bool },
    /// `CURSOR name IS <select>`.
    Cursor { name: String, query: Box<crate::ir::SelectStatement> },
}

impl Declaration {
    pub fn to_postgres(&self, ctx: &mut TransformationContext) -> Result<String> {
        match self {
            Declaration::Variable { name, data_type, default, is_inline_type } => {
                if *is_inline_type {
                    let literal = ctx
                        .package_context()
                        .and_then(|p| p.inline_type_for_variable(name))
                        .map(|def| def.init_literal())
                        .unwrap_or("'{}'::jsonb");
                    return Ok(format!("{name} jsonb := {literal}"));
                }
                match default {
                    Some(expr) => Ok(format!("{name} {data_type} := {}", expr.to_postgres(ctx)?)),
                    None => Ok(format!("{name} {data_type}")),
                }
            }
            Declaration::Cursor { name, query } => {
                Ok(format!("{name} CURSOR FOR {}", query.to_postgres(ctx)?))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseKind {
    /// `RAISE;` — re-raise the current exception.
    Reraise,
    /// `RAISE exception_name;` — a user-declared `EXCEPTION`, rendered
    /// with the exception's own name (`RAISE <name>`).
    Named,
    /// `RAISE_APPLICATION_ERROR(code, message)` → `RAISE EXCEPTION
    /// '%' USING ERRCODE = '...'` (spec §4.4.4).
    ApplicationError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    /// `FETCH cur INTO var1, var2, ...`.
    Into(Vec<String>),
    /// `FETCH cur BULK COLLECT INTO ...` parses losslessly but is an
    /// explicit Unsupported construct (spec §4.4.2) — the builder never
    /// constructs this variant; it exists only so the IR's shape mirrors
    /// the grammar's and a future lowering has somewhere to land.
    BulkCollect(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assignment { target: String, value: ExprNode },
    /// `v_range.min_sal := expr` — a top-level field of an inline-type
    /// variable, lowered to `jsonb_set` (spec §4.5). `path` holds the
    /// dotted segments after the variable itself; nested field
    /// assignment (`path.len() > 1`) builds a multi-element `jsonb_set`
    /// path array in the same call.
    FieldAssignment { variable: String, path: Vec<String>, value: ExprNode },
    Call { name: Vec<String>, args: Vec<ExprNode> },
    Raise { kind: RaiseKind, name: Option<String>, args: Vec<ExprNode> },
    Return(Option<ExprNode>),
    Null,
    Fetch { cursor: String, target: FetchTarget },
    Open { cursor: String },
    Close { cursor: String },
}

impl Statement {
    /// Registers every cursor-attribute read this statement's expressions
    /// contain, ahead of emission (spec §4.4.5's block-wide pre-scan).
    pub fn scan_cursor_attributes(&self, ctx: &mut TransformationContext) {
        match self {
            Statement::Assignment { value, .. } => value.scan_cursor_attributes(ctx),
            Statement::FieldAssignment { value, .. } => value.scan_cursor_attributes(ctx),
            Statement::Call { args, .. } => args.iter().for_each(|a| a.scan_cursor_attributes(ctx)),
            Statement::Raise { args, .. } => args.iter().for_each(|a| a.scan_cursor_attributes(ctx)),
            Statement::Return(Some(expr)) => expr.scan_cursor_attributes(ctx),
            Statement::Return(None)
            | Statement::Null
            | Statement::Fetch { .. }
            | Statement::Open { .. }
            | Statement::Close { .. } => {}
        }
    }

    pub fn to_postgres(&self, ctx: &mut TransformationContext) -> Result<String> {
        match self {
            Statement::Assignment { target, value } => {
                Ok(format!("{target} := {};", value.to_postgres(ctx)?))
            }
            Statement::FieldAssignment { variable, path, value } => {
                emit_field_assignment(variable, path, value, ctx)
            }
            Statement::Call { name, args } => {
                let rendered = args.iter().map(|a| a.to_postgres(ctx)).collect::<Result<Vec<_>>>()?;
                Ok(format!("PERFORM {}({});", name.join("."), rendered.join(", ")))
            }
            Statement::Raise { kind, name, args } => emit_raise(*kind, name.as_deref(), args, ctx),
            Statement::Return(Some(expr)) => Ok(format!("RETURN {};", expr.to_postgres(ctx)?)),
            Statement::Return(None) => Ok("RETURN;".to_string()),
            Statement::Null => Ok("NULL;".to_string()),
            Statement::Fetch { cursor, target } => emit_fetch(cursor, target, ctx),
            Statement::Open { cursor } => Ok(format!("OPEN {cursor};")),
            Statement::Close { cursor } => Ok(format!("CLOSE {cursor};")),
        }
    }
}

fn emit_field_assignment(
    variable: &str,
    path: &[String],
    value: &ExprNode,
    ctx: &TransformationContext,
) -> Result<String> {
    let Some(_def) = ctx.package_context().and_then(|p| p.inline_type_for_variable(variable)) else {
        return Err(TransformError::internal(format!(
            "field assignment built for {variable}, which has no inline-type definition in scope"
        )));
    };
    let path_literal = path.join(",");
    let rendered = value.to_postgres(ctx)?;
    // `create_missing` is `true` iff the path has more than one element
    // (spec §4.5, §8's "jsonb_set path depth" property).
    let create_missing = if path.len() > 1 { ", true" } else { "" };
    Ok(format!(
        "{variable} := jsonb_set({variable}, '{{{path_literal}}}', to_jsonb({rendered}){create_missing});"
    ))
}

fn emit_raise(kind: RaiseKind, name: Option<&str>, args: &[ExprNode], ctx: &TransformationContext) -> Result<String> {
    match kind {
        RaiseKind::Reraise => Ok("RAISE;".to_string()),
        RaiseKind::Named => {
            let name = name.ok_or_else(|| TransformError::internal("named RAISE built without a name"))?;
            Ok(format!("RAISE {name};"))
        }
        RaiseKind::ApplicationError => {
            if args.len() != 2 {
                return Err(TransformError::internal(format!(
                    "RAISE_APPLICATION_ERROR built with {} arguments, expected 2",
                    args.len()
                )));
            }
            let code_text = args[0].to_postgres(ctx)?;
            let message = args[1].to_postgres(ctx)?;
            let code: i32 = code_text.trim().parse().map_err(|_| {
                TransformError::unsupported(
                    "RAISE_APPLICATION_ERROR with a non-literal code",
                    format!("`{code_text}` is not a plain integer literal; only literal Oracle user error codes are mapped"),
                )
            })?;
            if !(-20999..=-20000).contains(&code) {
                return Err(TransformError::unsupported(
                    "RAISE_APPLICATION_ERROR code out of range",
                    format!("{code} is outside Oracle's user error range [-20999, -20000]"),
                ));
            }
            // xxx = n + 20000 (spec §4.4.4): -20123 -> 123 -> 'P0123'.
            let suffix = (code + 20000).unsigned_abs();
            Ok(format!(
                "RAISE EXCEPTION {message} USING ERRCODE = 'P0{suffix:03}', HINT = 'original Oracle error code {code}';"
            ))
        }
    }
}

fn emit_fetch(cursor: &str, target: &FetchTarget, ctx: &TransformationContext) -> Result<String> {
    let FetchTarget::Into(vars) = target else {
        return Err(TransformError::internal("BULK COLLECT fetch reached emission; builder should have rejected it"));
    };
    let base = format!("FETCH {cursor} INTO {};", vars.join(", "));
    if !ctx.cursor_attribute_observed(cursor) {
        return Ok(base);
    }
    Ok(format!(
        "{base}\n{cursor}__found := FOUND;\nIF {cursor}__found THEN {cursor}__rowcount := {cursor}__rowcount + 1; END IF;"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, InlineTypeCategory, InlineTypeDefinition, PackageContext, PackageVariable};
    use crate::indices::build_indices;

    fn ctx() -> TransformationContext<'static> {
        let catalog = Catalog::new();
        let indices = Box::leak(Box::new(build_indices(&catalog, &[])));
        TransformationContext::new("hr", indices)
    }

    #[test]
    fn application_error_renders_with_errcode() {
        let mut ctx = ctx();
        let stmt = Statement::Raise {
            kind: RaiseKind::ApplicationError,
            name: None,
            args: vec![ExprNode::Literal("-20123".into()), ExprNode::Literal("'boom'".into())],
        };
        let rendered = stmt.to_postgres(&mut ctx).unwrap();
        assert_eq!(
            rendered,
            "RAISE EXCEPTION 'boom' USING ERRCODE = 'P0123', HINT = 'original Oracle error code -20123';"
        );
    }

    #[test]
    fn application_error_rejects_out_of_range_code() {
        let mut ctx = ctx();
        let stmt = Statement::Raise {
            kind: RaiseKind::ApplicationError,
            name: None,
            args: vec![ExprNode::Literal("-19999".into()), ExprNode::Literal("'boom'".into())],
        };
        let err = stmt.to_postgres(&mut ctx).unwrap_err();
        assert!(matches!(err, TransformError::Unsupported { .. }));
    }

    #[test]
    fn fetch_without_observed_attribute_is_plain() {
        let mut ctx = ctx();
        let stmt = Statement::Fetch { cursor: "c".into(), target: FetchTarget::Into(vec!["v_empno".into()]) };
        assert_eq!(stmt.to_postgres(&mut ctx).unwrap(), "FETCH c INTO v_empno;");
    }

    #[test]
    fn fetch_with_observed_attribute_gains_companions() {
        let mut ctx = ctx();
        ctx.observe_cursor_attribute("c");
        let stmt = Statement::Fetch { cursor: "c".into(), target: FetchTarget::Into(vec!["v_empno".into()]) };
        let rendered = stmt.to_postgres(&mut ctx).unwrap();
        assert!(rendered.contains("c__found := FOUND;"), "{rendered}");
        assert!(
            rendered.contains("IF c__found THEN c__rowcount := c__rowcount + 1; END IF;"),
            "{rendered}"
        );
    }

    #[test]
    fn field_assignment_renders_jsonb_set() {
        let catalog = Catalog::new();
        let indices = Box::leak(Box::new(build_indices(&catalog, &[])));
        let mut pkg = PackageContext::default();
        pkg.variables.insert(
            "v_range".into(),
            PackageVariable { data_type: "range_t".into(), default_text: None, is_constant: false },
        );
        pkg.inline_types.insert(
            "range_t".into(),
            InlineTypeDefinition {
                name: "range_t".into(),
                category: InlineTypeCategory::Record,
                fields: vec![],
                element_type: None,
                size_limit: None,
                index_key_type: None,
            },
        );
        let mut ctx = TransformationContext::new("hr", indices).with_package_context(pkg);
        let stmt = Statement::FieldAssignment {
            variable: "v_range".into(),
            path: vec!["min_sal".into()],
            value: ExprNode::Literal("1000".into()),
        };
        let rendered = stmt.to_postgres(&mut ctx).unwrap();
        assert_eq!(rendered, "v_range := jsonb_set(v_range, '{min_sal}', to_jsonb(1000));");
    }

    #[test]
    fn nested_field_assignment_sets_create_missing() {
        let catalog = Catalog::new();
        let indices = Box::leak(Box::new(build_indices(&catalog, &[])));
        let mut pkg = PackageContext::default();
        pkg.variables.insert(
            "v_emp".into(),
            PackageVariable { data_type: "emp_t".into(), default_text: None, is_constant: false },
        );
        pkg.inline_types.insert(
            "emp_t".into(),
            InlineTypeDefinition {
                name: "emp_t".into(),
                category: InlineTypeCategory::Record,
                fields: vec![],
                element_type: None,
                size_limit: None,
                index_key_type: None,
            },
        );
        let mut ctx = TransformationContext::new("hr", indices).with_package_context(pkg);
        let stmt = Statement::FieldAssignment {
            variable: "v_emp".into(),
            path: vec!["address".into(), "city".into()],
            value: ExprNode::Literal("'Boston'".into()),
        };
        let rendered = stmt.to_postgres(&mut ctx).unwrap();
        assert_eq!(
            rendered,
            "v_emp := jsonb_set(v_emp, '{address,city}', to_jsonb('Boston'), true);"
        );
    }
}
