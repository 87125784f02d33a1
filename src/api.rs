// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The external interface (spec §6): the `transform_*` entry points a host
//! calls with a piece of Oracle source text and gets a [`TransformationResult`]
//! back, success or failure alike — never an exception at this boundary.
//!
//! Unlike the teacher's own [`analyze()`][crate::api], this layer calls
//! straight into `rowan`/plain Rust rather than routing through a
//! `wasm_bindgen` re-export: this crate has no wasm target (see
//! `DESIGN.md`), so there is exactly one entry point per production instead
//! of the teacher's `analyze()` plus `js_analyze()` pair.

use crate::builder;
use crate::context::TransformationContext;
use crate::error::{Result, TransformError};
use crate::indices::Indices;
use crate::parser::{self, ParseEntry, Parsed};
use crate::result::TransformationResult;
use crate::syntax::SyntaxNode;

/// Translates a bare `SELECT` statement (spec §6).
pub fn transform_sql(source_text: &str, current_schema: &str, indices: &Indices, show_ast: bool) -> TransformationResult {
    transform_code(ParseEntry::SelectStatement, source_text, current_schema, indices, show_ast)
}

/// Translates a `CREATE [OR REPLACE] FUNCTION ...` body (spec §6).
pub fn transform_function(
    source_text: &str,
    current_schema: &str,
    indices: &Indices,
    show_ast: bool,
) -> TransformationResult {
    transform_code(ParseEntry::FunctionBody, source_text, current_schema, indices, show_ast)
}

/// Translates a `CREATE [OR REPLACE] PROCEDURE ...` body (spec §6).
pub fn transform_procedure(
    source_text: &str,
    current_schema: &str,
    indices: &Indices,
    show_ast: bool,
) -> TransformationResult {
    transform_code(ParseEntry::ProcedureBody, source_text, current_schema, indices, show_ast)
}

/// The general entry point all of the above delegate to (spec §6):
/// parses `source_text` at `parse_entry`, builds the semantic IR, and
/// renders it to PostgreSQL text against `current_schema`/`indices`.
///
/// A `parse_entry` of [`ParseEntry::PackageSpec`] has no emission — a
/// package spec is accepted for analysis only (spec §4.1) — and always
/// fails with an input error; hosts that need its declarations use
/// [`crate::inline_types::extract_package_context`] directly instead.
pub fn transform_code(
    parse_entry: ParseEntry,
    source_text: &str,
    current_schema: &str,
    indices: &Indices,
    show_ast: bool,
) -> TransformationResult {
    if source_text.trim().is_empty() {
        return TransformationResult::failure(source_text, TransformError::Input("source text is empty".into()).to_string());
    }
    if parse_entry == ParseEntry::PackageSpec {
        return TransformationResult::failure(
            source_text,
            TransformError::Input("package_spec has no emission; use extract_package_context".into()).to_string(),
        );
    }

    match run(parse_entry, source_text, current_schema, indices) {
        Ok((target_text, parsed)) => {
            let result = TransformationResult::success(source_text, target_text, parsed.diagnostics().to_vec());
            if show_ast {
                result.with_ast_dump(dump_syntax_tree(&parsed.syntax()))
            } else {
                result
            }
        }
        Err((err, parsed)) => {
            let result = TransformationResult::failure(source_text, err.to_string());
            match (show_ast, parsed) {
                (true, Some(parsed)) => result.with_ast_dump(dump_syntax_tree(&parsed.syntax())),
                _ => result,
            }
        }
    }
}

/// Runs the parse → build → emit pipeline, keeping the [`Parsed`] tree
/// around on both paths so the caller can still attach an `ast_dump` to a
/// build/emission failure (only a hard parse failure has no tree at all).
fn run(
    parse_entry: ParseEntry,
    source_text: &str,
    current_schema: &str,
    indices: &Indices,
) -> std::result::Result<(String, Parsed), (TransformError, Option<Parsed>)> {
    let parsed = parser::parse(source_text, parse_entry).map_err(|e| (TransformError::from(e), None))?;

    emit(parse_entry, &parsed, current_schema, indices)
        .map(|text| (text, parsed))
        .map_err(|err| {
            let tree = parser::parse(source_text, parse_entry).ok();
            (err, tree)
        })
}

fn emit(parse_entry: ParseEntry, parsed: &Parsed, current_schema: &str, indices: &Indices) -> Result<String> {
    use crate::ast::{AstNode, Root};

    let mut ctx = TransformationContext::new(current_schema, indices);
    let root = Root::cast(parsed.syntax()).ok_or_else(|| TransformError::internal("failed to find root node"))?;

    match parse_entry {
        ParseEntry::SelectStatement => {
            let node = root
                .select_statement()
                .ok_or_else(|| TransformError::internal("parsed select_statement produced no SelectStatement node"))?;
            builder::build_select_statement(&node)?.to_postgres(&mut ctx)
        }
        ParseEntry::FunctionBody => {
            let node = root
                .function_body()
                .ok_or_else(|| TransformError::internal("parsed function_body produced no FunctionBody node"))?;
            builder::build_function_body(&node)?.to_postgres(&mut ctx)
        }
        ParseEntry::ProcedureBody => {
            let node = root
                .procedure_body()
                .ok_or_else(|| TransformError::internal("parsed procedure_body produced no ProcedureBody node"))?;
            builder::build_procedure_body(&node)?.to_postgres(&mut ctx)
        }
        ParseEntry::PackageBody => {
            let node = root
                .package_body()
                .ok_or_else(|| TransformError::internal("parsed package_body produced no PackageBody node"))?;
            // A package body's own `TYPE`/`%ROWTYPE` declarations are
            // elaborated the same way a spec's would be (spec §8 scenarios
            // 9/10) — no separate `extract_package_context` call is needed
            // since the declare section is already in hand from parsing.
            if let Some(section) = node.declare_section() {
                ctx = ctx.with_package_context(crate::inline_types::build_package_context(&section, indices));
            }
            builder::build_package_body(&node)?.to_postgres(&mut ctx)
        }
        ParseEntry::PackageSpec => {
            unreachable!("rejected by transform_code before run() is called")
        }
    }
}

/// Renders a lossless syntax tree as an indented rule/token listing (spec
/// §4.6: "a tree-printer of rule names and terminal tokens with
/// truncation"). Token text longer than [`TOKEN_TRUNCATE_AT`] is elided
/// with a trailing `...`; trivia tokens (whitespace, comments) are skipped
/// since they add noise without aiding diagnosis.
const TOKEN_TRUNCATE_AT: usize = 40;

fn dump_syntax_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    dump_node(node, 0, &mut out);
    out
}

fn dump_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    use rowan::NodeOrToken;

    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("{:?}\n", node.kind()));

    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => dump_node(&n, depth + 1, out),
            NodeOrToken::Token(t) => {
                if matches!(t.kind(), crate::syntax::SyntaxKind::Whitespace | crate::syntax::SyntaxKind::Comment) {
                    continue;
                }
                let text = t.text();
                let shown = if text.len() > TOKEN_TRUNCATE_AT {
                    format!("{}...", &text[..TOKEN_TRUNCATE_AT])
                } else {
                    text.to_string()
                };
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str(&format!("{:?} {shown:?}\n", t.kind()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn indices() -> Indices {
        let catalog = Catalog::new();
        crate::indices::build_indices(&catalog, &[])
    }

    #[test]
    fn transform_sql_qualifies_table_and_drops_dual() {
        let indices = indices();
        let result = transform_sql("SELECT 1 FROM dual", "hr", &indices, false);
        assert!(result.success);
        assert_eq!(result.target_text.as_deref(), Some("SELECT 1"));
        assert_eq!(result.source_text, "SELECT 1 FROM dual");
    }

    #[test]
    fn transform_sql_rejects_empty_source() {
        let indices = indices();
        let result = transform_sql("   ", "hr", &indices, false);
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("input error"));
    }

    #[test]
    fn transform_sql_surfaces_parse_errors_as_failure() {
        let indices = indices();
        let result = transform_sql("SELECT FROM", "hr", &indices, false);
        assert!(!result.success);
        assert!(result.target_text.is_none());
    }

    #[test]
    fn transform_function_renders_create_or_replace() {
        let indices = indices();
        let result = transform_function(
            "CREATE OR REPLACE FUNCTION add_one(p_n NUMBER) RETURN NUMBER IS BEGIN RETURN p_n + 1; END add_one;",
            "hr",
            &indices,
            false,
        );
        assert!(result.success, "{:?}", result.error_message);
        assert!(result.target_text.unwrap().starts_with("CREATE OR REPLACE FUNCTION add_one"));
    }

    #[test]
    fn transform_procedure_rejects_unsupported_construct_as_failure_not_panic() {
        let indices = indices();
        let result = transform_procedure(
            "CREATE OR REPLACE PROCEDURE p IS BEGIN NULL; EXCEPTION WHEN OTHERS THEN NULL; END p;",
            "hr",
            &indices,
            false,
        );
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("unsupported construct"));
    }

    #[test]
    fn show_ast_attaches_a_dump_on_success() {
        let indices = indices();
        let result = transform_sql("SELECT 1 FROM dual", "hr", &indices, true);
        let dump = result.ast_dump.unwrap();
        assert!(dump.contains("Root"));
        assert!(dump.contains("SelectStatement"));
    }

    #[test]
    fn package_body_elaborates_its_own_inline_type_declarations() {
        let indices = indices();
        let result = transform_code(
            ParseEntry::PackageBody,
            "CREATE OR REPLACE PACKAGE BODY pkg IS \
             TYPE salary_range_t IS RECORD (min_sal NUMBER, max_sal NUMBER); \
             v_range salary_range_t; \
             v_range.min_sal := 50000; \
             END pkg;",
            "hr",
            &indices,
            false,
        );
        assert!(result.success, "{:?}", result.error_message);
        let target = result.target_text.unwrap();
        assert!(target.contains("v_range jsonb := '{}'::jsonb;"), "{target}");
        assert!(
            target.contains("v_range := jsonb_set(v_range, '{min_sal}', to_jsonb(50000));"),
            "{target}"
        );
    }

    #[test]
    fn package_body_lowers_nested_field_assignment_with_create_missing() {
        let indices = indices();
        let result = transform_code(
            ParseEntry::PackageBody,
            "CREATE OR REPLACE PACKAGE BODY pkg IS \
             TYPE address_t IS RECORD (city VARCHAR2); \
             TYPE emp_t IS RECORD (address address_t); \
             v_emp emp_t; \
             v_emp.address.city := 'Boston'; \
             END pkg;",
            "hr",
            &indices,
            false,
        );
        assert!(result.success, "{:?}", result.error_message);
        let target = result.target_text.unwrap();
        assert!(
            target.contains("v_emp := jsonb_set(v_emp, '{address,city}', to_jsonb('Boston'), true);"),
            "{target}"
        );
    }

    #[test]
    fn package_spec_has_no_emission() {
        let indices = indices();
        let result = transform_code(
            ParseEntry::PackageSpec,
            "CREATE OR REPLACE PACKAGE pkg IS END pkg;",
            "hr",
            &indices,
            false,
        );
        assert!(!result.success);
        assert!(result.error_message.unwrap().contains("extract_package_context"));
    }
}
