// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The inline-type elaboration engine's extraction half (spec §4.5):
//! `extract_package_context` parses a package spec and walks its declare
//! section for `TYPE ... IS ...` declarations and `%ROWTYPE` variables,
//! producing the [`PackageContext`] a package body's `TransformationContext`
//! is built with. The other half — rewriting declarations and LHS field
//! assignments of a variable with an inline type — lives in
//! `crate::ir::statement`, at emission time.

use crate::ast::{self, AstNode};
use crate::catalog::{InlineTypeCategory, InlineTypeDefinition, InlineTypeField, PackageContext, PackageVariable};
use crate::error::{Result, TransformError};
use crate::indices::Indices;
use crate::parser::{parse, ParseEntry};

/// A small curated Oracle-to-PostgreSQL scalar type map, used only to
/// populate [`InlineTypeField::target_type`] for display/diagnostic
/// purposes — elaboration itself always collapses to `jsonb` regardless of
/// field type (spec §4.5). Unrecognized types pass through lower-cased.
fn map_scalar_type(oracle_type: &str) -> String {
    let upper = oracle_type.trim().to_ascii_uppercase();
    let base = upper.split('(').next().unwrap_or(&upper).trim();
    match base {
        "NUMBER" | "INTEGER" | "PLS_INTEGER" | "BINARY_INTEGER" | "NATURALN" | "NATURAL" | "POSITIVE" => {
            "numeric".to_string()
        }
        "VARCHAR2" | "NVARCHAR2" | "VARCHAR" | "LONG" => "varchar".to_string(),
        "CHAR" | "NCHAR" => "char".to_string(),
        "DATE" => "timestamp".to_string(),
        "TIMESTAMP" => "timestamp".to_string(),
        "CLOB" | "NCLOB" => "text".to_string(),
        "BOOLEAN" => "boolean".to_string(),
        "RAW" | "BLOB" => "bytea".to_string(),
        _ => oracle_type.trim().to_ascii_lowercase(),
    }
}

fn build_record_fields(fields: &[ast::RecordField]) -> Vec<InlineTypeField> {
    fields
        .iter()
        .map(|f| {
            let source_type = f.type_text();
            let target_type = map_scalar_type(&source_type);
            InlineTypeField { name: f.name().unwrap_or_default(), source_type, target_type }
        })
        .collect()
}

fn build_collection_definition(name: &str, spec: &ast::CollectionSpec) -> InlineTypeDefinition {
    let element_type = Some(map_scalar_type(&spec.element_type_text()));
    let index_key_type = spec.index_key_type();
    let category = if index_key_type.is_some() {
        InlineTypeCategory::IndexBy
    } else if spec.is_varray() {
        InlineTypeCategory::Varray
    } else {
        InlineTypeCategory::TableOf
    };
    InlineTypeDefinition {
        name: name.to_string(),
        category,
        fields: Vec::new(),
        element_type,
        size_limit: spec.varray_capacity(),
        index_key_type,
    }
}

/// Builds the `ROWTYPE` definition for a variable declared `v tbl%ROWTYPE`,
/// keyed by the variable's own name rather than a `TYPE` name (spec §4.5,
/// [`PackageContext::inline_type_for_variable`]'s fallback lookup), with
/// fields drawn from the referenced table via the column index.
fn build_rowtype_definition(variable_name: &str, type_text: &str, indices: &Indices) -> InlineTypeDefinition {
    let table = type_text.trim_end_matches("%ROWTYPE").trim_end_matches("%rowtype").trim();
    let fields = indices
        .columns_for(table)
        .iter()
        .map(|c| InlineTypeField {
            name: c.name.clone(),
            source_type: c.source_type.clone(),
            target_type: c.target_type.clone(),
        })
        .collect();
    InlineTypeDefinition {
        name: variable_name.to_string(),
        category: InlineTypeCategory::Rowtype,
        fields,
        element_type: None,
        size_limit: None,
        index_key_type: None,
    }
}

/// Walks one `declare_section`'s `TYPE ... IS ...` declarations and
/// package-level variables into a [`PackageContext`] (spec §4.5). Shared by
/// [`extract_package_context`] (a package spec, parsed from text) and
/// `crate::api`'s own package-body emission (a body's declare section is
/// already parsed by the time emission runs, so there is no text to
/// re-parse — a package body's own `TYPE`/`%ROWTYPE` declarations are
/// elaborated the same way a spec's are, spec §8 scenarios 9/10).
pub(crate) fn build_package_context(section: &ast::DeclareSection, indices: &Indices) -> PackageContext {
    let mut ctx = PackageContext::default();

    for type_decl in section.type_decls() {
        let Some(name) = type_decl.name() else { continue };
        let definition = if let Some(fields) = type_decl.record_fields() {
            InlineTypeDefinition {
                name: name.clone(),
                category: InlineTypeCategory::Record,
                fields: build_record_fields(&fields.fields()),
                element_type: None,
                size_limit: None,
                index_key_type: None,
            }
        } else if let Some(spec) = type_decl.collection_spec() {
            build_collection_definition(&name, &spec)
        } else {
            continue;
        };
        ctx.inline_types.insert(name, definition);
    }

    for variable in section.variable_decls() {
        let Some(name) = variable.name() else { continue };
        let data_type = variable.type_text().unwrap_or_default();

        if data_type.to_ascii_lowercase().ends_with("%rowtype") {
            ctx.inline_types
                .insert(name.clone(), build_rowtype_definition(&name, &data_type, indices));
        }

        ctx.variables.insert(
            name,
            PackageVariable {
                data_type,
                default_text: variable.default_expr().map(|e| e.syntax().text().to_string()),
                is_constant: variable.is_constant(),
            },
        );
    }

    ctx
}

/// Parses `spec_text` as a `package_spec` and extracts every `TYPE ... IS
/// ...` declaration and package-level variable (spec §4.5, §6).
pub fn extract_package_context(schema: &str, package: &str, spec_text: &str, indices: &Indices) -> Result<PackageContext> {
    if spec_text.trim().is_empty() {
        return Err(TransformError::Input(format!("empty package spec text for {schema}.{package}")));
    }

    let parsed = parse(spec_text, ParseEntry::PackageSpec)?;
    let package_spec = parsed
        .syntax()
        .children()
        .find_map(ast::PackageSpec::cast)
        .ok_or_else(|| TransformError::internal("parsed package_spec produced no PackageSpec node"))?;

    let Some(section) = package_spec.declare_section() else {
        return Ok(PackageContext::default());
    };

    Ok(build_package_context(&section, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Column, Side, Table};

    fn empty_indices() -> Indices {
        let catalog = Catalog::new();
        crate::indices::build_indices(&catalog, &[])
    }

    #[test]
    fn extracts_record_type_and_variable() {
        let spec = "CREATE OR REPLACE PACKAGE pkg IS \
             TYPE salary_range_t IS RECORD (min_sal NUMBER, max_sal NUMBER); \
             v_range salary_range_t; \
             END pkg;";
        let ctx = extract_package_context("hr", "pkg", spec, &empty_indices()).unwrap();

        let def = ctx.inline_types.get("salary_range_t").unwrap();
        assert!(matches!(def.category, InlineTypeCategory::Record));
        assert_eq!(def.fields.len(), 2);
        assert_eq!(def.fields[0].name, "min_sal");

        assert_eq!(ctx.variables.get("v_range").unwrap().data_type, "salary_range_t");
        assert_eq!(ctx.inline_type_for_variable("v_range").unwrap().name, "salary_range_t");
    }

    #[test]
    fn extracts_table_of_index_by_collection() {
        let spec = "CREATE OR REPLACE PACKAGE pkg IS \
             TYPE t_ids IS TABLE OF NUMBER INDEX BY BINARY_INTEGER; \
             END pkg;";
        let ctx = extract_package_context("hr", "pkg", spec, &empty_indices()).unwrap();
        let def = ctx.inline_types.get("t_ids").unwrap();
        assert!(matches!(def.category, InlineTypeCategory::IndexBy));
        assert_eq!(def.element_type.as_deref(), Some("numeric"));
        assert_eq!(def.index_key_type.as_deref(), Some("BINARY_INTEGER"));
        assert_eq!(def.size_limit, None);
    }

    #[test]
    fn extracts_varray_size_limit() {
        let spec = "CREATE OR REPLACE PACKAGE pkg IS \
             TYPE t_names IS VARRAY(10) OF VARCHAR2(30); \
             END pkg;";
        let ctx = extract_package_context("hr", "pkg", spec, &empty_indices()).unwrap();
        let def = ctx.inline_types.get("t_names").unwrap();
        assert!(matches!(def.category, InlineTypeCategory::Varray));
        assert_eq!(def.size_limit, Some(10));
        assert_eq!(def.index_key_type, None);
    }

    #[test]
    fn rowtype_variable_pulls_fields_from_column_index() {
        let catalog = Catalog::new();
        catalog.set_tables(
            Side::Source,
            vec![Table {
                schema: "hr".to_string(),
                name: "emp".to_string(),
                columns: vec![Column {
                    ordinal: 1,
                    name: "empno".to_string(),
                    source_type: "NUMBER".to_string(),
                    target_type: "numeric".to_string(),
                    type_owner: None,
                    precision: None,
                    scale: None,
                    char_length: None,
                    nullable: false,
                }],
            }],
        );
        let indices = crate::indices::build_indices(&catalog, &[]);

        let spec = "CREATE OR REPLACE PACKAGE pkg IS v_emp hr.emp%ROWTYPE; END pkg;";
        let ctx = extract_package_context("hr", "pkg", spec, &indices).unwrap();
        let def = ctx.inline_type_for_variable("v_emp").unwrap();
        assert!(matches!(def.category, InlineTypeCategory::Rowtype));
        assert_eq!(def.fields.len(), 1);
        assert_eq!(def.fields[0].name, "empno");
    }

    #[test]
    fn rejects_empty_spec_text() {
        let err = extract_package_context("hr", "pkg", "   ", &empty_indices()).unwrap_err();
        assert!(matches!(err, TransformError::Input(_)));
    }
}
