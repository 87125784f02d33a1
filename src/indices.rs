// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The four read-only, precomputed lookup structures a translation run
//! consults (spec §4.3). `build_indices` is the one place they're
//! assembled, from a `Catalog` snapshot; everything downstream only ever
//! reads them.

use std::collections::{HashMap, HashSet};

use crate::catalog::{Catalog, Column, Side};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndexEntry {
    pub name: String,
    pub source_type: String,
    pub target_type: String,
    pub type_owner: Option<String>,
    pub precision: Option<u32>,
    pub scale: Option<i32>,
    pub char_length: Option<u32>,
    pub nullable: bool,
}

impl From<&Column> for ColumnIndexEntry {
    fn from(c: &Column) -> Self {
        Self {
            name: c.name.clone(),
            source_type: c.source_type.clone(),
            target_type: c.target_type.clone(),
            type_owner: c.type_owner.clone(),
            precision: c.precision,
            scale: c.scale,
            char_length: c.char_length,
            nullable: c.nullable,
        }
    }
}

/// The four maps spec §4.3 names, computed once per `build_indices` call
/// and shared read-only (via `&Indices`) for the lifetime of a
/// translation.
#[derive(Debug, Clone, Default)]
pub struct Indices {
    /// `qualified_table` (`schema.table`, lower-case) → its columns, in
    /// declared ordinal order.
    columns: HashMap<String, Vec<ColumnIndexEntry>>,
    /// `qualified_type` (`schema.type`, lower-case) → its method/
    /// subprogram names, lower-case. Doubles as the package-function
    /// index (see DESIGN.md): a package's subprograms are stored the same
    /// `schema.package.function` triple shape Oracle's own
    /// `ALL_PROCEDURES` uses, since the curated data model has no
    /// separate entity for them.
    type_methods: HashMap<String, HashSet<String>>,
    /// `(owner, name)`, both lower-case → fully qualified target. `owner`
    /// is either a real schema or the sentinel `"public"` for `PUBLIC`
    /// synonyms.
    synonyms: HashMap<(String, String), String>,
}

impl Indices {
    pub fn columns_for(&self, qualified_table: &str) -> &[ColumnIndexEntry] {
        self.columns
            .get(&qualified_table.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_method(&self, qualified_type: &str, method: &str) -> bool {
        self.type_methods
            .get(&qualified_type.to_ascii_lowercase())
            .is_some_and(|methods| methods.contains(&method.to_ascii_lowercase()))
    }

    /// `true` if `schema.package.function` names a cataloged package
    /// subprogram.
    pub fn has_package_function(&self, schema: &str, package: &str, function: &str) -> bool {
        self.has_method(&format!("{schema}.{package}"), function)
    }

    /// Resolves an unqualified name to its synonym target, following spec
    /// §4.3's algorithm exactly:
    ///
    /// 1. If `name` already contains a `.`, it's qualified; no synonym
    ///    lookup applies — returns `None`.
    /// 2. Otherwise look up `(current_schema, name)`.
    /// 3. Otherwise look up `(PUBLIC, name)`.
    /// 4. Otherwise return `None` (not a synonym at all).
    ///
    /// This is one hop only: a synonym whose target is itself a synonym
    /// is not chased further (spec §4.3).
    pub fn resolve_synonym(&self, current_schema: &str, name: &str) -> Option<String> {
        if name.contains('.') {
            return None;
        }
        let name = name.to_ascii_lowercase();
        let schema_key = (current_schema.to_ascii_lowercase(), name.clone());
        self.synonyms
            .get(&schema_key)
            .or_else(|| self.synonyms.get(&(crate::catalog::PUBLIC_SYNONYM_OWNER.to_string(), name)))
            .cloned()
    }
}

/// Builds the four indices from a catalog snapshot, for the given schemas
/// (spec §4.3). `schemas` scopes which source-side tables/types
/// contribute to the column and method indices — typically the catalog's
/// own `get_schema_names(Side::Source)`, or a single schema when
/// `do.only-test-schema` is configured (spec §6).
pub fn build_indices(catalog: &Catalog, schemas: &[String]) -> Indices {
    let wanted: HashSet<String> = schemas.iter().map(|s| s.to_ascii_lowercase()).collect();
    let in_scope = |schema: &str| wanted.is_empty() || wanted.contains(&schema.to_ascii_lowercase());

    let mut columns = HashMap::new();
    for side in [Side::Source, Side::Target] {
        for table in catalog.get_tables(side) {
            if !in_scope(&table.schema) {
                continue;
            }
            // Columns are already in ordinal order as stored by the catalog.
            let entries: Vec<ColumnIndexEntry> = table.columns.iter().map(ColumnIndexEntry::from).collect();
            columns.entry(table.qualified_name().to_ascii_lowercase()).or_insert(entries);
        }
    }

    let mut type_methods: HashMap<String, HashSet<String>> = HashMap::new();
    for side in [Side::Source, Side::Target] {
        for object_type in catalog.get_object_types(side) {
            if !in_scope(&object_type.schema) {
                continue;
            }
            let methods = object_type.methods.iter().map(|m| m.to_ascii_lowercase()).collect();
            type_methods
                .entry(object_type.qualified_name().to_ascii_lowercase())
                .or_insert(methods);
        }
    }

    let mut synonyms = HashMap::new();
    for side in [Side::Source, Side::Target] {
        for synonym in catalog.get_synonyms(side) {
            if !synonym.is_public() && !in_scope(&synonym.owner) {
                continue;
            }
            let key = (synonym.owner.to_ascii_lowercase(), synonym.name.to_ascii_lowercase());
            synonyms.entry(key).or_insert_with(|| synonym.target().to_ascii_lowercase());
        }
    }

    log::info!(
        "built indices: {} tables, {} types, {} synonyms across {} schema(s)",
        columns.len(),
        type_methods.len(),
        synonyms.len(),
        if schemas.is_empty() { "all".to_string() } else { schemas.len().to_string() }
    );

    Indices {
        columns,
        type_methods,
        synonyms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, Synonym, Table};

    fn column(name: &str) -> Column {
        Column {
            ordinal: 0,
            name: name.to_string(),
            source_type: "NUMBER".to_string(),
            target_type: "numeric".to_string(),
            type_owner: None,
            precision: None,
            scale: None,
            char_length: None,
            nullable: true,
        }
    }

    #[test]
    fn resolves_schema_synonym_before_public() {
        let catalog = Catalog::new();
        catalog.set_synonyms(
            Side::Source,
            vec![
                Synonym {
                    owner: "hr".to_string(),
                    name: "emp".to_string(),
                    target_owner: "hr".to_string(),
                    target_name: "employees".to_string(),
                    dblink: None,
                },
                Synonym {
                    owner: "public".to_string(),
                    name: "emp".to_string(),
                    target_owner: "sales".to_string(),
                    target_name: "employees".to_string(),
                    dblink: None,
                },
            ],
        );
        let indices = build_indices(&catalog, &[]);
        assert_eq!(indices.resolve_synonym("hr", "emp"), Some("hr.employees".to_string()));
        assert_eq!(indices.resolve_synonym("sales", "emp"), Some("sales.employees".to_string()));
    }

    #[test]
    fn qualified_names_never_consult_synonyms() {
        let catalog = Catalog::new();
        let indices = build_indices(&catalog, &[]);
        assert_eq!(indices.resolve_synonym("hr", "other.emp"), None);
    }

    #[test]
    fn column_index_is_scoped_by_schema() {
        let catalog = Catalog::new();
        catalog.set_tables(
            Side::Source,
            vec![Table {
                schema: "hr".to_string(),
                name: "employees".to_string(),
                columns: vec![column("empno"), column("ename")],
            }],
        );
        let indices = build_indices(&catalog, &["hr".to_string()]);
        assert_eq!(indices.columns_for("hr.employees").len(), 2);
        assert!(indices.columns_for("sales.employees").is_empty());

        let scoped_out = build_indices(&catalog, &["sales".to_string()]);
        assert!(scoped_out.columns_for("hr.employees").is_empty());
    }
}
