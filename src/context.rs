// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Per-translation state (spec §4.4.3/§4.5): the current schema, a
//! borrowed view of the precomputed indices, the query-local alias/CTE
//! names the builder accumulates as it descends a `FROM` clause, and
//! (for package bodies) the inline-type context a field access or
//! `FETCH` needs.

use std::collections::HashSet;

use crate::catalog::PackageContext;
use crate::indices::Indices;

/// Everything the builder threads through one `transform_*` call. Borrows
/// `Indices` for the call's duration rather than cloning it (spec §4.4.3:
/// "borrows the indices for the duration of one translation") — indices
/// are rebuilt per schema-scan, not per statement, so cloning them per
/// call would be wasteful for no benefit.
pub struct TransformationContext<'a> {
    current_schema: String,
    indices: &'a Indices,
    /// Names that resolve locally rather than through schema
    /// qualification: CTE names from a `WITH` clause and table aliases
    /// introduced in the current `FROM` clause (spec §4.4.3 step 1, §8's
    /// CTE-exemption property). Exclusively owned by the context, not
    /// shared with the indices.
    local_names: HashSet<String>,
    package_context: Option<PackageContext>,
    /// Cursors whose `%FOUND`/`%NOTFOUND`/`%ROWCOUNT`/`%ISOPEN` attribute
    /// was referenced somewhere in the enclosing block, used to decide
    /// whether a `FETCH` needs the attribute-tracking lowering (spec
    /// §4.4.5).
    observed_cursor_attributes: HashSet<String>,
}

impl<'a> TransformationContext<'a> {
    pub fn new(current_schema: impl Into<String>, indices: &'a Indices) -> Self {
        Self {
            current_schema: current_schema.into().to_ascii_lowercase(),
            indices,
            local_names: HashSet::new(),
            package_context: None,
            observed_cursor_attributes: HashSet::new(),
        }
    }

    pub fn with_package_context(mut self, context: PackageContext) -> Self {
        self.package_context = Some(context);
        self
    }

    pub fn current_schema(&self) -> &str {
        &self.current_schema
    }

    pub fn indices(&self) -> &Indices {
        self.indices
    }

    pub fn package_context(&self) -> Option<&PackageContext> {
        self.package_context.as_ref()
    }

    pub fn register_local_name(&mut self, name: &str) {
        self.local_names.insert(name.to_ascii_lowercase());
    }

    pub fn is_local_name(&self, name: &str) -> bool {
        self.local_names.contains(&name.to_ascii_lowercase())
    }

    pub fn observe_cursor_attribute(&mut self, cursor: &str) {
        self.observed_cursor_attributes.insert(cursor.to_ascii_lowercase());
    }

    pub fn cursor_attribute_observed(&self, cursor: &str) -> bool {
        self.observed_cursor_attributes.contains(&cursor.to_ascii_lowercase())
    }

    /// Qualifies a table/view reference per spec §4.4.3's four-step
    /// algorithm:
    ///
    /// 1. A local name (CTE or alias already registered this statement)
    ///    is emitted lower-cased and unqualified.
    /// 2. Otherwise, a synonym resolves to its already-qualified target.
    /// 3. Otherwise, an unqualified name is prefixed with the current
    ///    schema.
    /// 4. Otherwise (already dotted, and not a synonym), the reference is
    ///    emitted exactly as written — spec §8's idempotence property
    ///    requires qualification to be a no-op on already-qualified
    ///    input, so this step does not even lower-case it.
    pub fn qualify_table(&self, original_text: &str) -> String {
        let lower = original_text.to_ascii_lowercase();
        if self.is_local_name(&lower) {
            return lower;
        }
        if let Some(target) = self.indices.resolve_synonym(&self.current_schema, &lower) {
            return target;
        }
        if !lower.contains('.') {
            return format!("{}.{}", self.current_schema, lower);
        }
        original_text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Side, Synonym};
    use crate::indices::build_indices;

    #[test]
    fn qualifies_unqualified_name_with_current_schema() {
        let catalog = Catalog::new();
        let indices = build_indices(&catalog, &[]);
        let ctx = TransformationContext::new("hr", &indices);
        assert_eq!(ctx.qualify_table("EMPLOYEES"), "hr.employees");
    }

    #[test]
    fn already_qualified_name_is_untouched() {
        let catalog = Catalog::new();
        let indices = build_indices(&catalog, &[]);
        let ctx = TransformationContext::new("hr", &indices);
        assert_eq!(ctx.qualify_table("Sales.Orders"), "Sales.Orders");
    }

    #[test]
    fn local_cte_name_wins_over_schema_qualification() {
        let catalog = Catalog::new();
        let indices = build_indices(&catalog, &[]);
        let mut ctx = TransformationContext::new("hr", &indices);
        ctx.register_local_name("recent");
        assert_eq!(ctx.qualify_table("recent"), "recent");
    }

    #[test]
    fn synonym_resolves_before_schema_qualification() {
        let catalog = Catalog::new();
        catalog.set_synonyms(
            Side::Source,
            vec![Synonym {
                owner: "hr".to_string(),
                name: "emp".to_string(),
                target_owner: "hr".to_string(),
                target_name: "employees".to_string(),
                dblink: None,
            }],
        );
        let indices = build_indices(&catalog, &[]);
        let ctx = TransformationContext::new("hr", &indices);
        assert_eq!(ctx.qualify_table("emp"), "hr.employees");
    }
}
