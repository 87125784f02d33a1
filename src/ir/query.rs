// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The query IR (spec §4.4.1's `Query` family): `SelectStatement` down
//! through `QueryBlock`, `FromClause` and `SelectedList`. Emission is
//! where table-reference qualification (spec §4.4.3) and the `MINUS` →
//! `EXCEPT` / `DUAL`-dropping rewrites (spec §4.4.4, SPEC_FULL.md §3)
//! happen — the builder only validates shape.

use crate::context::TransformationContext;
use crate::error::Result;
use crate::ir::ExprNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub with: Vec<WithFactoringClause>,
    pub subquery: Subquery,
    pub order_by: Vec<ExprNode>,
    pub for_update: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithFactoringClause {
    pub name: String,
    pub subquery: Subquery,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subquery {
    pub first: SubqueryBasicElements,
    pub operations: Vec<SubqueryOperationPart>,
}

/// Always a plain query block: a parenthesized nested subquery parses
/// (spec §4.1 is permissive) but is one of the curated baseline's
/// explicit Unsupported constructs (spec §4.4.2), so the builder never
/// constructs this node for that shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubqueryBasicElements {
    pub query_block: QueryBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubqueryOperator {
    Union,
    UnionAll,
    Intersect,
    /// Emitted as `EXCEPT` (spec §4.4.4).
    Minus,
}

impl SubqueryOperator {
    fn keyword(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::Minus => "EXCEPT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubqueryOperationPart {
    pub operator: SubqueryOperator,
    pub elements: SubqueryBasicElements,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBlock {
    pub selected_list: SelectedList,
    /// At most one entry — multiple tables in a `FROM` list is rejected
    /// by the builder (spec §4.4.2, scenario 6).
    pub from: Vec<FromItem>,
    pub where_clause: Option<ExprNode>,
    pub group_by: Vec<ExprNode>,
    pub having: Option<ExprNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedList {
    Asterisk,
    Elements(Vec<SelectListElement>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectListElement {
    pub expr: ExprNode,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FromItem {
    /// `None` for Oracle's `DUAL` pseudo-table, which PostgreSQL has no
    /// equivalent of and which is dropped from the emitted `FROM` clause
    /// entirely (SPEC_FULL.md §3).
    pub table: Option<String>,
    pub alias: Option<String>,
}

impl SelectStatement {
    pub fn to_postgres(&self, ctx: &mut TransformationContext) -> Result<String> {
        let mut cte_sql = Vec::with_capacity(self.with.len());
        for clause in &self.with {
            ctx.register_local_name(&clause.name);
            let body = clause.subquery.to_postgres(ctx)?;
            cte_sql.push(format!("{} AS ({body})", clause.name.to_ascii_lowercase()));
        }

        let mut out = String::new();
        if !cte_sql.is_empty() {
            out.push_str("WITH ");
            out.push_str(&cte_sql.join(", "));
            out.push(' ');
        }
        out.push_str(&self.subquery.to_postgres(ctx)?);

        if !self.order_by.is_empty() {
            let rendered = self.order_by.iter().map(|e| e.to_postgres(ctx)).collect::<Result<Vec<_>>>()?;
            out.push_str(" ORDER BY ");
            out.push_str(&rendered.join(", "));
        }
        if self.for_update {
            out.push_str(" FOR UPDATE");
        }
        Ok(out)
    }
}

impl Subquery {
    pub fn to_postgres(&self, ctx: &mut TransformationContext) -> Result<String> {
        let mut out = self.first.query_block.to_postgres(ctx)?;
        for part in &self.operations {
            out.push(' ');
            out.push_str(part.operator.keyword());
            out.push(' ');
            out.push_str(&part.elements.query_block.to_postgres(ctx)?);
        }
        Ok(out)
    }
}

impl QueryBlock {
    pub fn to_postgres(&self, ctx: &mut TransformationContext) -> Result<String> {
        let mut out = String::from("SELECT ");
        out.push_str(&self.selected_list.to_postgres(ctx)?);

        if let Some(item) = self.from.first() {
            if let Some(table) = &item.table {
                out.push_str(" FROM ");
                out.push_str(&ctx.qualify_table(table));
                if let Some(alias) = &item.alias {
                    out.push(' ');
                    out.push_str(alias);
                }
            }
            // `DUAL`: FROM clause dropped entirely (SPEC_FULL.md §3).
        }

        if let Some(expr) = &self.where_clause {
            out.push_str(" WHERE ");
            out.push_str(&expr.to_postgres(ctx)?);
        }

        if !self.group_by.is_empty() {
            let rendered = self.group_by.iter().map(|e| e.to_postgres(ctx)).collect::<Result<Vec<_>>>()?;
            out.push_str(" GROUP BY ");
            out.push_str(&rendered.join(", "));
        }
        if let Some(having) = &self.having {
            out.push_str(" HAVING ");
            out.push_str(&having.to_postgres(ctx)?);
        }

        Ok(out)
    }
}

impl SelectedList {
    fn to_postgres(&self, ctx: &TransformationContext) -> Result<String> {
        match self {
            SelectedList::Asterisk => Ok("*".to_string()),
            SelectedList::Elements(elements) => {
                let rendered = elements.iter().map(|e| e.to_postgres(ctx)).collect::<Result<Vec<_>>>()?;
                Ok(rendered.join(" , "))
            }
        }
    }
}

impl SelectListElement {
    fn to_postgres(&self, ctx: &TransformationContext) -> Result<String> {
        let expr = self.expr.to_postgres(ctx)?;
        match &self.alias {
            Some(alias) => Ok(format!("{expr} {alias}")),
            None => Ok(expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::indices::build_indices;

    fn ctx() -> TransformationContext<'static> {
        let catalog = Catalog::new();
        let indices = Box::leak(Box::new(build_indices(&catalog, &[])));
        TransformationContext::new("hr", indices)
    }

    fn block(table: &str, alias: Option<&str>) -> QueryBlock {
        QueryBlock {
            selected_list: SelectedList::Elements(vec![SelectListElement {
                expr: ExprNode::Identifier(vec!["empno".into()]),
                alias: None,
            }]),
            from: vec![FromItem { table: Some(table.to_string()), alias: alias.map(str::to_string) }],
            where_clause: None,
            group_by: vec![],
            having: None,
        }
    }

    #[test]
    fn qualifies_table_with_current_schema() {
        let mut ctx = ctx();
        let qb = block("EMPLOYEES", None);
        assert_eq!(qb.to_postgres(&mut ctx).unwrap(), "SELECT empno FROM hr.employees");
    }

    #[test]
    fn minus_renders_as_except() {
        let mut ctx = ctx();
        let subquery = Subquery {
            first: SubqueryBasicElements { query_block: block("t1", None) },
            operations: vec![SubqueryOperationPart {
                operator: SubqueryOperator::Minus,
                elements: SubqueryBasicElements { query_block: block("t2", None) },
            }],
        };
        let rendered = subquery.to_postgres(&mut ctx).unwrap();
        assert!(rendered.contains(" EXCEPT "), "{rendered}");
    }

    #[test]
    fn dual_is_dropped_from_from_clause() {
        let mut ctx = ctx();
        let qb = QueryBlock {
            selected_list: SelectedList::Elements(vec![SelectListElement {
                expr: ExprNode::Literal("1".into()),
                alias: None,
            }]),
            from: vec![FromItem { table: None, alias: None }],
            where_clause: None,
            group_by: vec![],
            having: None,
        };
        assert_eq!(qb.to_postgres(&mut ctx).unwrap(), "SELECT 1");
    }

    #[test]
    fn cte_name_is_registered_before_being_referenced() {
        let mut ctx = ctx();
        let stmt = SelectStatement {
            with: vec![WithFactoringClause {
                name: "recent".to_string(),
                subquery: Subquery { first: SubqueryBasicElements { query_block: block("emp", None) }, operations: vec![] },
            }],
            subquery: Subquery { first: SubqueryBasicElements { query_block: block("recent", None) }, operations: vec![] },
            order_by: vec![],
            for_update: false,
        };
        let rendered = stmt.to_postgres(&mut ctx).unwrap();
        assert!(rendered.ends_with("FROM recent"), "{rendered}");
        assert!(!rendered.contains("hr.recent"), "{rendered}");
    }
}
