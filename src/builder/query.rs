// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Builds the query IR (spec §4.4.1/§4.4.2) from the typed `select_statement`
//! AST, rejecting the curated baseline's explicit unsupported shapes:
//! parenthesized nested subqueries, and a `FROM` clause naming more than
//! one table.

use crate::ast::{self, AstNode};
use crate::builder::expr::build_expression;
use crate::error::{Result, TransformError};
use crate::ir::{
    FromItem, QueryBlock, SelectListElement, SelectStatement, SelectedList, Subquery, SubqueryBasicElements,
    SubqueryOperationPart, SubqueryOperator, WithFactoringClause,
};

pub(crate) fn build_select_statement(stmt: &ast::SelectStatement) -> Result<SelectStatement> {
    let with = match stmt.with_clause() {
        Some(clause) => clause
            .factoring_clauses()
            .iter()
            .map(build_with_factoring_clause)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let subquery = stmt
        .subquery()
        .ok_or_else(|| TransformError::internal("SelectStatement built with no Subquery"))
        .and_then(|s| build_subquery(&s))?;

    let order_by = stmt
        .order_by_clause()
        .map(|clause| clause.expressions().iter().map(build_expression).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    Ok(SelectStatement { with, subquery, order_by, for_update: stmt.for_update_clause().is_some() })
}

fn build_with_factoring_clause(clause: &ast::WithFactoringClause) -> Result<WithFactoringClause> {
    let name = clause
        .name()
        .ok_or_else(|| TransformError::internal("WithFactoringClause built with no name"))?;
    let subquery = clause
        .subquery()
        .ok_or_else(|| TransformError::internal("WithFactoringClause built with no Subquery"))
        .and_then(|s| build_subquery(&s))?;
    Ok(WithFactoringClause { name, subquery })
}

pub(crate) fn build_subquery(subquery: &ast::Subquery) -> Result<Subquery> {
    let first = subquery
        .basic_elements()
        .ok_or_else(|| TransformError::internal("Subquery built with no SubqueryBasicElements"))
        .and_then(|e| build_basic_elements(&e))?;

    let operations = subquery
        .operation_parts()
        .iter()
        .map(build_operation_part)
        .collect::<Result<Vec<_>>>()?;

    Ok(Subquery { first, operations })
}

fn build_basic_elements(elements: &ast::SubqueryBasicElements) -> Result<SubqueryBasicElements> {
    if elements.nested_subquery().is_some() {
        return Err(TransformError::unsupported(
            "parenthesized subquery",
            "nested subquery expressions have no curated lowering in the baseline translator",
        ));
    }
    let query_block = elements
        .query_block()
        .ok_or_else(|| TransformError::internal("SubqueryBasicElements built with neither a query block nor a nested subquery"))
        .and_then(|b| build_query_block(&b))?;
    Ok(SubqueryBasicElements { query_block })
}

fn build_operation_part(part: &ast::SubqueryOperationPart) -> Result<SubqueryOperationPart> {
    let operator = match part.operator_text().as_str() {
        "UNION" => SubqueryOperator::Union,
        "UNION ALL" => SubqueryOperator::UnionAll,
        "INTERSECT" => SubqueryOperator::Intersect,
        "MINUS" => SubqueryOperator::Minus,
        other => return Err(TransformError::internal(format!("unrecognized set operator `{other}`"))),
    };
    let elements = part
        .basic_elements()
        .ok_or_else(|| TransformError::internal("SubqueryOperationPart built with no SubqueryBasicElements"))
        .and_then(|e| build_basic_elements(&e))?;
    Ok(SubqueryOperationPart { operator, elements })
}

fn build_query_block(block: &ast::QueryBlock) -> Result<QueryBlock> {
    let selected_list = build_selected_list(
        &block
            .selected_list()
            .ok_or_else(|| TransformError::internal("QueryBlock built with no SelectedList"))?,
    )?;

    let from = match block.from_clause() {
        Some(clause) => {
            let refs = clause.table_references();
            if refs.len() > 1 {
                return Err(TransformError::unsupported(
                    "multi-table FROM clause",
                    "Multiple tables in FROM clause not yet supported",
                ));
            }
            refs.iter().map(build_from_item).collect::<Result<Vec<_>>>()?
        }
        None => Vec::new(),
    };

    let where_clause = block
        .where_clause()
        .map(|w| w.expression().ok_or_else(|| TransformError::internal("WhereClause built with no Expression")))
        .transpose()?
        .map(build_expression)
        .transpose()?;

    let (group_by, having) = match block.group_by_clause() {
        Some(clause) => {
            let group_by = clause.group_expressions().iter().map(build_expression).collect::<Result<Vec<_>>>()?;
            let having = clause.having().map(|h| build_expression(&h)).transpose()?;
            (group_by, having)
        }
        None => (Vec::new(), None),
    };

    Ok(QueryBlock { selected_list, from, where_clause, group_by, having })
}

fn build_from_item(table_ref: &ast::TableReference) -> Result<FromItem> {
    if table_ref.is_table_collection() {
        return Err(TransformError::unsupported(
            "table_collection_expression",
            "TABLE(collection_expr) in a FROM clause has no curated lowering in the baseline translator",
        ));
    }
    if table_ref.is_dual() {
        return Ok(FromItem { table: None, alias: None });
    }
    let table = table_ref
        .ident_group()
        .ok_or_else(|| TransformError::internal("non-DUAL TableReference built with no IdentGroup"))?
        .name();
    Ok(FromItem { table: Some(table), alias: table_ref.alias() })
}

fn build_selected_list(list: &ast::SelectedList) -> Result<SelectedList> {
    if list.is_star() {
        return Ok(SelectedList::Asterisk);
    }
    let elements = list
        .elements()
        .iter()
        .map(|el| {
            let expr = el
                .expression()
                .ok_or_else(|| TransformError::internal("SelectListElement built with no Expression"))?;
            Ok(SelectListElement { expr: build_expression(&expr)?, alias: el.alias() })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SelectedList::Elements(elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    fn build(input: &str) -> Result<SelectStatement> {
        let parsed = parse(input, ParseEntry::SelectStatement).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        let stmt = parsed.syntax().children().find_map(ast::SelectStatement::cast).expect("expected a SelectStatement");
        build_select_statement(&stmt)
    }

    #[test]
    fn builds_plain_select_with_from_and_where() {
        let stmt = build("SELECT empno FROM emp WHERE deptno = 10").unwrap();
        assert_eq!(stmt.subquery.first.query_block.from.len(), 1);
        assert!(stmt.subquery.first.query_block.where_clause.is_some());
    }

    #[test]
    fn builds_dual_as_tableless_from_item() {
        let stmt = build("SELECT 1 FROM dual").unwrap();
        assert_eq!(stmt.subquery.first.query_block.from[0].table, None);
    }

    #[test]
    fn rejects_multiple_from_tables() {
        let err = build("SELECT a FROM t1, t2 WHERE t1.id = t2.id").unwrap_err();
        assert!(matches!(err, TransformError::Unsupported { .. }));
    }

    #[test]
    fn rejects_table_collection_expression() {
        let err = build("SELECT * FROM TABLE(get_ids(10))").unwrap_err();
        assert!(matches!(err, TransformError::Unsupported { .. }));
    }

    #[test]
    fn rejects_parenthesized_subquery() {
        let err = build("SELECT * FROM (SELECT * FROM emp)").unwrap_err();
        assert!(matches!(err, TransformError::Unsupported { .. }));
    }

    #[test]
    fn builds_minus_operation() {
        let stmt = build("SELECT a FROM t1 MINUS SELECT b FROM t2").unwrap();
        assert_eq!(stmt.subquery.operations.len(), 1);
        assert_eq!(stmt.subquery.operations[0].operator, SubqueryOperator::Minus);
    }

    #[test]
    fn builds_with_clause_names() {
        let stmt = build("WITH recent AS (SELECT * FROM emp) SELECT * FROM recent").unwrap();
        assert_eq!(stmt.with.len(), 1);
        assert_eq!(stmt.with[0].name, "recent");
    }
}
