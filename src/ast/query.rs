// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Typed AST nodes over `select_statement` and its nested query grammar
//! (spec §4.4.1's `Query` family).

use rowan::NodeOrToken;

use crate::syntax::SyntaxKind;

use super::typed_syntax_node;
use super::{AstNode, Expression, IdentGroup};

typed_syntax_node!(
    SelectStatement,
    Subquery,
    SubqueryBasicElements,
    SubqueryOperationPart,
    QueryBlock,
    WithClause,
    WithFactoringClause,
    FromClause,
    TableReference,
    SelectedList,
    SelectListElement,
    WhereClause,
    GroupByClause,
    OrderByClause,
    ForUpdateClause
);

impl SelectStatement {
    pub fn with_clause(&self) -> Option<WithClause> {
        self.syntax.children().find_map(WithClause::cast)
    }

    pub fn subquery(&self) -> Option<Subquery> {
        self.syntax.children().find_map(Subquery::cast)
    }

    pub fn order_by_clause(&self) -> Option<OrderByClause> {
        self.syntax.children().find_map(OrderByClause::cast)
    }

    pub fn for_update_clause(&self) -> Option<ForUpdateClause> {
        self.syntax.children().find_map(ForUpdateClause::cast)
    }
}

impl Subquery {
    pub fn basic_elements(&self) -> Option<SubqueryBasicElements> {
        self.syntax.children().find_map(SubqueryBasicElements::cast)
    }

    /// The `UNION [ALL]` / `INTERSECT` / `MINUS` tail, in source order.
    pub fn operation_parts(&self) -> Vec<SubqueryOperationPart> {
        self.syntax.children().filter_map(SubqueryOperationPart::cast).collect()
    }
}

impl SubqueryBasicElements {
    /// The plain `SELECT ...` form.
    pub fn query_block(&self) -> Option<QueryBlock> {
        self.syntax.children().find_map(QueryBlock::cast)
    }

    /// The parenthesized-subquery form — parses fine, but is one of the
    /// curated baseline's explicit unsupported constructs (spec §9).
    pub fn nested_subquery(&self) -> Option<Subquery> {
        self.syntax.children().find_map(Subquery::cast)
    }
}

impl SubqueryOperationPart {
    /// `UNION`, `UNION ALL`, `INTERSECT`, or `MINUS`, reassembled from its
    /// keyword tokens (spec §4.4.4 maps `MINUS` to PostgreSQL's `EXCEPT`).
    pub fn operator_text(&self) -> String {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .filter(|t| t.kind() == SyntaxKind::Keyword)
            .map(|t| t.text().to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn basic_elements(&self) -> Option<SubqueryBasicElements> {
        self.syntax.children().find_map(SubqueryBasicElements::cast)
    }
}

impl WithClause {
    pub fn factoring_clauses(&self) -> Vec<WithFactoringClause> {
        self.syntax.children().filter_map(WithFactoringClause::cast).collect()
    }
}

impl WithFactoringClause {
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::Ident))
            .map(|t| t.text().to_owned())
    }

    pub fn subquery(&self) -> Option<Subquery> {
        self.syntax.children().find_map(Subquery::cast)
    }
}

impl QueryBlock {
    pub fn selected_list(&self) -> Option<SelectedList> {
        self.syntax.children().find_map(SelectedList::cast)
    }

    pub fn from_clause(&self) -> Option<FromClause> {
        self.syntax.children().find_map(FromClause::cast)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.syntax.children().find_map(WhereClause::cast)
    }

    pub fn group_by_clause(&self) -> Option<GroupByClause> {
        self.syntax.children().find_map(GroupByClause::cast)
    }
}

impl SelectedList {
    /// `true` for a bare `SELECT *`.
    pub fn is_star(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .any(|t| t.kind() == SyntaxKind::Asterisk)
    }

    pub fn elements(&self) -> Vec<SelectListElement> {
        self.syntax.children().filter_map(SelectListElement::cast).collect()
    }
}

impl SelectListElement {
    pub fn expression(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }

    /// The element's alias, whether introduced by `AS` or bare
    /// (`col alias` with no keyword in between).
    pub fn alias(&self) -> Option<String> {
        let mut past_expression = false;
        for el in self.syntax.children_with_tokens() {
            match el {
                NodeOrToken::Node(n) if n.kind() == SyntaxKind::Expression => past_expression = true,
                NodeOrToken::Token(t) if past_expression && t.kind() == SyntaxKind::Ident => {
                    return Some(t.text().to_owned())
                }
                _ => {}
            }
        }
        None
    }
}

impl FromClause {
    pub fn table_references(&self) -> Vec<TableReference> {
        self.syntax.children().filter_map(TableReference::cast).collect()
    }
}

impl TableReference {
    pub fn ident_group(&self) -> Option<IdentGroup> {
        self.syntax.children().find_map(IdentGroup::cast)
    }

    /// `true` for Oracle's no-op `DUAL` pseudo-table (spec §9: dropped
    /// from the emitted `FROM` clause entirely).
    pub fn is_dual(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|el| el.into_token())
            .any(|t| t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("dual"))
    }

    /// `true` for `TABLE(collection_expr)` (spec §4.4.2's first explicit
    /// Unsupported construct) — parses losslessly, the builder rejects it.
    pub fn is_table_collection(&self) -> bool {
        self.syntax.children().any(|n| n.kind() == SyntaxKind::TableCollectionExpression)
    }

    pub fn alias(&self) -> Option<String> {
        let mut past_ident = false;
        for el in self.syntax.children_with_tokens() {
            match el {
                NodeOrToken::Node(n) if n.kind() == SyntaxKind::IdentGroup => past_ident = true,
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("dual") => {
                    past_ident = true
                }
                NodeOrToken::Token(t) if past_ident && t.kind() == SyntaxKind::Ident => {
                    return Some(t.text().to_owned())
                }
                _ => {}
            }
        }
        None
    }
}

impl WhereClause {
    pub fn expression(&self) -> Option<Expression> {
        self.syntax.children().find_map(Expression::cast)
    }
}

impl GroupByClause {
    /// The grouping expressions, up to (not including) an optional
    /// trailing `HAVING` predicate.
    pub fn group_expressions(&self) -> Vec<Expression> {
        let mut out = Vec::new();
        for el in self.syntax.children_with_tokens() {
            match el {
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("having") => {
                    break
                }
                NodeOrToken::Node(n) => {
                    if let Some(expr) = Expression::cast(n) {
                        out.push(expr);
                    }
                }
                _ => {}
            }
        }
        out
    }

    pub fn having(&self) -> Option<Expression> {
        let mut past_having = false;
        for el in self.syntax.children_with_tokens() {
            match el {
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("having") => {
                    past_having = true
                }
                NodeOrToken::Node(n) if past_having => return Expression::cast(n),
                _ => {}
            }
        }
        None
    }
}

impl OrderByClause {
    pub fn expressions(&self) -> Vec<Expression> {
        self.syntax.children().filter_map(Expression::cast).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, ParseEntry};

    fn root_select(input: &str) -> SelectStatement {
        let parsed = parse(input, ParseEntry::SelectStatement).unwrap_or_else(|e| panic!("{input:?}: {e}"));
        parsed
            .syntax()
            .children()
            .find_map(SelectStatement::cast)
            .expect("expected a SelectStatement")
    }

    #[test]
    fn reads_selected_list_and_from_clause() {
        let stmt = root_select("SELECT empno, ename AS name FROM emp WHERE deptno = 10");
        let block = stmt.subquery().unwrap().basic_elements().unwrap().query_block().unwrap();
        let elements = block.selected_list().unwrap().elements();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].alias().as_deref(), Some("name"));

        let from = block.from_clause().unwrap();
        assert_eq!(from.table_references()[0].ident_group().unwrap().name(), "emp");
        assert!(block.where_clause().is_some());
    }

    #[test]
    fn recognizes_dual_table() {
        let stmt = root_select("SELECT 1 FROM dual");
        let block = stmt.subquery().unwrap().basic_elements().unwrap().query_block().unwrap();
        assert!(block.from_clause().unwrap().table_references()[0].is_dual());
    }

    #[test]
    fn reads_minus_set_operation() {
        let stmt = root_select("SELECT a FROM t1 MINUS SELECT b FROM t2");
        let parts = stmt.subquery().unwrap().operation_parts();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].operator_text(), "MINUS");
    }

    #[test]
    fn reads_group_by_and_having_separately() {
        let stmt = root_select("SELECT deptno FROM emp GROUP BY deptno HAVING COUNT(*) > 1");
        let block = stmt.subquery().unwrap().basic_elements().unwrap().query_block().unwrap();
        let group_by = block.group_by_clause().unwrap();
        assert_eq!(group_by.group_expressions().len(), 1);
        assert!(group_by.having().is_some());
    }

    #[test]
    fn reads_with_factoring_clause_name() {
        let stmt = root_select("WITH recent AS (SELECT * FROM emp) SELECT * FROM recent");
        let with = stmt.with_clause().unwrap();
        assert_eq!(with.factoring_clauses()[0].name().as_deref(), Some("recent"));
    }
}
