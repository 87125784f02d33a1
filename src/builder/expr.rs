// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Builds [`ExprNode`] trees from the typed expression AST.
//!
//! The grammar only partially folds precedence into the tree shape (see
//! `crate::grammar::expressions`): an `Expression` is a flat run of
//! `CompoundExpression` siblings joined by bare `AND`/`OR` tokens, and a
//! `CompoundExpression` is itself a `Concatenation`-or-bare-atom run
//! optionally followed by one comparison operator and another such run.
//! This module is where that flat shape gets folded into the IR's nested
//! binary tree — purely structurally; no catalog or context lookup
//! happens here (that's emission's job, in `crate::ir::expr`).

use rowan::NodeOrToken;

use crate::ast::{
    Argument, ArgumentList, AstNode, CompoundExpression, Concatenation, Expression, FunctionInvocation, IdentGroup,
};
use crate::error::{Result, TransformError};
use crate::ir::{CursorAttributeKind, ExprNode};
use crate::syntax::{SyntaxElement, SyntaxKind};

fn is_trivia(el: &SyntaxElement) -> bool {
    matches!(el, NodeOrToken::Token(t) if matches!(t.kind(), SyntaxKind::Whitespace | SyntaxKind::Comment))
}

pub(crate) fn build_expression(expr: &Expression) -> Result<ExprNode> {
    let mut compounds = Vec::new();
    let mut operators = Vec::new();
    for el in expr.syntax().children_with_tokens() {
        match el {
            NodeOrToken::Node(n) if n.kind() == SyntaxKind::CompoundExpression => {
                compounds.push(CompoundExpression::cast(n).expect("checked kind"));
            }
            NodeOrToken::Token(t) if t.kind() == SyntaxKind::LogicOp => {
                let text = t.text().to_ascii_uppercase();
                if matches!(text.as_str(), "AND" | "OR") {
                    operators.push(text);
                }
            }
            _ => {}
        }
    }

    let mut compounds = compounds.into_iter();
    let first = compounds
        .next()
        .ok_or_else(|| TransformError::internal("Expression built with no CompoundExpression child"))?;
    let mut node = build_compound(&first)?;
    for (op, compound) in operators.into_iter().zip(compounds) {
        let rhs = build_compound(&compound)?;
        node = ExprNode::Binary { op, lhs: Box::new(node), rhs: Box::new(rhs) };
    }
    Ok(node)
}

fn build_compound(compound: &CompoundExpression) -> Result<ExprNode> {
    if let Some(keyword) = compound.unsupported_keyword() {
        return Err(TransformError::unsupported(
            "IN/BETWEEN/LIKE predicate",
            format!("`{keyword}` has no curated PostgreSQL lowering in the baseline translator"),
        ));
    }

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut cmp_op = None;
    let mut past_cmp = false;
    for el in compound.syntax().children_with_tokens() {
        if is_trivia(&el) {
            continue;
        }
        if let NodeOrToken::Token(t) = &el {
            if t.kind() == SyntaxKind::ComparisonOp {
                cmp_op = Some(t.text().to_owned());
                past_cmp = true;
                continue;
            }
        }
        if past_cmp {
            right.push(el);
        } else {
            left.push(el);
        }
    }

    let lhs = build_concatenation_like(&left)?;
    match cmp_op {
        None => Ok(lhs),
        Some(op) => {
            let rhs = build_concatenation_like(&right)?;
            Ok(ExprNode::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) })
        }
    }
}

fn build_concatenation_like(elements: &[SyntaxElement]) -> Result<ExprNode> {
    if let [NodeOrToken::Node(n)] = elements {
        if n.kind() == SyntaxKind::Concatenation {
            let concat = Concatenation::cast(n.clone()).expect("checked kind");
            return build_concatenation(&concat);
        }
    }
    build_atom_run(elements)
}

fn build_concatenation(concat: &Concatenation) -> Result<ExprNode> {
    let mut groups: Vec<Vec<SyntaxElement>> = vec![Vec::new()];
    let mut ops = Vec::new();
    for el in concat.syntax().children_with_tokens() {
        if is_trivia(&el) {
            continue;
        }
        if let NodeOrToken::Token(t) = &el {
            if matches!(t.kind(), SyntaxKind::Concat | SyntaxKind::ArithmeticOp) {
                ops.push(t.text().to_owned());
                groups.push(Vec::new());
                continue;
            }
        }
        groups.last_mut().expect("always at least one group").push(el);
    }

    let mut groups = groups.into_iter();
    let first = groups.next().expect("always at least one group");
    let mut node = build_atom_run(&first)?;
    for (op, group) in ops.into_iter().zip(groups) {
        let rhs = build_atom_run(&group)?;
        node = ExprNode::Binary { op, lhs: Box::new(node), rhs: Box::new(rhs) };
    }
    Ok(node)
}

fn build_atom_run(elements: &[SyntaxElement]) -> Result<ExprNode> {
    let elements: Vec<SyntaxElement> = elements.iter().cloned().filter(|el| !is_trivia(el)).collect();

    let mut idx = 0;
    let mut unary_op = None;
    if let Some(NodeOrToken::Token(t)) = elements.first() {
        if matches!(t.kind(), SyntaxKind::ArithmeticOp) && matches!(t.text(), "+" | "-") {
            unary_op = Some(t.text().to_owned());
            idx = 1;
        }
    }

    let atom = build_atom(&elements[idx..])?;
    Ok(match unary_op {
        Some(op) => ExprNode::Unary { op, operand: Box::new(atom) },
        None => atom,
    })
}

fn build_atom(elements: &[SyntaxElement]) -> Result<ExprNode> {
    match elements {
        [NodeOrToken::Node(n)] if n.kind() == SyntaxKind::IdentGroup => {
            let group = IdentGroup::cast(n.clone()).expect("checked kind");
            Ok(ExprNode::Identifier(group.segments()))
        }
        [NodeOrToken::Node(n), NodeOrToken::Token(pct), NodeOrToken::Token(attr)]
            if n.kind() == SyntaxKind::IdentGroup && pct.kind() == SyntaxKind::Percentage =>
        {
            let group = IdentGroup::cast(n.clone()).expect("checked kind");
            let kind = CursorAttributeKind::parse(attr.text()).ok_or_else(|| {
                TransformError::unsupported("cursor attribute", format!("unrecognized attribute `{}`", attr.text()))
            })?;
            Ok(ExprNode::CursorAttribute { cursor: group.name(), attribute: kind })
        }
        [NodeOrToken::Node(n)] if n.kind() == SyntaxKind::FunctionInvocation => {
            build_function_invocation(&FunctionInvocation::cast(n.clone()).expect("checked kind"))
        }
        [NodeOrToken::Node(n)] if n.kind() == SyntaxKind::Expression => {
            let inner = Expression::cast(n.clone()).expect("checked kind");
            Ok(ExprNode::Paren(Box::new(build_expression(&inner)?)))
        }
        [NodeOrToken::Token(t)]
            if matches!(
                t.kind(),
                SyntaxKind::QuotedLiteral | SyntaxKind::Integer | SyntaxKind::BindVar
            ) || (t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("null")) =>
        {
            Ok(ExprNode::Literal(t.text().to_owned()))
        }
        other => Err(TransformError::internal(format!(
            "unrecognized expression atom shape with {} element(s)",
            other.len()
        ))),
    }
}

fn build_function_invocation(call: &FunctionInvocation) -> Result<ExprNode> {
    let ident = call
        .ident()
        .ok_or_else(|| TransformError::internal("FunctionInvocation built with no IdentGroup"))?;
    let args: Vec<Argument> = call.argument_list().map(|l: ArgumentList| l.arguments()).unwrap_or_default();
    let args = args
        .iter()
        .map(|a| {
            a.expression()
                .ok_or_else(|| TransformError::internal("Argument built with no Expression"))
                .and_then(|e| build_expression(&e))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(ExprNode::FunctionCall { name: ident.segments(), args })
}
