// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The semantic intermediate representation (spec §4.4.1): a closed,
//! tagged-variant tree built by [`crate::builder`] from the typed AST and
//! consumed by nothing but `to_postgres`. Every node kind appears exactly
//! once here; emission never downcasts beyond the variant tag it already
//! holds.
//!
//! Tree ownership is straightforward (spec §3): each node exclusively owns
//! its children, nothing is shared, and emission borrows
//! [`crate::context::TransformationContext`] rather than owning a copy of
//! it.

mod expr;
mod program_unit;
mod query;
mod statement;

pub use expr::{CursorAttributeKind, ExprNode};
pub use program_unit::{Block, FunctionBody, PackageBody, ProcedureBody};
pub use query::{
    FromItem, QueryBlock, SelectListElement, SelectStatement, SelectedList, Subquery, SubqueryBasicElements,
    SubqueryOperationPart, SubqueryOperator, WithFactoringClause,
};
pub use statement::{Declaration, FetchTarget, RaiseKind, Statement};
