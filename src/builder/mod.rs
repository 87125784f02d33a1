// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Builds the semantic IR (spec §4.4) from the typed AST. The builder is
//! purely structural: it never sees a [`crate::context::TransformationContext`]
//! or the catalog, and raises [`crate::error::TransformError::Unsupported`]
//! or [`crate::error::TransformError::Internal`] for any shape the curated
//! baseline doesn't cover. Every context-dependent rewrite — schema
//! qualification, synonym resolution, inline-type elaboration — happens
//! later, in the IR's own `to_postgres`.

pub(crate) mod expr;
pub(crate) mod program_unit;
pub(crate) mod query;
pub(crate) mod statement;

pub(crate) use program_unit::{build_function_body, build_package_body, build_procedure_body};
pub(crate) use query::build_select_statement;
