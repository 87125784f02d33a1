// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Builds the program-unit IR (spec §4.4.1) from the typed `function_body`,
//! `procedure_body` and `package_body` AST: a [`Block`] (declare section +
//! statement list), wrapped with a header for functions/procedures. An
//! `EXCEPTION ... END` handler section parses losslessly (spec §9) but is
//! outside the closed statement taxonomy, so reaching one here is an
//! explicit Unsupported construct.

use crate::ast::{self, AstNode};
use crate::builder::statement::{build_declare_section, build_statement};
use crate::error::{Result, TransformError};
use crate::ir::{Block, FunctionBody, PackageBody, ProcedureBody};

fn reject_exception_section(present: bool) -> Result<()> {
    if present {
        return Err(TransformError::unsupported(
            "EXCEPTION handler section",
            "exception handling has no curated lowering in the baseline translator",
        ));
    }
    Ok(())
}

pub(crate) fn build_block(block: &ast::Block) -> Result<Block> {
    reject_exception_section(block.exception_section().is_some())?;

    let declarations = block
        .declare_section()
        .map(|s| build_declare_section(&s))
        .transpose()?
        .unwrap_or_default();
    let statements = block
        .statement_list()
        .map(|l| l.statements().iter().map(build_statement).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    Ok(Block { declarations, statements })
}

fn build_params(params: &[ast::Param]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|p| (p.name().unwrap_or_default(), p.type_text()))
        .collect()
}

pub(crate) fn build_function_body(func: &ast::FunctionBody) -> Result<FunctionBody> {
    let header = func
        .header()
        .ok_or_else(|| TransformError::internal("FunctionBody built with no FunctionHeader"))?;
    let body = build_block(
        &func
            .block()
            .ok_or_else(|| TransformError::internal("FunctionBody built with no Block"))?,
    )?;
    Ok(FunctionBody {
        name: header.name().ok_or_else(|| TransformError::internal("FunctionHeader built with no name"))?,
        params: build_params(&header.params()),
        return_type: header.return_type_text(),
        body,
    })
}

pub(crate) fn build_procedure_body(proc: &ast::ProcedureBody) -> Result<ProcedureBody> {
    let header = proc
        .header()
        .ok_or_else(|| TransformError::internal("ProcedureBody built with no ProcedureHeader"))?;
    let body = build_block(
        &proc
            .block()
            .ok_or_else(|| TransformError::internal("ProcedureBody built with no Block"))?,
    )?;
    Ok(ProcedureBody {
        name: header.name().ok_or_else(|| TransformError::internal("ProcedureHeader built with no name"))?,
        params: build_params(&header.params()),
        body,
    })
}

pub(crate) fn build_package_body(pkg: &ast::PackageBody) -> Result<PackageBody> {
    reject_exception_section(pkg.exception_section().is_some())?;

    let declarations = pkg
        .declare_section()
        .map(|s| build_declare_section(&s))
        .transpose()?
        .unwrap_or_default();
    let statements = pkg
        .statement_list()
        .map(|l| l.statements().iter().map(build_statement).collect::<Result<Vec<_>>>())
        .transpose()?
        .unwrap_or_default();

    Ok(PackageBody {
        name: pkg.name().ok_or_else(|| TransformError::internal("PackageBody built with no name"))?,
        body: Block { declarations, statements },
    })
}
