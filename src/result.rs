// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The translation outcome (spec §4.6/§6): a plain record, never an
//! exception at the interface layer — a failed translation is an ordinary
//! `TransformationResult` with `success = false`, not a thrown error.

use crate::parser::Diagnostic;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TransformationResult {
    pub success: bool,
    /// Echoed back byte-for-byte on every outcome (spec §8's round-trip
    /// property), success or failure alike.
    pub source_text: String,
    pub target_text: Option<String>,
    pub error_message: Option<String>,
    /// Present only when the caller asked for `show_ast` (spec §4.6).
    pub ast_dump: Option<String>,
    /// Non-fatal observations from the front-end (spec §3's `ParseEntry`
    /// contract); empty for every currently-produced `Parsed` (see
    /// `crate::parser::Parser::finish_parse`, a pragmatic simplification
    /// noted in DESIGN.md), but carried through so a future diagnostic
    /// producer has somewhere to surface them without an API break.
    pub diagnostics: Vec<Diagnostic>,
}

impl TransformationResult {
    pub fn success(source_text: impl Into<String>, target_text: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: true,
            source_text: source_text.into(),
            target_text: Some(target_text.into()),
            error_message: None,
            ast_dump: None,
            diagnostics,
        }
    }

    pub fn failure(source_text: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            source_text: source_text.into(),
            target_text: None,
            error_message: Some(error_message.into()),
            ast_dump: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_ast_dump(mut self, dump: impl Into<String>) -> Self {
        self.ast_dump = Some(dump.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_echoes_source_text() {
        let result = TransformationResult::success("SELECT 1 FROM dual", "SELECT 1", vec![]);
        assert!(result.success);
        assert_eq!(result.source_text, "SELECT 1 FROM dual");
        assert_eq!(result.target_text.as_deref(), Some("SELECT 1"));
        assert!(result.error_message.is_none());
    }

    #[test]
    fn failure_carries_no_target_text() {
        let result = TransformationResult::failure("SELECT", "parse error at 1:7");
        assert!(!result.success);
        assert!(result.target_text.is_none());
        assert_eq!(result.error_message.as_deref(), Some("parse error at 1:7"));
    }
}
