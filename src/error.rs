// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Structured error taxonomy for everything above the grammar front-end
//! (spec §7). [`crate::parser::ParseError`] already covers the lexing/
//! parsing layer; [`TransformError`] covers name resolution, unsupported
//! constructs, and internal invariant violations in the builder and
//! catalog layers.

/// The five error categories spec §7 distinguishes. Each carries enough
/// context to render a useful diagnostic without re-walking the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize)]
pub enum TransformError {
    /// Malformed input that never reached the grammar, e.g. an empty
    /// string, or a schema/package name that fails basic identifier
    /// validation before parsing is attempted.
    #[error("input error: {0}")]
    Input(String),

    /// A hard parse failure from the grammar front-end.
    #[error(transparent)]
    Parse(#[from] crate::parser::ParseError),

    /// A construct the grammar accepts losslessly but the builder
    /// deliberately refuses to translate (spec §4.4.2).
    #[error("unsupported construct: {construct} ({detail})")]
    Unsupported { construct: String, detail: String },

    /// Name resolution failed: an identifier that isn't a local alias/CTE
    /// name, doesn't resolve via a synonym, and isn't found once qualified
    /// by the current schema.
    #[error("could not resolve {kind} {name:?}")]
    Resolution { kind: String, name: String },

    /// A condition the builder's own invariants guarantee can't happen —
    /// reaching one means a bug in this crate, not bad input. Always
    /// logged via `log::error!` before conversion (spec §7), since by the
    /// time it becomes a `TransformationResult` the call stack is gone.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl TransformError {
    pub fn unsupported(construct: impl Into<String>, detail: impl Into<String>) -> Self {
        let construct = construct.into();
        let detail = detail.into();
        log::debug!("rejecting unsupported construct: {construct} ({detail})");
        Self::Unsupported { construct, detail }
    }

    pub fn resolution(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Resolution {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Logs the violated invariant at error level before returning it —
    /// by the time this becomes part of a [`crate::result::TransformationResult`]
    /// no backtrace survives, so the log line is the only record.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("internal invariant violated: {message}");
        Self::Internal(message)
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
