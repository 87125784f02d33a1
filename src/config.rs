// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! Host-supplied configuration the core consumes (spec §6): which schemas
//! an extraction/transformation run scopes itself to, and which
//! [`ParseEntry`] `transform_code` falls back to when the caller doesn't
//! name one.

use crate::parser::ParseEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `do.all-schemas`: process every source schema rather than the
    /// `only_test_schema` allowlist.
    pub all_schemas: bool,
    /// `do.only-test-schema`: schema names to restrict to when
    /// `all_schemas` is `false`. Stored exactly as supplied; trimming and
    /// lower-casing happen in [`Self::resolved_schemas`], not here, so the
    /// original host-supplied text is still available for diagnostics.
    pub only_test_schema: Vec<String>,
    /// `default parse entry`: the production `transform_code` assumes when
    /// called without an explicit [`ParseEntry`].
    pub default_parse_entry: ParseEntry,
}

impl Default for Config {
    fn default() -> Self {
        Self { all_schemas: false, only_test_schema: Vec::new(), default_parse_entry: ParseEntry::SelectStatement }
    }
}

impl Config {
    /// Parses `do.only-test-schema`'s comma-separated form (spec §6: "each
    /// trimmed and lower-cased").
    pub fn with_only_test_schema(mut self, raw: &str) -> Self {
        self.only_test_schema = raw
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// The schemas a translation/extraction run should scope itself to,
    /// given the source side's known schema list. When `all_schemas` is
    /// set, every known schema is returned unfiltered; otherwise only the
    /// `only_test_schema` entries that are actually present survive —
    /// unknown entries are warned about and dropped (spec §6).
    pub fn resolved_schemas(&self, known_schemas: &[String]) -> Vec<String> {
        if self.all_schemas {
            return known_schemas.to_vec();
        }

        let known: std::collections::HashSet<&str> = known_schemas.iter().map(String::as_str).collect();
        self.only_test_schema
            .iter()
            .filter(|name| {
                let present = known.contains(name.as_str());
                if !present {
                    log::warn!("do.only-test-schema names unknown schema {name:?}, dropping");
                }
                present
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_test_schema_is_trimmed_and_lower_cased() {
        let config = Config::default().with_only_test_schema(" HR , Sales ,,");
        assert_eq!(config.only_test_schema, vec!["hr".to_string(), "sales".to_string()]);
    }

    #[test]
    fn all_schemas_ignores_the_allowlist() {
        let config = Config { all_schemas: true, ..Config::default().with_only_test_schema("hr") };
        assert_eq!(config.resolved_schemas(&["hr".to_string(), "sales".to_string()]), vec!["hr", "sales"]);
    }

    #[test]
    fn unknown_schema_names_are_dropped() {
        let config = Config::default().with_only_test_schema("hr,ghost");
        assert_eq!(config.resolved_schemas(&["hr".to_string()]), vec!["hr".to_string()]);
    }

    #[test]
    fn default_parse_entry_is_select_statement() {
        assert_eq!(Config::default().default_parse_entry, ParseEntry::SelectStatement);
    }
}
