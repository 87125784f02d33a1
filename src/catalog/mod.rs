// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The metadata catalog (spec §4.2/§3): one `RwLock`-guarded slot per
//! entity kind, so a read of the column list for one table doesn't block
//! a concurrent write of the sequence list for another. Every setter
//! replaces a slot's contents wholesale — the catalog is a cache of
//! externally-sourced metadata, not something individual callers mutate
//! incrementally.

mod entities;

use std::collections::HashMap;
use std::sync::RwLock;

pub use entities::*;

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Thread-safe store for everything `crate::indices::build_indices` and
/// `crate::context::TransformationContext` read from. Each field is its
/// own lock (spec §4.2, §5): a long read of `tables` never blocks a write
/// to `sequences`.
#[derive(Debug, Default)]
pub struct Catalog {
    schema_names: RwLock<HashMap<Side, Vec<String>>>,
    tables: RwLock<HashMap<Side, Vec<Table>>>,
    object_types: RwLock<HashMap<Side, Vec<ObjectType>>>,
    synonyms: RwLock<HashMap<Side, Vec<Synonym>>>,
    sequences: RwLock<HashMap<Side, Vec<(String, String, Sequence)>>>,
    package_contexts: RwLock<HashMap<(String, String), PackageContext>>,
    outcomes: RwLock<Vec<CreationOutcome>>,
}

macro_rules! side_slot {
    ($get:ident, $set:ident, $field:ident, $ty:ty) => {
        pub fn $get(&self, side: Side) -> Vec<$ty> {
            self.$field
                .read()
                .expect("catalog lock poisoned")
                .get(&side)
                .cloned()
                .unwrap_or_default()
        }

        pub fn $set(&self, side: Side, values: Vec<$ty>) {
            log::debug!(
                "catalog: replacing {:?} {} slot with {} entries",
                side,
                stringify!($field),
                values.len()
            );
            self.$field.write().expect("catalog lock poisoned").insert(side, values);
        }
    };
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    side_slot!(get_schema_names, set_schema_names_raw, schema_names, String);
    side_slot!(get_tables, set_tables, tables, Table);
    side_slot!(get_object_types, set_object_types, object_types, ObjectType);
    side_slot!(get_synonyms, set_synonyms, synonyms, Synonym);

    /// Case-normalizes every schema name before storing (cross-cutting
    /// invariant: identifiers are lower-cased at every ingestion
    /// boundary, spec §8).
    pub fn set_schema_names(&self, side: Side, names: Vec<String>) {
        self.set_schema_names_raw(side, names.iter().map(|n| normalize(n)).collect());
    }

    pub fn get_sequence(&self, side: Side, schema: &str, name: &str) -> Option<Sequence> {
        let key_schema = normalize(schema);
        let key_name = normalize(name);
        self.sequences
            .read()
            .expect("catalog lock poisoned")
            .get(&side)
            .and_then(|seqs| {
                seqs.iter()
                    .find(|(s, n, _)| *s == key_schema && *n == key_name)
                    .map(|(_, _, seq)| *seq)
            })
    }

    pub fn set_sequences(&self, side: Side, sequences: Vec<(String, String, Sequence)>) {
        let normalized = sequences
            .into_iter()
            .map(|(schema, name, seq)| (normalize(&schema), normalize(&name), seq))
            .collect::<Vec<_>>();
        log::debug!("catalog: replacing {side:?} sequences slot with {} entries", normalized.len());
        self.sequences.write().expect("catalog lock poisoned").insert(side, normalized);
    }

    pub fn register_package_context(&self, schema: &str, package: &str, context: PackageContext) {
        let key = (normalize(schema), normalize(package));
        self.package_contexts.write().expect("catalog lock poisoned").insert(key, context);
    }

    pub fn get_package_context(&self, schema: &str, package: &str) -> Option<PackageContext> {
        let key = (normalize(schema), normalize(package));
        self.package_contexts.read().expect("catalog lock poisoned").get(&key).cloned()
    }

    pub fn record_outcome(&self, outcome: CreationOutcome) {
        self.outcomes.write().expect("catalog lock poisoned").push(outcome);
    }

    pub fn outcomes(&self) -> Vec<CreationOutcome> {
        self.outcomes.read().expect("catalog lock poisoned").clone()
    }

    /// Clears every slot. Locks are acquired in a fixed, alphabetical
    /// order (by field name) so this can never deadlock against another
    /// thread doing the same, even though no current caller nests catalog
    /// locks across slots (spec §5).
    pub fn reset_all(&self) {
        self.object_types.write().expect("catalog lock poisoned").clear();
        self.outcomes.write().expect("catalog lock poisoned").clear();
        self.package_contexts.write().expect("catalog lock poisoned").clear();
        self.schema_names.write().expect("catalog lock poisoned").clear();
        self.sequences.write().expect("catalog lock poisoned").clear();
        self.synonyms.write().expect("catalog lock poisoned").clear();
        self.tables.write().expect("catalog lock poisoned").clear();
    }
}
