// SPDX-License-Identifier: SEE LICENSE IN LICENSE.md
// SPDX-FileCopyrightText: 2023 CYBERTEC PostgreSQL International GmbH
// <office@cybertec.at>

//! The catalog's entity types (spec §3's data model table). Plain data,
//! no behavior beyond the occasional qualified-name helper — the catalog
//! in `super` owns storage and concurrency.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which end of the migration an entity describes. Most catalog slots are
/// keyed by side since a source (Oracle) table and its target (PostgreSQL)
/// counterpart can disagree on column types, nullability, or even which
/// columns exist during an in-flight migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Source,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub ordinal: u32,
    pub name: String,
    pub source_type: String,
    pub target_type: String,
    /// The owning schema of a user-defined column type, when it isn't a
    /// built-in scalar.
    pub type_owner: Option<String>,
    pub precision: Option<u32>,
    pub scale: Option<i32>,
    pub char_length: Option<u32>,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeField {
    pub name: String,
    pub type_name: String,
    pub type_owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectType {
    pub schema: String,
    pub name: String,
    pub fields: Vec<ObjectTypeField>,
    /// Member and static method/procedure names, lower-cased. Reused
    /// verbatim as the backing store for the package-function index (see
    /// DESIGN.md): a PL/SQL package's subprograms are catalogued the same
    /// owner/package/name-triple way Oracle's own `ALL_PROCEDURES` does,
    /// and the curated data model (spec §3) has no separate entity for
    /// them.
    pub methods: Vec<String>,
}

impl ObjectType {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

pub const PUBLIC_SYNONYM_OWNER: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub owner: String,
    pub name: String,
    pub target_owner: String,
    pub target_name: String,
    /// The remote database link a `CREATE SYNONYM ... FOR target@dblink`
    /// targets, if any (spec §3). The resolver (`Indices::resolve_synonym`)
    /// only ever needs `target_owner`/`target_name`; `dblink` is carried
    /// through for a DDL-generation collaborator to surface, never
    /// consulted by the translator itself.
    #[serde(default)]
    pub dblink: Option<String>,
}

impl Synonym {
    pub fn is_public(&self) -> bool {
        self.owner == PUBLIC_SYNONYM_OWNER
    }

    pub fn target(&self) -> String {
        format!("{}.{}", self.target_owner, self.target_name)
    }
}

/// Sequence bounds use `i128`: Oracle permits `NUMBER(28)`-sized bounds
/// that don't fit in `i64` (see SPEC_FULL.md §2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub min_value: i128,
    pub max_value: i128,
    /// The next value the sequence will hand out, at the time of extraction.
    pub current_value: i128,
    pub increment: i128,
    /// Number of values pre-allocated in memory (Oracle's `CACHE n`).
    pub cache_size: i128,
    pub cycle: bool,
    /// `ORDER`: whether values are guaranteed to be handed out in request
    /// order across RAC instances. Meaningless on a single PostgreSQL
    /// instance but carried through for the DDL-generation collaborator.
    pub order: bool,
}

/// One inline-type category (spec §4.5). All four currently elaborate to
/// the same `jsonb` representation; the variant is kept distinct rather
/// than collapsed so a future elaboration strategy (e.g. a real composite
/// type for `RECORD`) has somewhere to hang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineTypeCategory {
    Record,
    Rowtype,
    TableOf,
    Varray,
    IndexBy,
}

impl InlineTypeCategory {
    pub fn is_collection(self) -> bool {
        matches!(self, Self::TableOf | Self::Varray | Self::IndexBy)
    }

    /// The literal a freshly-declared variable of this category is
    /// initialized to once elaborated to `jsonb` (spec §4.5): collections
    /// start empty-array, records/rowtypes/index-by tables start
    /// empty-object.
    pub fn init_literal(self) -> &'static str {
        match self {
            Self::Record | Self::Rowtype | Self::IndexBy => "'{}'::jsonb",
            Self::TableOf | Self::Varray => "'[]'::jsonb",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineTypeField {
    pub name: String,
    pub source_type: String,
    pub target_type: String,
}

/// One `TYPE ... IS ...` declaration (or bare `%ROWTYPE` variable, see
/// below) elaborated from a package spec (spec §4.5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineTypeDefinition {
    pub name: String,
    pub category: InlineTypeCategory,
    pub fields: Vec<InlineTypeField>,
    /// The collection element's PostgreSQL-mapped scalar type, for
    /// `TABLE OF`/`VARRAY`/`INDEX BY` categories.
    pub element_type: Option<String>,
    /// `VARRAY(n)`'s capacity `n`. `None` outside the `Varray` category.
    pub size_limit: Option<u32>,
    /// `TABLE OF t INDEX BY k`'s index key type `k`. `None` outside the
    /// `IndexBy` category.
    pub index_key_type: Option<String>,
}

impl InlineTypeDefinition {
    pub fn init_literal(&self) -> &'static str {
        self.category.init_literal()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVariable {
    pub data_type: String,
    pub default_text: Option<String>,
    pub is_constant: bool,
}

/// Everything `extract_package_context` pulls out of a package spec (spec
/// §4.4.3/§4.5): the variables a package-qualified reference might be
/// resolving to, and the inline types those variables (or the package's
/// own `TYPE` declarations) introduce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageContext {
    pub variables: HashMap<String, PackageVariable>,
    pub inline_types: HashMap<String, InlineTypeDefinition>,
}

impl PackageContext {
    /// Resolves a variable's inline-type definition, whether it was typed
    /// by a package-level `TYPE name IS ...` or declared directly as
    /// `v %ROWTYPE` (in which case the definition is keyed by the
    /// variable's own name — see `crate::inline_types`).
    pub fn inline_type_for_variable(&self, variable: &str) -> Option<&InlineTypeDefinition> {
        let var = self.variables.get(variable)?;
        self.inline_types
            .get(var.data_type.as_str())
            .or_else(|| self.inline_types.get(variable))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    Extraction,
    Creation,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationError {
    pub object_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedObject {
    pub object_name: String,
    pub reason: String,
}

/// The append-only record of one creation/transfer/extraction run (spec
/// §3's "Creation outcome" row). `Catalog::record_outcome` is the only
/// way to add one; nothing ever mutates an existing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationOutcome {
    pub kind: JobKind,
    pub created: Vec<String>,
    pub skipped: Vec<SkippedObject>,
    pub errors: Vec<CreationError>,
}
