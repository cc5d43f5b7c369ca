// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity metadata.
//!
//! `#[derive(Entity)]` describes a struct as an [`EntityDescriptor`]: its
//! fields, which one is the identity, and which are embedded structs. The
//! [`MetadataCache`] flattens that description once per type into an
//! [`EntityMetadata`] with the table name, the column order and the
//! statement templates.
//!
//! | Template | Shape |
//! |----------|-------|
//! | insert | `INSERT INTO t_user (name, score) VALUES (?, ?)` |
//! | update | `UPDATE t_user SET name = ?, score = ? WHERE id = ?` |
//! | select by id | `SELECT id, name, score FROM t_user WHERE id = ?` |
//! | delete by id | `DELETE FROM t_user WHERE id = ?` |
//! | placeholder group | `(?, ?)` |

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock}
};

use tracing::debug;

use crate::{
    naming::NamingConfig,
    path::IDENTITY_COLUMN,
    value::{ToValue, Value}
};

/// How an entity field maps to columns.
#[derive(Debug, Clone, Copy)]
pub enum ColumnKind {
    /// A plain column.
    Column,
    /// The identity column.
    Identity,
    /// An embedded struct whose columns are flattened in place.
    Embedded(fn() -> &'static EntityDescriptor)
}

/// One field of an entity or embeddable struct.
#[derive(Debug, Clone, Copy)]
pub struct EntityField {
    /// Rust field name.
    pub name:   &'static str,
    /// Explicit column name.
    pub column: Option<&'static str>,
    /// Mapping kind.
    pub kind:   ColumnKind
}

/// Static description of an entity type.
#[derive(Debug, Clone, Copy)]
pub struct EntityDescriptor {
    /// Fully qualified type name; the cache key.
    pub type_name: &'static str,
    /// Bare type name, used to derive the table name.
    pub name:      &'static str,
    /// Explicit table name.
    pub table:     Option<&'static str>,
    /// Fields in declaration order.
    pub fields:    &'static [EntityField]
}

/// A struct whose fields map to table columns.
///
/// Implemented by `#[derive(Entity)]`, including embeddable structs.
pub trait Columns {
    /// Static description.
    fn descriptor() -> &'static EntityDescriptor
    where
        Self: Sized;

    /// Push one value per flattened column, in column order.
    fn write_values(&self, out: &mut Vec<Value>);
}

/// A table row type with an identity.
pub trait Entity: Columns {
    /// Identity type.
    type Id: ToValue;

    /// Identity value.
    fn id(&self) -> &Self::Id;

    /// Replace the identity, e.g. with a generated key after insert.
    fn set_id(&mut self, id: Self::Id);
}

/// Flattened, per-type statement metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    /// Owning type.
    pub type_name:         &'static str,
    /// Table name.
    pub table:             String,
    /// Every column in value order.
    pub columns:           Vec<String>,
    /// Identity column name.
    pub identity:          String,
    /// Position of the identity in [`Self::columns`].
    pub identity_index:    Option<usize>,
    /// Columns written by insert and update.
    pub insert_columns:    Vec<String>,
    /// `id, name, score`
    pub column_list:       String,
    /// `(?, ?)` with one placeholder per insert column.
    pub placeholder_group: String,
    /// Insert template.
    pub insert_sql:        String,
    /// Update-by-id template.
    pub update_sql:        String,
    /// Select-by-id template.
    pub select_by_id_sql:  String,
    /// Delete-by-id template.
    pub delete_by_id_sql:  String
}

impl EntityMetadata {
    /// Flatten a descriptor and precompute its templates.
    pub fn build(descriptor: &EntityDescriptor, naming: &NamingConfig) -> Self {
        let mut columns = Vec::new();
        let mut identity = None;
        flatten(descriptor, naming, &mut columns, &mut identity);

        let table = descriptor
            .table
            .map_or_else(|| naming.entity_table(descriptor.name), str::to_owned);
        let identity_index = identity.as_ref().map(|(index, _)| *index);
        let identity = identity.map_or_else(|| IDENTITY_COLUMN.to_owned(), |(_, column)| column);
        let insert_columns = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != identity_index)
            .map(|(_, c)| c.clone())
            .collect::<Vec<_>>();

        let column_list = columns.join(", ");
        let placeholder_group = format!("({})", vec!["?"; insert_columns.len()].join(", "));
        let insert_sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            table,
            insert_columns.join(", "),
            placeholder_group
        );
        let update_sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            table,
            assignments(&insert_columns),
            identity
        );
        let select_by_id_sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            column_list, table, identity
        );
        let delete_by_id_sql = format!("DELETE FROM {} WHERE {} = ?", table, identity);

        Self {
            type_name: descriptor.type_name,
            table,
            columns,
            identity,
            identity_index,
            insert_columns,
            column_list,
            placeholder_group,
            insert_sql,
            update_sql,
            select_by_id_sql,
            delete_by_id_sql
        }
    }

    /// Values of an entity in column order.
    pub fn values<E: Columns>(&self, entity: &E) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.columns.len());
        entity.write_values(&mut values);
        values
    }

    /// Split values into the insert columns' values and the identity value.
    pub fn split_identity(&self, mut values: Vec<Value>) -> (Vec<Value>, Value) {
        match self.identity_index {
            Some(index) if index < values.len() => {
                let id = values.remove(index);
                (values, id)
            }
            _ => (values, Value::Null)
        }
    }
}

/// `a = ?, b = ?`
pub(crate) fn assignments(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn flatten(
    descriptor: &EntityDescriptor,
    naming: &NamingConfig,
    columns: &mut Vec<String>,
    identity: &mut Option<(usize, String)>
) {
    for field in descriptor.fields {
        let column = || field.column.map_or_else(|| naming.column(field.name), str::to_owned);
        match field.kind {
            ColumnKind::Column => columns.push(column()),
            ColumnKind::Identity => {
                if identity.is_none() {
                    *identity = Some((columns.len(), column()));
                }
                columns.push(column());
            }
            ColumnKind::Embedded(nested) => flatten(nested(), naming, columns, identity)
        }
    }
}

/// Cache of entity metadata keyed by type name.
///
/// Same discipline as [`ProcessorRegistry`](crate::ProcessorRegistry): read
/// lock on hit, build outside the lock on miss, first installed value wins.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<&'static str, Arc<EntityMetadata>>>
}

impl MetadataCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch metadata for a descriptor, building it on first use.
    pub fn get(&self, descriptor: &EntityDescriptor, naming: &NamingConfig) -> Arc<EntityMetadata> {
        if let Some(meta) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(descriptor.type_name)
        {
            return Arc::clone(meta);
        }

        let built = EntityMetadata::build(descriptor, naming);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let meta = entries.entry(descriptor.type_name).or_insert_with(|| {
            debug!(
                type_name = descriptor.type_name,
                table = %built.table,
                "compiled entity metadata"
            );
            Arc::new(built)
        });
        Arc::clone(meta)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
