// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field processors and the per-type plan cache.
//!
//! A [`QueryPlan`] holds one [`Processor`] per field of a query type. Plans
//! are compiled once from the static [`QuerySchema`] and cached in a
//! [`ProcessorRegistry`] keyed by the schema's type name.
//!
//! Building a plan never touches nested query types: their plans are looked
//! up when a nested value is first compiled. Self-referential and mutually
//! recursive query types therefore build without re-entering the registry.
//!
//! Shape errors (unsupported fields, malformed annotations) are logged with
//! `tracing::warn!` and the field is skipped.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock}
};

use tracing::{debug, warn};

use crate::{
    compiler::QueryCompiler,
    error::QueryError,
    naming::NamingConfig,
    operator::Operator,
    path::EntityPath,
    schema::{Connective, FieldKind, FieldValue, GroupShape, QueryField, QuerySchema},
    sql::{Conditions, SqlAndArgs, SqlBuilder},
    subquery::SubquerySpec,
    suffix::{match_qualified, match_suffix}
};

/// Compiled handling of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Processor {
    /// Contributes nothing (paging metadata or a rejected field).
    Skip,
    /// `column <op> placeholder`.
    Operator {
        /// Target column.
        column:   String,
        /// Comparison operator.
        operator: Operator
    },
    /// OR/AND group.
    Group {
        /// Joining connective.
        connective: Connective,
        /// Value shape.
        shape:      GroupShape,
        /// Column for scalar-list groups.
        column:     String,
        /// Operator for scalar-list groups.
        operator:   Operator
    },
    /// Literal template; the value repeats once per `?`.
    Condition {
        /// SQL template.
        template:     &'static str,
        /// Number of `?` in the template.
        placeholders: usize
    },
    /// `column <op> (SELECT <select> FROM <table>[ WHERE ...])`.
    Subquery {
        /// Compared column.
        column:   String,
        /// Comparison operator.
        operator: Operator,
        /// Projected expression.
        select:   String,
        /// Queried table.
        table:    String
    },
    /// Relation path.
    Path(EntityPath),
    /// Embedded query flattened into the parent.
    Flatten
}

/// One field's processor with the field name for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    /// Field name.
    pub field:     &'static str,
    /// Compiled processor.
    pub processor: Processor
}

/// Compiled processors of a query type, in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    /// Owning type.
    pub type_name: &'static str,
    /// One entry per schema field.
    pub entries:   Vec<PlanEntry>
}

impl QueryPlan {
    /// Compile a plan from a schema.
    pub fn build(schema: &QuerySchema, naming: &NamingConfig) -> Self {
        let entries = schema
            .fields
            .iter()
            .map(|field| PlanEntry {
                field:     field.name,
                processor: match build_processor(schema.type_name, field, naming) {
                    Ok(processor) => processor,
                    Err(err) => {
                        warn!(
                            type_name = schema.type_name,
                            field = field.name,
                            %err,
                            "skipping query field"
                        );
                        Processor::Skip
                    }
                }
            })
            .collect();
        Self {
            type_name: schema.type_name,
            entries
        }
    }

    /// Number of fields that can contribute a condition.
    pub fn active(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.processor != Processor::Skip)
            .count()
    }
}

fn base_column(field: &QueryField, name: &str, naming: &NamingConfig) -> (String, Operator) {
    let matched = match_suffix(name, naming);
    let column = field.column.map_or(matched.column, str::to_owned);
    (column, matched.operator)
}

fn build_processor(
    type_name: &'static str,
    field: &QueryField,
    naming: &NamingConfig
) -> Result<Processor, QueryError> {
    let unsupported = |reason| QueryError::UnsupportedField {
        type_name,
        field: field.name,
        reason
    };
    Ok(match field.kind {
        FieldKind::Page => Processor::Skip,
        FieldKind::Unsupported(reason) => return Err(unsupported(reason)),
        FieldKind::Flatten => Processor::Flatten,
        FieldKind::Scalar => {
            let (column, operator) = base_column(field, field.name, naming);
            Processor::Operator {
                column,
                operator
            }
        }
        FieldKind::Group {
            connective,
            shape
        } => {
            let base = Connective::split(field.name).map_or(field.name, |(_, base)| base);
            let (column, operator) = base_column(field, base, naming);
            Processor::Group {
                connective,
                shape,
                column,
                operator
            }
        }
        FieldKind::Condition(template) => Processor::Condition {
            template,
            placeholders: template.matches('?').count()
        },
        FieldKind::Subquery(raw) => {
            let spec = SubquerySpec::parse(raw)?;
            let matched = match_qualified(field.name, naming);
            if matched.operator == Operator::Null {
                return Err(unsupported("a subquery cannot use the null operator"));
            }
            Processor::Subquery {
                column:   field.column.map_or(matched.column, str::to_owned),
                operator: matched.operator,
                select:   spec.select.clone(),
                table:    spec.table(naming)
            }
        }
        FieldKind::Path(raw) => Processor::Path(EntityPath::parse(raw, naming)?)
    })
}

impl Processor {
    /// Render a present field value into `out`.
    ///
    /// A value whose shape does not fit the processor is logged and
    /// contributes nothing.
    pub fn apply(
        &self,
        compiler: &QueryCompiler,
        type_name: &'static str,
        field: &'static str,
        value: FieldValue<'_>,
        out: &mut Conditions
    ) {
        let mismatch = || warn!(type_name, field, "field value does not fit its processor");
        match (self, value) {
            (_, FieldValue::Absent) | (Self::Skip, _) => {}
            (Self::Operator { column, operator }, FieldValue::Scalar(value)) => {
                match operator.condition(column, &value) {
                    Some((sql, args)) => out.push(sql, args),
                    None => mismatch()
                }
            }
            (Self::Operator { column, operator }, FieldValue::List(values)) => {
                match operator.list_condition(column, &values) {
                    Some((sql, args)) => out.push(sql, args),
                    None => mismatch()
                }
            }
            (
                Self::Group {
                    connective,
                    shape: GroupShape::Nested,
                    ..
                },
                FieldValue::Query(query)
            ) => {
                let mut members = Conditions::new();
                compiler.collect(query, &mut members);
                out.push_fragment(members.group(connective.separator()));
            }
            (
                Self::Group {
                    connective,
                    shape: GroupShape::NestedList,
                    ..
                },
                FieldValue::Queries(queries)
            ) => {
                let mut members = Conditions::new();
                for query in queries {
                    let mut inner = Conditions::new();
                    compiler.collect(query, &mut inner);
                    members.push_fragment(inner.group(Connective::And.separator()));
                }
                out.push_fragment(members.group(connective.separator()));
            }
            (
                Self::Group {
                    connective,
                    shape: GroupShape::ScalarList,
                    column,
                    operator
                },
                FieldValue::List(values)
            ) => {
                let mut members = Conditions::new();
                for value in &values {
                    match operator.condition(column, value) {
                        Some((sql, args)) => members.push(sql, args),
                        None => mismatch()
                    }
                }
                out.push_fragment(members.group(connective.separator()));
            }
            (
                Self::Condition {
                    template,
                    placeholders
                },
                FieldValue::Scalar(value)
            ) => {
                out.push((*template).to_owned(), vec![value; *placeholders]);
            }
            (
                Self::Subquery {
                    column,
                    operator,
                    select,
                    table
                },
                value
            ) => {
                let nested = match value {
                    FieldValue::Query(query) => compiler.build_where(query),
                    FieldValue::Scalar(_) => SqlAndArgs::default(),
                    _ => return mismatch()
                };
                let mut builder = SqlBuilder::new(format!(
                    "{} {} (SELECT {} FROM {}",
                    column,
                    operator.sign(),
                    select,
                    table
                ));
                builder.push_where(nested);
                builder.push(")");
                out.push_fragment(builder.build());
            }
            (Self::Path(path), value) => {
                let target = path.hops();
                let filters = match value {
                    FieldValue::Query(query) => vec![(target, compiler.build_where(query))],
                    FieldValue::Path(hops) => hops
                        .iter()
                        .filter_map(|(index, query)| {
                            if index == 0 || index > target {
                                warn!(
                                    type_name,
                                    field,
                                    index,
                                    path = %path,
                                    "ignoring path filter outside the traversed hops"
                                );
                                return None;
                            }
                            Some((index, compiler.build_where(query)))
                        })
                        .collect(),
                    FieldValue::Scalar(_) => Vec::new(),
                    _ => return mismatch()
                };
                out.push_fragment(path.compile(&filters));
            }
            (Self::Flatten, FieldValue::Query(query)) => compiler.collect(query, out),
            _ => mismatch()
        }
    }
}

/// Cache of compiled query plans keyed by type name.
///
/// Safe under concurrent first use: lookups take a read lock, a miss builds
/// the plan outside any lock, and installation goes through
/// `entry().or_insert` so the first installed plan wins and every caller
/// receives that same [`Arc`].
#[derive(Debug, Default)]
pub struct ProcessorRegistry {
    plans: RwLock<HashMap<&'static str, Arc<QueryPlan>>>
}

impl ProcessorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the plan for a schema, compiling it on first use.
    pub fn plan(&self, schema: &QuerySchema, naming: &NamingConfig) -> Arc<QueryPlan> {
        if let Some(plan) = self
            .plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(schema.type_name)
        {
            return Arc::clone(plan);
        }

        let built = QueryPlan::build(schema, naming);
        let mut plans = self.plans.write().unwrap_or_else(PoisonError::into_inner);
        let plan = plans.entry(schema.type_name).or_insert_with(|| {
            debug!(
                type_name = schema.type_name,
                fields = built.entries.len(),
                "compiled query plan"
            );
            Arc::new(built)
        });
        Arc::clone(plan)
    }

    /// Check whether a type has a cached plan.
    pub fn contains(&self, type_name: &str) -> bool {
        self.plans
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(type_name)
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.plans.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check whether no plan is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SCHEMA: QuerySchema = QuerySchema {
        type_name: "processor::tests::UserQuery",
        fields:    &[
            QueryField::new("id_gt", FieldKind::Scalar),
            QueryField::new("nick_like", FieldKind::Scalar).with_column("nickname"),
            QueryField::new(
                "name_or",
                FieldKind::Group {
                    connective: Connective::Or,
                    shape:      GroupShape::Nested
                }
            ),
            QueryField::new("page", FieldKind::Page),
            QueryField::new("blob", FieldKind::Unsupported("not an Option")),
            QueryField::new("role", FieldKind::Path("user")),
            QueryField::new(
                "score_gt_avg",
                FieldKind::Subquery("select:avg(score),from:UserEntity")
            ),
            QueryField::new("valid", FieldKind::Condition("state = ? OR owner = ?"))
        ]
    };

    #[test]
    fn plan_follows_field_order() {
        let plan = QueryPlan::build(&SCHEMA, &NamingConfig::default());
        let fields: Vec<_> = plan.entries.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            ["id_gt", "nick_like", "name_or", "page", "blob", "role", "score_gt_avg", "valid"]
        );
        assert_eq!(
            plan.entries[0].processor,
            Processor::Operator {
                column:   "id".into(),
                operator: Operator::Gt
            }
        );
        assert_eq!(
            plan.entries[1].processor,
            Processor::Operator {
                column:   "nickname".into(),
                operator: Operator::Like
            }
        );
    }

    #[test]
    fn shape_errors_are_skipped() {
        let plan = QueryPlan::build(&SCHEMA, &NamingConfig::default());
        assert_eq!(plan.entries[3].processor, Processor::Skip);
        assert_eq!(plan.entries[4].processor, Processor::Skip);
        assert_eq!(plan.entries[5].processor, Processor::Skip);
        assert_eq!(plan.active(), 5);
    }

    #[test]
    fn subquery_and_condition_processors() {
        let plan = QueryPlan::build(&SCHEMA, &NamingConfig::default());
        assert_eq!(
            plan.entries[6].processor,
            Processor::Subquery {
                column:   "score".into(),
                operator: Operator::Gt,
                select:   "avg(score)".into(),
                table:    "t_user".into()
            }
        );
        assert_eq!(
            plan.entries[7].processor,
            Processor::Condition {
                template:     "state = ? OR owner = ?",
                placeholders: 2
            }
        );
    }

    #[test]
    fn registry_caches_once() {
        let registry = ProcessorRegistry::new();
        let naming = NamingConfig::default();
        assert!(registry.is_empty());
        let first = registry.plan(&SCHEMA, &naming);
        let second = registry.plan(&SCHEMA, &naming);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(SCHEMA.type_name));
    }
}
