//! Schema diffing.
//!
//! `compare` reconciles the introspected (existing) namespaces against the
//! declared (desired) ones and produces one [`Migrator`] per namespace pair.
//! Tables, columns, constraints, indices, and sequences are matched by name,
//! never by position, via two-pass set differences.
//!
//! Within a namespace, actions are emitted in phases: table structure first
//! (CREATE TABLE plus all column-level actions, in desired-table order),
//! then constraints and indices, then DROP TABLE for removed tables, then
//! sequences. Cross-table foreign keys therefore always reference tables
//! that already exist by the time the constraint is added, and destructive
//! table drops land last.

use strata_schema::{Column, Constraint, Index, Namespace, Sequence, Table};

use crate::action::Action;

/// The namespace pair a migrator is bound to.
#[derive(Debug, Clone)]
pub enum NamespacePair {
    /// The namespace exists only in the desired state.
    Create { desired: Namespace },
    /// The namespace exists only in the live database.
    Drop { existing: Namespace },
    /// The namespace exists on both sides.
    Reconcile {
        existing: Namespace,
        desired: Namespace,
    },
}

impl NamespacePair {
    /// The name the migrator operates under.
    pub fn name(&self) -> &str {
        match self {
            Self::Create { desired } => &desired.name,
            Self::Drop { existing } => &existing.name,
            Self::Reconcile { desired, .. } => &desired.name,
        }
    }
}

/// A plan fragment scoped to one namespace pair.
#[derive(Debug, Clone)]
pub struct Migrator {
    pair: NamespacePair,
    actions: Vec<Action>,
    locked: bool,
}

impl Migrator {
    fn new(pair: NamespacePair) -> Self {
        let mut migrator = Self {
            pair,
            actions: Vec::new(),
            locked: false,
        };
        migrator.plan();
        migrator
    }

    /// The namespace pair this migrator is bound to.
    pub fn pair(&self) -> &NamespacePair {
        &self.pair
    }

    /// The namespace name this migrator operates under.
    pub fn namespace(&self) -> &str {
        self.pair.name()
    }

    /// The ordered action list.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Whether this migrator's plan is structurally destructive.
    ///
    /// Set when the plan begins with `DROP SCHEMA`. The diff engine never
    /// suppresses generation; gating on the flag is the consumer's job.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether the migrator has no work.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn plan(&mut self) {
        match &self.pair {
            NamespacePair::Create { desired } => {
                let mut actions = vec![Action::CreateSchema {
                    namespace: desired.name.clone(),
                }];
                actions.extend(compare_tables(&desired.name, &[], &desired.tables));
                actions.extend(compare_sequences(&desired.name, &[], &desired.sequences));
                self.actions = actions;
            }
            NamespacePair::Drop { existing } => {
                self.actions = vec![Action::DropSchema {
                    namespace: existing.name.clone(),
                }];
                self.locked = true;
            }
            NamespacePair::Reconcile { existing, desired } => {
                let mut actions = compare_tables(&desired.name, &existing.tables, &desired.tables);
                actions.extend(compare_sequences(
                    &desired.name,
                    &existing.sequences,
                    &desired.sequences,
                ));
                self.actions = actions;
            }
        }
    }
}

impl std::fmt::Display for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.actions.is_empty() {
            return write!(f, "No actions required for namespace {}", self.namespace());
        }
        let (from, to) = match &self.pair {
            NamespacePair::Create { desired } => ("(none)", desired.name.as_str()),
            NamespacePair::Drop { existing } => (existing.name.as_str(), "(none)"),
            NamespacePair::Reconcile { existing, desired } => {
                (existing.name.as_str(), desired.name.as_str())
            }
        };
        write!(
            f,
            "Migrating namespace {from} -> {to} ({} actions)",
            self.actions.len()
        )
    }
}

/// Compare existing and desired namespaces, producing one migrator per pair.
///
/// Migrators come out in desired order, followed by existing-only namespaces
/// slated for teardown.
pub fn compare(existing: &[Namespace], desired: &[Namespace]) -> Vec<Migrator> {
    let mut migrators = Vec::new();

    for ns in desired {
        let pair = match existing.iter().find(|e| e.name == ns.name) {
            Some(e) => NamespacePair::Reconcile {
                existing: e.clone(),
                desired: ns.clone(),
            },
            None => NamespacePair::Create {
                desired: ns.clone(),
            },
        };
        migrators.push(Migrator::new(pair));
    }

    for ns in existing {
        if desired.iter().all(|d| d.name != ns.name) {
            migrators.push(Migrator::new(NamespacePair::Drop {
                existing: ns.clone(),
            }));
        }
    }

    migrators
}

fn qualify(namespace: &str, table: &str) -> String {
    format!("{namespace}.{table}")
}

fn compare_tables(namespace: &str, existing: &[Table], desired: &[Table]) -> Vec<Action> {
    // Phased: structure, then attachments, then drops. See module docs.
    let mut structure = Vec::new();
    let mut attachments = Vec::new();
    let mut drops = Vec::new();

    for table in desired {
        match existing.iter().find(|t| t.name == table.name) {
            Some(current) => {
                structure.extend(compare_columns(
                    namespace,
                    &table.name,
                    &current.columns,
                    &table.columns,
                ));
                attachments.extend(compare_constraints(
                    namespace,
                    &table.name,
                    &current.constraints,
                    &table.constraints,
                ));
                attachments.extend(compare_indices(
                    namespace,
                    &table.name,
                    &current.indices,
                    &table.indices,
                ));
            }
            None => {
                structure.push(Action::CreateTable {
                    table: qualify(namespace, &table.name),
                });
                structure.extend(compare_columns(namespace, &table.name, &[], &table.columns));
                attachments.extend(compare_constraints(
                    namespace,
                    &table.name,
                    &[],
                    &table.constraints,
                ));
                attachments.extend(compare_indices(namespace, &table.name, &[], &table.indices));
            }
        }
    }

    for table in existing {
        if desired.iter().all(|t| t.name != table.name) {
            drops.push(Action::DropTable {
                table: qualify(namespace, &table.name),
            });
        }
    }

    structure.extend(attachments);
    structure.extend(drops);
    structure
}

fn compare_columns(
    namespace: &str,
    table: &str,
    existing: &[Column],
    desired: &[Column],
) -> Vec<Action> {
    let qualified = qualify(namespace, table);
    let mut actions = Vec::new();

    for current in existing {
        match desired.iter().find(|c| c.name == current.name) {
            Some(target) => {
                // Attribute order is fixed: type, default, nullable. The
                // type string carries the max length, so a length change is
                // a type change.
                if target.type_sql() != current.type_sql() {
                    actions.push(Action::AlterColumnType {
                        table: qualified.clone(),
                        column: target.name.clone(),
                        data_type: target.type_sql(),
                    });
                }
                if target.default != current.default {
                    actions.push(match &target.default {
                        Some(expr) => Action::SetDefault {
                            table: qualified.clone(),
                            column: target.name.clone(),
                            expr: expr.clone(),
                        },
                        None => Action::DropDefault {
                            table: qualified.clone(),
                            column: target.name.clone(),
                        },
                    });
                }
                if target.nullable != current.nullable {
                    actions.push(if target.nullable {
                        Action::DropNotNull {
                            table: qualified.clone(),
                            column: target.name.clone(),
                        }
                    } else {
                        Action::SetNotNull {
                            table: qualified.clone(),
                            column: target.name.clone(),
                        }
                    });
                }
            }
            None => actions.push(Action::DropColumn {
                table: qualified.clone(),
                column: current.name.clone(),
            }),
        }
    }

    for column in desired {
        if existing.iter().all(|c| c.name != column.name) {
            actions.push(Action::add_column(qualified.clone(), column));
        }
    }

    actions
}

fn compare_constraints(
    namespace: &str,
    table: &str,
    existing: &[Constraint],
    desired: &[Constraint],
) -> Vec<Action> {
    let qualified = qualify(namespace, table);
    let mut actions = Vec::new();

    for current in existing {
        match desired.iter().find(|c| c.name == current.name) {
            Some(target) => {
                if !target.equivalent(current) {
                    // Always DROP before ADD.
                    actions.push(Action::DropConstraint {
                        table: qualified.clone(),
                        name: current.name.clone(),
                    });
                    actions.push(Action::add_constraint(qualified.clone(), target));
                }
            }
            None => actions.push(Action::DropConstraint {
                table: qualified.clone(),
                name: current.name.clone(),
            }),
        }
    }

    for constraint in desired {
        if existing.iter().all(|c| c.name != constraint.name) {
            actions.push(Action::add_constraint(qualified.clone(), constraint));
        }
    }

    actions
}

fn compare_indices(
    namespace: &str,
    table: &str,
    existing: &[Index],
    desired: &[Index],
) -> Vec<Action> {
    let qualified = qualify(namespace, table);
    let mut actions = Vec::new();

    for current in existing {
        match desired.iter().find(|i| i.name == current.name) {
            Some(target) => {
                if !target.equivalent(current) {
                    actions.push(Action::DropIndex {
                        index: qualify(namespace, &current.name),
                    });
                    actions.push(Action::create_index(qualified.clone(), target));
                }
            }
            None => actions.push(Action::DropIndex {
                index: qualify(namespace, &current.name),
            }),
        }
    }

    for index in desired {
        if existing.iter().all(|i| i.name != index.name) {
            actions.push(Action::create_index(qualified.clone(), index));
        }
    }

    actions
}

fn compare_sequences(
    namespace: &str,
    existing: &[Sequence],
    desired: &[Sequence],
) -> Vec<Action> {
    let mut actions = Vec::new();

    for current in existing {
        match desired.iter().find(|s| s.name == current.name) {
            Some(target) => {
                if target.kind != current.kind {
                    actions.push(Action::AlterSequence {
                        sequence: qualify(namespace, &current.name),
                        kind: target.kind.to_string(),
                    });
                }
            }
            None => actions.push(Action::DropSequence {
                sequence: qualify(namespace, &current.name),
            }),
        }
    }

    for sequence in desired {
        if existing.iter().all(|s| s.name != sequence.name) {
            actions.push(Action::CreateSequence {
                sequence: qualify(namespace, &sequence.name),
                kind: None,
            });
        }
    }

    actions
}
