//! End-to-end planning scenarios, driven through the YAML document loader
//! the way an operator would drive the engine.

use strata_migrate::{compare, reverse_actions, reverse_sql, Action, ExistingState, Migrator};
use strata_schema::{
    Column, Constraint, ConstraintKind, Document, Namespace, Reference, Table,
};

const SIMPLE: &str = r#"
namespaces:
  - name: public
    tables:
      - name: users
        columns:
          - name: id
            type: INTEGER
            nullable: false
            default: nextval('users_id_seq')
          - name: email
            type: CHARACTER VARYING
            max_length: 255
            nullable: true
          - name: created_at
            type: TIMESTAMP WITH TIME ZONE
            nullable: false
            default: now()
        constraints:
          - name: users_pkey
            type: PRIMARY KEY
            targets: [id]
          - name: users_email_unique
            type: UNIQUE
            targets: [email]
        indices:
          - name: idx_users_email
            unique: true
            columns: [email]
    sequences:
      - name: users_id_seq
        type: bigint
"#;

const BLOG: &str = r#"
namespaces:
  - name: public
    tables:
      - name: users
        columns:
          - name: id
            type: INTEGER
            nullable: false
            default: nextval('users_id_seq')
        constraints:
          - name: users_pkey
            type: PRIMARY KEY
            targets: [id]
      - name: posts
        columns:
          - name: id
            type: INTEGER
            nullable: false
            default: nextval('posts_id_seq')
          - name: author_id
            type: INTEGER
            nullable: true
        constraints:
          - name: posts_pkey
            type: PRIMARY KEY
            targets: [id]
          - name: posts_author_fk
            type: FOREIGN KEY
            targets: [author_id]
            reference:
              table: users
              columns: [id]
            on_delete: CASCADE
    sequences:
      - name: users_id_seq
        type: bigint
      - name: posts_id_seq
        type: bigint
"#;

fn load(text: &str) -> Vec<Namespace> {
    let doc = Document::from_str(text).expect("fixture parses");
    doc.validate().expect("fixture validates");
    doc.namespaces
}

fn actions(existing: &[Namespace], desired: &[Namespace]) -> Vec<String> {
    compare(existing, desired)
        .iter()
        .flat_map(Migrator::actions)
        .map(ToString::to_string)
        .collect()
}

fn position(actions: &[String], needle: &str) -> usize {
    actions
        .iter()
        .position(|a| a.contains(needle))
        .unwrap_or_else(|| {
            panic!(
                "expected actions to contain {needle:?}, got:\n  {}",
                actions.join("\n  ")
            )
        })
}

#[test]
fn fresh_deploy_emits_full_creation_in_order() {
    let desired = load(SIMPLE);
    let up = actions(&[], &desired);

    let schema = position(&up, "CREATE SCHEMA public;");
    let table = position(&up, "CREATE TABLE public.users ();");
    let id = position(&up, "ADD COLUMN id");
    let email = position(&up, "ADD COLUMN email");
    let pkey = position(&up, "ADD CONSTRAINT users_pkey PRIMARY KEY");
    let unique = position(&up, "ADD CONSTRAINT users_email_unique UNIQUE");
    let index = position(&up, "CREATE UNIQUE INDEX idx_users_email");
    let sequence = position(&up, "CREATE SEQUENCE public.users_id_seq");

    assert!(schema < table);
    assert!(table < id);
    assert!(id < email);
    assert!(email < pkey);
    assert!(pkey < unique);
    assert!(unique < index);
    assert!(index < sequence);
}

#[test]
fn identical_states_are_a_noop() {
    let state = load(SIMPLE);
    assert!(actions(&state, &state).is_empty());
}

#[test]
fn column_widening_emits_single_type_change_and_reverses() {
    let existing = load(SIMPLE);
    let mut desired = load(SIMPLE);
    desired[0].tables[0].columns[0].data_type = "BIGINT".to_string();

    let up = actions(&existing, &desired);
    assert_eq!(
        up,
        vec!["ALTER TABLE public.users ALTER COLUMN id TYPE BIGINT;"]
    );

    let snapshot = ExistingState::from_namespaces(&existing);
    let forward = vec![Action::AlterColumnType {
        table: "public.users".to_string(),
        column: "id".to_string(),
        data_type: "BIGINT".to_string(),
    }];
    let down = reverse_actions(&forward, &snapshot);
    assert_eq!(down.len(), 1);
    assert!(down[0].contains("TYPE INTEGER"));
}

#[test]
fn foreign_key_action_change_drops_then_adds() {
    let existing = load(BLOG);
    let mut desired = load(BLOG);
    let fk = desired[0].tables[1]
        .constraints
        .iter_mut()
        .find(|c| c.name == "posts_author_fk")
        .unwrap();
    fk.on_delete = Some(strata_schema::ReferentialAction::SetNull);

    let up = actions(&existing, &desired);
    let dropped = position(&up, "DROP CONSTRAINT posts_author_fk");
    let added = position(&up, "ADD CONSTRAINT posts_author_fk");
    assert!(dropped < added);
    assert!(up[added].contains("ON DELETE SET NULL"));
}

#[test]
fn namespace_teardown_is_single_locked_cascade_drop() {
    let existing = load(SIMPLE);
    let migrators = compare(&existing, &[]);

    assert_eq!(migrators.len(), 1);
    assert!(migrators[0].is_locked());
    assert_eq!(
        migrators[0].actions()[0].to_string(),
        "DROP SCHEMA public CASCADE;"
    );
}

#[test]
fn export_round_trip_diffs_to_zero() {
    let state = load(BLOG);
    let exported = Document::new(state.clone()).to_yaml().unwrap();
    let reloaded = load(&exported);
    assert!(actions(&state, &reloaded).is_empty());
    assert!(actions(&reloaded, &state).is_empty());
}

#[test]
fn down_sql_reverses_forward_order() {
    let up = "CREATE TABLE public.users ();\n\
              ALTER TABLE public.users ADD COLUMN id INTEGER NOT NULL;";
    let down = reverse_sql(up, &ExistingState::new());

    assert_eq!(down.len(), 2);
    assert!(down[0].contains("DROP COLUMN id"));
    assert!(down[1].contains("DROP TABLE public.users"));
}

#[test]
fn fresh_deploy_reverses_to_teardown() {
    let desired = load(SIMPLE);
    let forward: Vec<Action> = compare(&[], &desired)
        .iter()
        .flat_map(|m| m.actions().iter().cloned())
        .collect();

    let down = reverse_actions(&forward, &ExistingState::new());
    assert_eq!(down.len(), forward.len());
    // The last reverse action undoes the first forward action.
    assert_eq!(down.last().unwrap(), "DROP SCHEMA public CASCADE;");
}

#[test]
fn blog_deploy_creates_tables_before_cross_table_fk() {
    let desired = load(BLOG);
    let up = actions(&[], &desired);

    let users = position(&up, "CREATE TABLE public.users ();");
    let posts = position(&up, "CREATE TABLE public.posts ();");
    let fk = position(&up, "ADD CONSTRAINT posts_author_fk FOREIGN KEY");

    assert!(users < fk);
    assert!(posts < fk);
    assert!(up[fk].contains("REFERENCES users (id)"));
    assert!(up[fk].contains("ON DELETE CASCADE"));
}

#[test]
fn explicit_no_action_matches_introspected_default() {
    // The operator spells out ON DELETE/ON UPDATE NO ACTION; the server
    // reports that default as unset. The two must diff to nothing.
    let declared = r#"
namespaces:
  - name: public
    tables:
      - name: posts
        columns:
          - name: author_id
            type: INTEGER
            nullable: true
        constraints:
          - name: posts_author_fk
            type: FOREIGN KEY
            targets: [author_id]
            reference:
              table: users
              columns: [id]
            on_delete: NO ACTION
            on_update: NO ACTION
"#;
    let desired = load(declared);
    assert_eq!(desired[0].tables[0].constraints[0].on_delete, None);
    assert_eq!(desired[0].tables[0].constraints[0].on_update, None);

    // The same foreign key as introspection produces it.
    let introspected = vec![Namespace {
        name: "public".to_string(),
        tables: vec![Table {
            name: "posts".to_string(),
            columns: vec![Column {
                name: "author_id".to_string(),
                data_type: "INTEGER".to_string(),
                max_length: None,
                nullable: true,
                default: None,
                primary_key: false,
            }],
            constraints: vec![Constraint {
                name: "posts_author_fk".to_string(),
                kind: ConstraintKind::ForeignKey,
                targets: vec!["author_id".to_string()],
                reference: Some(Reference {
                    table: "users".to_string(),
                    columns: vec!["id".to_string()],
                }),
                on_delete: None,
                on_update: None,
            }],
            indices: vec![],
        }],
        sequences: vec![],
    }];

    assert!(actions(&introspected, &desired).is_empty());
    assert!(actions(&desired, &introspected).is_empty());
}

#[test]
fn added_nullable_column_diffs_incrementally() {
    let existing = load(SIMPLE);
    let mut desired = load(SIMPLE);
    desired[0].tables[0].columns.push(Column {
        name: "bio".to_string(),
        data_type: "TEXT".to_string(),
        max_length: None,
        nullable: true,
        default: None,
        primary_key: false,
    });

    let up = actions(&existing, &desired);
    assert_eq!(up, vec!["ALTER TABLE public.users ADD COLUMN bio TEXT NULL;"]);
}
