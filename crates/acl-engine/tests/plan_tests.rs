//! Tests for the desired vs live diff.

use acl_engine::{
    derive, diff, AclEntry, ActionKind, Group, MembershipSet, Role, RuleTable, Scope, ScopeType,
};

const ME: &str = "me@x";

fn entry(scope_type: ScopeType, value: &str, role: Role) -> AclEntry {
    AclEntry {
        id: format!("{}:{}", scope_type, value),
        scope: Scope::new(scope_type, value),
        role,
    }
}

fn owner() -> AclEntry {
    entry(ScopeType::User, ME, Role::Owner)
}

fn plan_for(rows: &[[&str; 3]], groups: &[&str], live: &[AclEntry]) -> acl_engine::Plan {
    let table = RuleTable::load(rows.iter().copied()).unwrap();
    let membership = MembershipSet::from_external(groups.iter().map(|g| Group::new(*g)));
    diff(ME, &derive(ME, &membership, &table), live)
}

#[test]
fn missing_grant_is_added() {
    let plan = plan_for(&[["eng", "ops@x", "writer"]], &["eng"], &[owner()]);
    assert_eq!(plan.actions.len(), 1);
    let add = &plan.actions[0];
    assert_eq!(add.kind, ActionKind::Add);
    assert_eq!(add.identity, "ops@x");
    assert_eq!(add.entry_id, None);
    assert_eq!(add.before, None);
    assert_eq!(add.after, Some(Role::Writer));
    assert_eq!(plan.preserved, vec![owner()]);
}

#[test]
fn differing_role_is_updated_in_place() {
    let live = vec![owner(), entry(ScopeType::Group, "ops@x", Role::Writer)];
    let plan = plan_for(&[["eng", "ops@x", "reader"]], &["eng"], &live);

    assert_eq!(plan.actions.len(), 1);
    let update = &plan.actions[0];
    assert_eq!(update.kind, ActionKind::Update);
    assert_eq!(update.scope_type, ScopeType::Group);
    assert_eq!(update.entry_id.as_deref(), Some("group:ops@x"));
    assert_eq!(update.before, Some(Role::Writer));
    assert_eq!(update.after, Some(Role::Reader));
}

#[test]
fn equal_role_is_noop() {
    let live = vec![owner(), entry(ScopeType::User, "ops@x", Role::Writer)];
    let plan = plan_for(&[["eng", "ops@x", "writer"]], &["eng"], &live);
    assert_eq!(plan.actions.len(), 1);
    assert_eq!(plan.actions[0].kind, ActionKind::NoOp);
    assert!(plan.is_converged());
}

#[test]
fn undesired_entry_is_removed() {
    let live = vec![owner(), entry(ScopeType::Group, "old@x", Role::Reader)];
    let plan = plan_for(&[], &["eng"], &live);
    assert_eq!(plan.actions.len(), 1);
    assert_eq!(plan.actions[0].kind, ActionKind::Remove);
    assert_eq!(plan.actions[0].identity, "old@x");
    assert_eq!(plan.actions[0].after, None);
}

#[test]
fn owner_entry_is_preserved_even_with_other_roles() {
    let live = vec![entry(ScopeType::User, "ME@x", Role::Reader)];
    let plan = plan_for(&[], &[], &live);
    assert!(plan.actions.is_empty());
    assert_eq!(plan.preserved.len(), 1);
}

#[test]
fn domain_and_default_scopes_are_preserved() {
    let live = vec![
        owner(),
        entry(ScopeType::Domain, "x.com", Role::FreeBusyReader),
        AclEntry {
            id: "default".to_string(),
            scope: Scope::new(ScopeType::Default, ""),
            role: Role::FreeBusyReader,
        },
    ];
    let plan = plan_for(&[], &[], &live);
    assert!(plan.actions.is_empty());
    assert_eq!(plan.preserved.len(), 3);
}

#[test]
fn matching_is_case_insensitive() {
    let live = vec![owner(), entry(ScopeType::User, "Ops@X", Role::Writer)];
    let plan = plan_for(&[["eng", "ops@x", "writer"]], &["eng"], &live);
    assert_eq!(plan.actions.len(), 1);
    assert_eq!(plan.actions[0].kind, ActionKind::NoOp);
}

#[test]
fn duplicate_live_entries_keep_the_one_with_desired_role() {
    let live = vec![
        owner(),
        entry(ScopeType::Group, "ops@x", Role::Reader),
        entry(ScopeType::User, "ops@x", Role::Writer),
    ];
    let plan = plan_for(&[["eng", "ops@x", "writer"]], &["eng"], &live);

    let changes: Vec<_> = plan.actions.iter().filter(|a| a.kind.is_change()).collect();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ActionKind::Remove);
    assert_eq!(changes[0].entry_id.as_deref(), Some("group:ops@x"));

    let kept: Vec<_> = plan.of_kind(ActionKind::NoOp).collect();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].entry_id.as_deref(), Some("user:ops@x"));
}

#[test]
fn duplicate_with_desired_role_wins_even_when_listed_last() {
    let live = vec![
        owner(),
        entry(ScopeType::User, "ops@x", Role::Reader),
        entry(ScopeType::Group, "ops@x", Role::Writer),
    ];
    let plan = plan_for(&[["eng", "ops@x", "writer"]], &["eng"], &live);

    let order: Vec<(ActionKind, Option<&str>)> = plan
        .actions
        .iter()
        .map(|a| (a.kind, a.entry_id.as_deref()))
        .collect();
    assert_eq!(
        order,
        vec![
            (ActionKind::NoOp, Some("group:ops@x")),
            (ActionKind::Remove, Some("user:ops@x")),
        ]
    );
}

#[test]
fn duplicates_without_desired_role_prefer_grant_scope_type() {
    let live = vec![
        owner(),
        entry(ScopeType::Group, "ops@x", Role::Reader),
        entry(ScopeType::User, "ops@x", Role::FreeBusyReader),
    ];
    let plan = plan_for(&[["eng", "ops@x", "writer"]], &["eng"], &live);

    let update: Vec<_> = plan.of_kind(ActionKind::Update).collect();
    assert_eq!(update.len(), 1);
    assert_eq!(update[0].entry_id.as_deref(), Some("user:ops@x"));
    let removed: Vec<_> = plan.of_kind(ActionKind::Remove).collect();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].entry_id.as_deref(), Some("group:ops@x"));
}

#[test]
fn duplicates_fall_back_to_first_in_live_order() {
    let table = RuleTable::load(vec![vec!["eng", "ops@x", "writer", "group"]]).unwrap();
    let membership = MembershipSet::from_external(vec![Group::new("eng")]);
    let live = vec![
        owner(),
        entry(ScopeType::User, "ops@x", Role::Reader),
        AclEntry {
            id: "user:ops-alias".to_string(),
            scope: Scope::new(ScopeType::User, "OPS@x"),
            role: Role::FreeBusyReader,
        },
    ];
    let plan = diff(ME, &derive(ME, &membership, &table), &live);

    let update: Vec<_> = plan.of_kind(ActionKind::Update).collect();
    assert_eq!(update.len(), 1);
    assert_eq!(update[0].entry_id.as_deref(), Some("user:ops@x"));
    assert_eq!(plan.of_kind(ActionKind::Remove).count(), 1);
}

#[test]
fn actions_are_ordered_add_update_noop_remove() {
    let live = vec![
        owner(),
        entry(ScopeType::User, "gone@x", Role::Reader),
        entry(ScopeType::User, "same@x", Role::Reader),
        entry(ScopeType::User, "changed@x", Role::Reader),
    ];
    let plan = plan_for(
        &[
            ["eng", "same@x", "reader"],
            ["eng", "changed@x", "writer"],
            ["eng", "new-b@x", "reader"],
            ["eng", "new-a@x", "reader"],
        ],
        &["eng"],
        &live,
    );

    let order: Vec<(ActionKind, &str)> = plan
        .actions
        .iter()
        .map(|a| (a.kind, a.identity.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (ActionKind::Add, "new-a@x"),
            (ActionKind::Add, "new-b@x"),
            (ActionKind::Update, "changed@x"),
            (ActionKind::NoOp, "same@x"),
            (ActionKind::Remove, "gone@x"),
        ]
    );
    assert_eq!(plan.of_kind(ActionKind::Add).count(), 2);
    assert!(!plan.is_converged());
}
