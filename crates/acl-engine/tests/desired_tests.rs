//! Tests for desired-state derivation.

use acl_engine::{derive, Group, MembershipSet, Role, RuleTable, ScopeType};

fn membership(groups: &[&str]) -> MembershipSet {
    MembershipSet::from_external(groups.iter().map(|g| Group::new(*g)))
}

fn rules(rows: &[[&str; 3]]) -> RuleTable {
    RuleTable::load(rows.iter().copied()).unwrap()
}

#[test]
fn only_rules_of_member_groups_apply() {
    let table = rules(&[
        ["eng", "ops@x", "writer"],
        ["sales", "crm@x", "reader"],
    ]);
    let desired = derive("me@x", &membership(&["eng"]), &table);

    assert_eq!(desired.len(), 1);
    let grant = desired.get("ops@x").unwrap();
    assert_eq!(grant.role, Role::Writer);
    assert_eq!(grant.scope_type, ScopeType::User);
    assert!(!desired.contains("crm@x"));
}

#[test]
fn most_permissive_role_wins() {
    let table = rules(&[["eng", "ops@x", "reader"], ["infra", "ops@x", "writer"]]);
    let desired = derive("me@x", &membership(&["eng", "infra"]), &table);
    assert_eq!(desired.get("ops@x").unwrap().role, Role::Writer);
}

#[test]
fn most_permissive_merge_ignores_rule_order() {
    let forward = rules(&[["eng", "ops@x", "writer"], ["eng", "ops@x", "reader"]]);
    let backward = rules(&[["eng", "ops@x", "reader"], ["eng", "ops@x", "writer"]]);
    let groups = membership(&["eng"]);

    assert_eq!(derive("me@x", &groups, &forward).get("ops@x").unwrap().role, Role::Writer);
    assert_eq!(derive("me@x", &groups, &backward).get("ops@x").unwrap().role, Role::Writer);
}

#[test]
fn owner_beats_everything() {
    let table = rules(&[
        ["a", "t@x", "freeBusyReader"],
        ["b", "t@x", "owner"],
        ["c", "t@x", "writer"],
    ]);
    let desired = derive("me@x", &membership(&["a", "b", "c"]), &table);
    assert_eq!(desired.get("t@x").unwrap().role, Role::Owner);
}

#[test]
fn rules_targeting_the_subject_are_skipped() {
    let table = rules(&[["eng", "Me@X", "owner"], ["eng", "ops@x", "reader"]]);
    let desired = derive("me@x", &membership(&["eng"]), &table);
    assert!(!desired.contains("me@x"));
    assert_eq!(desired.len(), 1);
}

#[test]
fn scope_type_follows_the_winning_rule() {
    let table = RuleTable::load(vec![
        vec!["eng", "team@x", "reader", "group"],
        vec!["infra", "team@x", "writer", "user"],
    ])
    .unwrap();
    let desired = derive("me@x", &membership(&["eng", "infra"]), &table);
    let grant = desired.get("team@x").unwrap();
    assert_eq!(grant.role, Role::Writer);
    assert_eq!(grant.scope_type, ScopeType::User);
}

#[test]
fn tie_keeps_first_contributing_scope_type() {
    let table = RuleTable::load(vec![
        vec!["alpha", "team@x", "reader", "group"],
        vec!["beta", "team@x", "reader", "user"],
    ])
    .unwrap();
    let desired = derive("me@x", &membership(&["beta", "alpha"]), &table);
    assert_eq!(desired.get("team@x").unwrap().scope_type, ScopeType::Group);
}

#[test]
fn no_membership_means_nothing_desired() {
    let table = rules(&[["eng", "ops@x", "writer"]]);
    assert!(derive("me@x", &MembershipSet::default(), &table).is_empty());
}

#[test]
fn grants_iterate_in_identity_order() {
    let table = rules(&[
        ["eng", "zed@x", "reader"],
        ["eng", "amy@x", "reader"],
        ["eng", "kim@x", "reader"],
    ]);
    let desired = derive("me@x", &membership(&["eng"]), &table);
    let targets: Vec<&str> = desired.iter().map(|g| g.target_identity.as_str()).collect();
    assert_eq!(targets, vec!["amy@x", "kim@x", "zed@x"]);
}
