use super::*;

fn view(project: &str, dataset: &str, table: &str) -> ObjectRef {
    ObjectRef::from_parts(project, dataset, table).unwrap()
}

#[test]
fn test_authorizes_view_matches_identity_only() {
    let entry = AccessEntry::authorized_view(view("p", "reporting", "v"));
    assert!(entry.authorizes_view(&view("p", "reporting", "v")));
    assert!(!entry.authorizes_view(&view("p", "reporting", "other")));
    assert!(!entry.authorizes_view(&view("q", "reporting", "v")));
}

#[test]
fn test_member_entry_never_authorizes_view() {
    let entry = AccessEntry::member("READER", "userByEmail", "a@example.com");
    assert!(!entry.authorizes_view(&view("p", "d", "v")));
}

#[test]
fn test_find_view_grant_returns_first_match() {
    let v = view("p", "d", "v");
    let entries = vec![
        AccessEntry::member("OWNER", "specialGroup", "projectOwners"),
        AccessEntry::authorized_view(v.clone()),
        AccessEntry::authorized_view(v.clone()),
    ];
    assert_eq!(find_view_grant(&entries, &v), Some(1));
    assert_eq!(find_view_grant(&entries, &view("p", "d", "x")), None);
}

#[test]
fn test_yaml_shape() {
    let yaml = r#"
- role: READER
  member:
    entity_type: groupByEmail
    entity_id: analysts@example.com
- view:
    project: p
    dataset: reporting
    table: orders_v
"#;
    let entries: Vec<AccessEntry> = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[0],
        AccessEntry::member("READER", "groupByEmail", "analysts@example.com")
    );
    assert!(entries[1].authorizes_view(&view("p", "reporting", "orders_v")));
    assert_eq!(entries[1].role, None);
}

#[test]
fn test_yaml_keeps_extra_attributes() {
    let yaml = r#"
role: READER
member:
  entity_type: userByEmail
  entity_id: a@example.com
extra:
  condition:
    expression: request.time.getHours() < 18
"#;
    let entry: AccessEntry = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        entry.extra["condition"]["expression"],
        "request.time.getHours() < 18"
    );

    let written = serde_yaml::to_string(&entry).unwrap();
    let back: AccessEntry = serde_yaml::from_str(&written).unwrap();
    assert_eq!(back, entry);

    let plain = serde_yaml::to_string(&AccessEntry::authorized_view(view("p", "d", "v"))).unwrap();
    assert!(!plain.contains("extra"));
}

#[test]
fn test_display() {
    let grant = AccessEntry::authorized_view(view("p", "d", "v"));
    assert_eq!(grant.to_string(), "view p:d.v");
    let member = AccessEntry::member("WRITER", "userByEmail", "a@example.com");
    assert_eq!(member.to_string(), "WRITER userByEmail=a@example.com");
}
