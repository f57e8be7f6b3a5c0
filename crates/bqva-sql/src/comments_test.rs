use super::*;

#[test]
fn test_line_comment_removed_to_end_of_line() {
    let out = strip_comments("SELECT 1 -- FROM d.t\nFROM d.u");
    assert_eq!(out, "SELECT 1  \nFROM d.u");
}

#[test]
fn test_block_comment_spanning_lines() {
    let out = strip_comments("/*\nFROM d.t\n*/SELECT 2");
    assert_eq!(out, " SELECT 2");
}

#[test]
fn test_block_comment_is_not_greedy() {
    let out = strip_comments("/* a */ keep /* b */");
    assert_eq!(out, "  keep  ");
}

#[test]
fn test_decorated_block_comment() {
    let out = strip_comments("JOIN\n/********\n*    FROM\n*******/\n d.t");
    assert_eq!(out, "JOIN\n \n d.t");
}

#[test]
fn test_no_comments_borrows() {
    let out = strip_comments("SELECT * FROM d.t");
    assert!(matches!(out, Cow::Borrowed(_)));
}
