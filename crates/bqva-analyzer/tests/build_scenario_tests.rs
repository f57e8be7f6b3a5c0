//! Dependency tree construction scenarios

use bqva_analyzer::test_utils::{legacy_view, obj, table, view, warehouse_with};
use bqva_analyzer::{AnalyzerError, TreeBuilder};
use bqva_warehouse::WarehouseCall;

// ── Fail fast ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_dependency_aborts_build() {
    let wh = warehouse_with(vec![
        view("p:a.top", "SELECT * FROM b.missing JOIN c.present ON TRUE"),
        table("p:c.present"),
    ]);
    let err = TreeBuilder::new(&wh)
        .build(&obj("p:a.top"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    // nothing after the failed lookup is resolved
    assert!(!wh
        .calls()
        .unwrap()
        .contains(&WarehouseCall::Resolve(obj("p:c.present"))));
}

#[tokio::test]
async fn test_missing_deep_dependency_aborts_build() {
    let wh = warehouse_with(vec![
        view("p:a.top", "SELECT * FROM b.mid"),
        view("p:b.mid", "SELECT * FROM c.gone"),
    ]);
    let result = TreeBuilder::new(&wh).build(&obj("p:a.top")).await;
    assert!(matches!(result, Err(ref e) if e.is_not_found()));
}

// ── Invalid root ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_table_root_is_invalid_kind() {
    let wh = warehouse_with(vec![table("p:raw.orders")]);
    let err = TreeBuilder::new(&wh)
        .build(&obj("p:raw.orders"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("[A001]"));
}

// ── Project inheritance ─────────────────────────────────────────────────

#[tokio::test]
async fn test_unqualified_reference_uses_immediate_view_project() {
    let wh = warehouse_with(vec![
        view("root-proj:a.top", "SELECT * FROM `mid-proj.b.mid`"),
        view("mid-proj:b.mid", "SELECT * FROM c.leaf"),
        table("mid-proj:c.leaf"),
        table("root-proj:c.leaf"),
    ]);
    let tree = TreeBuilder::new(&wh)
        .build(&obj("root-proj:a.top"))
        .await
        .unwrap();

    let mid = tree.children(tree.root())[0];
    let leaf = tree.children(mid)[0];
    assert_eq!(tree.object(leaf).reference(), &obj("mid-proj:c.leaf"));
}

// ── Ordering ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_children_follow_query_order() {
    let wh = warehouse_with(vec![
        view(
            "p:a.v",
            "SELECT * FROM z.last_alpha JOIN a.first_alpha ON TRUE JOIN m.middle ON TRUE",
        ),
        table("p:z.last_alpha"),
        table("p:a.first_alpha"),
        table("p:m.middle"),
    ]);
    let tree = TreeBuilder::new(&wh).build(&obj("p:a.v")).await.unwrap();
    let names: Vec<String> = tree
        .children(tree.root())
        .iter()
        .map(|id| tree.object(*id).reference().table.to_string())
        .collect();
    assert_eq!(names, vec!["last_alpha", "first_alpha", "middle"]);
}

#[tokio::test]
async fn test_commented_references_are_not_resolved() {
    let wh = warehouse_with(vec![
        view(
            "p:a.v",
            "/* FROM x.fake */ SELECT * -- JOIN y.fake\nFROM b.real",
        ),
        table("p:b.real"),
    ]);
    let tree = TreeBuilder::new(&wh).build(&obj("p:a.v")).await.unwrap();
    assert_eq!(tree.len(), 2);
}

// ── Mixed dialects ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_each_view_uses_its_own_dialect() {
    let wh = warehouse_with(vec![
        view("p:a.modern", "SELECT * FROM `p.b.old`"),
        legacy_view("p:b.old", "SELECT * FROM [p:c.base]"),
        table("p:c.base"),
    ]);
    let tree = TreeBuilder::new(&wh)
        .build(&obj("p:a.modern"))
        .await
        .unwrap();
    assert_eq!(tree.len(), 3);
    let old = tree.children(tree.root())[0];
    assert_eq!(tree.object(tree.children(old)[0]).reference(), &obj("p:c.base"));
}

// ── Cycles ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_two_view_cycle_is_reported() {
    let wh = warehouse_with(vec![
        view("p:a.first", "SELECT * FROM b.second"),
        view("p:b.second", "SELECT * FROM a.first"),
    ]);
    let err = TreeBuilder::new(&wh)
        .build(&obj("p:a.first"))
        .await
        .unwrap_err();
    match err {
        AnalyzerError::CyclicDependency { path } => {
            assert_eq!(path, vec!["p:a.first", "p:b.second", "p:a.first"]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[tokio::test]
async fn test_diamond_is_not_a_cycle() {
    let wh = warehouse_with(vec![
        view("p:a.top", "SELECT * FROM b.left JOIN c.right ON TRUE"),
        view("p:b.left", "SELECT * FROM d.base"),
        view("p:c.right", "SELECT * FROM d.base"),
        table("p:d.base"),
    ]);
    let tree = TreeBuilder::new(&wh).build(&obj("p:a.top")).await.unwrap();
    assert_eq!(tree.len(), 5);
}
