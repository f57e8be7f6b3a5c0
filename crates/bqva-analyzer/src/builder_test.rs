use super::*;
use crate::test_utils::{layered_warehouse, legacy_view, obj, table, view, warehouse_with};
use bqva_warehouse::WarehouseCall;

fn refs(tree: &DependencyTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|id| tree.object(*id).reference().to_string())
        .collect()
}

#[tokio::test]
async fn test_build_layered_tree() {
    let wh = layered_warehouse();
    let tree = TreeBuilder::new(&wh)
        .build(&obj("p:reporting.summary"))
        .await
        .unwrap();

    assert_eq!(tree.len(), 5);
    let root = tree.root();
    assert_eq!(
        refs(&tree, tree.children(root)),
        vec!["p:marts.sales", "other:shared.calendar"]
    );
    let sales = tree.children(root)[0];
    assert_eq!(
        refs(&tree, tree.children(sales)),
        vec!["p:raw.orders", "p:marts.fx_rates"]
    );
}

#[tokio::test]
async fn test_resolution_is_depth_first() {
    let wh = layered_warehouse();
    TreeBuilder::new(&wh)
        .build(&obj("p:reporting.summary"))
        .await
        .unwrap();

    let order: Vec<String> = wh
        .calls()
        .unwrap()
        .into_iter()
        .map(|call| match call {
            WarehouseCall::Resolve(r) => r.to_string(),
            other => panic!("unexpected call {:?}", other),
        })
        .collect();
    assert_eq!(
        order,
        vec![
            "p:reporting.summary",
            "p:marts.sales",
            "p:raw.orders",
            "p:marts.fx_rates",
            "other:shared.calendar",
        ]
    );
}

#[tokio::test]
async fn test_root_must_be_view() {
    let wh = warehouse_with(vec![table("p:raw.orders")]);
    let err = TreeBuilder::new(&wh)
        .build(&obj("p:raw.orders"))
        .await
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::InvalidKind { kind: "TABLE", .. }));
    assert_eq!(wh.calls().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_root_is_not_found() {
    let wh = warehouse_with(vec![]);
    let err = TreeBuilder::new(&wh)
        .build(&obj("p:d.v"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_view_without_references_is_a_single_node() {
    let wh = warehouse_with(vec![view("p:d.v", "SELECT 1 AS one")]);
    let tree = TreeBuilder::new(&wh).build(&obj("p:d.v")).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert!(tree.edges().is_empty());
}

#[tokio::test]
async fn test_legacy_view_children() {
    let wh = warehouse_with(vec![
        legacy_view("p:d.v", "SELECT * FROM [p:raw.a] JOIN [raw.b] ON a.id = b.id"),
        table("p:raw.a"),
        table("p:raw.b"),
    ]);
    let tree = TreeBuilder::new(&wh).build(&obj("p:d.v")).await.unwrap();
    assert_eq!(
        refs(&tree, tree.children(tree.root())),
        vec!["p:raw.a", "p:raw.b"]
    );
}

#[tokio::test]
async fn test_self_reference_is_a_cycle() {
    let wh = warehouse_with(vec![view("p:d.v", "SELECT * FROM d.v")]);
    let err = TreeBuilder::new(&wh).build(&obj("p:d.v")).await.unwrap_err();
    match err {
        AnalyzerError::CyclicDependency { path } => {
            assert_eq!(path, vec!["p:d.v", "p:d.v"]);
        }
        other => panic!("expected cycle, got {:?}", other),
    }
}
