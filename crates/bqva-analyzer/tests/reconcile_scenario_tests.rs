//! End-to-end build + reconcile scenarios against the in-memory warehouse

use bqva_analyzer::test_utils::{dataset_of, layered_warehouse, obj, table, view, warehouse_with};
use bqva_analyzer::{EdgeOutcome, Reconciler, TreeBuilder};
use bqva_core::{AccessEntry, DatasetRef, DependencyTree};
use bqva_warehouse::{MemoryWarehouse, WarehouseCall};

async fn build(wh: &MemoryWarehouse, root: &str) -> DependencyTree {
    let tree = TreeBuilder::new(wh).build(&obj(root)).await.unwrap();
    wh.clear_calls().unwrap();
    tree
}

fn access(wh: &MemoryWarehouse, dataset: &DatasetRef) -> Vec<AccessEntry> {
    wh.access_snapshot(dataset).unwrap().unwrap()
}

fn sorted(entries: Vec<AccessEntry>) -> Vec<String> {
    let mut out: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
    out.sort();
    out
}

fn unrelated_entries() -> Vec<AccessEntry> {
    vec![
        AccessEntry::member("OWNER", "specialGroup", "projectOwners"),
        AccessEntry::member("READER", "groupByEmail", "analysts@example.com"),
        AccessEntry::authorized_view(obj("elsewhere:mart.unrelated")),
    ]
}

// ── Idempotence ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_apply_twice_equals_apply_once() {
    let wh = layered_warehouse();
    let raw = dataset_of("p:raw.orders");
    wh.seed_access(raw.clone(), unrelated_entries()).unwrap();
    let tree = build(&wh, "p:reporting.summary").await;
    let reconciler = Reconciler::new(&wh);

    reconciler.apply(&tree).await.unwrap();
    let once: Vec<_> = ["p:raw.x", "p:marts.x", "other:shared.x"]
        .iter()
        .map(|d| access(&wh, &dataset_of(d)))
        .collect();

    wh.clear_calls().unwrap();
    let second = reconciler.apply(&tree).await.unwrap();
    let twice: Vec<_> = ["p:raw.x", "p:marts.x", "other:shared.x"]
        .iter()
        .map(|d| access(&wh, &dataset_of(d)))
        .collect();

    assert_eq!(once, twice);
    assert_eq!(second.changes(), 0);
    assert_eq!(second.count(EdgeOutcome::AlreadyAuthorized), 3);
    assert!(!wh
        .calls()
        .unwrap()
        .iter()
        .any(|c| matches!(c, WarehouseCall::SetAccess(_))));
}

// ── Round trip ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_apply_then_revoke_restores_access_lists() {
    let wh = layered_warehouse();
    let datasets: Vec<DatasetRef> = ["p:raw.x", "p:marts.x", "other:shared.x", "p:reporting.x"]
        .iter()
        .map(|d| dataset_of(d))
        .collect();
    for dataset in &datasets {
        wh.seed_access(dataset.clone(), unrelated_entries()).unwrap();
    }
    let before: Vec<_> = datasets.iter().map(|d| sorted(access(&wh, d))).collect();

    let tree = build(&wh, "p:reporting.summary").await;
    let reconciler = Reconciler::new(&wh);
    reconciler.apply(&tree).await.unwrap();
    assert_eq!(access(&wh, &datasets[0]).len(), 4);

    let report = reconciler.revoke(&tree).await.unwrap();
    assert_eq!(report.count(EdgeOutcome::Revoked), 3);

    let after: Vec<_> = datasets.iter().map(|d| sorted(access(&wh, d))).collect();
    assert_eq!(before, after);
}

// ── Unrelated entries survive ───────────────────────────────────────────

#[tokio::test]
async fn test_apply_appends_without_disturbing_entries() {
    let wh = layered_warehouse();
    let raw = dataset_of("p:raw.orders");
    wh.seed_access(raw.clone(), unrelated_entries()).unwrap();
    let tree = build(&wh, "p:reporting.summary").await;

    Reconciler::new(&wh).apply(&tree).await.unwrap();

    let mut expected = unrelated_entries();
    expected.push(AccessEntry::authorized_view(obj("p:marts.sales")));
    assert_eq!(access(&wh, &raw), expected);
}

// ── Edge locality ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_grants_are_one_hop_only() {
    let wh = layered_warehouse();
    let tree = build(&wh, "p:reporting.summary").await;
    Reconciler::new(&wh).apply(&tree).await.unwrap();

    // raw authorizes its parent (marts.sales), never the grandparent
    let raw = access(&wh, &dataset_of("p:raw.orders"));
    assert!(raw.iter().any(|e| e.authorizes_view(&obj("p:marts.sales"))));
    assert!(!raw.iter().any(|e| e.authorizes_view(&obj("p:reporting.summary"))));
    assert!(access(&wh, &dataset_of("p:reporting.summary")).is_empty());
}

// ── Same-dataset edges ──────────────────────────────────────────────────

#[tokio::test]
async fn test_same_dataset_edges_touch_nothing() {
    let wh = warehouse_with(vec![
        view("p:d.top", "SELECT * FROM d.middle"),
        view("p:d.middle", "SELECT * FROM `p.d.bottom`"),
        table("p:d.bottom"),
    ]);
    let tree = build(&wh, "p:d.top").await;
    let reconciler = Reconciler::new(&wh);

    let applied = reconciler.apply(&tree).await.unwrap();
    let revoked = reconciler.revoke(&tree).await.unwrap();
    let status = reconciler.status(&tree).await.unwrap();

    assert_eq!(applied.count(EdgeOutcome::SameDataset), 2);
    assert_eq!(revoked.count(EdgeOutcome::SameDataset), 2);
    assert!(status.all_authorized());
    assert!(wh.calls().unwrap().is_empty());
}

// ── Duplicate references ────────────────────────────────────────────────

#[tokio::test]
async fn test_duplicate_references_make_duplicate_edges() {
    let wh = warehouse_with(vec![
        view(
            "p:marts.v",
            "SELECT * FROM raw.t AS a JOIN raw.t AS b ON a.parent_id = b.id",
        ),
        table("p:raw.t"),
    ]);
    let tree = build(&wh, "p:marts.v").await;
    assert_eq!(tree.children(tree.root()).len(), 2);

    let report = Reconciler::new(&wh).apply(&tree).await.unwrap();
    assert_eq!(
        report.edges.iter().map(|e| e.outcome).collect::<Vec<_>>(),
        vec![EdgeOutcome::Granted, EdgeOutcome::AlreadyAuthorized]
    );
    assert_eq!(
        access(&wh, &dataset_of("p:raw.t")),
        vec![AccessEntry::authorized_view(obj("p:marts.v"))]
    );

    let revoked = Reconciler::new(&wh).revoke(&tree).await.unwrap();
    assert_eq!(
        revoked.edges.iter().map(|e| e.outcome).collect::<Vec<_>>(),
        vec![EdgeOutcome::Revoked, EdgeOutcome::NotAuthorized]
    );
    assert!(access(&wh, &dataset_of("p:raw.t")).is_empty());
}

#[tokio::test]
async fn test_dry_run_duplicate_edges_match_a_real_run() {
    let wh = warehouse_with(vec![
        view(
            "p:marts.v",
            "SELECT * FROM raw.t AS a JOIN raw.t AS b ON a.parent_id = b.id",
        ),
        table("p:raw.t"),
    ]);
    let tree = build(&wh, "p:marts.v").await;
    let raw = dataset_of("p:raw.t");

    let planned = Reconciler::new(&wh).dry_run(true).apply(&tree).await.unwrap();
    assert_eq!(
        planned.edges.iter().map(|e| e.outcome).collect::<Vec<_>>(),
        vec![EdgeOutcome::Granted, EdgeOutcome::AlreadyAuthorized]
    );
    assert_eq!(planned.changes(), 1);
    assert!(access(&wh, &raw).is_empty());
    // the second edge uses the pending list instead of re-reading
    assert_eq!(wh.calls().unwrap(), vec![WarehouseCall::GetAccess(raw.clone())]);

    Reconciler::new(&wh).apply(&tree).await.unwrap();
    wh.clear_calls().unwrap();

    let planned = Reconciler::new(&wh).dry_run(true).revoke(&tree).await.unwrap();
    assert_eq!(
        planned.edges.iter().map(|e| e.outcome).collect::<Vec<_>>(),
        vec![EdgeOutcome::Revoked, EdgeOutcome::NotAuthorized]
    );
    assert_eq!(planned.changes(), 1);
    assert_eq!(
        access(&wh, &raw),
        vec![AccessEntry::authorized_view(obj("p:marts.v"))]
    );
}

// ── Partial failure ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_failure_midway_keeps_earlier_grants() {
    let wh = layered_warehouse();
    let tree = build(&wh, "p:reporting.summary").await;
    // Edges in level order: marts, shared, raw, (marts same-dataset)
    let shared = dataset_of("other:shared.calendar");
    wh.set_read_only(&shared, true).unwrap();

    let err = Reconciler::new(&wh).apply(&tree).await.unwrap_err();
    assert!(err.is_access_control());

    // marts was granted before the failure and is not rolled back
    assert_eq!(
        access(&wh, &dataset_of("p:marts.sales")),
        vec![AccessEntry::authorized_view(obj("p:reporting.summary"))]
    );
    assert!(access(&wh, &shared).is_empty());
    // raw comes after the failing edge and was never reached
    assert!(access(&wh, &dataset_of("p:raw.orders")).is_empty());
    assert!(!wh
        .calls()
        .unwrap()
        .contains(&WarehouseCall::GetAccess(dataset_of("p:raw.orders"))));
}

#[tokio::test]
async fn test_revoke_failure_midway_keeps_earlier_revocations() {
    let wh = layered_warehouse();
    let tree = build(&wh, "p:reporting.summary").await;
    Reconciler::new(&wh).apply(&tree).await.unwrap();

    let shared = dataset_of("other:shared.calendar");
    wh.set_read_only(&shared, true).unwrap();
    let err = Reconciler::new(&wh).revoke(&tree).await.unwrap_err();
    assert!(err.is_access_control());

    assert!(access(&wh, &dataset_of("p:marts.sales")).is_empty());
    assert_eq!(access(&wh, &shared).len(), 1);
    assert_eq!(access(&wh, &dataset_of("p:raw.orders")).len(), 1);
}
