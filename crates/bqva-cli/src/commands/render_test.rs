use super::*;
use bqva_analyzer::test_utils::{layered_warehouse, obj};
use bqva_analyzer::{Reconciler, TreeBuilder};
use bqva_warehouse::MemoryWarehouse;

async fn layered_tree(wh: &MemoryWarehouse) -> DependencyTree {
    TreeBuilder::new(wh)
        .build(&obj("p:reporting.summary"))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_format_tree_plain() {
    let wh = layered_warehouse();
    let tree = layered_tree(&wh).await;
    let text = format_tree(&tree, None, Palette::plain());
    assert_eq!(
        text,
        "p:reporting.summary\n\
         ├── p:marts.sales\n\
         │   ├── p:raw.orders\n\
         │   └── p:marts.fx_rates\n\
         └── other:shared.calendar\n"
    );
}

#[tokio::test]
async fn test_format_tree_with_status() {
    let wh = layered_warehouse();
    let tree = layered_tree(&wh).await;
    let status = Reconciler::new(&wh).status(&tree).await.unwrap();
    let text = format_tree(&tree, Some(&status), Palette::plain());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "p:reporting.summary");
    assert!(lines[1].ends_with("p:marts.sales ⨯"));
    assert!(lines[3].ends_with("p:marts.fx_rates ✓"));
}

#[tokio::test]
async fn test_colours_when_enabled() {
    let wh = layered_warehouse();
    let tree = layered_tree(&wh).await;
    let text = format_tree(&tree, None, Palette { enabled: true });
    assert!(text.starts_with("\x1b[36mp\x1b[0m:\x1b[33mreporting\x1b[0m.\x1b[32msummary\x1b[0m"));
    assert!(text.contains("\x1b[31morders\x1b[0m"));
}

#[test]
fn test_key_lists_every_colour() {
    let key = format_key(Palette::plain());
    assert_eq!(key, "Key:\n◉ Project\n◉ Dataset\n◉ Table\n◉ View\n");
}

#[tokio::test]
async fn test_tree_json() {
    let wh = layered_warehouse();
    let tree = layered_tree(&wh).await;
    let status = Reconciler::new(&wh).status(&tree).await.unwrap();
    let json = tree_json(&tree, Some(&status));

    assert_eq!(json["name"], "summary");
    assert_eq!(json["kind"], "VIEW");
    assert!(json.get("authorized").is_none());
    assert_eq!(json["children"][0]["name"], "sales");
    assert_eq!(json["children"][0]["authorized"], false);
    assert_eq!(json["children"][0]["children"][1]["authorized"], true);
    assert_eq!(json["children"][1]["project"], "other");
    assert_eq!(json["children"][1]["kind"], "TABLE");
}

#[tokio::test]
async fn test_format_report() {
    let wh = layered_warehouse();
    let tree = layered_tree(&wh).await;
    let report = Reconciler::new(&wh).dry_run(true).apply(&tree).await.unwrap();
    let text = format_report(&report, Palette::plain());

    assert!(text.contains("  p:marts.sales <- p:reporting.summary: granted\n"));
    assert!(text.contains("  p:marts.fx_rates <- p:marts.sales: same dataset\n"));
    assert!(text.ends_with("authorize: would change 3 of 4 edge(s) (dry run)\n"));
}
