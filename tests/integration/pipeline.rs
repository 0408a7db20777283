use gitk_graph::git::StaticLog;
use gitk_graph::models::ConnectorKind;
use gitk_graph::{GraphConfig, GraphError, HistoryBuilder, HistoryController};
use pretty_assertions::assert_eq;

use crate::test_utils::*;

#[test]
fn test_merged_feature_layout() -> anyhow::Result<()> {
    let view = HistoryBuilder::new(&pipe_config())?.build(&merged_feature_log())?;
    let layout = &view.layout;

    assert_eq!(layout.len(), 5);
    assert_eq!(layout.connectors.len(), 5);

    // f2 inherits the feature lane from f1; b forks off the shared root
    let f1 = layout.position("f1").unwrap();
    let f2 = layout.position("f2").unwrap();
    let b = layout.position("b").unwrap();
    assert_eq!(f1.lane, f2.lane);
    assert_ne!(b.lane, f2.lane);

    let m = layout.position("m").unwrap();
    assert_eq!(m.column, (b.lane + f2.lane) as f32 / 2.0);
    assert_eq!(layout.connector("f2", "f1").unwrap().kind, ConnectorKind::Direct);

    let refs: Vec<&str> = view.commits[0].refs.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(refs, vec!["HEAD", "main", "origin/main"]);
    Ok(())
}

#[test]
fn test_layout_is_reproducible() -> anyhow::Result<()> {
    let builder = HistoryBuilder::new(&pipe_config())?;
    let first = builder.build(&merged_feature_log())?;
    let second = builder.build(&merged_feature_log())?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_rows_are_unique() -> anyhow::Result<()> {
    let view = HistoryBuilder::new(&pipe_config())?.build(&merged_feature_log())?;
    let mut rows: Vec<usize> = view.layout.nodes.iter().map(|n| n.row).collect();
    rows.dedup();
    assert_eq!(rows, (0..5).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_view_serializes_to_json() -> anyhow::Result<()> {
    let view = HistoryBuilder::new(&pipe_config())?.build(&merged_feature_log())?;
    let json = serde_json::to_value(&view)?;

    assert_eq!(json["layout"]["nodes"].as_array().map(Vec::len), Some(5));
    assert!(json["layout"]["connectors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["kind"]["kind"] == "routed"));
    Ok(())
}

#[test]
fn test_truncated_history() -> anyhow::Result<()> {
    let text = [
        log_line("c", &["b"], "alice", 300, "Third", "main"),
        log_line("b", &["a"], "alice", 200, "Second", ""),
    ]
    .join("\n");
    let view = HistoryBuilder::new(&pipe_config())?.build(&text)?;

    assert!(view.partial_history);
    assert!(view.layout.position("a").is_none());
    assert_eq!(view.layout.connectors.len(), 1);
    assert_eq!(view.commits[1].dangling_parents, vec!["a"]);
    Ok(())
}

#[tokio::test]
async fn test_controller_keeps_last_good_view() -> anyhow::Result<()> {
    let controller = HistoryController::new(&pipe_config())?;
    controller.refresh(&StaticLog::new(merged_feature_log())).await?;

    let duplicate = [log_line("a", &[], "x", 1, "one", ""), log_line("a", &[], "x", 2, "two", "")].join("\n");
    let err = controller.refresh(&StaticLog::new(duplicate)).await.unwrap_err();

    assert!(matches!(err, GraphError::DuplicateHash { .. }));
    assert_eq!(controller.current().layout.len(), 5);
    assert!(controller.last_error().unwrap().contains("more than once"));
    Ok(())
}

#[test]
fn test_real_repository_history() -> anyhow::Result<()> {
    if !git_available() {
        return Ok(());
    }
    let (_temp_dir, repo_path) = create_merged_repo()?;
    let config = GraphConfig::default();
    let text = read_git_log(&repo_path, &config)?;

    let view = HistoryBuilder::new(&config)?.build(&text)?;
    assert!(view.warnings.is_empty());
    assert_eq!(view.layout.len(), 4);
    assert_eq!(view.layout.connectors.len(), 4);
    assert!(!view.partial_history);

    let head = &view.commits[0];
    assert!(head.is_merge);
    assert!(head.refs.iter().any(|r| r.name == "main" && r.is_head));
    Ok(())
}
