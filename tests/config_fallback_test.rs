use anyhow::Result;
use da_resolver::core::ConfigProvider;
use da_resolver::utils::validation::Validate;
use da_resolver::{
    FallbackTable, InMemoryDirectory, MatchPolicy, OutcomeKind, ResolutionOutcome, Resolver,
    TomlConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// 從設定檔載入備援表並在離線狀態下查詢
#[tokio::test]
async fn test_configured_fallback_table_replaces_builtin() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("resolver.toml");
    tokio::fs::write(
        &config_path,
        r#"
[matching]
policy = "case_insensitive"

[[fallback]]
match_key = "DA.SAPPORO"
postal_code = "0600001"
full_address = "北海道札幌市中央区北一条西二丁目"

[[fallback]]
match_key = "DA."
postal_code = "100-0001"
full_address = "東京都千代田区千代田1番"
"#,
    )
    .await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    let table = config.fallback_table()?.expect("rows configured");

    let resolver = Resolver::new(InMemoryDirectory::offline())
        .with_fallback(Arc::new(table))
        .with_policy(config.match_policy());

    let outcome = resolver.resolve_input("da.sapporo.1-2").await;
    let record = outcome.record().expect("resolved");
    assert_eq!(record.postal_code().as_str(), "060-0001");
    assert_eq!(record.digital_address().as_str(), "da.sapporo.1-2");

    // 表格順序優先：第二列也會命中，但第一列先比對
    let outcome = resolver.resolve_input("DA.SAPPORO.DA.").await;
    assert_eq!(outcome.record().unwrap().postal_code().as_str(), "060-0001");

    // 內建表已被取代
    let outcome = resolver.resolve_input("東京都新宿区西新宿2-8-1").await;
    assert_eq!(outcome, ResolutionOutcome::NotFound);

    Ok(())
}

#[test]
fn test_verbatim_policy_is_default() {
    let resolver = Resolver::new(InMemoryDirectory::offline());
    let table = FallbackTable::from_rows([("DA.TOKYO", "100-0001", "東京都千代田区千代田1番")])
        .unwrap();
    let resolver = resolver.with_fallback(Arc::new(table));

    let upper = tokio_test::block_on(resolver.resolve_input("DA.TOKYO.1"));
    let lower = tokio_test::block_on(resolver.resolve_input("da.tokyo.1"));
    assert_eq!(upper.kind(), OutcomeKind::Resolved);
    assert_eq!(lower.kind(), OutcomeKind::NotFound);
    assert_eq!(MatchPolicy::default(), MatchPolicy::Verbatim);
}

#[tokio::test]
async fn test_demo_directory_prefers_remote_answer() {
    let resolver = Resolver::new(InMemoryDirectory::demo());

    // 完全符合展示資料
    let outcome = resolver.resolve_input("大阪府大阪市北区梅田1-1-1").await;
    assert_eq!(outcome.record().unwrap().postal_code().as_str(), "530-0001");

    // 遠端可用且回覆查無資料時，不會再查備援表
    let outcome = resolver.resolve_input("大阪府大阪市北区梅田9-9-9").await;
    assert_eq!(outcome, ResolutionOutcome::NotFound);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_requests_run_independently() {
    let resolver = Resolver::new(InMemoryDirectory::demo().with_latency(Duration::from_secs(1)));

    let (first, second, third) = tokio::join!(
        resolver.resolve_input("東京都新宿区西新宿2-8-1"),
        resolver.resolve_input("神奈川県横浜市西区みなとみらい2-2-1"),
        resolver.resolve_input("  "),
    );

    assert_eq!(first.record().unwrap().postal_code().as_str(), "163-8001");
    assert_eq!(second.record().unwrap().postal_code().as_str(), "220-8120");
    assert_eq!(third.kind(), OutcomeKind::InvalidInput);
}
