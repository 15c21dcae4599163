//! 전역 로거 통합 테스트
//!
//! 로거 생성은 전역 로거를 교체하므로 순서가 보장되도록 하나의 테스트에서 검증합니다.

use anyhow::Result;
use logger::logging::{global, init_logging, init_registry, LogConfig, PathResolver};
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_global_logger_follows_latest_build() -> Result<()> {
    let temp_dir = TempDir::new()?;

    // 초기 전역 로거는 아무것도 기록하지 않음
    let initial = global::logger();
    assert!(initial.core().cores().is_empty());
    initial.error("dropped", &[]);

    let base = temp_dir.path().to_path_buf();
    let resolver: PathResolver = Arc::new(move |_path: &str, file_name: &str| {
        base.join(file_name).to_string_lossy().into_owned()
    });
    let registry = init_registry(Some(resolver));

    let first_path = temp_dir.path().join("first.log");
    registry.make_logger(LogConfig {
        level: "info".to_string(),
        format: "json".to_string(),
        suffix: "first".to_string(),
        file_path: first_path.to_string_lossy().into_owned(),
        ..Default::default()
    });

    let first = registry.get_logger("first").expect("first");
    assert!(global::logger().shares_core_with(&first));

    global::sugared().infof(format_args!("via global {}", 1));
    first.sync()?;
    let record: Value = serde_json::from_str(fs::read_to_string(&first_path)?.trim_end())?;
    assert_eq!(record["message"], "via global 1");

    // 기본 설정 헬퍼로 만든 로거가 새 전역 로거가 됨
    let sugared = init_logging("/ignored", "second.log", "second").expect("second");
    assert!(global::logger().shares_core_with(&sugared.desugar()));
    assert!(temp_dir.path().join("second.log").exists());

    // 교체 시 이전 전역 로거를 돌려받음
    let previous = global::replace_globals(first.clone());
    assert!(previous.shares_core_with(&sugared.desugar()));
    assert!(global::logger().shares_core_with(&first));

    Ok(())
}
