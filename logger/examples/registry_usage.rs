//! 로거 레지스트리 사용 예제
//!
//! `RUST_LOG=debug cargo run --example registry_usage` 로 실행하면 라이브러리 내부
//! 진단 로그(파일 생성, 순환 등)도 함께 볼 수 있습니다.

use anyhow::Result;
use logger::logging::{init_registry, Field, LogConfig, PathResolver};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    println!("📝 로거 레지스트리 예제 시작");

    // 예제용으로 ./logs 아래에 기록
    let resolver: PathResolver =
        Arc::new(|_path: &str, file_name: &str| format!("./logs/{}", file_name));
    let registry = init_registry(Some(resolver));

    // === 예제 1: 기본 설정 ===
    let config = registry.make_default_config("", "api.log", "api");
    registry.make_logger(config);

    if let Some(log) = registry.get_sugared_logger("[api]") {
        log.info("API 서버 시작");
        log.infof(format_args!("포트 {} 에서 대기 중", 8080));
        log.warnw("응답 지연", [("endpoint", "/rooms"), ("elapsed", "1.5s")]);
    }

    // === 예제 2: JSON + 필드 ===
    let json_config = LogConfig {
        level: "debug".to_string(),
        format: "json".to_string(),
        suffix: "game".to_string(),
        encode_level: "LowercaseLevelEncoder".to_string(),
        stacktrace_key: "stacktrace".to_string(),
        caller_key: "caller".to_string(),
        file_path: "./logs/game.log".to_string(),
        max_size: 10,
        max_backups: 5,
        max_age: 7,
        compress: true,
        ..Default::default()
    }
    .with_env_overrides();
    registry.make_logger(json_config);

    if let Some(log) = registry.get_logger("game") {
        let room = log.named("room").with(&[Field::int("room_id", 42)]);
        room.debug("플레이어 입장", &[Field::string("player", "alice")]);
        room.info("라운드 시작", &[Field::duration("limit", Duration::from_secs(180))]);
        room.error("동기화 실패", &[Field::bool("retrying", true)]);
        log.sync()?;
    }

    // === 예제 3: 없는 접미사 ===
    if registry.get_logger("missing").is_none() {
        println!("   ✓ 등록되지 않은 접미사는 None");
    }

    println!("✅ 완료! ./logs 디렉토리에서 생성된 로그를 확인하세요.");
    Ok(())
}
