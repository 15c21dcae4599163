//! 기본 로그 파일 경로
//!
//! macOS/Windows: `<home>/logs/envExporter`
//! 그 외 (또는 홈 디렉토리를 알 수 없을 때): `/home/admin/logs/envExporter`

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::logging::rotation::set_mode;

/// 서버 환경의 기본 로그 디렉토리
pub const DEFAULT_LOG_FOLDER: &str = "/home/admin/logs/envExporter";

const HOME_LOG_SUBDIR: &str = "logs/envExporter";

/// 로그 디렉토리 권한
pub const LOG_DIR_MODE: u32 = 0o755;

/// 플랫폼별 기본 로그 디렉토리
pub fn default_log_folder() -> PathBuf {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        match dirs::home_dir() {
            Some(home) => home.join(HOME_LOG_SUBDIR),
            None => PathBuf::from(DEFAULT_LOG_FOLDER),
        }
    } else {
        PathBuf::from(DEFAULT_LOG_FOLDER)
    }
}

/// 기본 경로 해석기: `<기본 로그 디렉토리>/<file_name>`
///
/// `_path` 인자는 사용하지 않습니다. 다른 디렉토리가 필요하면
/// 레지스트리 초기화 시 경로 해석 함수를 직접 넘기면 됩니다.
pub fn default_log_path(_path: &str, file_name: &str) -> String {
    let folder = default_log_folder();
    prepare_log_dir(&folder);
    format!("{}/{}", folder.display(), file_name)
}

/// 디렉토리 생성 및 권한 설정 (실패해도 진행)
pub fn prepare_log_dir(dir: &Path) {
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(dir) {
            debug!(path = %dir.display(), error = %e, "로그 디렉토리 생성 실패");
        }
    }

    if let Err(e) = set_mode(dir, LOG_DIR_MODE) {
        debug!(path = %dir.display(), error = %e, "로그 디렉토리 권한 설정 실패");
    }
}
