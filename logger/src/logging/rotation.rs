//! 로그 파일 순환 및 보관 관리
//!
//! 크기 기준으로 로그 파일을 순환하고, 이전 파일을 개수/보관 일수 정책에 따라
//! 정리하며, 필요하면 gzip으로 압축합니다.
//!
//! 이전 파일 이름: `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm><ext>` (UTC), 압축 시 `.gz` 추가

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use crossbeam::channel::{bounded, Sender, TrySendError};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::logging::config::LogConfig;
use crate::logging::error::{LogError, LogResult};

pub const MEGABYTE: u64 = 1024 * 1024;

/// max-size가 0일 때 사용하는 기본 최대 크기 (MB)
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

/// 로그 파일 권한
pub const LOG_FILE_MODE: u32 = 0o666;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const COMPRESS_SUFFIX: &str = ".gz";

/// 순환 정책
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// 순환 전 최대 크기 (바이트, 0이면 기본값)
    pub max_size: u64,
    /// 보관할 이전 파일 최대 개수 (0이면 무제한)
    pub max_backups: u32,
    /// 이전 파일 최대 보관 일수 (0이면 무제한)
    pub max_age_days: u32,
    /// 이전 파일 gzip 압축
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE_MB * MEGABYTE,
            max_backups: 0,
            max_age_days: 0,
            compress: false,
        }
    }
}

impl RotationPolicy {
    pub fn from_config(config: &LogConfig) -> Self {
        Self {
            max_size: config.max_size.saturating_mul(MEGABYTE),
            max_backups: config.max_backups,
            max_age_days: config.max_age,
            compress: config.compress,
        }
    }

    fn max_bytes(&self) -> u64 {
        if self.max_size == 0 {
            DEFAULT_MAX_SIZE_MB * MEGABYTE
        } else {
            self.max_size
        }
    }
}

/// 로그 파일이 존재하도록 보장 (없으면 생성, 권한 설정)
///
/// 실패해도 호출자에게 전파하지 않고 디버그 로그로만 남깁니다.
pub fn ensure_log_file(path: &Path) {
    if let Err(e) = OpenOptions::new().create(true).append(true).open(path) {
        debug!(path = %path.display(), error = %e, "로그 파일 열기 실패");
        if e.kind() == io::ErrorKind::NotFound {
            if let Err(e) = File::create(path) {
                debug!(path = %path.display(), error = %e, "로그 파일 생성 실패");
            }
        }
    }

    if let Err(e) = set_mode(path, LOG_FILE_MODE) {
        debug!(path = %path.display(), error = %e, "로그 파일 권한 설정 실패");
    }
}

#[cfg(unix)]
pub(crate) fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub(crate) fn set_mode(path: &Path, _mode: u32) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}

/// 이전 로그 파일 정보
#[derive(Debug, Clone)]
struct BackupFile {
    path: PathBuf,
    timestamp: DateTime<Utc>,
    compressed: bool,
}

/// 현재 로그 파일과 그 이전 파일들의 이름 규칙 및 보관 정책
#[derive(Debug, Clone)]
struct LogFiles {
    path: PathBuf,
    policy: RotationPolicy,
}

impl LogFiles {
    fn file_stem_and_ext(&self) -> (String, String) {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match file_name.rfind('.') {
            Some(idx) if idx > 0 => (file_name[..idx].to_string(), file_name[idx..].to_string()),
            _ => (file_name, String::new()),
        }
    }

    /// 이전 파일 시각이 항상 증가하도록 가장 최근 이전 파일보다 뒤의 시각을 사용
    fn next_backup_time(&self) -> DateTime<Utc> {
        let now = Utc::now();
        match self.old_log_files() {
            Ok(files) => match files.first() {
                Some(newest) if newest.timestamp >= now => {
                    newest.timestamp + Duration::milliseconds(1)
                }
                _ => now,
            },
            Err(_) => now,
        }
    }

    /// 겹치는 이름이 있으면 1ms씩 뒤로 밀어 고유한 이름을 만듦
    fn backup_name(&self, mut time: DateTime<Utc>) -> PathBuf {
        let (stem, ext) = self.file_stem_and_ext();
        let dir = self.path.parent().unwrap_or_else(|| Path::new(""));

        loop {
            let timestamp = format!(
                "{}.{:03}",
                time.format(BACKUP_TIME_FORMAT),
                time.timestamp_subsec_millis()
            );
            let candidate = dir.join(format!("{}-{}{}", stem, timestamp, ext));
            let compressed = PathBuf::from(format!("{}{}", candidate.display(), COMPRESS_SUFFIX));
            if !candidate.exists() && !compressed.exists() {
                return candidate;
            }
            time += Duration::milliseconds(1);
        }
    }

    fn parse_backup_time(&self, file_name: &str, stem: &str, ext: &str) -> Option<DateTime<Utc>> {
        let rest = file_name.strip_prefix(stem)?.strip_prefix('-')?;
        let timestamp = rest.strip_suffix(ext)?;
        let (seconds, millis) = timestamp.rsplit_once('.')?;
        if millis.len() != 3 {
            return None;
        }
        let millis: i64 = millis.parse().ok()?;
        let naive = NaiveDateTime::parse_from_str(seconds, BACKUP_TIME_FORMAT).ok()?;
        Some(naive.and_utc() + Duration::milliseconds(millis))
    }

    /// 이전 로그 파일 목록 (최신순). 디렉토리가 아직 없으면 빈 목록
    fn old_log_files(&self) -> LogResult<Vec<BackupFile>> {
        let (stem, ext) = self.file_stem_and_ext();
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();

            if let Some(timestamp) = self.parse_backup_time(&name, &stem, &ext) {
                backups.push(BackupFile {
                    path: entry.path(),
                    timestamp,
                    compressed: false,
                });
            } else if let Some(plain) = name.strip_suffix(COMPRESS_SUFFIX) {
                if let Some(timestamp) = self.parse_backup_time(plain, &stem, &ext) {
                    backups.push(BackupFile {
                        path: entry.path(),
                        timestamp,
                        compressed: true,
                    });
                }
            }
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    fn needs_mill(&self) -> bool {
        self.policy.max_backups > 0 || self.policy.max_age_days > 0 || self.policy.compress
    }

    /// 보관 정책 적용 (개수, 보관 일수, 압축)
    ///
    /// 개별 파일 처리 실패는 경고로 남기고 나머지 파일을 계속 처리합니다.
    fn mill(&self) {
        if !self.needs_mill() {
            return;
        }

        let mut files = match self.old_log_files() {
            Ok(files) => files,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "이전 로그 파일 목록 읽기 실패");
                return;
            }
        };

        let mut remove = Vec::new();

        if self.policy.max_backups > 0 && files.len() > self.policy.max_backups as usize {
            // 같은 시각의 원본과 압축본은 하나로 계산
            let mut preserved = HashSet::new();
            let mut keep = Vec::new();
            for file in files {
                let base = file
                    .path
                    .to_string_lossy()
                    .trim_end_matches(COMPRESS_SUFFIX)
                    .to_string();
                preserved.insert(base);
                if preserved.len() > self.policy.max_backups as usize {
                    remove.push(file);
                } else {
                    keep.push(file);
                }
            }
            files = keep;
        }

        if self.policy.max_age_days > 0 {
            let cutoff = Utc::now() - Duration::days(i64::from(self.policy.max_age_days));
            let (expired, keep): (Vec<_>, Vec<_>) =
                files.into_iter().partition(|f| f.timestamp < cutoff);
            remove.extend(expired);
            files = keep;
        }

        for file in &remove {
            match fs::remove_file(&file.path) {
                Ok(_) => debug!(path = %file.path.display(), "오래된 로그 파일 삭제됨"),
                Err(e) => warn!(path = %file.path.display(), error = %e, "로그 파일 삭제 실패"),
            }
        }

        if self.policy.compress {
            for file in files.iter().filter(|f| !f.compressed) {
                if let Err(e) = compress_log_file(&file.path) {
                    warn!(path = %file.path.display(), error = %e, "로그 파일 압축 실패");
                }
            }
        }
    }
}

enum MillRequest {
    Mill,
    /// 앞선 요청이 모두 처리되면 응답
    Barrier(Sender<()>),
}

/// 이전 파일 정리/압축을 맡는 백그라운드 스레드
///
/// 쓰기 경로는 요청만 보내고 기다리지 않습니다. 대기 중인 정리 요청이 있으면
/// 새 요청은 합쳐집니다.
#[derive(Debug)]
struct MillWorker {
    sender: Option<Sender<MillRequest>>,
    handle: Option<JoinHandle<()>>,
}

impl MillWorker {
    fn spawn(files: LogFiles) -> io::Result<Self> {
        let (sender, receiver) = bounded::<MillRequest>(1);
        let handle = thread::Builder::new()
            .name("log-mill".to_string())
            .spawn(move || {
                for request in receiver.iter() {
                    match request {
                        MillRequest::Mill => files.mill(),
                        MillRequest::Barrier(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            })?;

        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    fn request(&self) {
        if let Some(sender) = &self.sender {
            match sender.try_send(MillRequest::Mill) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => {
                    warn!("로그 정리 스레드가 종료됨");
                }
            }
        }
    }

    /// 이미 보낸 정리 요청이 끝날 때까지 대기
    fn wait_idle(&self) -> io::Result<()> {
        let Some(sender) = &self.sender else {
            return Ok(());
        };
        let (done_tx, done_rx) = bounded(1);
        sender
            .send(MillRequest::Barrier(done_tx))
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log mill worker stopped"))?;
        done_rx
            .recv()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log mill worker stopped"))
    }
}

impl Drop for MillWorker {
    fn drop(&mut self) {
        // 채널을 닫으면 남은 요청을 처리한 뒤 스레드가 끝남
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("로그 정리 스레드 패닉");
            }
        }
    }
}

/// 크기 기준 순환 파일 작성기
///
/// 첫 쓰기 시점에 파일을 엽니다. 동시 접근은 상위의 싱크 잠금이 보호합니다.
/// 이전 파일 정리는 백그라운드 스레드에서 수행되며, `flush`는 그 작업이 끝날 때까지 기다립니다.
#[derive(Debug)]
pub struct RotatingFileWriter {
    files: LogFiles,
    file: Option<File>,
    size: u64,
    worker: Option<MillWorker>,
}

impl RotatingFileWriter {
    /// 빈 경로는 임시 디렉토리의 `<프로세스명>-lumberjack.log`로 대체
    pub fn new<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Self {
        let path = path.as_ref();
        let path = if path.as_os_str().is_empty() {
            fallback_log_path()
        } else {
            path.to_path_buf()
        };

        Self {
            files: LogFiles { path, policy },
            file: None,
            size: 0,
            worker: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.files.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.files.policy
    }

    /// 현재 파일을 이전 파일로 넘기고 새 파일을 연 뒤 보관 정책 적용을 요청
    pub fn rotate(&mut self) -> LogResult<()> {
        self.file = None;
        self.open_new()?;
        self.request_mill();
        Ok(())
    }

    /// 정리 스레드에 작업 요청. 스레드를 만들 수 없으면 직접 수행
    fn request_mill(&mut self) {
        if !self.files.needs_mill() {
            return;
        }

        if self.worker.is_none() {
            match MillWorker::spawn(self.files.clone()) {
                Ok(worker) => self.worker = Some(worker),
                Err(e) => {
                    warn!(error = %e, "로그 정리 스레드 생성 실패");
                    self.files.mill();
                    return;
                }
            }
        }

        if let Some(worker) = &self.worker {
            worker.request();
        }
    }

    /// 기존 파일에 이어 쓰거나, 이어 쓰면 한도를 넘는 경우 순환
    fn open_existing_or_new(&mut self, write_len: u64) -> LogResult<()> {
        self.request_mill();

        let metadata = match fs::metadata(&self.files.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(e) => return Err(e.into()),
        };

        if metadata.len() + write_len >= self.files.policy.max_bytes() {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.files.path) {
            Ok(file) => {
                self.file = Some(file);
                self.size = metadata.len();
                Ok(())
            }
            Err(e) => {
                // 기존 파일을 열 수 없으면 새 파일로 대체
                warn!(path = %self.files.path.display(), error = %e, "기존 로그 파일 열기 실패");
                self.open_new()
            }
        }
    }

    fn open_new(&mut self) -> LogResult<()> {
        let path = &self.files.path;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        if path.exists() {
            let backup = self.files.backup_name(self.files.next_backup_time());
            fs::rename(path, &backup)?;
            debug!(
                old_path = %path.display(),
                new_path = %backup.display(),
                "로그 파일 순환 완료"
            );
        }

        let file = create_log_file(path)?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let write_len = buf.len() as u64;
        let max = self.files.policy.max_bytes();
        if write_len > max {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("write length {} exceeds maximum file size {}", write_len, max),
            ));
        }

        if self.file.is_none() {
            self.open_existing_or_new(write_len).map_err(into_io)?;
        }

        if self.size + write_len > max {
            self.rotate().map_err(into_io)?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file is not open"))?;
        let written = file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        match &self.worker {
            Some(worker) => worker.wait_idle(),
            None => Ok(()),
        }
    }
}

fn into_io(err: LogError) -> io::Error {
    match err {
        LogError::Io(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}

fn create_log_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOG_FILE_MODE);
    }
    options.open(path)
}

/// 파일을 `<path>.gz`로 압축하고 원본 삭제
fn compress_log_file(path: &Path) -> LogResult<()> {
    let target = PathBuf::from(format!("{}{}", path.display(), COMPRESS_SUFFIX));

    let mut source = File::open(path)?;
    let output = File::create(&target)?;
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut source, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    debug!(path = %target.display(), "로그 파일 압축 완료");
    Ok(())
}

fn fallback_log_path() -> PathBuf {
    let process = std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "logger".to_string());
    std::env::temp_dir().join(format!("{}-lumberjack.log", process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn small_policy(max_size: u64) -> RotationPolicy {
        RotationPolicy {
            max_size,
            ..Default::default()
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_policy_from_config() {
        let config = LogConfig {
            max_size: 10,
            max_backups: 200,
            max_age: 30,
            compress: true,
            ..Default::default()
        };
        let policy = RotationPolicy::from_config(&config);
        assert_eq!(policy.max_size, 10 * MEGABYTE);
        assert_eq!(policy.max_backups, 200);
        assert_eq!(policy.max_age_days, 30);
        assert!(policy.compress);

        assert_eq!(small_policy(0).max_bytes(), DEFAULT_MAX_SIZE_MB * MEGABYTE);
    }

    #[test]
    fn test_ensure_log_file_creates() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        ensure_log_file(&log_path);
        assert!(log_path.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&log_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, LOG_FILE_MODE);
        }
    }

    #[test]
    fn test_ensure_log_file_missing_dir_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("missing").join("app.log");

        ensure_log_file(&log_path);
        assert!(!log_path.exists());
    }

    #[test]
    fn test_write_appends_to_existing() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");
        fs::write(&log_path, b"first\n").unwrap();

        let mut writer = RotatingFileWriter::new(&log_path, small_policy(1024));
        writer.write_all(b"second\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "first\nsecond\n");
        assert_eq!(dir_entries(temp_dir.path()), vec!["app.log"]);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("nested").join("deep").join("app.log");

        let mut writer = RotatingFileWriter::new(&log_path, small_policy(1024));
        writer.write_all(b"hello\n").unwrap();

        assert!(log_path.exists());
    }

    #[test]
    fn test_rotation_on_size_limit() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let mut writer = RotatingFileWriter::new(&log_path, small_policy(10));
        writer.write_all(b"12345678\n").unwrap();
        writer.write_all(b"abcdefgh\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "abcdefgh\n");

        let entries = dir_entries(temp_dir.path());
        assert_eq!(entries.len(), 2);
        let backup = entries.iter().find(|n| n.as_str() != "app.log").unwrap();
        assert!(backup.starts_with("app-"));
        assert!(backup.ends_with(".log"));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join(backup)).unwrap(),
            "12345678\n"
        );
    }

    #[test]
    fn test_oversized_write_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let mut writer = RotatingFileWriter::new(&log_path, small_policy(4));
        let err = writer.write(b"too long").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_open_existing_full_file_rotates() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");
        fs::write(&log_path, vec![b'x'; 16]).unwrap();

        let mut writer = RotatingFileWriter::new(&log_path, small_policy(16));
        writer.write_all(b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "new\n");
        assert_eq!(dir_entries(temp_dir.path()).len(), 2);
    }

    #[test]
    fn test_max_backups_prunes_oldest() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let policy = RotationPolicy {
            max_size: 1024,
            max_backups: 2,
            ..Default::default()
        };
        let mut writer = RotatingFileWriter::new(&log_path, policy);

        for i in 0..5 {
            writer.write_all(format!("segment {}\n", i).as_bytes()).unwrap();
            writer.rotate().unwrap();
        }
        writer.flush().unwrap();

        let entries = dir_entries(temp_dir.path());
        // 현재 파일 + 이전 파일 2개
        assert_eq!(entries.len(), 3);

        let contents: Vec<String> = entries
            .iter()
            .filter(|n| n.as_str() != "app.log")
            .map(|n| fs::read_to_string(temp_dir.path().join(n)).unwrap())
            .collect();
        assert!(contents.contains(&"segment 3\n".to_string()));
        assert!(contents.contains(&"segment 4\n".to_string()));
    }

    #[test]
    fn test_max_age_removes_expired_backups() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");
        let expired = temp_dir.path().join("app-2001-01-01T00-00-00.000.log");
        fs::write(&expired, b"old").unwrap();
        let unrelated = temp_dir.path().join("other-2001-01-01T00-00-00.000.log");
        fs::write(&unrelated, b"other").unwrap();

        let policy = RotationPolicy {
            max_size: 1024,
            max_age_days: 1,
            ..Default::default()
        };
        let mut writer = RotatingFileWriter::new(&log_path, policy);
        writer.write_all(b"fresh\n").unwrap();
        writer.flush().unwrap();

        assert!(!expired.exists());
        assert!(unrelated.exists());
        assert!(log_path.exists());
    }

    #[test]
    fn test_compress_backups() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let policy = RotationPolicy {
            max_size: 1024,
            compress: true,
            ..Default::default()
        };
        let mut writer = RotatingFileWriter::new(&log_path, policy);
        writer.write_all(b"to be compressed\n").unwrap();
        writer.rotate().unwrap();
        writer.flush().unwrap();

        let entries = dir_entries(temp_dir.path());
        assert_eq!(entries.len(), 2);
        let gz = entries.iter().find(|n| n.ends_with(".log.gz")).unwrap();

        let mut decoder = GzDecoder::new(File::open(temp_dir.path().join(gz)).unwrap());
        let mut content = String::new();
        decoder.read_to_string(&mut content).unwrap();
        assert_eq!(content, "to be compressed\n");
    }

    #[test]
    fn test_backup_name_roundtrip_and_uniqueness() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("service.log");
        let writer = RotatingFileWriter::new(&log_path, RotationPolicy::default());

        let now = Utc::now();
        let first = writer.files.backup_name(now);
        fs::write(&first, b"").unwrap();
        let second = writer.files.backup_name(now);
        assert_ne!(first, second);

        let name = first.file_name().unwrap().to_string_lossy().into_owned();
        let parsed = writer
            .files
            .parse_backup_time(&name, "service", ".log")
            .unwrap();
        assert_eq!(parsed.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn test_missing_dir_has_no_backups() {
        let temp_dir = TempDir::new().unwrap();
        let files = LogFiles {
            path: temp_dir.path().join("not-yet").join("app.log"),
            policy: RotationPolicy {
                max_backups: 3,
                ..Default::default()
            },
        };

        assert!(files.old_log_files().unwrap().is_empty());
    }

    #[test]
    fn test_first_write_into_new_dir_with_retention_policy() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("fresh").join("app.log");

        let policy = RotationPolicy {
            max_size: 1024,
            max_backups: 2,
            max_age_days: 7,
            compress: true,
        };
        let mut writer = RotatingFileWriter::new(&log_path, policy);
        writer.write_all(b"first\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&log_path).unwrap(), "first\n");
        assert_eq!(dir_entries(log_path.parent().unwrap()), vec!["app.log"]);
    }

    #[test]
    fn test_cleanup_runs_off_the_writer_and_flush_waits() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let policy = RotationPolicy {
            max_size: 64,
            max_backups: 1,
            compress: true,
            ..Default::default()
        };
        let mut writer = RotatingFileWriter::new(&log_path, policy);
        for i in 0..20 {
            writer.write_all(format!("line {:02} of the segment\n", i).as_bytes()).unwrap();
        }
        assert!(writer.worker.is_some());

        writer.flush().unwrap();
        let entries = dir_entries(temp_dir.path());
        let backups: Vec<_> = entries.iter().filter(|n| n.as_str() != "app.log").collect();
        assert_eq!(backups.len(), 1, "{:?}", entries);
        assert!(backups[0].ends_with(".log.gz"));

        // 작성기를 버리면 정리 스레드도 종료됨
        drop(writer);
        assert!(log_path.exists());
    }

    #[test]
    fn test_no_worker_without_retention_policy() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("app.log");

        let mut writer = RotatingFileWriter::new(&log_path, small_policy(10));
        writer.write_all(b"12345678\n").unwrap();
        writer.write_all(b"abcdefgh\n").unwrap();

        assert!(writer.worker.is_none());
    }

    #[test]
    fn test_empty_path_falls_back_to_temp() {
        let writer = RotatingFileWriter::new("", RotationPolicy::default());
        assert!(writer.path().starts_with(std::env::temp_dir()));
        assert!(writer
            .path()
            .to_string_lossy()
            .ends_with("-lumberjack.log"));
    }
}
