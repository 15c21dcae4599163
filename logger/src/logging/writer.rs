//! 로그 출력 작성기
//!
//! 여러 출력 대상(표준 출력 + 순환 파일)으로 동시에 쓰는 작성기와
//! 테스트용 메모리 작성기를 제공합니다.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// 모든 작성기에 같은 내용을 쓰는 작성기
///
/// 한 작성기가 실패해도 나머지에는 계속 쓰고, 첫 번째 에러를 반환합니다.
pub struct MultiWriter {
    writers: Vec<Box<dyn Write + Send>>,
}

impl MultiWriter {
    pub fn new(writers: Vec<Box<dyn Write + Send>>) -> Self {
        Self { writers }
    }

    pub fn len(&self) -> usize {
        self.writers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writers.is_empty()
    }
}

impl Write for MultiWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut first_error = None;
        for writer in &mut self.writers {
            if let Err(e) = writer.write_all(buf) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut first_error = None;
        for writer in &mut self.writers {
            if let Err(e) = writer.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// 메모리 내 로그 작성기 (테스트용)
///
/// 복제본끼리 같은 버퍼를 공유하므로, 하나는 로거에 넘기고 다른 하나로 내용을 확인합니다.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl InMemoryLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 내용
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    /// 기록된 줄 목록
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Write for InMemoryLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
