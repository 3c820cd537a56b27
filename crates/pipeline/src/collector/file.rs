//! 파일 기반 라인 수집기
//!
//! 인증 로그 파일을 감시하며 새로운 라인이 추가되면 수집합니다.
//! `tail -f`와 유사한 동작을 비동기 폴링 방식으로 구현합니다.
//!
//! # 로테이션 감지
//! - inode 변경 감지 (logrotate 등, Unix 전용)
//! - 파일 크기 축소 감지 (truncation)
//! - 새 파일 자동 열기
//!
//! # 재생(replay) 주의
//! 최초 attach 시 파일의 처음부터 읽습니다. 기존 로그 내용이 그대로
//! 흘러들어오며, 이를 억제하는 것이 파이프라인 warm-up 윈도우의 역할입니다.

use std::path::PathBuf;
use std::time::Duration;

use metrics::counter;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use authmap_core::event::RawLine;
use authmap_core::metrics::{
    COLLECTOR_LINES_DROPPED_TOTAL, COLLECTOR_LINES_TOTAL, COLLECTOR_ROTATIONS_TOTAL,
};

use crate::error::AuthPipelineError;

/// 읽기 버퍼 크기
const READ_CHUNK: usize = 8 * 1024;

/// 파일 수집기 설정
#[derive(Debug, Clone)]
pub struct FileCollectorConfig {
    /// 감시할 파일 경로
    pub path: PathBuf,
    /// 파일 상태 체크 주기
    pub poll_interval: Duration,
    /// 최대 라인 길이 (바이트), 초과 라인은 버립니다
    pub max_line_length: usize,
}

/// 파일별 추적 상태
struct TailState {
    /// 현재 열린 파일 핸들
    file: File,
    /// 마지막 읽기 위치 (바이트 오프셋)
    offset: u64,
    /// 현재 파일의 inode (Unix 전용)
    #[cfg(unix)]
    inode: u64,
    /// 개행을 기다리는 미완성 라인 버퍼
    partial: Vec<u8>,
    /// 길이 초과 라인을 다음 개행까지 버리는 중인지
    discarding: bool,
}

/// 파일 기반 라인 수집기
///
/// 지정된 파일을 주기적으로 폴링하여 새로운 라인을 수집합니다.
/// 파일 로테이션(inode 변경, truncation)을 자동 감지하고 다시 엽니다.
pub struct FileCollector {
    /// 수집기 설정
    config: FileCollectorConfig,
    /// 수집된 라인 전송 채널
    tx: mpsc::Sender<RawLine>,
    /// 협조적 종료 토큰
    cancel: CancellationToken,
    /// 로그/RawLine에 쓰는 소스 식별자
    source: String,
}

impl FileCollector {
    /// 새 파일 수집기를 생성합니다.
    pub fn new(
        config: FileCollectorConfig,
        tx: mpsc::Sender<RawLine>,
        cancel: CancellationToken,
    ) -> Self {
        let source = format!("file:{}", config.path.display());
        Self {
            config,
            tx,
            cancel,
            source,
        }
    }

    /// 수집기를 시작합니다. 취소되거나 수신측이 사라질 때까지 실행됩니다.
    ///
    /// 파일이 존재하지 않으면 즉시 에러를 반환합니다 (시작 preflight에서
    /// 걸러지지만, 시작 이후 레이스에 대한 마지막 방어선입니다).
    pub async fn run(self) -> Result<(), AuthPipelineError> {
        let mut state = self.open().await?;
        info!(source = %self.source, "file collector attached");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!(source = %self.source, "file collector cancelled");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            if let Some(reopened) = self.check_rotation(&state).await? {
                counter!(COLLECTOR_ROTATIONS_TOTAL).increment(1);
                info!(source = %self.source, "log file rotated; reopened from start");
                state = reopened;
            }

            if !self.drain_new_lines(&mut state).await? {
                // 수신측이 닫혔으면 파이프라인이 정지한 것입니다
                debug!(source = %self.source, "line receiver closed");
                return Ok(());
            }
        }
    }

    /// 파일을 열고 처음부터 읽을 준비를 합니다.
    async fn open(&self) -> Result<TailState, AuthPipelineError> {
        let file = File::open(&self.config.path)
            .await
            .map_err(|e| AuthPipelineError::Collector {
                source_type: "file".to_owned(),
                reason: format!("cannot open {}: {e}", self.config.path.display()),
            })?;
        #[cfg(unix)]
        let inode = {
            use std::os::unix::fs::MetadataExt;
            file.metadata()
                .await
                .map_err(AuthPipelineError::Io)?
                .ino()
        };
        Ok(TailState {
            file,
            offset: 0,
            #[cfg(unix)]
            inode,
            partial: Vec::new(),
            discarding: false,
        })
    }

    /// 파일 로테이션/truncation 여부를 확인하고, 감지되면 새 상태를 돌려줍니다.
    async fn check_rotation(
        &self,
        state: &TailState,
    ) -> Result<Option<TailState>, AuthPipelineError> {
        let metadata = match tokio::fs::metadata(&self.config.path).await {
            Ok(metadata) => metadata,
            // 로테이션 중 파일이 잠시 없을 수 있습니다. 기존 핸들을 유지하고
            // 새 파일이 나타나면 다음 폴링에서 inode 변경으로 감지됩니다.
            Err(_) => return Ok(None),
        };

        #[cfg(unix)]
        let rotated = {
            use std::os::unix::fs::MetadataExt;
            metadata.ino() != state.inode
        };
        #[cfg(not(unix))]
        let rotated = false;

        let truncated = metadata.len() < state.offset;

        if rotated || truncated {
            return self.open().await.map(Some);
        }
        Ok(None)
    }

    /// 현재 오프셋부터 EOF까지 읽어 완성된 라인을 채널로 전송합니다.
    ///
    /// 수신측이 닫혀 있으면 `Ok(false)`를 반환합니다.
    async fn drain_new_lines(&self, state: &mut TailState) -> Result<bool, AuthPipelineError> {
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let read = state
                .file
                .read(&mut chunk)
                .await
                .map_err(AuthPipelineError::Io)?;
            if read == 0 {
                return Ok(true);
            }
            state.offset += read as u64;

            for &byte in &chunk[..read] {
                if byte == b'\n' {
                    if state.discarding {
                        state.discarding = false;
                    } else if !self.send_line(&state.partial).await {
                        return Ok(false);
                    }
                    state.partial.clear();
                    continue;
                }
                if state.discarding {
                    continue;
                }
                if state.partial.len() >= self.config.max_line_length {
                    warn!(
                        source = %self.source,
                        max = self.config.max_line_length,
                        "dropping oversized line"
                    );
                    counter!(COLLECTOR_LINES_DROPPED_TOTAL).increment(1);
                    state.partial.clear();
                    state.discarding = true;
                    continue;
                }
                state.partial.push(byte);
            }
        }
    }

    /// 한 라인을 RawLine으로 만들어 전송합니다. 수신측이 닫혔으면 false.
    async fn send_line(&self, bytes: &[u8]) -> bool {
        let text = String::from_utf8_lossy(bytes)
            .trim_end_matches('\r')
            .to_owned();
        counter!(COLLECTOR_LINES_TOTAL).increment(1);
        self.tx
            .send(RawLine::new(text, self.source.clone()))
            .await
            .is_ok()
    }
}
