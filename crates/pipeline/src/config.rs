//! 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`AuthmapConfig`](authmap_core::config::AuthmapConfig)를
//! 기반으로 파이프라인 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```
//! use authmap_core::config::AuthmapConfig;
//! use authmap_pipeline::config::PipelineConfig;
//!
//! let core_config = AuthmapConfig::default();
//! let config = PipelineConfig::from_core(&core_config);
//! assert_eq!(config.wait_length_secs, 5);
//! ```

use std::path::Path;
use std::time::Duration;

use authmap_core::config::AuthmapConfig;

use crate::error::AuthPipelineError;

/// 인증 파이프라인 설정
///
/// core의 `[auth]` 섹션에서 파생되며, 파이프라인 내부에서 사용하는
/// 추가 설정(채널 용량, 수집기 활성화 여부)을 포함합니다.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 감시할 인증 로그 파일 경로
    pub watch_path: String,
    /// 파일 수집기 활성화 여부
    ///
    /// 꺼져 있으면 라인은 [`line_sender`](crate::AuthPipeline::line_sender)로만
    /// 주입됩니다 (테스트, 외부 수집기).
    pub follow: bool,
    /// warm-up 윈도우 길이 (초)
    pub wait_length_secs: u64,
    /// 파일 상태 폴링 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 최대 라인 길이 (바이트)
    pub max_line_length: usize,
    /// 수집기 -> 파이프라인 채널 용량
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            watch_path: "/var/log/auth.log".to_owned(),
            follow: true,
            wait_length_secs: 5,
            poll_interval_ms: 500,
            max_line_length: 64 * 1024,
            channel_capacity: 1024,
        }
    }
}

impl PipelineConfig {
    /// core 설정에서 파이프라인 설정을 생성합니다.
    ///
    /// core에 없는 확장 필드는 기본값이 적용됩니다.
    pub fn from_core(core: &AuthmapConfig) -> Self {
        Self {
            watch_path: core.auth.path.clone(),
            wait_length_secs: core.auth.wait_length_secs,
            poll_interval_ms: core.auth.poll_interval_ms,
            max_line_length: core.auth.max_line_length,
            ..Self::default()
        }
    }

    /// warm-up 윈도우를 Duration으로 반환합니다.
    pub fn wait_length(&self) -> Duration {
        Duration::from_secs(self.wait_length_secs)
    }

    /// 폴링 주기를 Duration으로 반환합니다.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AuthPipelineError> {
        if self.follow {
            if self.watch_path.is_empty() {
                return Err(AuthPipelineError::Config {
                    field: "watch_path".to_owned(),
                    reason: "must not be empty".to_owned(),
                });
            }
            if !Path::new(&self.watch_path).is_absolute() {
                return Err(AuthPipelineError::Config {
                    field: "watch_path".to_owned(),
                    reason: format!("'{}' must be an absolute path", self.watch_path),
                });
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(AuthPipelineError::Config {
                field: "poll_interval_ms".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.max_line_length == 0 {
            return Err(AuthPipelineError::Config {
                field: "max_line_length".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(AuthPipelineError::Config {
                field: "channel_capacity".to_owned(),
                reason: "must be greater than 0".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn from_core_maps_auth_section() {
        let mut core = AuthmapConfig::default();
        core.auth.path = "/var/log/secure".to_owned();
        core.auth.wait_length_secs = 9;
        let config = PipelineConfig::from_core(&core);
        assert_eq!(config.watch_path, "/var/log/secure");
        assert_eq!(config.wait_length(), Duration::from_secs(9));
        assert!(config.follow);
    }

    #[test]
    fn relative_watch_path_rejected_when_following() {
        let config = PipelineConfig {
            watch_path: "auth.log".to_owned(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn watch_path_ignored_when_not_following() {
        let config = PipelineConfig {
            watch_path: String::new(),
            follow: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_poll_interval_rejected() {
        let config = PipelineConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
