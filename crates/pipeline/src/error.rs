//! 파이프라인 에러 타입
//!
//! [`AuthPipelineError`]는 파이프라인 내부에서 발생하는 모든 에러를 표현합니다.
//! `From<AuthPipelineError> for AuthmapError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use authmap_core::error::{AuthmapError, GeoError, PipelineError, SinkError};

/// 인증 파이프라인 도메인 에러
///
/// 수집, 분류 규칙 컴파일, 위치 조회, 싱크 쓰기, 채널 통신 등
/// 파이프라인 내부의 모든 에러 상황을 포괄합니다.
#[derive(Debug, thiserror::Error)]
pub enum AuthPipelineError {
    /// 수집기 에러 (파일 I/O 등)
    #[error("collector error: {source_type}: {reason}")]
    Collector {
        /// 수집 소스 유형 (현재는 file)
        source_type: String,
        /// 에러 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 채널 통신 에러
    #[error("channel error: {0}")]
    Channel(String),

    /// 위치 조회 에러
    #[error("geo error: {0}")]
    Geo(#[from] GeoError),

    /// 싱크 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<AuthPipelineError> for AuthmapError {
    fn from(err: AuthPipelineError) -> Self {
        AuthmapError::Pipeline(PipelineError::InitFailed(err.to_string()))
    }
}
