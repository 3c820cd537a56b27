//! 에러 타입 — 도메인별 에러 정의

/// Authmap 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum AuthmapError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// 위치 조회 에러
    #[error("geo error: {0}")]
    Geo(#[from] GeoError),

    /// 메트릭 싱크 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 기본 설정 파일 생성 실패
    #[error("failed to write default config to {path}: {reason}")]
    WriteFailed { path: String, reason: String },
}

/// 파이프라인 처리 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 채널 전송 실패
    #[error("channel send failed: {0}")]
    ChannelSend(String),

    /// 채널 수신 실패
    #[error("channel receive failed: {0}")]
    ChannelRecv(String),

    /// 파이프라인 초기화 실패
    #[error("pipeline init failed: {0}")]
    InitFailed(String),

    /// 이미 실행 중인 파이프라인을 다시 시작하려 함
    #[error("pipeline already running")]
    AlreadyRunning,

    /// 실행 중이 아닌 파이프라인을 정지하려 함
    #[error("pipeline not running")]
    NotRunning,
}

/// 위치 조회(geolocation) 에러
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// GeoLite 데이터베이스 열기 실패
    #[error("failed to open geo database at {path}: {reason}")]
    DatabaseOpen { path: String, reason: String },

    /// 데이터베이스에 해당 주소가 없음
    #[error("address not found in geo database: {ip}")]
    AddressNotFound { ip: String },

    /// 조회 실패 (손상된 레코드 등)
    #[error("geo lookup failed for {ip}: {reason}")]
    Lookup { ip: String, reason: String },
}

/// 메트릭 싱크 에러
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 싱크 연결 실패 (DNS, TCP, TLS 등)
    #[error("sink connection failed: {0}")]
    Connection(String),

    /// 쓰기 거부 (HTTP 4xx/5xx 응답)
    #[error("sink write rejected: status {status}: {reason}")]
    Write { status: u16, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "auth.path".to_owned(),
            reason: "must not be empty".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("auth.path"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn geo_error_wraps_into_authmap_error() {
        let err = GeoError::AddressNotFound {
            ip: "10.0.0.5".to_owned(),
        };
        let top: AuthmapError = err.into();
        assert!(matches!(top, AuthmapError::Geo(_)));
        assert!(top.to_string().contains("10.0.0.5"));
    }

    #[test]
    fn sink_error_display() {
        let err = SinkError::Write {
            status: 401,
            reason: "unauthorized".to_owned(),
        };
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let top: AuthmapError = io.into();
        assert!(matches!(top, AuthmapError::Io(_)));
    }
}
