//! 설정 관리 — authmap.toml 파싱 및 런타임 설정
//!
//! [`AuthmapConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선, 데몬에서 적용)
//! 2. 환경변수 (`AUTHMAP_INFLUX_URL=...` 형식)
//! 3. 설정 파일 (`authmap.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! 설정 파일이 없으면 데몬이 [`AuthmapConfig::write_default`]로
//! 기본 설정 파일을 생성합니다.
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), authmap_core::error::AuthmapError> {
//! use authmap_core::config::AuthmapConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = AuthmapConfig::load("authmap.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = AuthmapConfig::parse("[auth]\nwait_length_secs = 10")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AuthmapError, ConfigError};

/// Authmap 통합 설정
///
/// `authmap.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthmapConfig {
    /// 일반 설정 (로깅)
    #[serde(default)]
    pub general: GeneralConfig,
    /// InfluxDB 싱크 설정
    #[serde(default)]
    pub influx: InfluxConfig,
    /// GeoLite 데이터베이스 설정
    #[serde(default)]
    pub geolite: GeoLiteConfig,
    /// 인증 로그 수집 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// Prometheus 메트릭 노출 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl AuthmapConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, AuthmapError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    ///
    /// 값 검증은 하지 않습니다. 환경변수가 파일 값을 대체할 수 있으므로
    /// 검증은 오버라이드 적용이 끝난 뒤 호출자가 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthmapError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AuthmapError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                AuthmapError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, AuthmapError> {
        toml::from_str(toml_str).map_err(|e| {
            AuthmapError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 기본 설정을 TOML 파일로 기록합니다.
    ///
    /// 설정 파일이 없는 최초 실행 시 데몬이 호출합니다.
    /// 부모 디렉토리가 없으면 생성합니다.
    pub async fn write_default(path: impl AsRef<Path>) -> Result<Self, AuthmapError> {
        let path = path.as_ref();
        let config = Self::default();
        let content = toml::to_string_pretty(&config).map_err(|e| {
            AuthmapError::Config(ConfigError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AuthmapError::Config(ConfigError::WriteFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            })?;
        }
        tokio::fs::write(path, content).await.map_err(|e| {
            AuthmapError::Config(ConfigError::WriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(config)
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `AUTHMAP_{SECTION}_{FIELD}`
    /// 예: `AUTHMAP_INFLUX_URL=http://localhost:8086`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "AUTHMAP_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "AUTHMAP_GENERAL_LOG_FORMAT");

        // Influx
        override_string(&mut self.influx.url, "AUTHMAP_INFLUX_URL");
        override_string(&mut self.influx.token, "AUTHMAP_INFLUX_TOKEN");
        override_string(&mut self.influx.org, "AUTHMAP_INFLUX_ORG");
        override_string(&mut self.influx.bucket, "AUTHMAP_INFLUX_BUCKET");

        // GeoLite
        override_string(&mut self.geolite.path, "AUTHMAP_GEOLITE_PATH");

        // Auth
        override_string(&mut self.auth.path, "AUTHMAP_AUTH_PATH");
        override_u64(
            &mut self.auth.wait_length_secs,
            "AUTHMAP_AUTH_WAIT_LENGTH_SECS",
        );
        override_u64(
            &mut self.auth.poll_interval_ms,
            "AUTHMAP_AUTH_POLL_INTERVAL_MS",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "AUTHMAP_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "AUTHMAP_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "AUTHMAP_METRICS_PORT");
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), AuthmapError> {
        match self.general.log_format.as_str() {
            "json" | "pretty" => {}
            other => {
                return Err(invalid(
                    "general.log_format",
                    format!("expected 'json' or 'pretty', got '{other}'"),
                ));
            }
        }

        if self.influx.url.is_empty() {
            return Err(invalid("influx.url", "must not be empty"));
        }
        if !self.influx.url.starts_with("http://") && !self.influx.url.starts_with("https://") {
            return Err(invalid("influx.url", "must start with http:// or https://"));
        }

        if self.geolite.path.is_empty() {
            return Err(invalid("geolite.path", "must not be empty"));
        }

        if self.auth.path.is_empty() {
            return Err(invalid("auth.path", "must not be empty"));
        }
        if !Path::new(&self.auth.path).is_absolute() {
            return Err(invalid("auth.path", "must be an absolute path"));
        }
        if self.auth.poll_interval_ms == 0 {
            return Err(invalid("auth.poll_interval_ms", "must be greater than 0"));
        }
        if self.auth.max_line_length == 0 {
            return Err(invalid("auth.max_line_length", "must be greater than 0"));
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(invalid("metrics.port", "must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> AuthmapError {
    AuthmapError::Config(ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    })
}

/// 일반 설정 (로깅)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 출력 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// InfluxDB v2 싱크 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InfluxConfig {
    /// 쓰기 엔드포인트 base URL
    pub url: String,
    /// API 토큰 (빈 문자열이면 Authorization 헤더 생략)
    pub token: String,
    /// 조직 이름
    pub org: String,
    /// 버킷(데이터베이스) 이름
    pub bucket: String,
}

impl Default for InfluxConfig {
    fn default() -> Self {
        Self {
            url: "http://influxdb:8086".to_owned(),
            token: String::new(),
            org: String::new(),
            bucket: "db0".to_owned(),
        }
    }
}

/// GeoLite2 데이터베이스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoLiteConfig {
    /// GeoLite2-City.mmdb 파일 경로
    pub path: String,
}

impl Default for GeoLiteConfig {
    fn default() -> Self {
        Self {
            path: "/etc/authmap/GeoLite2-City.mmdb".to_owned(),
        }
    }
}

/// 인증 로그 수집 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 감시할 인증 로그 파일 경로
    pub path: String,
    /// warm-up 윈도우 길이 (초) — 파이프라인 시작 후 이 시간 이내에
    /// 관측된 라인은 기존 로그 재생으로 보고 버립니다
    pub wait_length_secs: u64,
    /// 파일 상태 폴링 주기 (밀리초)
    pub poll_interval_ms: u64,
    /// 최대 라인 길이 (바이트), 초과분이 있는 라인은 버립니다
    pub max_line_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            path: "/var/log/auth.log".to_owned(),
            wait_length_secs: 5,
            poll_interval_ms: 500,
            max_line_length: 64 * 1024, // 64KB
        }
    }
}

/// Prometheus 메트릭 노출 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 메트릭 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 리슨 주소
    pub listen_addr: String,
    /// 리슨 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9695,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *target = value;
    }
}

fn override_u64(target: &mut u64, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring non-numeric environment override"),
        }
    }
}

fn override_u16(target: &mut u16, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring non-numeric environment override"),
        }
    }
}

fn override_bool(target: &mut bool, var: &str) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(var, value, "ignoring non-boolean environment override"),
        }
    }
}
