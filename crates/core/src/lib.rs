//! Authmap 공통 크레이트 — 도메인 타입, 에러, 설정, 확장 trait
//!
//! 파이프라인 크레이트(`authmap-pipeline`)와 데몬(`authmap-daemon`)이
//! 공유하는 최소 공통 레이어입니다.
//!
//! # 모듈 구성
//! - [`event`]: 인증 이벤트 도메인 타입 (`Tag`, `RawLine`, `AuthEvent`, `MetricPoint` 등)
//! - [`error`]: 도메인별 에러 타입
//! - [`config`]: `authmap.toml` 파싱 및 환경변수 오버라이드
//! - [`metrics`]: Prometheus 메트릭 이름 상수
//! - [`pipeline`]: 모듈 확장 포인트 trait (`Pipeline`, `LocationResolver`, `MetricSink`)

pub mod config;
pub mod error;
pub mod event;
pub mod metrics;
pub mod pipeline;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{AuthmapError, ConfigError, GeoError, PipelineError, SinkError};

// 설정
pub use config::AuthmapConfig;

// 이벤트
pub use event::{AuthEvent, GeoRecord, MetricPoint, RawLine, Tag};

// 파이프라인 trait
pub use pipeline::{HealthStatus, LocationResolver, MetricSink, Pipeline};
