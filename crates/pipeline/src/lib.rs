//! # authmap-pipeline
//!
//! 인증 로그 파이프라인 -- 수집, 분류, 위치 조회, 메트릭 방출.
//!
//! ## 아키텍처
//!
//! ```text
//! FileCollector ──(mpsc)──> AuthPipeline worker
//!                              │ warm-up 판정
//!                              │ EventClassifier (filter → tags → address)
//!                              │ GeoEnricher (LocationResolver)
//!                              └ MetricSink::write (InfluxSink)
//! ```
//!
//! 수집기와 워커는 각각 자체 tokio 태스크에서 실행되며,
//! [`tokio_util::sync::CancellationToken`]으로 협조적으로 종료됩니다.
//!
//! ## 사용 예시
//!
//! ```no_run
//! use authmap_core::pipeline::Pipeline;
//! use authmap_pipeline::{AuthPipelineBuilder, InfluxSink, MaxmindResolver, PipelineConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = MaxmindResolver::open("/etc/authmap/GeoLite2-City.mmdb")?;
//! let sink = InfluxSink::new(&authmap_core::config::InfluxConfig::default())?;
//! let mut pipeline = AuthPipelineBuilder::new(resolver, sink)
//!     .config(PipelineConfig::default())
//!     .build()?;
//! pipeline.start().await?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod collector;
pub mod config;
pub mod error;
pub mod geo;
pub mod pipeline;
pub mod sink;

pub use classify::{AddressExtractor, EventClassifier, LineFilter, TagMatcher};
pub use collector::{FileCollector, FileCollectorConfig};
pub use config::PipelineConfig;
pub use error::AuthPipelineError;
pub use geo::{GeoEnricher, MaxmindResolver};
pub use pipeline::{AuthPipeline, AuthPipelineBuilder, PipelineStats, StatsSnapshot};
pub use sink::InfluxSink;
