//! 인증 파이프라인 본체
//!
//! 수집기 채널에서 라인을 받아 warm-up 판정 → 분류 → 위치 조회 → 방출의
//! 단계를 한 워커 태스크 안에서 순서대로 수행합니다. 채널 순서가 곧 처리
//! 순서이며, 한 라인의 처리가 끝나기 전에 다음 라인을 시작하지 않습니다.
//!
//! # 실패 정책
//! - 위치 조회 실패: 해당 이벤트만 건너뛰고 카운터를 올립니다.
//! - 싱크 쓰기 실패: 포인트를 버리고 기록을 남긴 뒤 계속합니다.
//! - 누적 실패가 임계값을 넘으면 헬스 상태가 Degraded로 내려갑니다.
//!   어느 경우에도 라인 하나 때문에 프로세스가 죽지 않습니다.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use metrics::counter;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use authmap_core::error::{AuthmapError, PipelineError};
use authmap_core::event::{MetricPoint, RawLine};
use authmap_core::metrics::{
    GEO_LOOKUP_FAILURES_TOTAL, GEO_UNPARSEABLE_TOTAL, LABEL_TAG, PIPELINE_EVENTS_TOTAL,
    PIPELINE_LINES_TOTAL, PIPELINE_WARMUP_DISCARDED_TOTAL, SINK_POINTS_WRITTEN_TOTAL,
    SINK_WRITE_FAILURES_TOTAL,
};
use authmap_core::pipeline::{HealthStatus, LocationResolver, MetricSink, Pipeline};

use crate::classify::EventClassifier;
use crate::collector::{FileCollector, FileCollectorConfig};
use crate::config::PipelineConfig;
use crate::error::AuthPipelineError;
use crate::geo::GeoEnricher;

/// 누적 실패가 이 값 이상이면 헬스가 Degraded로 내려갑니다
const DEGRADED_FAILURE_THRESHOLD: u64 = 10;

/// 파이프라인 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineState {
    /// 생성됨, 아직 시작 전
    Initialized,
    /// 워커/수집기 태스크 실행 중
    Running,
    /// 정지됨 (재시작 불가)
    Stopped,
}

/// 파이프라인 누적 통계 (atomic, 워커와 공유)
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// 수신한 전체 라인 수
    pub lines_seen: AtomicU64,
    /// warm-up 윈도우에서 버린 라인 수
    pub warmup_discarded: AtomicU64,
    /// 분류된 이벤트 수
    pub events_classified: AtomicU64,
    /// 싱크에 기록된 포인트 수
    pub points_emitted: AtomicU64,
    /// 위치 조회 실패 수
    pub geo_failures: AtomicU64,
    /// 싱크 쓰기 실패 수
    pub sink_failures: AtomicU64,
}

impl PipelineStats {
    /// 현재 값의 일관성 없는 스냅샷을 만듭니다 (로깅/테스트용).
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lines_seen: self.lines_seen.load(Ordering::Relaxed),
            warmup_discarded: self.warmup_discarded.load(Ordering::Relaxed),
            events_classified: self.events_classified.load(Ordering::Relaxed),
            points_emitted: self.points_emitted.load(Ordering::Relaxed),
            geo_failures: self.geo_failures.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
        }
    }
}

/// [`PipelineStats`]의 시점 스냅샷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub lines_seen: u64,
    pub warmup_discarded: u64,
    pub events_classified: u64,
    pub points_emitted: u64,
    pub geo_failures: u64,
    pub sink_failures: u64,
}

/// 인증 파이프라인 빌더
///
/// resolver와 sink는 trait으로 주입됩니다. 프로덕션에서는
/// [`MaxmindResolver`](crate::geo::MaxmindResolver)와
/// [`InfluxSink`](crate::sink::InfluxSink), 테스트에서는 목 구현을 씁니다.
pub struct AuthPipelineBuilder<R, S> {
    config: PipelineConfig,
    resolver: R,
    sink: S,
}

impl<R, S> AuthPipelineBuilder<R, S>
where
    R: LocationResolver + 'static,
    S: MetricSink + 'static,
{
    /// 기본 설정으로 빌더를 생성합니다.
    pub fn new(resolver: R, sink: S) -> Self {
        Self {
            config: PipelineConfig::default(),
            resolver,
            sink,
        }
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 설정을 검증하고 규칙을 컴파일하여 파이프라인을 만듭니다.
    pub fn build(self) -> Result<AuthPipeline<R, S>, AuthPipelineError> {
        self.config.validate()?;
        let classifier = EventClassifier::new()?;
        let (raw_tx, raw_rx) = mpsc::channel(self.config.channel_capacity);
        Ok(AuthPipeline {
            config: self.config,
            state: PipelineState::Initialized,
            classifier: Some(classifier),
            enricher: Some(GeoEnricher::new(self.resolver)),
            sink: Some(self.sink),
            raw_rx: Some(raw_rx),
            raw_tx,
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
            stats: Arc::new(PipelineStats::default()),
        })
    }
}

/// 인증 파이프라인
///
/// [`Pipeline`] trait을 구현하며, start 시점에 파일 수집기(설정에 따라)와
/// 워커 태스크를 띄웁니다. 한 번 stop한 파이프라인은 재시작할 수 없습니다.
pub struct AuthPipeline<R, S> {
    config: PipelineConfig,
    state: PipelineState,
    /// start에서 워커로 이동하는 부품들
    classifier: Option<EventClassifier>,
    enricher: Option<GeoEnricher<R>>,
    sink: Option<S>,
    raw_rx: Option<mpsc::Receiver<RawLine>>,
    raw_tx: mpsc::Sender<RawLine>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    stats: Arc<PipelineStats>,
}

impl<R, S> AuthPipeline<R, S>
where
    R: LocationResolver + 'static,
    S: MetricSink + 'static,
{
    /// 라인 주입용 sender를 반환합니다.
    ///
    /// 파일 수집기를 끄고(`follow = false`) 외부에서 라인을 공급할 때,
    /// 그리고 통합 테스트에서 사용합니다.
    pub fn line_sender(&self) -> mpsc::Sender<RawLine> {
        self.raw_tx.clone()
    }

    /// 누적 통계 핸들을 반환합니다.
    pub fn stats(&self) -> Arc<PipelineStats> {
        Arc::clone(&self.stats)
    }

    fn take_worker(&mut self) -> Result<Worker<R, S>, AuthmapError> {
        let (Some(classifier), Some(enricher), Some(sink)) = (
            self.classifier.take(),
            self.enricher.take(),
            self.sink.take(),
        ) else {
            return Err(PipelineError::InitFailed("pipeline parts already consumed".to_owned()).into());
        };
        Ok(Worker {
            classifier,
            enricher,
            sink,
            stats: Arc::clone(&self.stats),
            wait: self.config.wait_length(),
            started_at: SystemTime::now(),
        })
    }
}

impl<R, S> Pipeline for AuthPipeline<R, S>
where
    R: LocationResolver + 'static,
    S: MetricSink + 'static,
{
    async fn start(&mut self) -> Result<(), AuthmapError> {
        match self.state {
            PipelineState::Running => return Err(PipelineError::AlreadyRunning.into()),
            PipelineState::Stopped => {
                return Err(
                    PipelineError::InitFailed("stopped pipeline cannot be restarted".to_owned())
                        .into(),
                );
            }
            PipelineState::Initialized => {}
        }

        let worker = self.take_worker()?;
        let Some(raw_rx) = self.raw_rx.take() else {
            return Err(PipelineError::InitFailed("line receiver already consumed".to_owned()).into());
        };

        if self.config.follow {
            let collector = FileCollector::new(
                FileCollectorConfig {
                    path: self.config.watch_path.clone().into(),
                    poll_interval: self.config.poll_interval(),
                    max_line_length: self.config.max_line_length,
                },
                self.raw_tx.clone(),
                self.cancel.child_token(),
            );
            self.tasks.push(tokio::spawn(async move {
                if let Err(e) = collector.run().await {
                    error!(error = %e, "file collector terminated");
                }
            }));
        }

        let cancel = self.cancel.child_token();
        self.tasks.push(tokio::spawn(worker.run(raw_rx, cancel)));

        self.state = PipelineState::Running;
        info!(
            watch_path = %self.config.watch_path,
            follow = self.config.follow,
            wait_secs = self.config.wait_length_secs,
            "auth pipeline started"
        );
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AuthmapError> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::NotRunning.into());
        }
        self.cancel.cancel();
        for handle in self.tasks.drain(..) {
            if let Err(e) = handle.await {
                warn!(error = %e, "pipeline task join failed");
            }
        }
        self.state = PipelineState::Stopped;
        let snapshot = self.stats.snapshot();
        info!(
            lines = snapshot.lines_seen,
            events = snapshot.events_classified,
            points = snapshot.points_emitted,
            "auth pipeline stopped"
        );
        Ok(())
    }

    async fn health_check(&self) -> HealthStatus {
        match self.state {
            PipelineState::Initialized => HealthStatus::Degraded("not started".to_owned()),
            PipelineState::Stopped => HealthStatus::Unhealthy("stopped".to_owned()),
            PipelineState::Running => {
                let snapshot = self.stats.snapshot();
                if snapshot.sink_failures >= DEGRADED_FAILURE_THRESHOLD {
                    HealthStatus::Degraded(format!(
                        "{} sink write failures",
                        snapshot.sink_failures
                    ))
                } else if snapshot.geo_failures >= DEGRADED_FAILURE_THRESHOLD {
                    HealthStatus::Degraded(format!("{} geo lookup failures", snapshot.geo_failures))
                } else {
                    HealthStatus::Healthy
                }
            }
        }
    }
}

/// 워커 태스크 본체 -- 라인 수신부터 방출까지
struct Worker<R, S> {
    classifier: EventClassifier,
    enricher: GeoEnricher<R>,
    sink: S,
    stats: Arc<PipelineStats>,
    wait: Duration,
    started_at: SystemTime,
}

impl<R, S> Worker<R, S>
where
    R: LocationResolver,
    S: MetricSink,
{
    async fn run(self, mut rx: mpsc::Receiver<RawLine>, cancel: CancellationToken) {
        let mut warmup_logged = false;
        loop {
            let line = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("pipeline worker cancelled");
                    return;
                }
                line = rx.recv() => match line {
                    Some(line) => line,
                    None => {
                        debug!("all line senders dropped");
                        return;
                    }
                },
            };

            self.stats.lines_seen.fetch_add(1, Ordering::Relaxed);
            counter!(PIPELINE_LINES_TOTAL).increment(1);

            // warm-up은 라인마다 판정합니다. 기준 시각 이전에 관측된 라인은
            // (파일 처음부터 읽어 들인 과거 기록 포함) 언제 도착하든 버립니다.
            if !passes_warmup(line.observed_at, self.started_at, self.wait) {
                self.stats.warmup_discarded.fetch_add(1, Ordering::Relaxed);
                counter!(PIPELINE_WARMUP_DISCARDED_TOTAL).increment(1);
                continue;
            }
            if !warmup_logged {
                warmup_logged = true;
                info!("warm-up window passed; emitting live events");
            }

            self.handle_line(&line).await;
        }
    }

    async fn handle_line(&self, line: &RawLine) {
        let Some(event) = self.classifier.classify(line) else {
            return;
        };
        self.stats.events_classified.fetch_add(1, Ordering::Relaxed);
        counter!(PIPELINE_EVENTS_TOTAL, LABEL_TAG => event.tag.as_str()).increment(1);
        debug!(tag = %event.tag, ip = %event.source_ip, "classified auth event");

        let geo = match self.enricher.enrich(&event.source_ip) {
            Ok(Some(geo)) => geo,
            Ok(None) => {
                counter!(GEO_UNPARSEABLE_TOTAL).increment(1);
                return;
            }
            Err(e) => {
                self.stats.geo_failures.fetch_add(1, Ordering::Relaxed);
                counter!(GEO_LOOKUP_FAILURES_TOTAL).increment(1);
                warn!(ip = %event.source_ip, error = %e, "geo lookup failed; skipping event");
                return;
            }
        };

        let point = MetricPoint::from_event(event, geo);
        match self.sink.write(&point).await {
            Ok(()) => {
                self.stats.points_emitted.fetch_add(1, Ordering::Relaxed);
                counter!(SINK_POINTS_WRITTEN_TOTAL).increment(1);
            }
            Err(e) => {
                self.stats.sink_failures.fetch_add(1, Ordering::Relaxed);
                counter!(SINK_WRITE_FAILURES_TOTAL).increment(1);
                error!(error = %e, point = %point, "sink write failed; point lost");
            }
        }
    }
}

/// warm-up 판정: 기준 시각 이후 `wait`를 넘겨 관측된 라인만 통과합니다.
///
/// 경계는 배타적입니다 (`age == wait`는 아직 warm-up 중). 기준 시각 이전
/// 라인(`duration_since` 실패)은 무조건 버립니다.
fn passes_warmup(observed_at: SystemTime, started_at: SystemTime, wait: Duration) -> bool {
    match observed_at.duration_since(started_at) {
        Ok(age) => age > wait,
        Err(_) => false,
    }
}
