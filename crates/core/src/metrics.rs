//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `authmap_`
//! - 영역: `collector_`, `pipeline_`, `geo_`, `sink_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(authmap_core::metrics::PIPELINE_LINES_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 분류 태그 레이블 키 (accepted, good_disconnect, bad_disconnect, invalid_user)
pub const LABEL_TAG: &str = "tag";

// ─── Collector 메트릭 ──────────────────────────────────────────────

/// 수집기: 읽어들인 원시 라인 수 (counter)
pub const COLLECTOR_LINES_TOTAL: &str = "authmap_collector_lines_total";

/// 수집기: 감지한 파일 로테이션 수 (counter)
pub const COLLECTOR_ROTATIONS_TOTAL: &str = "authmap_collector_rotations_total";

/// 수집기: 길이 초과 등으로 버린 라인 수 (counter)
pub const COLLECTOR_LINES_DROPPED_TOTAL: &str = "authmap_collector_lines_dropped_total";

// ─── Pipeline 메트릭 ───────────────────────────────────────────────

/// 파이프라인: 수신한 전체 라인 수 (counter)
pub const PIPELINE_LINES_TOTAL: &str = "authmap_pipeline_lines_total";

/// 파이프라인: warm-up 윈도우에서 버린 라인 수 (counter)
pub const PIPELINE_WARMUP_DISCARDED_TOTAL: &str = "authmap_pipeline_warmup_discarded_total";

/// 파이프라인: 분류된 인증 이벤트 수 (counter, label: tag)
pub const PIPELINE_EVENTS_TOTAL: &str = "authmap_pipeline_events_total";

// ─── Geo 메트릭 ────────────────────────────────────────────────────

/// Geo: IP 파싱 실패로 건너뛴 이벤트 수 (counter)
pub const GEO_UNPARSEABLE_TOTAL: &str = "authmap_geo_unparseable_total";

/// Geo: 위치 조회 실패 수 (counter)
pub const GEO_LOOKUP_FAILURES_TOTAL: &str = "authmap_geo_lookup_failures_total";

// ─── Sink 메트릭 ───────────────────────────────────────────────────

/// 싱크: 기록된 메트릭 포인트 수 (counter)
pub const SINK_POINTS_WRITTEN_TOTAL: &str = "authmap_sink_points_written_total";

/// 싱크: 쓰기 실패 수 (counter)
pub const SINK_WRITE_FAILURES_TOTAL: &str = "authmap_sink_write_failures_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
/// 일반적으로 `authmap-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        COLLECTOR_LINES_TOTAL,
        "Total number of raw lines read from the auth log"
    );
    describe_counter!(
        COLLECTOR_ROTATIONS_TOTAL,
        "Total number of log file rotations detected"
    );
    describe_counter!(
        COLLECTOR_LINES_DROPPED_TOTAL,
        "Total number of lines dropped by the collector (oversized or invalid)"
    );
    describe_counter!(
        PIPELINE_LINES_TOTAL,
        "Total number of lines received by the pipeline"
    );
    describe_counter!(
        PIPELINE_WARMUP_DISCARDED_TOTAL,
        "Total number of lines discarded inside the warm-up window"
    );
    describe_counter!(
        PIPELINE_EVENTS_TOTAL,
        "Total number of classified auth events, labelled by tag"
    );
    describe_counter!(
        GEO_UNPARSEABLE_TOTAL,
        "Total number of events skipped because the extracted IP did not parse"
    );
    describe_counter!(
        GEO_LOOKUP_FAILURES_TOTAL,
        "Total number of failed geolocation lookups"
    );
    describe_counter!(
        SINK_POINTS_WRITTEN_TOTAL,
        "Total number of metric points written to the sink"
    );
    describe_counter!(
        SINK_WRITE_FAILURES_TOTAL,
        "Total number of failed sink writes"
    );
}
