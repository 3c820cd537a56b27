//! 파이프라인 trait — 모듈 확장 포인트 정의

use std::net::IpAddr;

use crate::error::{AuthmapError, GeoError, SinkError};
use crate::event::{GeoRecord, MetricPoint};

/// 파이프라인 헬스 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// 정상 동작 중
    Healthy,
    /// 동작 중이나 주의 필요 (사유 포함)
    Degraded(String),
    /// 동작 불가 (사유 포함)
    Unhealthy(String),
}

/// 파이프라인 생명주기 trait
///
/// `authmap-daemon`은 이 trait을 통해 파이프라인을
/// start/stop/health_check 생명주기로 관리합니다.
#[allow(async_fn_in_trait)]
pub trait Pipeline {
    /// 파이프라인을 시작합니다. 이미 실행 중이면 에러를 반환합니다.
    async fn start(&mut self) -> Result<(), AuthmapError>;

    /// 파이프라인을 정지하고 백그라운드 태스크를 정리합니다.
    async fn stop(&mut self) -> Result<(), AuthmapError>;

    /// 현재 헬스 상태를 반환합니다.
    async fn health_check(&self) -> HealthStatus;
}

/// IP 주소를 지리 정보로 해석하는 trait
///
/// 동기/블로킹 계약입니다. 프로덕션 구현은 mmap된 GeoLite 데이터베이스를
/// 조회하므로 호출 비용이 충분히 작습니다. 테스트에서는 고정 응답
/// resolver를 주입합니다.
pub trait LocationResolver: Send + Sync {
    /// IP 주소의 위치 레코드를 조회합니다.
    ///
    /// 데이터베이스에 주소가 없거나 조회가 실패하면 에러를 반환하며,
    /// 처리 정책(건너뛰기/격상)은 호출자인 파이프라인이 결정합니다.
    fn resolve(&self, ip: IpAddr) -> Result<GeoRecord, GeoError>;
}

/// 메트릭 포인트를 기록하는 싱크 trait
///
/// 배치 없이 포인트 단위로 기록합니다. 쓰기 실패 시 파이프라인은
/// 기록을 남기고 계속 진행합니다 (관측 중단보다 포인트 유실이 낫습니다).
///
/// 반환 future는 워커 태스크에서 await하므로 `Send`여야 합니다.
pub trait MetricSink: Send + Sync {
    /// 메트릭 포인트 하나를 기록합니다.
    fn write(&self, point: &MetricPoint) -> impl Future<Output = Result<(), SinkError>> + Send;
}
