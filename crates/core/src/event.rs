//! 인증 이벤트 도메인 타입
//!
//! 파이프라인 단계 간에 전달되는 데이터 구조를 정의합니다.
//! 흐름: [`RawLine`] → [`AuthEvent`] → ([`GeoRecord`]) → [`MetricPoint`].
//!
//! 어떤 타입도 한 라인의 처리 범위를 넘어 유지되지 않습니다.
//! 파이프라인은 반복 간에 상태를 갖지 않습니다 (warm-up 기준 시각 제외).

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// 방출되는 measurement 이름
///
/// 다운스트림 호환성을 위해 바뀌면 안 됩니다.
pub const MEASUREMENT: &str = "authattempt";

/// 인증 이벤트 분류 태그 — 닫힌 집합
///
/// 어떤 태그에도 매칭되지 않는 라인은 "관심 대상 아님"이며,
/// 기본값/폴백 태그는 존재하지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// 인증 성공 ("Accepted ...")
    Accepted,
    /// 정상 세션 종료 ("Disconnected from user ...")
    GoodDisconnect,
    /// 비정상 연결 종료 ("Disconnected from ...", user 없음)
    BadDisconnect,
    /// 유효하지 않은 사용자 시도 ("Connection closed ...", "... reset by invalid user")
    InvalidUser,
}

impl Tag {
    /// 방출 시 사용하는 태그 문자열 (measurement tag value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Accepted => "accepted",
            Tag::GoodDisconnect => "good_disconnect",
            Tag::BadDisconnect => "bad_disconnect",
            Tag::InvalidUser => "invalid_user",
        }
    }

    /// 모든 태그 (순서는 의미 없음, 테스트/등록용)
    pub const ALL: [Tag; 4] = [
        Tag::Accepted,
        Tag::GoodDisconnect,
        Tag::BadDisconnect,
        Tag::InvalidUser,
    ];
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 수집된 원시 로그 라인
///
/// 수집기가 생성하고 파이프라인이 한 번 소비하는 불변 데이터입니다.
#[derive(Debug, Clone)]
pub struct RawLine {
    /// 라인 텍스트 (개행 제외)
    pub text: String,
    /// 수집 시각 — warm-up 판정의 기준
    pub observed_at: SystemTime,
    /// 수집 소스 식별자 (예: "file:/var/log/auth.log")
    pub source: String,
}

impl RawLine {
    /// 현재 시각으로 새 RawLine을 생성합니다.
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            observed_at: SystemTime::now(),
            source: source.into(),
        }
    }

    /// 수집 시각을 명시적으로 지정합니다 (테스트, 재생 시나리오).
    pub fn with_observed_at(mut self, at: SystemTime) -> Self {
        self.observed_at = at;
        self
    }
}

/// 분류된 인증 이벤트
///
/// 불변식: 두 필드 모두 채워진 경우에만 생성됩니다. 필터/분류/IP 추출 중
/// 하나라도 실패한 라인은 AuthEvent를 만들지 않습니다 (부분 생성 없음).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    /// 분류 태그
    pub tag: Tag,
    /// 출발지 IPv4 리터럴 (문자열 형태, 범위 검증 없음)
    pub source_ip: String,
}

/// 위치 조회 결과
///
/// AuthEvent당 하나 생성되며 방출 직후 소멸합니다.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    /// 국가 표시 이름 (en 로케일, 없으면 빈 문자열)
    pub country_name: String,
    /// 위도 (데이터베이스에 없으면 0.0)
    pub latitude: f64,
    /// 경도 (데이터베이스에 없으면 0.0)
    pub longitude: f64,
}

/// 싱크로 전달되는 최종 메트릭 레코드
///
/// measurement는 [`MEASUREMENT`]로 고정이며, 타임스탬프는 방출 시각입니다
/// (원본 로그 라인의 시각이 아님). 싱크에 전달되는 순간 소유권이 넘어갑니다.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    /// 분류 태그 (tag: type)
    pub tag: Tag,
    /// 출발지 IP (tag: ip)
    pub ip: String,
    /// 국가 이름 (field: country)
    pub country: String,
    /// 위도 (field: lat)
    pub latitude: f64,
    /// 경도 (field: lon)
    pub longitude: f64,
    /// 방출 시각
    pub timestamp: SystemTime,
}

impl MetricPoint {
    /// 이벤트와 위치 레코드에서 메트릭 포인트를 만듭니다.
    ///
    /// 타임스탬프는 호출 시점(= 방출 시각)으로 찍습니다.
    pub fn from_event(event: AuthEvent, geo: GeoRecord) -> Self {
        Self {
            tag: event.tag,
            ip: event.source_ip,
            country: geo.country_name,
            latitude: geo.latitude,
            longitude: geo.longitude,
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Display for MetricPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{MEASUREMENT} type={} ip={} country={:?} lat={} lon={}",
            self.tag, self.ip, self.country, self.latitude, self.longitude,
        )
    }
}
