//! 이벤트 분류 모듈 -- 원시 라인을 정규화된 인증 이벤트로 변환
//!
//! # 아키텍처
//! - [`LineFilter`]: sshd 프로세스 마커 검사, 내부 메시지 추출
//! - [`TagMatcher`]: 순서 고정 규칙으로 태그 분류
//! - [`AddressExtractor`]: 첫 IPv4 리터럴 추출
//! - [`EventClassifier`]: 위 세 단계를 합성한 라인 → [`AuthEvent`] 변환
//!
//! 전 단계가 순수 함수입니다. 어떤 단계든 실패하면 이벤트가 생성되지
//! 않으며, 부분적으로 채워진 이벤트는 존재하지 않습니다.

pub mod address;
pub mod filter;
pub mod tags;

pub use address::AddressExtractor;
pub use filter::LineFilter;
pub use tags::TagMatcher;

use authmap_core::event::{AuthEvent, RawLine};

use crate::error::AuthPipelineError;

/// 이벤트 분류기 -- 필터 → 태그 매처 → 주소 추출기 합성
///
/// 규칙 집합은 생성 시 한 번 컴파일되어 이후 불변입니다.
/// 같은 [`RawLine`]에 대해 항상 같은 결과를 반환합니다 (숨은 상태 없음).
pub struct EventClassifier {
    /// sshd 라인 필터
    filter: LineFilter,
    /// 태그 분류 규칙
    tags: TagMatcher,
    /// IPv4 추출기
    address: AddressExtractor,
}

impl EventClassifier {
    /// 규칙을 컴파일하여 새 분류기를 생성합니다.
    pub fn new() -> Result<Self, AuthPipelineError> {
        Ok(Self {
            filter: LineFilter::new()?,
            tags: TagMatcher::new()?,
            address: AddressExtractor::new()?,
        })
    }

    /// 원시 라인을 분류합니다.
    ///
    /// 필터 탈락, 태그 미매칭, IP 미발견 중 하나라도 발생하면 `None`
    /// (태그는 붙었지만 IP를 못 찾은 라인도 자리표시자 없이 버립니다).
    pub fn classify(&self, line: &RawLine) -> Option<AuthEvent> {
        let message = self.filter.inner_message(&line.text)?;
        let tag = self.tags.classify(message)?;
        let source_ip = self.address.first_ipv4(message)?;
        Some(AuthEvent {
            tag,
            source_ip: source_ip.to_owned(),
        })
    }
}
