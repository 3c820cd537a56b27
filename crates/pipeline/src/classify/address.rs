//! 주소 추출기 -- 메시지에서 첫 IPv4 리터럴 추출
//!
//! 점으로 구분된 1~3자리 숫자 네 그룹을 찾습니다. 값 범위 검증은 하지
//! 않습니다 ("999.999.999.999"도 구문상 매칭). 범위를 벗어난 주소는
//! 이후 `IpAddr` 파싱 단계에서 걸러집니다.

use regex::Regex;

use crate::error::AuthPipelineError;

/// IPv4 리터럴 추출기
pub struct AddressExtractor {
    /// 점으로 구분된 4그룹 패턴
    pattern: Regex,
}

impl AddressExtractor {
    /// 새 추출기를 생성합니다.
    pub fn new() -> Result<Self, AuthPipelineError> {
        Ok(Self {
            pattern: Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}")?,
        })
    }

    /// 메시지에서 첫 번째 IPv4 리터럴을 찾습니다.
    pub fn first_ipv4<'a>(&self, message: &'a str) -> Option<&'a str> {
        self.pattern.find(message).map(|m| m.as_str())
    }
}
