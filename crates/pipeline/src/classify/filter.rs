//! 라인 필터 -- sshd 프로세스 마커 검사 및 내부 메시지 추출
//!
//! `sshd[<pid>]: ` 마커(콜론 뒤 공백 필수)가 있는 라인만 통과시키고,
//! 공백 이후의 내부 메시지를 돌려줍니다. 다른 프로세스의 라인은
//! 에러가 아니라 정상적인 "건너뛰기"로 거부됩니다.

use regex::Regex;

use crate::error::AuthPipelineError;

/// sshd 라인 필터
///
/// 마커 정규식은 생성 시 한 번만 컴파일합니다.
pub struct LineFilter {
    /// `sshd[<pid>]: ` 프로세스 마커, 뒤따르는 공백까지 소비
    marker: Regex,
}

impl LineFilter {
    /// 새 필터를 생성합니다.
    pub fn new() -> Result<Self, AuthPipelineError> {
        Ok(Self {
            marker: Regex::new(r"sshd\[[0-9]+\]: +")?,
        })
    }

    /// 라인에서 sshd 내부 메시지를 추출합니다.
    ///
    /// 마커가 없거나(콜론 뒤 공백 없는 변형 포함), 마커 뒤에 공백뿐이면
    /// `None`을 반환합니다 (빈 메시지 이벤트를 만들지 않습니다).
    pub fn inner_message<'a>(&self, line: &'a str) -> Option<&'a str> {
        let marker = self.marker.find(line)?;
        let rest = &line[marker.end()..];
        if rest.is_empty() { None } else { Some(rest) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> LineFilter {
        LineFilter::new().unwrap()
    }

    #[test]
    fn extracts_message_after_marker() {
        let line = "May  1 10:00:00 host sshd[1234]: Accepted publickey for bob from 10.0.0.5";
        assert_eq!(
            filter().inner_message(line),
            Some("Accepted publickey for bob from 10.0.0.5"),
        );
    }

    #[test]
    fn rejects_lines_from_other_processes() {
        assert_eq!(
            filter().inner_message("May  1 10:00:00 host kernel: some unrelated message"),
            None,
        );
    }

    #[test]
    fn rejects_marker_without_pid() {
        assert_eq!(filter().inner_message("host sshd: no pid here"), None);
    }

    #[test]
    fn rejects_colon_without_trailing_space() {
        // 콜론 바로 뒤에 메시지가 붙은 변형은 마커로 인정하지 않습니다
        assert_eq!(
            filter().inner_message("host sshd[99]:Accepted publickey from 1.2.3.4"),
            None,
        );
    }

    #[test]
    fn marker_with_only_whitespace_yields_none() {
        assert_eq!(filter().inner_message("host sshd[99]:    "), None);
        assert_eq!(filter().inner_message("host sshd[99]:"), None);
    }

    #[test]
    fn multiple_spaces_after_colon_are_consumed() {
        assert_eq!(
            filter().inner_message("host sshd[7]:   Connection closed by 1.2.3.4"),
            Some("Connection closed by 1.2.3.4"),
        );
    }
}
