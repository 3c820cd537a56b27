//! 태그 매처 -- 순서가 고정된 분류 규칙 평가
//!
//! 내부 메시지를 [`Tag`]로 분류합니다. 규칙은 생성 시 한 번 컴파일되어
//! 불변 리스트로 유지되며, 선언된 순서대로 평가해 첫 매칭이 이깁니다.
//!
//! # 평가 순서 불변식
//! `good_disconnect`의 패턴("Disconnected from user")은 `bad_disconnect`의
//! 패턴("Disconnected from")의 진부분집합이므로 반드시 먼저 평가해야 합니다.
//! 순서 없는 맵 순회로 평가하면 두 태그가 실행마다 뒤바뀔 수 있습니다.

use authmap_core::event::Tag;
use regex::Regex;

use crate::error::AuthPipelineError;

/// 단일 분류 규칙
struct TagRule {
    /// 매칭 시 부여되는 태그
    tag: Tag,
    /// 컴파일된 패턴
    pattern: Regex,
}

/// 태그 매처 -- 순서 고정 first-match-wins 규칙 집합
///
/// 순수 값입니다. 전역 가변 상태를 갖지 않으며, 같은 입력에 대해
/// 언제나 같은 결과를 반환합니다.
pub struct TagMatcher {
    /// 평가 순서대로 정렬된 규칙 목록
    rules: Vec<TagRule>,
}

impl TagMatcher {
    /// 규칙 집합을 컴파일하여 새 매처를 생성합니다.
    pub fn new() -> Result<Self, AuthPipelineError> {
        // 순서가 곧 tie-break 정책입니다: good_disconnect가 bad_disconnect보다 먼저.
        let ordered: [(Tag, &str); 4] = [
            (Tag::Accepted, r"^Accepted"),
            (Tag::GoodDisconnect, r"^Disconnected from user"),
            (Tag::BadDisconnect, r"^Disconnected from"),
            (Tag::InvalidUser, r"^Connection closed|reset by invalid user"),
        ];

        let mut rules = Vec::with_capacity(ordered.len());
        for (tag, pattern) in ordered {
            rules.push(TagRule {
                tag,
                pattern: Regex::new(pattern)?,
            });
        }
        Ok(Self { rules })
    }

    /// 내부 메시지를 분류합니다.
    ///
    /// 어떤 규칙에도 매칭되지 않으면 `None`을 반환합니다
    /// (관심 대상 인증 이벤트가 아님, 에러 아님).
    pub fn classify(&self, message: &str) -> Option<Tag> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(message))
            .map(|rule| rule.tag)
    }

    /// 로드된 규칙 수를 반환합니다.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}
