//! 로그 수집 모듈 -- 인증 로그 파일에서 원시 라인을 수집합니다.
//!
//! # 아키텍처
//! [`FileCollector`]는 자체 tokio 태스크에서 실행되며, 수집한 라인을
//! `tokio::mpsc::Sender<RawLine>` 채널을 통해 파이프라인으로 전달합니다.
//! 채널이 가득 차면 전송이 블로킹되어 자연스러운 backpressure가 걸립니다.
//!
//! 수집기는 느리고 무한한 시퀀스를 만들 뿐 해석하지 않습니다.
//! 필터링과 분류는 전부 파이프라인 쪽 책임입니다.

pub mod file;

pub use file::{FileCollector, FileCollectorConfig};
