//! 분류기 벤치마크
//!
//! 한 라인당 비용(필터, 태그 매칭, IP 추출)을 측정합니다.
//! 인증 로그는 대부분 매칭되지 않는 라인이므로 탈락 경로가 중요합니다.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use authmap_core::event::RawLine;
use authmap_pipeline::EventClassifier;

fn bench_classify(c: &mut Criterion) {
    let classifier = EventClassifier::new().unwrap();

    let accepted = RawLine::new(
        "Jun  3 10:00:01 host sshd[4242]: Accepted publickey for alice from 203.0.113.1 port 50000 ssh2",
        "bench",
    );
    let invalid_user = RawLine::new(
        "Jun  3 10:00:04 host sshd[4244]: Connection closed by invalid user admin 203.0.113.4 port 50002 [preauth]",
        "bench",
    );
    let non_sshd = RawLine::new(
        "Jun  3 10:00:05 host systemd[1]: Started Session 12 of user alice.",
        "bench",
    );
    let untagged = RawLine::new(
        "Jun  3 10:00:06 host sshd[4242]: Failed password for root from 203.0.113.9 port 22 ssh2",
        "bench",
    );

    let mut group = c.benchmark_group("classify");
    group.bench_function("accepted", |b| {
        b.iter(|| classifier.classify(black_box(&accepted)))
    });
    group.bench_function("invalid_user", |b| {
        b.iter(|| classifier.classify(black_box(&invalid_user)))
    });
    group.bench_function("non_sshd_reject", |b| {
        b.iter(|| classifier.classify(black_box(&non_sshd)))
    });
    group.bench_function("untagged_reject", |b| {
        b.iter(|| classifier.classify(black_box(&untagged)))
    });
    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
