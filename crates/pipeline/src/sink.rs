//! 메트릭 싱크 -- InfluxDB v2 line protocol 쓰기
//!
//! [`InfluxSink`]는 [`MetricPoint`]를 line protocol 한 줄로 직렬화하여
//! `POST {url}/api/v2/write` 엔드포인트에 기록합니다 (ns 정밀도).
//!
//! # 방출 형식 (다운스트림 호환, 변경 금지)
//! ```text
//! authattempt,type=<tag>,ip=<ip> country="<name>",lat=<f64>,lon=<f64> <ts_ns>
//! ```

use std::time::{Duration, SystemTime};

use authmap_core::error::SinkError;
use authmap_core::event::{MEASUREMENT, MetricPoint};
use authmap_core::pipeline::MetricSink;

use authmap_core::config::InfluxConfig;

/// HTTP 요청 타임아웃
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 에러 응답 본문을 로그에 남길 때의 최대 길이
const MAX_ERROR_BODY: usize = 256;

/// InfluxDB v2 싱크
pub struct InfluxSink {
    /// 공유 HTTP 클라이언트
    client: reqwest::Client,
    /// 쓰기 엔드포인트 URL (`{base}/api/v2/write`)
    write_url: String,
    /// 조직 이름 (query parameter)
    org: String,
    /// 버킷 이름 (query parameter)
    bucket: String,
    /// API 토큰 (빈 문자열이면 Authorization 헤더 생략)
    token: String,
}

impl InfluxSink {
    /// 설정에서 새 싱크를 생성합니다.
    pub fn new(config: &InfluxConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            write_url: format!("{}/api/v2/write", config.url.trim_end_matches('/')),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
            token: config.token.clone(),
        })
    }
}

impl MetricSink for InfluxSink {
    async fn write(&self, point: &MetricPoint) -> Result<(), SinkError> {
        let body = to_line_protocol(point);

        let mut request = self
            .client
            .post(&self.write_url)
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body);
        if !self.token.is_empty() {
            request = request.header("Authorization", format!("Token {}", self.token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut reason = response.text().await.unwrap_or_default();
            reason.truncate(MAX_ERROR_BODY);
            return Err(SinkError::Write {
                status: status.as_u16(),
                reason,
            });
        }
        Ok(())
    }
}

/// 메트릭 포인트를 line protocol 한 줄로 직렬화합니다.
pub fn to_line_protocol(point: &MetricPoint) -> String {
    format!(
        "{MEASUREMENT},type={},ip={} country=\"{}\",lat={},lon={} {}",
        escape_tag_value(point.tag.as_str()),
        escape_tag_value(&point.ip),
        escape_field_string(&point.country),
        point.latitude,
        point.longitude,
        unix_nanos(point.timestamp),
    )
}

/// 태그 값 이스케이프: 쉼표, 등호, 공백
fn escape_tag_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | '=' | ' ') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 문자열 필드 값 이스케이프: 백슬래시, 큰따옴표
fn escape_field_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn unix_nanos(at: SystemTime) -> u128 {
    at.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use authmap_core::event::Tag;
    use std::time::Duration;

    fn sample_point() -> MetricPoint {
        MetricPoint {
            tag: Tag::Accepted,
            ip: "10.0.0.5".to_owned(),
            country: "United States".to_owned(),
            latitude: 38.0,
            longitude: -97.0,
            timestamp: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
        }
    }

    #[test]
    fn line_protocol_shape_is_stable() {
        let line = to_line_protocol(&sample_point());
        assert_eq!(
            line,
            "authattempt,type=accepted,ip=10.0.0.5 \
             country=\"United States\",lat=38,lon=-97 1700000000000000000",
        );
    }

    #[test]
    fn tag_values_are_escaped() {
        assert_eq!(escape_tag_value("a b,c=d"), r"a\ b\,c\=d");
    }

    #[test]
    fn field_strings_are_escaped() {
        assert_eq!(escape_field_string(r#"Côte d"Ivoire\"#), r#"Côte d\"Ivoire\\"#);
    }

    #[test]
    fn empty_country_is_an_empty_quoted_field() {
        let mut point = sample_point();
        point.country = String::new();
        let line = to_line_protocol(&point);
        assert!(line.contains("country=\"\""));
    }

    #[test]
    fn fractional_coordinates_keep_precision() {
        let mut point = sample_point();
        point.latitude = 37.5665;
        point.longitude = 126.978;
        let line = to_line_protocol(&point);
        assert!(line.contains("lat=37.5665"));
        assert!(line.contains("lon=126.978"));
    }

    #[test]
    fn sink_construction_from_default_config() {
        let sink = InfluxSink::new(&InfluxConfig::default()).unwrap();
        assert_eq!(sink.write_url, "http://influxdb:8086/api/v2/write");
    }
}
