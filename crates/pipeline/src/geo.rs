//! 위치 조회 -- IP 주소를 지리 정보로 변환
//!
//! [`GeoEnricher`]는 주입된 [`LocationResolver`] 구현을 통해 분류된
//! 이벤트의 출발지 IP를 [`GeoRecord`]로 변환합니다.
//! 프로덕션 구현은 [`MaxmindResolver`] (GeoLite2-City mmdb)입니다.
//!
//! # 실패 정책
//! - IP 문자열이 주소로 파싱되지 않으면 `Ok(None)` — 조용히 건너뜁니다.
//!   (추출기는 범위 검증을 하지 않으므로 "999.999.999.999"가 여기까지 옵니다.)
//! - resolver 실패는 `Err`로 전파하고, 건너뛰기/격상 정책은 파이프라인이
//!   결정합니다. 조회 한 번 실패했다고 프로세스를 중단하지 않습니다.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::{MaxMindDBError, Reader, geoip2};
use tracing::debug;

use authmap_core::error::GeoError;
use authmap_core::event::GeoRecord;
use authmap_core::pipeline::LocationResolver;

/// 국가 이름 로케일 (단일 고정)
const COUNTRY_LOCALE: &str = "en";

/// GeoLite2-City 데이터베이스 기반 resolver
///
/// 데이터베이스 전체를 메모리에 올려 조회하므로 블로킹 비용이 작습니다.
pub struct MaxmindResolver {
    /// 로드된 mmdb 리더
    reader: Reader<Vec<u8>>,
}

impl MaxmindResolver {
    /// 경로에서 GeoLite2-City 데이터베이스를 엽니다.
    ///
    /// 파일이 없거나 형식이 잘못되면 에러입니다. 데몬은 이를 시작 전
    /// preflight 실패로 취급합니다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GeoError> {
        let path = path.as_ref();
        let reader = Reader::open_readfile(path).map_err(|e| GeoError::DatabaseOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { reader })
    }
}

impl LocationResolver for MaxmindResolver {
    fn resolve(&self, ip: IpAddr) -> Result<GeoRecord, GeoError> {
        let city: geoip2::City<'_> = self.reader.lookup(ip).map_err(|e| match e {
            MaxMindDBError::AddressNotFoundError(_) => GeoError::AddressNotFound {
                ip: ip.to_string(),
            },
            other => GeoError::Lookup {
                ip: ip.to_string(),
                reason: other.to_string(),
            },
        })?;

        let country_name = city
            .country
            .as_ref()
            .and_then(|country| country.names.as_ref())
            .and_then(|names| names.get(COUNTRY_LOCALE))
            .copied()
            .unwrap_or_default()
            .to_owned();

        let (latitude, longitude) = city
            .location
            .as_ref()
            .map(|loc| (loc.latitude.unwrap_or(0.0), loc.longitude.unwrap_or(0.0)))
            .unwrap_or((0.0, 0.0));

        Ok(GeoRecord {
            country_name,
            latitude,
            longitude,
        })
    }
}

/// Geo enricher -- 이벤트의 IP 문자열을 위치 레코드로 변환
pub struct GeoEnricher<R> {
    /// 주입된 resolver
    resolver: R,
}

impl<R: LocationResolver> GeoEnricher<R> {
    /// 새 enricher를 생성합니다.
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    /// IP 문자열을 위치 레코드로 변환합니다.
    ///
    /// - `Ok(None)`: IP가 주소로 파싱되지 않음 (이벤트 건너뛰기)
    /// - `Err`: resolver 실패 (정책 결정은 호출자 몫)
    pub fn enrich(&self, source_ip: &str) -> Result<Option<GeoRecord>, GeoError> {
        let ip: IpAddr = match source_ip.parse() {
            Ok(ip) => ip,
            Err(_) => {
                debug!(ip = source_ip, "extracted literal is not a valid address");
                return Ok(None);
            }
        };
        self.resolver.resolve(ip).map(Some)
    }
}
