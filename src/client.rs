use std::io::Read;

use flate2::read::GzDecoder;
use hyper::body::Buf;
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING};
use hyper::{Body, Client, Method, Request, Uri};
use hyper_tls::HttpsConnector;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::constants::{ALLOW_NULL_PARAMETER, LAST_DAYS_PARAMETER};
use crate::disease::{GovernmentDiseaseData, HistoricalData};
use crate::error::{Error, Result};
use crate::vaccination::VaccinationData;

/// HTTP client for the disease.sh and RKI vaccination APIs.
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    disease_url: String,
    vaccination_url: String,
}

impl ApiClient {
    pub(crate) fn new(disease_url: &str, vaccination_url: &str) -> Self {
        ApiClient {
            client: Client::builder().build::<_, Body>(HttpsConnector::new()),
            disease_url: disease_url.trim_end_matches('/').to_string(),
            vaccination_url: vaccination_url.trim_end_matches('/').to_string(),
        }
    }

    /// Latest government-published numbers for `country`, one row per province.
    /// `allow_null` asks upstream to send `null` instead of `0` for missing values.
    pub(crate) async fn fetch_government_data(
        &self,
        country: &str,
        allow_null: bool,
    ) -> Result<Vec<GovernmentDiseaseData>> {
        let country = urlencoding::encode(country);
        let uri = format!(
            "{}/gov/{country}?{ALLOW_NULL_PARAMETER}={allow_null}",
            self.disease_url
        );
        self.get_json(&uri).await
    }

    /// Vaccination progress for Germany and each federal state.
    pub(crate) async fn fetch_vaccination_data(&self) -> Result<VaccinationData> {
        let uri = format!("{}/api", self.vaccination_url);
        self.get_json(&uri).await
    }

    /// Daily case, death and recovery series for the last `last_days` days
    /// (upstream also accepts `all`).
    pub(crate) async fn fetch_historical_data(
        &self,
        country: &str,
        last_days: &str,
    ) -> Result<HistoricalData> {
        let country = urlencoding::encode(country);
        let last_days = urlencoding::encode(last_days);
        let uri = format!(
            "{}/historical/{country}?{LAST_DAYS_PARAMETER}={last_days}",
            self.disease_url
        );
        self.get_json(&uri).await
    }

    async fn get_json<T: DeserializeOwned>(&self, uri: &str) -> Result<T> {
        let request = Request::builder()
            .uri(uri.parse::<Uri>()?)
            .method(Method::GET)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_ENCODING, "gzip")
            .body(Body::empty())?;

        let resp = self.client.request(request).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status {
                uri: uri.to_string(),
                status,
            });
        }

        let gzipped = resp
            .headers()
            .get(CONTENT_ENCODING)
            .map_or(false, |encoding| encoding.as_bytes().eq_ignore_ascii_case(b"gzip"));

        let bytes = hyper::body::to_bytes(resp.into_body()).await?;
        debug!(uri, status = %status, len = bytes.len(), gzipped, "fetched");

        if gzipped {
            let mut decoded = Vec::new();
            GzDecoder::new(bytes.reader()).read_to_end(&mut decoded)?;
            Ok(serde_json::from_slice(&decoded)?)
        } else {
            Ok(serde_json::from_slice(&bytes)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use axum::extract::{Path, Query};
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;
    use crate::testutil::{mock_upstream, spawn_upstream};

    #[tokio::test]
    async fn fetches_government_data() {
        let base = spawn_upstream(mock_upstream());
        let client = ApiClient::new(&base, &base);

        let rows = client.fetch_government_data("de", false).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].province, "Total");
        assert_eq!(rows[1].cases, 1900000);
    }

    #[tokio::test]
    async fn passes_country_and_allow_null() {
        let app = Router::new().route(
            "/gov/:country",
            get(
                |Path(country): Path<String>, Query(query): Query<HashMap<String, String>>| async move {
                    let allow_null = query.get("allowNull").cloned().unwrap_or_default();
                    format!(r#"[{{"province": "{country}:{allow_null}"}}]"#)
                },
            ),
        );
        let base = spawn_upstream(app);
        let client = ApiClient::new(&base, &base);

        let rows = client.fetch_government_data("at", true).await.unwrap();

        assert_eq!(rows[0].province, "at:true");
    }

    #[tokio::test]
    async fn fetches_vaccination_data() {
        let base = spawn_upstream(mock_upstream());
        let client = ApiClient::new(&base, &format!("{base}/"));

        let data = client.fetch_vaccination_data().await.unwrap();

        assert_eq!(data.country.total, 83166711);
        assert_eq!(data.states["Bayern"].counts.vaccinated, 110000);
    }

    #[tokio::test]
    async fn fetches_historical_data() {
        let base = spawn_upstream(mock_upstream());
        let client = ApiClient::new(&base, &base);

        let data = client.fetch_historical_data("germany", "2").await.unwrap();

        assert_eq!(data.country, "germany");
        assert_eq!(data.timeline.cases.len(), 2);
    }

    #[tokio::test]
    async fn decodes_gzip_bodies() {
        let app = Router::new().route(
            "/api",
            get(|| async {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder
                    .write_all(br#"{"total": 42, "states": {}}"#)
                    .unwrap();
                let body = encoder.finish().unwrap();
                ([(header::CONTENT_ENCODING, "gzip")], body).into_response()
            }),
        );
        let base = spawn_upstream(app);
        let client = ApiClient::new(&base, &base);

        let data = client.fetch_vaccination_data().await.unwrap();

        assert_eq!(data.country.total, 42);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let app = Router::new().route(
            "/api",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = spawn_upstream(app);
        let client = ApiClient::new(&base, &base);

        let err = client.fetch_vaccination_data().await.unwrap_err();

        match err {
            Error::Status { status, uri } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert!(uri.ends_with("/api"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let app = Router::new().route("/gov/:country", get(|| async { "<html>" }));
        let base = spawn_upstream(app);
        let client = ApiClient::new(&base, &base);

        let err = client.fetch_government_data("de", false).await.unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn bad_base_url_is_rejected() {
        let client = ApiClient::new("not a url", "not a url");

        let err = client.fetch_vaccination_data().await.unwrap_err();

        assert!(matches!(err, Error::Uri(_)));
    }
}
