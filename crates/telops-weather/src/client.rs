//! Telops site client.
//!
//! A fetch is two round-trips in one cookie session: load the landing page
//! to learn the current comet queue id, then post that id to the refresh
//! endpoint the way the page's own XHR does and read back the JSON record
//! list. No retries happen here.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, HOST, ORIGIN, REFERER};
use reqwest::{Client, Response};
use serde::Serialize;
use telops_core::{NetworkError, ReqwestErrorExt};
use tracing::instrument;
use url::Url;

use crate::error::StationError;
use crate::types::Record;

/// Refresh endpoint, relative to the site root.
pub const REFRESH_PATH: &str = "/dajaxice/netnode.refresh/";
/// Cookie marking the session as an interactive page view.
const SESSION_COOKIE: &str = "pushstate=pushed";
const USER_AGENT: &str = concat!("telops-weather/", env!("CARGO_PKG_VERSION"));

/// Something that can produce a refresh payload.
pub trait ReadingSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Record>, StationError>> + Send;
}

#[derive(Debug, Serialize)]
struct RefreshArgs {
    latest: u64,
}

#[allow(clippy::expect_used)]
fn queue_id_regex() -> &'static Regex {
    static QUEUE_ID: OnceLock<Regex> = OnceLock::new();
    QUEUE_ID.get_or_init(|| {
        // Literal pattern, cannot fail to compile.
        Regex::new(r"Telops\.latest_comet_queue_id = (.+?);").expect("valid queue id pattern")
    })
}

/// Pull the comet queue id out of the landing page.
pub fn parse_queue_id(page: &str) -> Result<u64, StationError> {
    let raw = queue_id_regex()
        .captures(page)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| {
            NetworkError::InvalidResponse("landing page has no comet queue id".to_string())
        })?
        .as_str();

    raw.trim().parse::<u64>().map_err(|_| {
        StationError::Network(NetworkError::InvalidResponse(format!(
            "comet queue id is not an integer: {:?}",
            raw
        )))
    })
}

fn network(e: reqwest::Error) -> StationError {
    StationError::Network(e.into_network_error())
}

fn header_value(value: &str) -> Result<HeaderValue, StationError> {
    HeaderValue::from_str(value)
        .map_err(|e| StationError::InvalidEndpoint(format!("{:?}: {}", value, e)))
}

#[derive(Debug, Clone)]
pub struct TelopsClient {
    landing_url: Url,
    refresh_url: Url,
    headers: HeaderMap,
    timeout: Duration,
}

impl TelopsClient {
    /// Client for the telops site rooted at `base_uri`.
    pub fn new(base_uri: &str, timeout: Duration) -> Result<Self, StationError> {
        let mut landing_url = Url::parse(base_uri)
            .map_err(|e| StationError::InvalidEndpoint(format!("{}: {}", base_uri, e)))?;
        landing_url.set_fragment(None);

        let host = landing_url
            .host_str()
            .ok_or_else(|| StationError::InvalidEndpoint(format!("{} has no host", base_uri)))?;
        let host = match landing_url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let origin = landing_url.origin().ascii_serialization();
        let refresh_url = landing_url
            .join(REFRESH_PATH)
            .map_err(|e| StationError::InvalidEndpoint(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(HOST, header_value(&host)?);
        headers.insert(ORIGIN, header_value(&origin)?);
        headers.insert(REFERER, header_value(&format!("{}/", origin))?);
        // The view insists on the field being present; an empty token passes.
        headers.insert("x-csrftoken", HeaderValue::from_static(""));
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));

        Ok(Self {
            landing_url,
            refresh_url,
            headers,
            timeout,
        })
    }

    pub fn landing_url(&self) -> &Url {
        &self.landing_url
    }

    pub fn refresh_url(&self) -> &Url {
        &self.refresh_url
    }

    /// Fresh HTTP client with its own cookie jar, primed with the session cookie.
    fn session(&self) -> Result<Client, StationError> {
        let jar = Jar::default();
        jar.add_cookie_str(SESSION_COOKIE, &self.refresh_url);

        Client::builder()
            .cookie_provider(Arc::new(jar))
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(network)
    }

    /// Run the landing + refresh exchange and decode the record list.
    #[instrument(skip(self), fields(url = %self.landing_url), level = "info")]
    pub async fn fetch_records(&self) -> Result<Vec<Record>, StationError> {
        let client = self.session()?;

        let landing = client
            .get(self.landing_url.clone())
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(network)?
            .text()
            .await
            .map_err(network)?;

        let queue_id = parse_queue_id(&landing)?;
        tracing::debug!("Comet queue id: {}", queue_id);

        let argv = serde_json::to_string(&RefreshArgs { latest: queue_id })
            .map_err(|e| StationError::parse(e.to_string()))?;

        let body = client
            .post(self.refresh_url.clone())
            .headers(self.headers.clone())
            .form(&[("argv", argv)])
            .send()
            .await
            .and_then(Response::error_for_status)
            .map_err(network)?
            .text()
            .await
            .map_err(network)?;

        let records: Vec<Record> = serde_json::from_str(&body).map_err(|e| {
            NetworkError::InvalidResponse(format!("refresh payload is not a record list: {}", e))
        })?;

        tracing::debug!("Refresh returned {} records", records.len());
        Ok(records)
    }
}

impl ReadingSource for TelopsClient {
    async fn fetch(&self) -> Result<Vec<Record>, StationError> {
        self.fetch_records().await
    }
}
