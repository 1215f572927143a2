use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{AdminError, Expectation, VerificationError};
use crate::journal::{AllLoggedRequests, LoggedRequest, RequestCount, StubMappingList};
use crate::types::{RequestMapping, StubMapping};

pub const MAPPINGS_PATH: &str = "/__admin/mappings";
pub const SAVE_MAPPINGS_PATH: &str = "/__admin/mappings/save";
pub const FIND_REQUESTS_PATH: &str = "/__admin/requests/find";
pub const COUNT_REQUESTS_PATH: &str = "/__admin/requests/count";
pub const RESET_REQUESTS_PATH: &str = "/__admin/requests/reset";
pub const RESET_PATH: &str = "/__admin/reset";
pub const RESET_SCENARIOS_PATH: &str = "/__admin/scenarios/reset";
pub const SHUTDOWN_PATH: &str = "/__admin/shutdown";

/// Substring the mapping listing must contain for the server to count as running.
/// Matches the server's pretty-printed output, including the space before the colon.
pub const RUNNING_MARKER: &str = "\"mappings\" :";

/// Async client for the mock server's admin API.
///
/// Each plain operation issues one request and never fails: transport errors are
/// logged at `warn` and the operation returns its default. The `try_` variants
/// return the same failures as [`AdminError`].
#[derive(Debug)]
pub struct AdminClient {
    client: reqwest::Client,
    base_url: RwLock<String>,
}

impl AdminClient {
    pub fn new(config: ClientConfig) -> Result<Self, AdminError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("mockadmin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdminError::Client(Box::new(e)))?;

        Ok(Self {
            client,
            base_url: RwLock::new(config.base_url),
        })
    }

    /// Client configured from `MOCKADMIN_BASE_URL` / `MOCKADMIN_CONFIG`.
    pub fn from_env() -> Result<Self, AdminError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> String {
        match self.base_url.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Point subsequent calls at another server. Calls already in flight keep
    /// the URL they started with.
    pub fn set_base_url(&self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        match self.base_url.write() {
            Ok(mut guard) => *guard = base_url,
            Err(poisoned) => *poisoned.into_inner() = base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, AdminError> {
        let raw = format!("{}{}", self.base_url().trim_end_matches('/'), path);
        let url = Url::parse(&raw).map_err(|e| AdminError::InvalidUrl {
            url: raw.clone(),
            detail: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(AdminError::InvalidUrl {
                url: raw,
                detail: format!("unsupported scheme '{scheme}'"),
            }),
        }
    }

    /// Send one admin request and return the body of a 2xx response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(Url, String), AdminError> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending admin request");

        let mut request = self.client.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdminError::ConnectionFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdminError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AdminError::ConnectionFailed {
                url: url.to_string(),
                source: Box::new(e),
            })?;
        Ok((url, text))
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<(), AdminError> {
        self.send::<()>(method, path, None).await.map(|_| ())
    }

    async fn fetch<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, AdminError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (url, text) = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| AdminError::Decode {
            url: url.to_string(),
            detail: e.to_string(),
        })
    }

    pub async fn try_create_mapping(&self, mapping: &StubMapping) -> Result<(), AdminError> {
        self.send(Method::POST, MAPPINGS_PATH, Some(mapping))
            .await
            .map(|_| ())
    }

    /// Register a stub mapping.
    pub async fn create_mapping(&self, mapping: &StubMapping) {
        settle("create_mapping", self.try_create_mapping(mapping).await);
    }

    pub async fn try_update_mapping(
        &self,
        id: Uuid,
        mapping: &StubMapping,
    ) -> Result<(), AdminError> {
        let path = format!("{MAPPINGS_PATH}/{id}");
        self.send(Method::PUT, &path, Some(mapping))
            .await
            .map(|_| ())
    }

    /// Replace the stub mapping registered under `id`.
    pub async fn update_mapping(&self, id: Uuid, mapping: &StubMapping) {
        settle("update_mapping", self.try_update_mapping(id, mapping).await);
    }

    pub async fn try_delete_mapping(&self, id: Uuid) -> Result<(), AdminError> {
        self.send_empty(Method::DELETE, &format!("{MAPPINGS_PATH}/{id}"))
            .await
    }

    pub async fn delete_mapping(&self, id: Uuid) {
        settle("delete_mapping", self.try_delete_mapping(id).await);
    }

    pub async fn try_list_mappings(&self) -> Result<Vec<StubMapping>, AdminError> {
        let list: StubMappingList = self.fetch::<(), _>(Method::GET, MAPPINGS_PATH, None).await?;
        Ok(list.mappings)
    }

    /// All registered stub mappings; empty if the server cannot be queried.
    pub async fn list_mappings(&self) -> Vec<StubMapping> {
        settle("list_mappings", self.try_list_mappings().await).unwrap_or_default()
    }

    pub async fn try_get_mapping(&self, id: Uuid) -> Result<StubMapping, AdminError> {
        self.fetch::<(), _>(Method::GET, &format!("{MAPPINGS_PATH}/{id}"), None)
            .await
    }

    pub async fn get_mapping(&self, id: Uuid) -> Option<StubMapping> {
        settle("get_mapping", self.try_get_mapping(id).await)
    }

    pub async fn try_find_requests(
        &self,
        filter: &RequestMapping,
    ) -> Result<Vec<LoggedRequest>, AdminError> {
        let all: AllLoggedRequests = self
            .fetch(Method::POST, FIND_REQUESTS_PATH, Some(filter))
            .await?;
        Ok(all.into_requests())
    }

    /// Journal entries matching `filter`, in server order. Empty on any failure.
    pub async fn find_requests(&self, filter: &RequestMapping) -> Vec<LoggedRequest> {
        settle("find_requests", self.try_find_requests(filter).await).unwrap_or_default()
    }

    pub async fn try_count_requests(&self, filter: &RequestMapping) -> Result<usize, AdminError> {
        let count: RequestCount = self
            .fetch(Method::POST, COUNT_REQUESTS_PATH, Some(filter))
            .await?;
        Ok(count.count)
    }

    /// Server-side count of journal entries matching `filter`.
    pub async fn count_requests(&self, filter: &RequestMapping) -> Option<usize> {
        settle("count_requests", self.try_count_requests(filter).await)
    }

    /// Fail unless at least one logged request matches `filter`.
    pub async fn verify(&self, filter: &RequestMapping) -> Result<(), VerificationError> {
        self.verify_expectation(Expectation::AtLeastOnce, filter)
            .await
    }

    /// Fail unless exactly `expected` logged requests match `filter`.
    pub async fn verify_count(
        &self,
        expected: usize,
        filter: &RequestMapping,
    ) -> Result<(), VerificationError> {
        self.verify_expectation(Expectation::Exactly(expected), filter)
            .await
    }

    async fn verify_expectation(
        &self,
        expected: Expectation,
        filter: &RequestMapping,
    ) -> Result<(), VerificationError> {
        let actual = self.find_requests(filter).await.len();
        check_expectation(expected, actual, filter)
    }

    pub async fn try_is_server_running(&self) -> Result<bool, AdminError> {
        let (_, body) = self.send::<()>(Method::GET, MAPPINGS_PATH, None).await?;
        Ok(body.contains(RUNNING_MARKER))
    }

    /// Health check: true only for a 2xx mapping listing containing [`RUNNING_MARKER`].
    pub async fn is_server_running(&self) -> bool {
        settle("is_server_running", self.try_is_server_running().await).unwrap_or(false)
    }

    pub async fn try_save_all_mappings(&self) -> Result<(), AdminError> {
        self.send_empty(Method::POST, SAVE_MAPPINGS_PATH).await
    }

    /// Ask the server to persist its current mappings.
    pub async fn save_all_mappings(&self) {
        settle("save_all_mappings", self.try_save_all_mappings().await);
    }

    pub async fn try_reset(&self) -> Result<(), AdminError> {
        self.send_empty(Method::POST, RESET_PATH).await
    }

    /// Drop all non-persistent mappings and clear the request journal.
    pub async fn reset(&self) {
        settle("reset", self.try_reset().await);
    }

    pub async fn try_reset_all_scenarios(&self) -> Result<(), AdminError> {
        self.send_empty(Method::POST, RESET_SCENARIOS_PATH).await
    }

    pub async fn reset_all_scenarios(&self) {
        settle("reset_all_scenarios", self.try_reset_all_scenarios().await);
    }

    pub async fn try_reset_requests(&self) -> Result<(), AdminError> {
        self.send_empty(Method::POST, RESET_REQUESTS_PATH).await
    }

    /// Clear the request journal, keeping mappings.
    pub async fn reset_requests(&self) {
        settle("reset_requests", self.try_reset_requests().await);
    }

    pub async fn try_shutdown_server(&self) -> Result<(), AdminError> {
        self.send_empty(Method::POST, SHUTDOWN_PATH).await
    }

    pub async fn shutdown_server(&self) {
        settle("shutdown_server", self.try_shutdown_server().await);
    }
}

/// Log a failed operation and discard the error.
fn settle<T>(operation: &'static str, result: Result<T, AdminError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(operation, code = e.code(), error = %e, "{operation} failed");
            None
        }
    }
}

fn check_expectation(
    expected: Expectation,
    actual: usize,
    filter: &RequestMapping,
) -> Result<(), VerificationError> {
    if expected.is_met_by(actual) {
        return Ok(());
    }
    Err(VerificationError {
        expected,
        actual,
        filter: filter.to_json_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> AdminClient {
        AdminClient::new(ClientConfig::new(base_url)).unwrap()
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let url = client("http://localhost:8080").endpoint(RESET_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/__admin/reset");
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let url = client("http://localhost:8080/").endpoint(RESET_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/__admin/reset");
    }

    #[test]
    fn endpoint_keeps_context_path() {
        let url = client("https://mocks.example.com/wiremock")
            .endpoint(MAPPINGS_PATH)
            .unwrap();
        assert_eq!(url.as_str(), "https://mocks.example.com/wiremock/__admin/mappings");
    }

    #[test]
    fn endpoint_rejects_invalid_url() {
        let err = client("not a url").endpoint(RESET_PATH).unwrap_err();
        assert_eq!(err.code(), "invalid_url");
        assert!(err.to_string().contains("Invalid admin URL"), "got: {err}");
    }

    #[test]
    fn endpoint_rejects_unsupported_scheme() {
        let err = client("ftp://localhost:8080").endpoint(RESET_PATH).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"), "got: {err}");
    }

    #[test]
    fn default_config_targets_localhost() {
        let client = AdminClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn set_base_url_replaces_target() {
        let client = client("http://localhost:8080");
        client.set_base_url("http://127.0.0.1:9090");
        assert_eq!(client.base_url(), "http://127.0.0.1:9090");
        let url = client.endpoint(SHUTDOWN_PATH).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9090/__admin/shutdown");
    }

    #[test]
    fn check_expectation_reports_filter() {
        let filter = RequestMapping::get().url("/ping");
        let err = check_expectation(Expectation::AtLeastOnce, 0, &filter).unwrap_err();
        assert_eq!(err.actual, 0);
        assert_eq!(err.filter, r#"{"method":"GET","url":"/ping"}"#);
        assert!(check_expectation(Expectation::Exactly(2), 2, &filter).is_ok());
    }

    #[test]
    fn settle_discards_error() {
        let result: Result<u8, AdminError> = Err(AdminError::Client("boom".into()));
        assert_eq!(settle("test_op", result), None);
        assert_eq!(settle("test_op", Ok::<u8, AdminError>(7)), Some(7));
    }

    #[tokio::test]
    async fn invalid_base_url_degrades_to_defaults() {
        let client = client("::not-a-url::");
        assert!(!client.is_server_running().await);
        assert!(client.find_requests(&RequestMapping::any()).await.is_empty());
        assert!(client.count_requests(&RequestMapping::any()).await.is_none());
        client.reset().await;
    }
}
