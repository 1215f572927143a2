use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::types::{HeaderValues, StubMapping};

/// A request the mock server actually received.
///
/// Only produced by decoding server responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct LoggedRequest {
    pub url: String,
    #[serde(default)]
    pub absolute_url: Option<String>,
    pub method: String,
    #[serde(default)]
    pub client_ip: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, HeaderValues>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub body_as_base64: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub logged_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub browser_proxy_request: bool,
}

impl LoggedRequest {
    /// First value of a header, looked up case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JournalMeta {
    pub total: usize,
}

/// The `{"requests": [...]}` envelope returned by journal queries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AllLoggedRequests {
    pub requests: Vec<LoggedRequest>,
    #[serde(default)]
    pub meta: Option<JournalMeta>,
    #[serde(default)]
    pub request_journal_disabled: bool,
}

impl AllLoggedRequests {
    pub fn into_requests(self) -> Vec<LoggedRequest> {
        self.requests
    }
}

/// `{"count": n}` from the request-count endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct RequestCount {
    pub count: usize,
}

/// `{"mappings": [...]}` from the mapping listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StubMappingList {
    #[serde(default)]
    pub mappings: Vec<StubMapping>,
}
