use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Header values as the server reports them: one string, or a list for repeated headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderValues {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValues {
    pub fn values(&self) -> Vec<&str> {
        match self {
            HeaderValues::Single(v) => vec![v.as_str()],
            HeaderValues::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        self.values().into_iter().next()
    }
}

/// A single match operator, serialized as `{"<operator>": <operand>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchOperator {
    EqualTo(String),
    Contains(String),
    Matches(String),
    DoesNotMatch(String),
    EqualToJson(serde_json::Value),
    MatchesJsonPath(String),
    EqualToXml(String),
    Absent(bool),
    /// Any operator not modelled above, kept as the raw matcher object
    /// (minus `caseInsensitive`) so it survives a decode/encode cycle.
    #[serde(skip)]
    Other(Map<String, Value>),
}

/// Matches a header, query parameter or body value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ValueMatcher {
    pub operator: MatchOperator,
    pub case_insensitive: Option<bool>,
}

const CASE_INSENSITIVE: &str = "caseInsensitive";

impl TryFrom<Map<String, Value>> for ValueMatcher {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let case_insensitive = match map.remove(CASE_INSENSITIVE) {
            None | Some(Value::Null) => None,
            Some(Value::Bool(flag)) => Some(flag),
            Some(other) => {
                return Err(format!("{CASE_INSENSITIVE} must be a boolean, got {other}"));
            }
        };
        if map.is_empty() {
            return Err("matcher has no operator".to_string());
        }
        // Known operators carry exactly one key; anything richer stays raw.
        let operator = if map.len() == 1 {
            match serde_json::from_value(Value::Object(map.clone())) {
                Ok(op) => op,
                Err(_) => MatchOperator::Other(map),
            }
        } else {
            MatchOperator::Other(map)
        };
        Ok(Self {
            operator,
            case_insensitive,
        })
    }
}

impl From<ValueMatcher> for Map<String, Value> {
    fn from(matcher: ValueMatcher) -> Self {
        let mut map = match matcher.operator {
            MatchOperator::Other(raw) => raw,
            known => match serde_json::to_value(known) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
        };
        if let Some(flag) = matcher.case_insensitive {
            map.insert(CASE_INSENSITIVE.to_string(), Value::Bool(flag));
        }
        map
    }
}

impl ValueMatcher {
    pub fn new(operator: MatchOperator) -> Self {
        Self {
            operator,
            case_insensitive: None,
        }
    }

    pub fn equal_to(value: impl Into<String>) -> Self {
        Self::new(MatchOperator::EqualTo(value.into()))
    }

    pub fn contains(value: impl Into<String>) -> Self {
        Self::new(MatchOperator::Contains(value.into()))
    }

    /// Regular expression match.
    pub fn matches(regex: impl Into<String>) -> Self {
        Self::new(MatchOperator::Matches(regex.into()))
    }

    pub fn does_not_match(regex: impl Into<String>) -> Self {
        Self::new(MatchOperator::DoesNotMatch(regex.into()))
    }

    pub fn equal_to_json(value: serde_json::Value) -> Self {
        Self::new(MatchOperator::EqualToJson(value))
    }

    pub fn matches_json_path(path: impl Into<String>) -> Self {
        Self::new(MatchOperator::MatchesJsonPath(path.into()))
    }

    pub fn equal_to_xml(value: impl Into<String>) -> Self {
        Self::new(MatchOperator::EqualToXml(value.into()))
    }

    pub fn absent() -> Self {
        Self::new(MatchOperator::Absent(true))
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = Some(true);
        self
    }
}

/// Describes which requests a stub answers, or which journal entries a query returns.
///
/// At most one URL matcher is set; each `url*` builder replaces the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMapping {
    #[serde(default = "any_method")]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_path_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query_parameters: BTreeMap<String, ValueMatcher>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_patterns: Vec<ValueMatcher>,
}

fn any_method() -> String {
    "ANY".to_string()
}

impl Default for RequestMapping {
    fn default() -> Self {
        Self::any()
    }
}

impl RequestMapping {
    /// Matches requests with the given HTTP method (upper-cased).
    pub fn method(method: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: None,
            url_pattern: None,
            url_path: None,
            url_path_pattern: None,
            headers: BTreeMap::new(),
            query_parameters: BTreeMap::new(),
            body_patterns: Vec::new(),
        }
    }

    /// Matches every method.
    pub fn any() -> Self {
        Self::method("ANY")
    }

    pub fn get() -> Self {
        Self::method("GET")
    }

    pub fn post() -> Self {
        Self::method("POST")
    }

    pub fn put() -> Self {
        Self::method("PUT")
    }

    pub fn delete() -> Self {
        Self::method("DELETE")
    }

    fn clear_url(mut self) -> Self {
        self.url = None;
        self.url_pattern = None;
        self.url_path = None;
        self.url_path_pattern = None;
        self
    }

    /// Exact match on path and query.
    pub fn url(self, url: impl Into<String>) -> Self {
        let mut this = self.clear_url();
        this.url = Some(url.into());
        this
    }

    /// Regex match on path and query.
    pub fn url_pattern(self, pattern: impl Into<String>) -> Self {
        let mut this = self.clear_url();
        this.url_pattern = Some(pattern.into());
        this
    }

    /// Exact match on the path only.
    pub fn url_path(self, path: impl Into<String>) -> Self {
        let mut this = self.clear_url();
        this.url_path = Some(path.into());
        this
    }

    /// Regex match on the path only.
    pub fn url_path_pattern(self, pattern: impl Into<String>) -> Self {
        let mut this = self.clear_url();
        this.url_path_pattern = Some(pattern.into());
        this
    }

    pub fn header(mut self, name: impl Into<String>, matcher: ValueMatcher) -> Self {
        self.headers.insert(name.into(), matcher);
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, matcher: ValueMatcher) -> Self {
        self.query_parameters.insert(name.into(), matcher);
        self
    }

    pub fn body(mut self, matcher: ValueMatcher) -> Self {
        self.body_patterns.push(matcher);
        self
    }

    /// Compact JSON form, used in verification messages.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

/// The canned response a stub returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDefinition {
    #[serde(default = "ok_status")]
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_body: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, HeaderValues>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_delay_milliseconds: Option<u64>,
}

fn ok_status() -> u16 {
    200
}

impl Default for ResponseDefinition {
    fn default() -> Self {
        Self::new(ok_status())
    }
}

impl ResponseDefinition {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            status_message: None,
            body: None,
            json_body: None,
            headers: BTreeMap::new(),
            fixed_delay_milliseconds: None,
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn status_message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }

    /// Plain-text body. Clears any JSON body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.json_body = None;
        self
    }

    /// JSON body. Clears any plain-text body.
    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.json_body = Some(body);
        self.body = None;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into(), HeaderValues::Single(value.into()));
        self
    }

    /// Repeated header, e.g. several `Set-Cookie` lines.
    pub fn header_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.headers
            .insert(name.into(), HeaderValues::Multiple(values));
        self
    }

    pub fn fixed_delay_ms(mut self, millis: u64) -> Self {
        self.fixed_delay_milliseconds = Some(millis);
        self
    }
}

/// A request matcher paired with a canned response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub request: RequestMapping,
    pub response: ResponseDefinition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_scenario_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_scenario_state: Option<String>,
}

impl StubMapping {
    pub fn new(request: RequestMapping, response: ResponseDefinition) -> Self {
        Self {
            id: None,
            name: None,
            request,
            response,
            priority: None,
            persistent: None,
            scenario_name: None,
            required_scenario_state: None,
            new_scenario_state: None,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Assign a fresh random id, so the mapping can later be updated or deleted.
    pub fn with_random_id(self) -> Self {
        self.with_id(Uuid::new_v4())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lower values win when several stubs match.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Persist the mapping when the server saves its mappings.
    pub fn persistent(mut self, persistent: bool) -> Self {
        self.persistent = Some(persistent);
        self
    }

    pub fn in_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario_name = Some(scenario.into());
        self
    }

    pub fn when_scenario_state_is(mut self, state: impl Into<String>) -> Self {
        self.required_scenario_state = Some(state.into());
        self
    }

    pub fn will_set_state_to(mut self, state: impl Into<String>) -> Self {
        self.new_scenario_state = Some(state.into());
        self
    }
}
