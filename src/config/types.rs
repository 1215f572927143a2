use serde::{Deserialize, Serialize};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Connection settings for an admin client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        assert_eq!(ClientConfig::default().base_url, "http://localhost:8080");
    }

    #[test]
    fn deserialize_base_url() {
        let json = r#"{"baseUrl": "http://mocks.internal:9999"}"#;
        let cfg: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.base_url, "http://mocks.internal:9999");
    }

    #[test]
    fn deserialize_empty_object_uses_default() {
        let cfg: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn deserialize_is_lenient_with_unknown_fields() {
        let json = r#"{"baseUrl": "http://h:1", "timeoutMs": 5000}"#;
        let cfg: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.base_url, "http://h:1");
    }

    #[test]
    fn serialize_uses_camel_case() {
        let json = serde_json::to_value(ClientConfig::new("http://h:1")).unwrap();
        assert_eq!(json, serde_json::json!({"baseUrl": "http://h:1"}));
    }
}
