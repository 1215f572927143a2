pub mod http_mock;

use mockadmin::{AdminClient, ClientConfig};

/// Address nothing listens on; connections are refused immediately.
#[allow(dead_code)]
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Build an async admin client pointing at `base_url`.
#[allow(dead_code)]
pub fn client_for(base_url: &str) -> AdminClient {
    AdminClient::new(ClientConfig::new(base_url)).unwrap()
}
