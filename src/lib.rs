pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod journal;
pub mod types;

pub use client::AdminClient;
pub use config::{load_config, ClientConfig, DEFAULT_BASE_URL};
pub use error::{AdminError, Expectation, VerificationError};
pub use journal::{AllLoggedRequests, LoggedRequest};
pub use types::{
    HeaderValues, MatchOperator, RequestMapping, ResponseDefinition, StubMapping, ValueMatcher,
};

