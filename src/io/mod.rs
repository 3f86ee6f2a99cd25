pub mod config;
pub mod error;
pub mod lines;
pub mod message;
pub mod oauth;
pub mod upstream;

// Re-export commonly used types
pub use config::{CREDENTIALS_FILE, Credentials, PARAMETERS_FILE, Parameters};
pub use error::{ConfigError, UpstreamError};
pub use lines::MessageLines;
pub use message::StreamMessage;
pub use oauth::OAuthSigner;
pub use upstream::{DEFAULT_FILTER_URL, FilterStreamClient, MessageStream, Upstream};
