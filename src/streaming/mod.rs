pub mod backoff;
pub mod error;
pub mod session;
pub mod supervisor;

pub use backoff::{ReconnectConfig, ReconnectPolicy};
pub use error::{AbortOnError, ErrorPolicy, PayloadError, SessionError, SkipErrors};
pub use session::{SessionReport, SessionState, SessionStats, StreamSession};
pub use supervisor::{CONNECTION_ERROR, Supervisor, SupervisorConfig};
